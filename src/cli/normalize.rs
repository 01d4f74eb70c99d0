use comfy_table::{Cell, Table};

use crate::address::parse_city_state;
use crate::error::Result;

pub fn format_addresses(addresses: &[String]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Input", "City", "State"]);
    for raw in addresses {
        let parsed = parse_city_state(raw);
        table.add_row(vec![
            Cell::new(raw),
            Cell::new(&parsed.city),
            Cell::new(parsed.state.unwrap_or("(unresolved)")),
        ]);
    }
    table.to_string()
}

pub fn run(addresses: &[String]) -> Result<()> {
    println!("{}", format_addresses(addresses));
    Ok(())
}
