use comfy_table::{Cell, Table};

use crate::cli::PayArgs;
use crate::error::Result;
use crate::fmt::money;
use crate::settings::{load_settings, save_settings, settings_path, validate, Settings, SettingsOverlay};

pub fn format_settings(settings: &Settings) -> String {
    let or_unset = |s: &str| if s.is_empty() { "(not set)".to_string() } else { s.to_string() };
    let mut table = Table::new();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec![Cell::new("Earning profile"), Cell::new(settings.profile_key())]);
    table.add_row(vec![Cell::new("Rate per mile"), Cell::new(money(settings.rate_per_mile))]);
    table.add_row(vec![
        Cell::new("Percentage rate"),
        Cell::new(format!("{}%", settings.percentage_rate)),
    ]);
    table.add_row(vec![Cell::new("Driver"), Cell::new(or_unset(&settings.driver_name))]);
    table.add_row(vec![Cell::new("Company"), Cell::new(or_unset(&settings.company_name))]);
    table.to_string()
}

pub fn show() -> Result<()> {
    let path = settings_path();
    let settings = load_settings();
    println!("Settings:   {}", path.display());
    if !path.exists() {
        println!("(file not found, showing defaults)");
    }
    println!("{}", format_settings(&settings));
    Ok(())
}

pub fn set(pay: &PayArgs, driver_name: Option<String>, company_name: Option<String>) -> Result<()> {
    let overlay = SettingsOverlay {
        driver_name,
        company_name,
        ..pay.overlay()
    };
    validate(&overlay)?;

    let mut settings = load_settings();
    settings.apply(&overlay);
    save_settings(&settings)?;

    println!("Saved {}", settings_path().display());
    println!("{}", format_settings(&settings));
    Ok(())
}
