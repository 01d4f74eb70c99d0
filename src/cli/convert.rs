use std::path::PathBuf;

use colored::Colorize;

use crate::convert::convert_file;
use crate::error::Result;
use crate::models::LoadStatus;

pub fn run(input: &str, output: &str, status: LoadStatus) -> Result<()> {
    let input_path = PathBuf::from(input);
    let output_path = PathBuf::from(output);

    let result = convert_file(&input_path, &output_path, status)?;

    println!(
        "Converted {} loads → {}",
        result.document.loads.len(),
        output_path.display()
    );

    for unresolved in &result.unresolved {
        eprintln!("{}", unresolved.to_string().yellow());
    }
    Ok(())
}
