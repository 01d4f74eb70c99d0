mod address;
mod cli;
mod convert;
mod earnings;
mod error;
mod fmt;
mod models;
mod reports;
mod settings;

use clap::Parser;

use cli::{Cli, Commands, SettingsCommands};

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            status,
        } => cli::convert::run(&input, &output, status),
        Commands::Normalize { addresses } => cli::normalize::run(&addresses),
        Commands::Summary {
            file,
            rpm_period,
            pay,
        } => cli::report::summary(&file, rpm_period, &pay),
        Commands::Analytics { file, by, pay } => cli::report::analytics(&file, by, &pay),
        Commands::Expenses {
            file,
            category,
            period,
        } => cli::report::expenses(&file, category, period),
        Commands::Loads {
            file,
            period,
            search,
            status,
            pay,
        } => cli::report::loads(&file, period, search.as_deref(), status, &pay),
        Commands::Settings { command } => match command {
            SettingsCommands::Show => cli::settings::show(),
            SettingsCommands::Set {
                pay,
                driver_name,
                company_name,
            } => cli::settings::set(&pay, driver_name, company_name),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
