pub mod convert;
pub mod normalize;
pub mod report;
pub mod settings;

use std::convert::Infallible;
use std::path::Path;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use crate::earnings::EarningProfile;
use crate::error::{Result, TruckflowError};
use crate::models::{BackupDocument, ExpenseCategory, LoadStatus};
use crate::reports::{GroupBy, Period};
use crate::settings::SettingsOverlay;

pub const DEFAULT_INPUT: &str = "loads.json";
pub const DEFAULT_OUTPUT: &str = "truckflow-import.json";

/// Read a backup-shaped document (or a bare array of loads) for reporting.
/// Period names as typed on the command line; anything unrecognized means
/// every record.
pub(crate) fn period_arg(name: &str) -> std::result::Result<Period, Infallible> {
    if !Period::is_known(name) {
        log::warn!("unrecognized period {name:?}, showing all records");
    }
    Ok(Period::parse(name))
}

pub(crate) fn read_document(path: &Path) -> Result<BackupDocument> {
    let content = std::fs::read_to_string(path)?;
    let source: Value = serde_json::from_str(&content)?;
    let doc = BackupDocument::from_value(&source).ok_or(TruckflowError::MissingLoads)?;
    log::info!(
        "read {} loads and {} expenses from {}",
        doc.loads.len(),
        doc.expenses.len(),
        path.display()
    );
    Ok(doc)
}

#[derive(Parser)]
#[command(name = "truckflow", version, about = "Load conversion and earnings reports for truck drivers.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Pay profile overrides; anything left unset comes from the document's
/// settings or the settings file.
#[derive(Args, Debug, Clone, Default)]
pub struct PayArgs {
    /// Earning profile
    #[arg(long, value_enum)]
    pub profile: Option<EarningProfile>,
    /// Rate per loaded mile (per-mile profiles)
    #[arg(long = "rate-per-mile")]
    pub rate_per_mile: Option<f64>,
    /// Percentage of gross (percentage profiles, optional for owner operators)
    #[arg(long = "percentage-rate")]
    pub percentage_rate: Option<f64>,
}

impl PayArgs {
    pub fn overlay(&self) -> SettingsOverlay {
        SettingsOverlay {
            earning_profile: self.profile.map(Some),
            rate_per_mile: self.rate_per_mile,
            percentage_rate: self.percentage_rate,
            ..Default::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a legacy load export into the app's backup/import format.
    Convert {
        /// Source JSON file with a "loads" array (or a bare array)
        #[arg(default_value = DEFAULT_INPUT)]
        input: String,
        /// Where to write the import document
        #[arg(default_value = DEFAULT_OUTPUT)]
        output: String,
        /// Status assigned to every converted load
        #[arg(long, value_enum, default_value = "delivered")]
        status: LoadStatus,
    },
    /// Show how free-text locations split into city and state.
    Normalize {
        /// One or more locations, e.g. "Arrey, NM 87930"
        #[arg(required = true)]
        addresses: Vec<String>,
    },
    /// Dashboard: period earnings and overall performance metrics.
    Summary {
        /// Backup document to read
        file: String,
        /// Period for the RPM figure, matched on delivery date
        /// (all, today, this-week, this-month, this-year)
        #[arg(long = "rpm-period", value_parser = period_arg, default_value = "all")]
        rpm_period: Period,
        #[command(flatten)]
        pay: PayArgs,
    },
    /// Revenue breakdown by broker or by pickup day/week/month/year.
    Analytics {
        /// Backup document to read
        file: String,
        /// Grouping key
        #[arg(long, value_enum, default_value = "month")]
        by: GroupBy,
        #[command(flatten)]
        pay: PayArgs,
    },
    /// Expense totals by category.
    Expenses {
        /// Backup document to read
        file: String,
        /// Only this category
        #[arg(long, value_enum)]
        category: Option<ExpenseCategory>,
        /// Only expenses dated in this period
        #[arg(long, value_parser = period_arg, default_value = "all")]
        period: Period,
    },
    /// Loads grouped by week, newest first, with weekly subtotals.
    Loads {
        /// Backup document to read
        file: String,
        /// Only loads picked up in this period
        #[arg(long, value_parser = period_arg, default_value = "all")]
        period: Period,
        /// Case-insensitive match on load ID, broker, or pickup/delivery city
        #[arg(long)]
        search: Option<String>,
        /// Only loads with this status
        #[arg(long, value_enum)]
        status: Option<LoadStatus>,
        #[command(flatten)]
        pay: PayArgs,
    },
    /// Show or change saved settings.
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Print the settings file location and current values.
    Show,
    /// Update saved settings.
    Set {
        #[command(flatten)]
        pay: PayArgs,
        /// Driver name shown on reports
        #[arg(long = "driver-name")]
        driver_name: Option<String>,
        /// Company name shown on reports
        #[arg(long = "company-name")]
        company_name: Option<String>,
    },
}
