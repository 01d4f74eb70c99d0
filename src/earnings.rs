use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::{Expense, Load};

/// How a driver's earnings are derived from a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum EarningProfile {
    OwnerOperator,
    SoloPerMile,
    TeamPerMile,
    SoloPercentage,
    TeamPercentage,
}

impl EarningProfile {
    pub const ALL: [EarningProfile; 5] = [
        Self::OwnerOperator,
        Self::SoloPerMile,
        Self::TeamPerMile,
        Self::SoloPercentage,
        Self::TeamPercentage,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::OwnerOperator => "owner_operator",
            Self::SoloPerMile => "solo_per_mile",
            Self::TeamPerMile => "team_per_mile",
            Self::SoloPercentage => "solo_percentage",
            Self::TeamPercentage => "team_percentage",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// Unknown profile names (and non-strings) decode as `None`, which pays the
/// gross amount.
pub fn lenient_profile<'de, D>(deserializer: D) -> std::result::Result<Option<EarningProfile>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => EarningProfile::from_key(s.trim()),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayProfile {
    pub earning_profile: Option<EarningProfile>,
    pub rate_per_mile: Option<f64>,
    pub percentage_rate: Option<f64>,
}

impl PayProfile {
    pub fn new(profile: EarningProfile, rate_per_mile: f64, percentage_rate: f64) -> Self {
        Self {
            earning_profile: Some(profile),
            rate_per_mile: Some(rate_per_mile),
            percentage_rate: Some(percentage_rate),
        }
    }
}

/// Driver earnings for a single load under the given pay profile.
pub fn calculate_earnings(load: &Load, profile: Option<&PayProfile>) -> f64 {
    let Some(profile) = profile else {
        return load.gross();
    };
    let rate = profile.rate_per_mile.unwrap_or(0.0);
    let pct = profile.percentage_rate.unwrap_or(0.0);

    match profile.earning_profile {
        Some(EarningProfile::OwnerOperator) => {
            if pct > 0.0 && pct < 100.0 {
                load.gross() * (pct / 100.0)
            } else {
                load.gross()
            }
        }
        Some(EarningProfile::SoloPerMile | EarningProfile::TeamPerMile) => load.miles() * rate,
        Some(EarningProfile::SoloPercentage | EarningProfile::TeamPercentage) => {
            load.gross() * (pct / 100.0)
        }
        None => load.gross(),
    }
}

pub fn total_earnings<'a, I>(loads: I, profile: Option<&PayProfile>) -> f64
where
    I: IntoIterator<Item = &'a Load>,
{
    loads
        .into_iter()
        .map(|l| calculate_earnings(l, profile))
        .sum()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub total_earnings: f64,
    pub total_expenses: f64,
    pub net_revenue: f64,
    pub total_miles: f64,
    pub total_deadhead: f64,
    pub total_trips: usize,
    pub avg_per_mile: f64,
    pub avg_per_trip: f64,
    pub deadhead_ratio: f64,
}

pub fn calculate_metrics(loads: &[Load], expenses: &[Expense], profile: Option<&PayProfile>) -> Metrics {
    let mut total_earnings = 0.0f64;
    let mut total_miles = 0.0f64;
    let mut total_deadhead = 0.0f64;
    for load in loads {
        total_earnings += calculate_earnings(load, profile);
        total_miles += load.miles();
        total_deadhead += load.deadhead();
    }
    let total_expenses: f64 = expenses.iter().map(Expense::value).sum();
    let total_trips = loads.len();
    let all_miles = total_miles + total_deadhead;

    Metrics {
        total_earnings,
        total_expenses,
        net_revenue: total_earnings - total_expenses,
        total_miles,
        total_deadhead,
        total_trips,
        avg_per_mile: if total_miles > 0.0 { total_earnings / total_miles } else { 0.0 },
        avg_per_trip: if total_trips > 0 { total_earnings / total_trips as f64 } else { 0.0 },
        deadhead_ratio: if all_miles > 0.0 { total_deadhead / all_miles * 100.0 } else { 0.0 },
    }
}
