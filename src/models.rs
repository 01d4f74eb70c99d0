use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::settings::SettingsOverlay;

pub const BACKUP_VERSION: &str = "1.0";

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------

/// Numbers and numeric strings decode to a value; null, absent, and anything
/// else decode to `None` and are treated as zero by the calculations.
pub fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| number_from_value(&v)))
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Whole numbers are written without a fraction (`300`, not `300.0`) so the
/// output matches what the app itself exports.
pub fn compact_number<S>(value: &Option<f64>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(n) if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => {
            serializer.serialize_i64(*n as i64)
        }
        Some(n) => serializer.serialize_f64(*n),
        None => serializer.serialize_none(),
    }
}

/// Strings pass through, numbers are rendered, everything else is empty.
pub fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Parse an ISO-ish date: `YYYY-MM-DD`, RFC 3339 (converted to local time),
/// or a naive `YYYY-MM-DDTHH:MM:SS` timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One record from the legacy load export, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLoad {
    #[serde(default, deserialize_with = "lenient_text")]
    pub load_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub broker: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub origin: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub destination: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub pu_date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub do_date: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub miles: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub deadhead: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    Pending,
    Delivered,
}

impl LoadStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Delivered => "Delivered",
        }
    }
}

fn lenient_status<'de, D>(deserializer: D) -> std::result::Result<LoadStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if s.eq_ignore_ascii_case("delivered") => LoadStatus::Delivered,
        _ => LoadStatus::Pending,
    })
}

/// A normalized load as stored by the app and written by `convert`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Load {
    #[serde(default, deserialize_with = "lenient_text")]
    pub load_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub broker_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub pickup_city: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub pickup_state: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub delivery_city: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub delivery_state: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub pickup_date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub delivery_date: String,
    #[serde(default, deserialize_with = "lenient_number", serialize_with = "compact_number")]
    pub loaded_miles: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", serialize_with = "compact_number")]
    pub deadhead_miles: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", serialize_with = "compact_number")]
    pub gross_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: String,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: LoadStatus,
}

impl Load {
    pub fn miles(&self) -> f64 {
        self.loaded_miles.unwrap_or(0.0)
    }

    pub fn deadhead(&self) -> f64 {
        self.deadhead_miles.unwrap_or(0.0)
    }

    pub fn gross(&self) -> f64 {
        self.gross_amount.unwrap_or(0.0)
    }

    pub fn pickup(&self) -> Option<NaiveDate> {
        parse_date(&self.pickup_date)
    }

    pub fn delivery(&self) -> Option<NaiveDate> {
        parse_date(&self.delivery_date)
    }

    /// Delivery date, or pickup date for loads not yet delivered.
    pub fn service_date(&self) -> Option<NaiveDate> {
        self.delivery().or_else(|| self.pickup())
    }

    pub fn route(&self) -> String {
        format!(
            "{} → {}",
            place(&self.pickup_city, &self.pickup_state),
            place(&self.delivery_city, &self.delivery_state)
        )
    }
}

fn place(city: &str, state: &str) -> String {
    match (city.is_empty(), state.is_empty()) {
        (false, false) => format!("{city}, {state}"),
        (false, true) => city.to_string(),
        (true, false) => state.to_string(),
        (true, true) => "?".to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Fuel,
    Maintenance,
    Insurance,
    Toll,
    Food,
    #[default]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        Self::Fuel,
        Self::Maintenance,
        Self::Insurance,
        Self::Toll,
        Self::Food,
        Self::Other,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Fuel => "fuel",
            Self::Maintenance => "maintenance",
            Self::Insurance => "insurance",
            Self::Toll => "toll",
            Self::Food => "food",
            Self::Other => "other",
        }
    }
}

fn lenient_category<'de, D>(deserializer: D) -> std::result::Result<ExpenseCategory, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let key = match &value {
        Some(Value::String(s)) => s.trim().to_lowercase(),
        _ => String::new(),
    };
    Ok(ExpenseCategory::ALL
        .into_iter()
        .find(|c| c.key() == key)
        .unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_number", serialize_with = "compact_number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: ExpenseCategory,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: String,
}

impl Expense {
    pub fn value(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    pub fn day(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

// ---------------------------------------------------------------------------
// Backup document
// ---------------------------------------------------------------------------

/// Full-backup document: the app's import/export format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub export_date: String,
    #[serde(default)]
    pub loads: Vec<Load>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub settings: SettingsOverlay,
}

/// The load records of an input document: the `loads` array of an object,
/// or the document itself when it is an array.
pub fn loads_array(source: &Value) -> Option<&Vec<Value>> {
    match source {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.get("loads").and_then(Value::as_array),
        _ => None,
    }
}

/// Decode each element on its own so one malformed record does not sink
/// the batch. Records that are not objects are replaced by `T::default()`.
pub fn decode_records<T: DeserializeOwned + Default>(items: &[Value], kind: &str) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item.clone()).unwrap_or_else(|e| {
                log::warn!("{kind} [{i}] could not be decoded ({e}); using empty record");
                T::default()
            })
        })
        .collect()
}

impl BackupDocument {
    /// Read a report input: a backup-shaped object or a bare array of loads.
    pub fn from_value(source: &Value) -> Option<Self> {
        let loads = decode_records::<Load>(loads_array(source)?, "load");
        let mut doc = BackupDocument {
            loads,
            ..Default::default()
        };
        if let Value::Object(map) = source {
            if let Some(v) = map.get("version").and_then(Value::as_str) {
                doc.version = v.to_string();
            }
            if let Some(v) = map.get("exportDate").and_then(Value::as_str) {
                doc.export_date = v.to_string();
            }
            if let Some(items) = map.get("expenses").and_then(Value::as_array) {
                doc.expenses = decode_records(items, "expense");
            }
            if let Some(settings) = map.get("settings") {
                doc.settings = serde_json::from_value(settings.clone()).unwrap_or_default();
            }
        }
        Some(doc)
    }
}
