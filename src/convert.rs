use std::fmt;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::address::parse_city_state;
use crate::error::{Result, TruckflowError};
use crate::models::{decode_records, loads_array, BackupDocument, Load, LoadStatus, RawLoad, BACKUP_VERSION};
use crate::settings::SettingsOverlay;

// ---------------------------------------------------------------------------
// Per-record mapping
// ---------------------------------------------------------------------------

/// Map one legacy export record to the app's load shape. Missing text fields
/// become empty and missing numbers become zero.
pub fn convert_load(raw: &RawLoad, status: LoadStatus) -> Load {
    let pickup = parse_city_state(&raw.origin);
    let delivery = parse_city_state(&raw.destination);

    Load {
        load_id: raw.load_id.clone(),
        broker_name: raw.broker.clone(),
        pickup_state: pickup.state_code().to_string(),
        pickup_city: pickup.city,
        delivery_state: delivery.state_code().to_string(),
        delivery_city: delivery.city,
        pickup_date: raw.pu_date.clone(),
        delivery_date: raw.do_date.clone(),
        loaded_miles: Some(raw.miles.unwrap_or(0.0)),
        deadhead_miles: Some(raw.deadhead.unwrap_or(0.0)),
        gross_amount: Some(raw.amount.unwrap_or(0.0)),
        notes: raw.notes.clone(),
        status,
    }
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Pickup,
    Delivery,
}

/// A converted load whose state could not be resolved, pointing back at the
/// raw text so it can be fixed by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedAddress {
    pub index: usize,
    pub endpoint: Endpoint,
    pub raw: String,
}

impl fmt::Display for UnresolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.endpoint {
            Endpoint::Pickup => write!(f, "  [{}] pickup_state empty  (origin:  {})", self.index, self.raw),
            Endpoint::Delivery => write!(
                f,
                "  [{}] delivery_state empty (destination: {})",
                self.index, self.raw
            ),
        }
    }
}

pub fn unresolved_addresses(raw: &[RawLoad], converted: &[Load]) -> Vec<UnresolvedAddress> {
    let mut out = Vec::new();
    for (index, (r, load)) in raw.iter().zip(converted).enumerate() {
        if load.pickup_state.is_empty() {
            out.push(UnresolvedAddress {
                index,
                endpoint: Endpoint::Pickup,
                raw: r.origin.clone(),
            });
        }
        if load.delivery_state.is_empty() {
            out.push(UnresolvedAddress {
                index,
                endpoint: Endpoint::Delivery,
                raw: r.destination.clone(),
            });
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Batch conversion
// ---------------------------------------------------------------------------

pub struct ConvertResult {
    pub document: BackupDocument,
    pub unresolved: Vec<UnresolvedAddress>,
}

pub fn export_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Convert a parsed export document. Fails only when it holds no loads
/// array, either at the top level or under `loads`.
pub fn convert_value(source: &Value, status: LoadStatus, export_date: String) -> Result<ConvertResult> {
    let items = loads_array(source).ok_or(TruckflowError::MissingLoads)?;
    let raw: Vec<RawLoad> = decode_records(items, "load");
    let loads: Vec<Load> = raw.iter().map(|r| convert_load(r, status)).collect();
    let unresolved = unresolved_addresses(&raw, &loads);

    Ok(ConvertResult {
        document: BackupDocument {
            version: BACKUP_VERSION.to_string(),
            export_date,
            loads,
            expenses: Vec::new(),
            settings: SettingsOverlay::default(),
        },
        unresolved,
    })
}

/// Read `input`, convert it, and write the backup document to `output`.
/// Nothing is written when the input is unusable.
pub fn convert_file(input: &Path, output: &Path, status: LoadStatus) -> Result<ConvertResult> {
    let content = std::fs::read_to_string(input)?;
    let source: Value = serde_json::from_str(&content)?;
    log::info!("read {} bytes from {}", content.len(), input.display());

    let result = convert_value(&source, status, export_timestamp())?;

    let json = serde_json::to_string_pretty(&result.document)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, json)?;
    log::info!(
        "wrote {} loads to {} ({} unresolved states)",
        result.document.loads.len(),
        output.display(),
        result.unresolved.len()
    );
    Ok(result)
}
