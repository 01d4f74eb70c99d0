use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::earnings::{lenient_profile, EarningProfile, PayProfile};
use crate::error::{Result, TruckflowError};
use crate::models::{lenient_number, lenient_text};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// `None` when the stored name is not a known profile; such settings pay
    /// the gross amount.
    #[serde(default = "default_profile", deserialize_with = "lenient_profile")]
    pub earning_profile: Option<EarningProfile>,
    #[serde(default)]
    pub rate_per_mile: f64,
    #[serde(default)]
    pub percentage_rate: f64,
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub company_name: String,
}

fn default_profile() -> Option<EarningProfile> {
    Some(EarningProfile::OwnerOperator)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            earning_profile: default_profile(),
            rate_per_mile: 0.0,
            percentage_rate: 0.0,
            driver_name: String::new(),
            company_name: String::new(),
        }
    }
}

/// Partial settings: the `settings` object of a backup document, or values
/// given on the command line. Absent keys leave the base value alone. A
/// present but unrecognized profile is `Some(None)` and still overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsOverlay {
    #[serde(default, deserialize_with = "present_profile", skip_serializing_if = "Option::is_none")]
    pub earning_profile: Option<Option<EarningProfile>>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub rate_per_mile: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub percentage_rate: Option<f64>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

fn present_profile<'de, D>(deserializer: D) -> std::result::Result<Option<Option<EarningProfile>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    lenient_profile(deserializer).map(Some)
}

fn optional_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = lenient_text(deserializer)?;
    Ok(if s.is_empty() { None } else { Some(s) })
}

impl SettingsOverlay {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Settings {
    pub fn apply(&mut self, overlay: &SettingsOverlay) {
        if let Some(p) = overlay.earning_profile {
            if p.is_none() {
                log::warn!("unrecognized earning profile; earnings fall back to the gross amount");
            }
            self.earning_profile = p;
        }
        if let Some(r) = overlay.rate_per_mile {
            self.rate_per_mile = r;
        }
        if let Some(p) = overlay.percentage_rate {
            self.percentage_rate = p;
        }
        if let Some(name) = &overlay.driver_name {
            self.driver_name = name.clone();
        }
        if let Some(name) = &overlay.company_name {
            self.company_name = name.clone();
        }
    }

    pub fn pay_profile(&self) -> PayProfile {
        PayProfile {
            earning_profile: self.earning_profile,
            rate_per_mile: Some(self.rate_per_mile),
            percentage_rate: Some(self.percentage_rate),
        }
    }

    pub fn profile_key(&self) -> &'static str {
        self.earning_profile.map_or("unrecognized", |p| p.key())
    }
}

pub fn validate(overlay: &SettingsOverlay) -> Result<()> {
    if let Some(r) = overlay.rate_per_mile {
        if !r.is_finite() || r < 0.0 {
            return Err(TruckflowError::InvalidArgument(format!(
                "rate per mile must be a non-negative number, got {r}"
            )));
        }
    }
    if let Some(p) = overlay.percentage_rate {
        if !p.is_finite() || !(0.0..=100.0).contains(&p) {
            return Err(TruckflowError::InvalidArgument(format!(
                "percentage rate must be between 0 and 100, got {p}"
            )));
        }
    }
    Ok(())
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("truckflow")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable settings at {}: {e}", path.display());
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(&settings_path(), settings)
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| TruckflowError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

/// Settings file, then the document's own settings, then CLI flags.
pub fn effective_settings(document: &SettingsOverlay, flags: &SettingsOverlay) -> Settings {
    let mut settings = load_settings();
    if !document.is_empty() {
        log::debug!("applying settings embedded in the document");
        settings.apply(document);
    }
    settings.apply(flags);
    settings
}
