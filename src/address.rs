//! City/state normalization for free-text "City, State [ZIP]" strings.
//!
//! Parsing runs a fixed chain of strategies after stripping any trailing ZIP:
//! comma split → last-token split → whole string as city. The first strategy
//! that produces a result wins, and the chain always ends in a result, so
//! unresolved input degrades to a best-effort city with no state.

use std::sync::OnceLock;

use regex::Regex;

/// Full state name (lowercase) → USPS code, 50 states plus DC.
pub const STATES: [(&str, &str); 51] = [
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
    ("district of columbia", "DC"),
];

fn trailing_zip() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[,\s]+[0-9]{5}(?:-[0-9]{4})?$").expect("valid ZIP pattern"))
}

/// Resolve a state token (2-letter code in any case, or full name) to its
/// uppercase code. Invalid codes such as "ZZ" resolve to `None`.
pub fn resolve_state(raw: &str) -> Option<&'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        let upper = trimmed.to_ascii_uppercase();
        return STATES
            .iter()
            .find(|(_, code)| *code == upper)
            .map(|(_, code)| *code);
    }

    let lower = trimmed.to_lowercase();
    STATES
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, code)| *code)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityState {
    pub city: String,
    pub state: Option<&'static str>,
}

impl CityState {
    /// State code as written to output records: empty when unresolved.
    pub fn state_code(&self) -> &'static str {
        self.state.unwrap_or("")
    }
}

type Strategy = fn(&str) -> Option<CityState>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("comma", split_on_comma),
    ("last-token", split_on_last_token),
    ("city-only", city_only),
];

/// Remove a trailing 5-digit ZIP (or ZIP+4) along with the whitespace or
/// commas in front of it.
pub fn strip_zip(raw: &str) -> String {
    let trimmed = raw.trim();
    trailing_zip().replace(trimmed, "").trim().to_string()
}

/// "City, State": city is everything before the first comma, state is the
/// first non-empty segment after it.
fn split_on_comma(cleaned: &str) -> Option<CityState> {
    let (city, rest) = cleaned.split_once(',')?;
    let state = rest
        .split(',')
        .map(str::trim)
        .find(|segment| !segment.is_empty())
        .and_then(resolve_state);
    Some(CityState {
        city: city.trim().to_string(),
        state,
    })
}

/// "City State": only accepted when the last token resolves.
fn split_on_last_token(cleaned: &str) -> Option<CityState> {
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    let (last, head) = tokens.split_last()?;
    if head.is_empty() {
        return None;
    }
    let state = resolve_state(last)?;
    Some(CityState {
        city: head.join(" "),
        state: Some(state),
    })
}

fn city_only(cleaned: &str) -> Option<CityState> {
    Some(CityState {
        city: cleaned.to_string(),
        state: None,
    })
}

/// Split a free-text location into city and state. Never fails.
pub fn parse_city_state(raw: &str) -> CityState {
    let cleaned = strip_zip(raw);
    if cleaned.is_empty() {
        return CityState::default();
    }

    for (name, strategy) in STRATEGIES {
        if let Some(parsed) = strategy(&cleaned) {
            log::debug!("{raw:?} parsed by {name} strategy: {parsed:?}");
            return parsed;
        }
    }
    CityState {
        city: cleaned,
        state: None,
    }
}
