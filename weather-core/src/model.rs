use serde::{Deserialize, Serialize};

/// Current-conditions payload. Only the fields the dashboard consumes are
/// deserialized; the provider sends many more.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    /// The provider's canonical city name.
    pub name: String,
    pub main: CurrentMain,
    #[serde(default)]
    pub weather: Vec<ConditionSummary>,
}

impl CurrentWeather {
    /// Description of the leading weather condition, or empty when the
    /// provider sent none.
    pub fn description(&self) -> &str {
        self.weather.first().map(|w| w.description.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentMain {
    pub temp: f64,
    pub feels_like: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionSummary {
    pub description: String,
}

/// 5-day/3-hour forecast payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Forecast {
    pub list: Vec<ForecastEntry>,
}

/// One 3-hour forecast sample.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    /// Timestamp string, e.g. "2025-09-14 12:00:00".
    pub dt_txt: String,
    pub main: EntryMain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryMain {
    pub temp_min: f64,
    pub temp_max: f64,
}

/// A user-saved city reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteCity {
    pub name: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// Action recorded in the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Search,
    AddFavorite,
    RemoveFavorite,
}

/// One immutable row of the append-only history log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// ISO-8601 timestamp of when the action happened.
    pub timestamp: String,
    pub city: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub action: HistoryAction,
}

/// Result of a successful search: both provider payloads plus the canonical
/// city name used for labeling.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub current: CurrentWeather,
    pub forecast: Forecast,
    pub display_name: String,
}
