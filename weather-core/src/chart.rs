use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::model::{EntryMain, Forecast, ForecastEntry};

/// Timestamp format used by the forecast `dt_txt` field.
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// City label used for the fixed demo dataset.
pub const PLACEHOLDER_CITY: &str = "Placeholder City";

/// One charted point: the temperature range observed on a calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTemps {
    pub date: NaiveDate,
    pub temp_min: f64,
    pub temp_max: f64,
}

/// Collapse 3-hour forecast entries into one min/max point per calendar
/// date, in ascending date order. A standard 5-day forecast (40 entries)
/// yields exactly 5 points. Entries with unparseable timestamps are skipped.
pub fn daily_min_max(entries: &[ForecastEntry]) -> Vec<DailyTemps> {
    let mut days: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for entry in entries {
        let Ok(timestamp) = NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT) else {
            debug!(dt_txt = %entry.dt_txt, "skipping forecast entry with unparseable timestamp");
            continue;
        };

        let slot = days.entry(timestamp.date()).or_insert((f64::INFINITY, f64::NEG_INFINITY));
        slot.0 = slot.0.min(entry.main.temp_min);
        slot.1 = slot.1.max(entry.main.temp_max);
    }

    days.into_iter()
        .map(|(date, (temp_min, temp_max))| DailyTemps { date, temp_min, temp_max })
        .collect()
}

/// Fixed 5-day dataset shown at startup, in demo mode, and after a failed
/// search.
pub fn placeholder_forecast() -> Forecast {
    let entry = |dt_txt: &str, temp_min: f64, temp_max: f64| ForecastEntry {
        dt_txt: dt_txt.to_string(),
        main: EntryMain { temp_min, temp_max },
    };

    Forecast {
        list: vec![
            entry("2025-09-14 12:00:00", 20.0, 25.0),
            entry("2025-09-15 12:00:00", 21.0, 26.0),
            entry("2025-09-16 12:00:00", 19.0, 24.0),
            entry("2025-09-17 12:00:00", 18.0, 23.0),
            entry("2025-09-18 12:00:00", 20.0, 27.0),
        ],
    }
}
