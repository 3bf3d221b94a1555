use tracing::debug;

use crate::client::WeatherProvider;
use crate::error::Result;
use crate::model::{FavoriteCity, HistoryAction, SearchOutcome};
use crate::store::CityStore;

/// Composition of the provider client and the city store into the dashboard
/// use-cases.
#[derive(Debug)]
pub struct WeatherApp {
    provider: Box<dyn WeatherProvider>,
    store: CityStore,
}

impl WeatherApp {
    pub fn new(provider: Box<dyn WeatherProvider>, store: CityStore) -> Self {
        Self { provider, store }
    }

    /// Fetch current conditions and the 5-day forecast for a city, labeled
    /// with the provider's canonical name. Logs a `search` history row with
    /// no coordinates; provider errors propagate unchanged.
    pub async fn search_city(&self, city: &str) -> Result<SearchOutcome> {
        debug!(city, "searching");
        let current = self.provider.current(city).await?;
        let forecast = self.provider.forecast(city).await?;
        let display_name = current.name.clone();

        self.store.append_history(city, None, None, HistoryAction::Search);

        Ok(SearchOutcome { current, forecast, display_name })
    }

    /// Resolve the canonical city name via a current-conditions lookup, then
    /// save it as a favorite with no coordinates.
    pub async fn add_favorite_by_search(&self, city: &str) -> Result<bool> {
        let current = self.provider.current(city).await?;
        self.store.add_favorite(&current.name, None, None)
    }

    pub fn favorites(&self) -> Result<Vec<FavoriteCity>> {
        self.store.list_favorites()
    }

    pub fn remove_favorite(&self, name: &str) -> Result<bool> {
        self.store.remove_favorite(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{ConditionSummary, CurrentMain, CurrentWeather, EntryMain, Forecast, ForecastEntry};
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    /// Provider stub returning a fixed city or a fixed provider error.
    #[derive(Debug)]
    struct StubProvider {
        fail_with: Option<(u16, String)>,
    }

    impl StubProvider {
        fn ok() -> Self {
            Self { fail_with: None }
        }

        fn failing(status: u16, message: &str) -> Self {
            Self { fail_with: Some((status, message.to_string())) }
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn current(&self, _city: &str) -> Result<CurrentWeather> {
            match &self.fail_with {
                Some((status, message)) => {
                    Err(Error::Api { status: *status, message: message.clone() })
                }
                None => Ok(CurrentWeather {
                    name: "Kyiv".to_string(),
                    main: CurrentMain { temp: 7.5, feels_like: 4.2 },
                    weather: vec![ConditionSummary { description: "light rain".to_string() }],
                }),
            }
        }

        async fn forecast(&self, _city: &str) -> Result<Forecast> {
            match &self.fail_with {
                Some((status, message)) => {
                    Err(Error::Api { status: *status, message: message.clone() })
                }
                None => Ok(Forecast {
                    list: vec![ForecastEntry {
                        dt_txt: "2025-09-14 12:00:00".to_string(),
                        main: EntryMain { temp_min: 5.0, temp_max: 11.0 },
                    }],
                }),
            }
        }
    }

    fn app(dir: &TempDir, provider: StubProvider) -> WeatherApp {
        let store = CityStore::open(dir.path()).expect("store opens");
        WeatherApp::new(Box::new(provider), store)
    }

    #[tokio::test]
    async fn search_tags_canonical_name_and_logs_history() {
        let dir = TempDir::new().expect("temp dir");
        let app = app(&dir, StubProvider::ok());

        let outcome = app.search_city("kyiv").await.expect("search succeeds");
        assert_eq!(outcome.display_name, "Kyiv");
        assert_eq!(outcome.current.main.temp, 7.5);
        assert_eq!(outcome.forecast.list.len(), 1);

        // One history row for the raw query city, no coordinates.
        let history = fs::read_to_string(dir.path().join("history.csv")).expect("history readable");
        let lines: Vec<&str> = history.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with(",kyiv,,,search"));
    }

    #[tokio::test]
    async fn provider_error_propagates_without_history() {
        let dir = TempDir::new().expect("temp dir");
        let app = app(&dir, StubProvider::failing(404, "city not found"));

        let err = app.search_city("nowhere").await.unwrap_err();
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "city not found");
            }
            other => panic!("expected Error::Api, got {other:?}"),
        }

        let history = fs::read_to_string(dir.path().join("history.csv")).expect("history readable");
        assert_eq!(history.lines().count(), 1);
    }

    #[tokio::test]
    async fn add_favorite_by_search_stores_canonical_name_once() {
        let dir = TempDir::new().expect("temp dir");
        let app = app(&dir, StubProvider::ok());

        assert!(app.add_favorite_by_search("kyiv").await.expect("first add"));
        assert!(!app.add_favorite_by_search("KYIV").await.expect("second add"));

        let favorites = app.favorites().expect("list succeeds");
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].name, "Kyiv");
        assert!(favorites[0].lat.is_none());
        assert!(favorites[0].lon.is_none());
    }

    #[tokio::test]
    async fn remove_favorite_passes_through() {
        let dir = TempDir::new().expect("temp dir");
        let app = app(&dir, StubProvider::ok());

        app.add_favorite_by_search("kyiv").await.expect("add succeeds");
        assert!(app.remove_favorite("Kyiv").expect("remove runs"));
        assert!(!app.remove_favorite("Kyiv").expect("remove runs"));
        assert!(app.favorites().expect("list succeeds").is_empty());
    }
}
