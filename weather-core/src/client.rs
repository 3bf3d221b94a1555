use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::model::{CurrentWeather, Forecast};

/// Production OpenWeather endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Measurement units requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    /// Temperature symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Units {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(format!("unknown units '{value}'. Supported units: metric, imperial.")),
        }
    }
}

/// Abstraction over the weather provider so front-ends and tests can swap
/// out the live client.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<CurrentWeather>;
    async fn forecast(&self, city: &str) -> Result<Forecast>;
}

/// Client for the two unauthenticated-GET OpenWeather endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    units: Units,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    /// Build a client, or fail when the caller resolved no API key. No
    /// network call is ever attempted without a key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            api_key,
            units: Units::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        })
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    /// Point the client at a different endpoint, used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch current conditions for a city.
    pub async fn get_current(&self, city: &str) -> Result<CurrentWeather> {
        self.fetch(city, "weather", "current weather").await
    }

    /// Fetch the 5-day/3-hour forecast for a city.
    pub async fn get_forecast(&self, city: &str) -> Result<Forecast> {
        self.fetch(city, "forecast", "5-day forecast").await
    }

    async fn fetch<T: DeserializeOwned>(&self, city: &str, path: &str, what: &str) -> Result<T> {
        let url = format!("{}/{path}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("units", self.units.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|err| Error::Unexpected(format!("failed to parse {what} JSON: {err}")))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<CurrentWeather> {
        self.get_current(city).await
    }

    async fn forecast(&self, city: &str) -> Result<Forecast> {
        self.get_forecast(city).await
    }
}

#[derive(Debug, Deserialize)]
struct ProviderMessage {
    message: Option<String>,
}

/// Map a non-2xx response to a typed error, preferring the provider's own
/// `message` field over the raw body.
fn api_error(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<ProviderMessage>(body)
        .ok()
        .and_then(|payload| payload.message)
        .unwrap_or_else(|| truncate_body(body));

    Error::Api { status: status.as_u16(), message }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        // Back the cut off to a char boundary so multibyte bodies can't
        // panic the error path.
        let mut cut = MAX;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenWeatherClient {
        OpenWeatherClient::new("TEST_KEY").expect("key is present").with_base_url(server.uri())
    }

    #[test]
    fn empty_api_key_fails_fast() {
        let err = OpenWeatherClient::new("").unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));

        let err = OpenWeatherClient::new("   ").unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
    }

    #[tokio::test]
    async fn get_current_sends_query_and_parses_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Kyiv"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "TEST_KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"name":"Kyiv","main":{"temp":7.5,"feels_like":4.2},"weather":[{"description":"light rain"}]}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let current = client_for(&server).get_current("Kyiv").await.expect("request succeeds");
        assert_eq!(current.name, "Kyiv");
        assert_eq!(current.main.temp, 7.5);
        assert_eq!(current.description(), "light rain");
    }

    #[tokio::test]
    async fn get_forecast_parses_entry_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Kyiv"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"list":[
                    {"dt_txt":"2025-09-14 12:00:00","main":{"temp_min":20.0,"temp_max":25.0}},
                    {"dt_txt":"2025-09-14 15:00:00","main":{"temp_min":19.5,"temp_max":26.0}}
                ]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let forecast = client_for(&server).get_forecast("Kyiv").await.expect("request succeeds");
        assert_eq!(forecast.list.len(), 2);
        assert_eq!(forecast.list[0].dt_txt, "2025-09-14 12:00:00");
        assert_eq!(forecast.list[1].main.temp_max, 26.0);
    }

    #[tokio::test]
    async fn not_found_maps_to_api_error_with_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_raw(
                r#"{"cod":"404","message":"city not found"}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let err = client_for(&server).get_current("Nowhere").await.unwrap_err();
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 404);
                assert!(message.contains("city not found"));
            }
            other => panic!("expected Error::Api, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn opaque_error_body_is_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(500).set_body_string("gateway exploded"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_current("Kyiv").await.unwrap_err();
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "gateway exploded");
            }
            other => panic!("expected Error::Api, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn imperial_units_reach_the_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"name":"Boston","main":{"temp":48.0,"feels_like":44.5},"weather":[]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = client_for(&server).with_units(Units::Imperial);
        let current = client.get_current("Boston").await.expect("request succeeds");
        assert_eq!(current.name, "Boston");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        // 2-byte 'é' straddles the 200-byte cutoff.
        let body = format!("{}é{}", "a".repeat(199), "b".repeat(50));
        let truncated = truncate_body(&body);
        assert!(truncated.starts_with("aaa"));
        assert!(truncated.ends_with("..."));
        assert!(!truncated.contains('é'));

        assert_eq!(truncate_body("short"), "short");
    }

    #[tokio::test]
    async fn multibyte_error_body_is_truncated_not_panicked() {
        let server = MockServer::start().await;
        let body = format!("{}é{}", "a".repeat(199), "b".repeat(50));
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(502).set_body_string(body))
            .mount(&server)
            .await;

        let err = client_for(&server).get_current("Kyiv").await.unwrap_err();
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 502);
                assert!(message.ends_with("..."));
            }
            other => panic!("expected Error::Api, got {other:?}"),
        }
    }

    #[test]
    fn units_parse_and_display() {
        assert_eq!("metric".parse::<Units>().expect("parses"), Units::Metric);
        assert_eq!("Imperial".parse::<Units>().expect("parses"), Units::Imperial);
        assert!("kelvin".parse::<Units>().is_err());
        assert_eq!(Units::Metric.to_string(), "metric");
        assert_eq!(Units::Imperial.symbol(), "°F");
    }
}
