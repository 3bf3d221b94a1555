//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Configuration & API-key resolution
//! - The OpenWeather client and provider abstraction
//! - The favorites store and append-only action log
//! - Use-case composition and forecast chart aggregation
//!
//! It is used by `weather-dash`, but can also be reused by other binaries or services.

pub mod chart;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod store;

pub use chart::{DailyTemps, PLACEHOLDER_CITY, daily_min_max, placeholder_forecast};
pub use client::{DEFAULT_BASE_URL, OpenWeatherClient, Units, WeatherProvider};
pub use config::Config;
pub use controller::WeatherApp;
pub use error::{Error, Result};
pub use model::{
    CurrentWeather, FavoriteCity, Forecast, ForecastEntry, HistoryAction, HistoryRecord,
    SearchOutcome,
};
pub use store::CityStore;
