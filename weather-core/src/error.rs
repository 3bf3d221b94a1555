use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the core library.
#[derive(Debug, Error)]
pub enum Error {
    /// Non-2xx response from the weather provider.
    #[error("API request failed [{status}]: {message}")]
    Api { status: u16, message: String },

    /// No API key was available when the client was built.
    #[error(
        "OpenWeather API key not provided. Set OPENWEATHER_API_KEY or run `weather-dash configure`."
    )]
    MissingApiKey,

    /// The favorites file could not be read or written.
    #[error("{0}")]
    Storage(String),

    /// Anything else that went wrong during a use-case.
    #[error("unhandled error: {0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}
