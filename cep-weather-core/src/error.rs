use thiserror::Error;

/// Input did not match the eight-digit CEP format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid zipcode")]
pub struct InvalidCep;

/// Failure of the postal-code directory lookup.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("zipcode {0} not found")]
    NotFound(String),

    #[error("postal code directory request failed: {0}")]
    Transport(String),
}

/// Failure of the weather provider call.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("weather provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode weather payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Outcome of a failed lookup, one variant per user-facing result.
///
/// The `Display` output is the public message; upstream detail lives in the
/// source chain and is only ever logged.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid zipcode")]
    InvalidZipcode(#[from] InvalidCep),

    #[error("can not find zipcode")]
    ZipcodeNotFound(#[source] ResolveError),

    #[error("error fetching weather data")]
    WeatherFetch(#[source] WeatherError),
}

impl LookupError {
    /// HTTP status code the failure maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            LookupError::InvalidZipcode(_) => 422,
            LookupError::ZipcodeNotFound(_) => 404,
            LookupError::WeatherFetch(_) => 500,
        }
    }

    /// Message safe to show to callers.
    pub fn public_message(&self) -> String {
        self.to_string()
    }
}

impl From<ResolveError> for LookupError {
    fn from(err: ResolveError) -> Self {
        LookupError::ZipcodeNotFound(err)
    }
}

impl From<WeatherError> for LookupError {
    fn from(err: WeatherError) -> Self {
        LookupError::WeatherFetch(err)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "WEATHER_API_KEY is required.\n\
         Hint: export WEATHER_API_KEY, pass --api-key, or run `cep-weather configure`."
    )]
    MissingApiKey,

    #[error("could not determine platform config directory")]
    NoConfigDir,

    #[error("failed to read config file {path}: {source}")]
    Read { path: String, source: std::io::Error },

    #[error("failed to parse config file {path}: {source}")]
    Parse { path: String, source: toml::de::Error },

    #[error("failed to write config file {path}: {source}")]
    Write { path: String, source: std::io::Error },

    #[error("failed to serialize configuration to TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}
