use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::WeatherError, model::CurrentConditions};

pub mod weatherapi;

pub use weatherapi::WeatherApiProvider;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a free-text location query.
    async fn fetch_current(&self, query: &str) -> Result<CurrentConditions, WeatherError>;
}
