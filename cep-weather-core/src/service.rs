//! The lookup pipeline: validate, resolve, fetch, assemble.

use anyhow::Context;
use reqwest::Client;
use std::sync::Arc;

use crate::{
    cep::Cep,
    config::Settings,
    error::LookupError,
    model::WeatherReport,
    provider::{WeatherApiProvider, WeatherProvider},
    resolver::{LocationResolver, ViaCepResolver},
};

#[derive(Debug, Clone)]
pub struct WeatherService {
    resolver: Arc<dyn LocationResolver>,
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(resolver: Arc<dyn LocationResolver>, provider: Arc<dyn WeatherProvider>) -> Self {
        Self { resolver, provider }
    }

    /// Wires the ViaCEP resolver and WeatherAPI client from resolved settings.
    /// Both share one HTTP connection pool with the transport's default timeouts.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let http = Client::builder().build().context("Failed to build HTTP client")?;

        let resolver = ViaCepResolver::with_base_url(http.clone(), settings.viacep_url.clone());
        let provider = WeatherApiProvider::with_base_url(
            http,
            settings.api_key.clone(),
            settings.weatherapi_url.clone(),
        );

        Ok(Self::new(Arc::new(resolver), Arc::new(provider)))
    }

    /// Runs one lookup for a raw `cep` query value.
    ///
    /// The first failing stage ends the lookup; nothing is retried.
    pub async fn lookup(&self, raw_cep: &str) -> Result<WeatherReport, LookupError> {
        let cep = Cep::parse(raw_cep)?;

        let location = self.resolver.resolve(&cep).await?;
        tracing::debug!(cep = %cep, city = %location.city, state = %location.state, "zipcode resolved");

        // WeatherAPI accepts the postal code as a query term; the resolved
        // city is not used for the weather lookup.
        let conditions = self.provider.fetch_current(cep.as_str()).await?;

        Ok(WeatherReport::from_conditions(&conditions))
    }
}
