use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt::Debug;

use crate::{cep::Cep, error::ResolveError, model::ResolvedLocation, util::truncate_body};

pub const VIACEP_BASE_URL: &str = "https://viacep.com.br/ws";

/// Maps a validated postal code to a city/state pair.
#[async_trait]
pub trait LocationResolver: Send + Sync + Debug {
    async fn resolve(&self, cep: &Cep) -> Result<ResolvedLocation, ResolveError>;
}

/// Resolver backed by the ViaCEP directory (`{base}/{cep}/json/`).
#[derive(Debug, Clone)]
pub struct ViaCepResolver {
    base_url: String,
    http: Client,
}

impl ViaCepResolver {
    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    cep: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    /// ViaCEP sends `"erro": true` on older deployments and `"erro": "true"` on newer ones.
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn is_error(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

#[async_trait]
impl LocationResolver for ViaCepResolver {
    async fn resolve(&self, cep: &Cep) -> Result<ResolvedLocation, ResolveError> {
        let url = format!("{}/{}/json/", self.base_url, cep);

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ResolveError::Transport(format!("request to ViaCEP failed: {e}")))?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ResolveError::NotFound(cep.to_string()));
        }

        let body = res
            .text()
            .await
            .map_err(|e| ResolveError::Transport(format!("failed to read ViaCEP body: {e}")))?;

        if !status.is_success() {
            return Err(ResolveError::Transport(format!(
                "ViaCEP returned status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: ViaCepResponse = serde_json::from_str(&body)
            .map_err(|e| ResolveError::Transport(format!("failed to parse ViaCEP JSON: {e}")))?;

        if parsed.is_error() {
            return Err(ResolveError::NotFound(cep.to_string()));
        }

        tracing::debug!(cep = %cep, city = %parsed.localidade, state = %parsed.uf, "resolved zipcode");

        Ok(ResolvedLocation { cep: parsed.cep, city: parsed.localidade, state: parsed.uf })
    }
}
