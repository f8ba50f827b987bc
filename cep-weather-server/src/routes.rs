use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
};
use cep_weather_core::WeatherService;

use crate::response::{ApiError, json_response};

pub const WEATHER_PATH: &str = "/weather";

/// Shared application state. The service and its clients are read-only.
#[derive(Clone)]
pub struct AppState {
    service: Arc<WeatherService>,
}

impl AppState {
    pub fn new(service: WeatherService) -> Self {
        Self { service: Arc::new(service) }
    }
}

pub fn router(service: WeatherService) -> Router {
    Router::new().route(WEATHER_PATH, any(weather)).with_state(AppState::new(service))
}

/// First `cep` value in the query string. Missing or unparseable reads as empty.
fn cep_param(uri: &Uri) -> String {
    Query::<Vec<(String, String)>>::try_from_uri(uri)
        .ok()
        .and_then(|Query(pairs)| pairs.into_iter().find(|(key, _)| key == "cep"))
        .map(|(_, value)| value)
        .unwrap_or_default()
}

/// GET /weather?cep=<8 digits>
///
/// Every other method gets an empty 405, whatever the query says. An empty
/// `cep` fails validation like any other malformed one.
async fn weather(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Response, ApiError> {
    if method != Method::GET {
        return Ok(StatusCode::METHOD_NOT_ALLOWED.into_response());
    }

    let cep = cep_param(&uri);
    let report = state.service.lookup(&cep).await?;
    tracing::info!(%cep, temp_c = report.temp_c, city = %report.location.city, "weather served");

    Ok(json_response(StatusCode::OK, &report))
}
