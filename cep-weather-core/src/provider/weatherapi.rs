use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::WeatherError,
    model::{Ancillary, Condition, CurrentConditions, Place},
    util::truncate_body,
};

use super::WeatherProvider;

pub const WEATHERAPI_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Client for WeatherAPI.com's `current.json` endpoint.
///
/// Key and base URL are fixed at construction; the client is shared read-only
/// between requests.
#[derive(Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for WeatherApiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl WeatherApiProvider {
    pub fn new(http: Client, api_key: String) -> Self {
        Self::with_base_url(http, api_key, WEATHERAPI_BASE_URL)
    }

    pub fn with_base_url(http: Client, api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { api_key, base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    region: String,
    country: String,
    lat: Option<f64>,
    lon: Option<f64>,
    tz_id: Option<String>,
    localtime: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    #[serde(default)]
    icon: String,
    code: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    temp_f: Option<f64>,
    is_day: Option<u8>,
    condition: WaCondition,
    last_updated_epoch: Option<i64>,
    feelslike_c: Option<f64>,
    humidity: Option<u8>,
    cloud: Option<u8>,
    wind_kph: Option<f64>,
    wind_degree: Option<u16>,
    wind_dir: Option<String>,
    gust_kph: Option<f64>,
    pressure_mb: Option<f64>,
    precip_mm: Option<f64>,
    vis_km: Option<f64>,
    uv: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

impl From<WaResponse> for CurrentConditions {
    fn from(parsed: WaResponse) -> Self {
        let WaResponse { location, current } = parsed;

        Self {
            temperature_c: current.temp_c,
            temperature_f: current.temp_f,
            condition: Condition {
                text: current.condition.text,
                icon: current.condition.icon,
                code: current.condition.code,
            },
            place: Place {
                name: location.name,
                region: location.region,
                country: location.country,
                latitude: location.lat,
                longitude: location.lon,
                timezone: location.tz_id,
                local_time: location.localtime,
            },
            ancillary: Ancillary {
                feels_like_c: current.feelslike_c,
                humidity_pct: current.humidity,
                cloud_pct: current.cloud,
                wind_kph: current.wind_kph,
                wind_degree: current.wind_degree,
                wind_dir: current.wind_dir,
                gust_kph: current.gust_kph,
                pressure_mb: current.pressure_mb,
                precip_mm: current.precip_mm,
                visibility_km: current.vis_km,
                uv: current.uv,
                is_day: current.is_day.map(|d| d != 0),
            },
            observed_at: current.last_updated_epoch.and_then(unix_to_utc),
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch_current(&self, query: &str) -> Result<CurrentConditions, WeatherError> {
        let url = format!("{}/current.json", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", query)])
            .send()
            .await
            .map_err(redact)?;

        let status = res.status();
        let body = res.text().await.map_err(redact)?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: WaResponse = serde_json::from_str(&body)?;
        let conditions = CurrentConditions::from(parsed);

        tracing::debug!(
            query,
            temp_c = conditions.temperature_c,
            condition = %conditions.condition.text,
            observed_at = ?conditions.observed_at,
            "fetched current weather"
        );

        Ok(conditions)
    }
}

/// reqwest errors embed the request URL, which carries the API key.
fn redact(err: reqwest::Error) -> WeatherError {
    WeatherError::Request(err.without_url())
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> WeatherApiProvider {
        WeatherApiProvider::with_base_url(Client::new(), "dummy-key".into(), server.uri())
    }

    fn full_payload() -> serde_json::Value {
        json!({
            "location": {
                "name": "São Paulo",
                "region": "São Paulo",
                "country": "Brazil",
                "lat": -23.53,
                "lon": -46.62,
                "tz_id": "America/Sao_Paulo",
                "localtime_epoch": 1_700_000_000,
                "localtime": "2023-11-14 19:13"
            },
            "current": {
                "last_updated_epoch": 1_700_000_000,
                "last_updated": "2023-11-14 19:00",
                "temp_c": 25.0,
                "temp_f": 77.0,
                "is_day": 1,
                "condition": {
                    "text": "Sunny",
                    "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png",
                    "code": 1000
                },
                "wind_mph": 6.9,
                "wind_kph": 11.2,
                "wind_degree": 150,
                "wind_dir": "SSE",
                "pressure_mb": 1015.0,
                "pressure_in": 29.97,
                "precip_mm": 0.0,
                "precip_in": 0.0,
                "humidity": 54,
                "cloud": 0,
                "feelslike_c": 26.1,
                "feelslike_f": 79.0,
                "windchill_c": 24.0,
                "windchill_f": 75.2,
                "heatindex_c": 25.5,
                "heatindex_f": 77.9,
                "dewpoint_c": 15.0,
                "dewpoint_f": 59.0,
                "vis_km": 10.0,
                "vis_miles": 6.0,
                "uv": 1.0,
                "gust_mph": 9.1,
                "gust_kph": 14.7
            }
        })
    }

    #[tokio::test]
    async fn fetches_current_conditions_with_key_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/current.json"))
            .and(query_param("key", "dummy-key"))
            .and(query_param("q", "01001000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(full_payload()))
            .expect(1)
            .mount(&server)
            .await;

        let conditions = provider_for(&server).fetch_current("01001000").await.unwrap();

        assert_eq!(conditions.temperature_c, 25.0);
        assert_eq!(conditions.temperature_f, Some(77.0));
        assert_eq!(conditions.condition.text, "Sunny");
        assert_eq!(conditions.condition.code, Some(1000));
        assert_eq!(conditions.place.name, "São Paulo");
        assert_eq!(conditions.place.country, "Brazil");
        assert_eq!(conditions.place.timezone.as_deref(), Some("America/Sao_Paulo"));
        assert_eq!(conditions.ancillary.humidity_pct, Some(54));
        assert_eq!(conditions.ancillary.wind_dir.as_deref(), Some("SSE"));
        assert_eq!(conditions.ancillary.is_day, Some(true));
        assert_eq!(conditions.observed_at.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[tokio::test]
    async fn tolerates_minimal_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/current.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "location": { "name": "São Paulo", "region": "São Paulo", "country": "Brazil" },
                "current": {
                    "temp_c": 25.0,
                    "temp_f": 77.0,
                    "condition": {
                        "text": "Sunny",
                        "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png",
                        "code": 1000
                    }
                }
            })))
            .mount(&server)
            .await;

        let conditions = provider_for(&server).fetch_current("01001000").await.unwrap();

        assert_eq!(conditions.temperature_c, 25.0);
        assert_eq!(conditions.ancillary, Ancillary::default());
        assert!(conditions.observed_at.is_none());
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/current.json"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 1006, "message": "No matching location found." }
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_current("00000000").await.unwrap_err();

        match err {
            WeatherError::Status { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("No matching location"), "{body}");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unexpected_payload_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/current.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "current": {} })))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_current("01001000").await.unwrap_err();
        assert!(matches!(err, WeatherError::Decode(_)), "{err:?}");
    }

    #[tokio::test]
    async fn transport_error_does_not_leak_api_key() {
        let provider = WeatherApiProvider::with_base_url(
            Client::new(),
            "super-secret".into(),
            "http://127.0.0.1:9",
        );

        let err = provider.fetch_current("01001000").await.unwrap_err();

        assert!(matches!(err, WeatherError::Request(_)), "{err:?}");
        assert!(!err.to_string().contains("super-secret"), "{err}");
        assert!(!format!("{err:?}").contains("super-secret"), "{err:?}");
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let provider = WeatherApiProvider::new(Client::new(), "super-secret".into());
        let debug = format!("{provider:?}");

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains(WEATHERAPI_BASE_URL));
    }
}
