//! Core library for the CEP weather lookup.
//!
//! This crate defines:
//! - Postal code (CEP) validation
//! - Clients for the ViaCEP directory and the WeatherAPI.com provider
//! - Temperature conversion and the outbound report shape
//! - The lookup pipeline tying these together
//! - Configuration handling
//!
//! It is used by `cep-weather-server`, but can also be reused by other binaries or services.

pub mod cep;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod provider;
pub mod resolver;
pub mod service;

mod util;

pub use cep::{Cep, is_valid_cep};
pub use config::{Config, Overrides, Settings};
pub use convert::{celsius_to_fahrenheit, celsius_to_kelvin};
pub use error::{ConfigError, InvalidCep, LookupError, ResolveError, WeatherError};
pub use model::{CurrentConditions, ErrorReport, ResolvedLocation, WeatherReport};
pub use provider::{WeatherApiProvider, WeatherProvider};
pub use resolver::{LocationResolver, ViaCepResolver};
pub use service::WeatherService;
