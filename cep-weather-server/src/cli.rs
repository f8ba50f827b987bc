use std::path::PathBuf;

use anyhow::Context;
use cep_weather_core::{
    Config, ConfigError, ErrorReport, LookupError, Overrides, Settings, WeatherReport,
    WeatherService,
};
use clap::{Args, Parser, Subcommand};

use crate::{response::error_chain, server};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cep-weather", version, about = "Current weather by Brazilian postal code (CEP)")]
pub struct Cli {
    /// Path to the config file; defaults to the platform config directory.
    #[arg(long, global = true, env = "CEP_WEATHER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub server: ServerArgs,

    /// Defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Settings that override the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct ServerArgs {
    /// Address to listen on.
    #[arg(long, global = true, env = "APP_HOST")]
    pub host: Option<String>,

    /// Port to listen on.
    #[arg(long, global = true, env = "PORT")]
    pub port: Option<u16>,

    /// WeatherAPI.com API key.
    #[arg(long, global = true, env = "WEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the WeatherAPI.com v1 API.
    #[arg(long, global = true, env = "WEATHERAPI_URL")]
    pub weatherapi_url: Option<String>,

    /// Base URL of the ViaCEP `ws` API.
    #[arg(long, global = true, env = "VIACEP_URL")]
    pub viacep_url: Option<String>,
}

impl From<ServerArgs> for Overrides {
    fn from(args: ServerArgs) -> Self {
        Overrides {
            host: args.host,
            port: args.port,
            api_key: args.api_key,
            weatherapi_url: args.weatherapi_url,
            viacep_url: args.viacep_url,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve,

    /// Look up the current weather for one CEP and print it as JSON.
    Lookup {
        /// Eight-digit postal code, e.g. 01001000.
        cep: String,
    },

    /// Store the WeatherAPI.com API key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { config, server: args, command } = self;

        match command.unwrap_or(Command::Serve) {
            Command::Serve => {
                let settings = resolve_settings(config.as_deref(), args)?;
                server::serve(settings).await
            }
            Command::Lookup { cep } => {
                let settings = resolve_settings(config.as_deref(), args)?;
                let service = WeatherService::from_settings(&settings)?;
                let outcome = service.lookup(&cep).await;

                println!("{}", render_lookup(&outcome)?);
                if outcome.is_err() {
                    std::process::exit(1);
                }
                Ok(())
            }
            Command::Configure => configure(config),
        }
    }
}

/// JSON for a lookup outcome, shaped like the `/weather` response body.
///
/// Failures print only the public message; the full chain goes to the log.
fn render_lookup(outcome: &Result<WeatherReport, LookupError>) -> serde_json::Result<String> {
    match outcome {
        Ok(report) => serde_json::to_string_pretty(report),
        Err(err) => {
            tracing::warn!(error = %error_chain(err), "lookup failed");
            serde_json::to_string_pretty(&ErrorReport::new(err.public_message()))
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => match Config::load() {
            Err(ConfigError::NoConfigDir) => {
                tracing::debug!("no platform config directory; using defaults");
                Ok(Config::default())
            }
            other => other,
        },
    }
}

fn resolve_settings(path: Option<&std::path::Path>, args: ServerArgs) -> anyhow::Result<Settings> {
    let config = load_config(path)?;
    let settings = config.resolve(args.into())?;
    tracing::debug!(?settings, "settings resolved");
    Ok(settings)
}

fn configure(path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = load_config(path.as_deref())?;

    let api_key = inquire::Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .with_help_message("Get one at https://www.weatherapi.com/my/")
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_owned());

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Saved API key to {}", saved_to.display());
    Ok(())
}
