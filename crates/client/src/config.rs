//! # Client Configuration Module
//!
//! Loads the settings the portal client needs to reach the Coherence backend.
//!
//! ## Environment Variables
//!
//! - `COHERENCE_ENV`: `production` selects the hosted API, anything else the
//!   local development server
//! - `COHERENCE_API_URL`: overrides the API base URL
//! - `COHERENCE_TOKEN`: session token sent with every request (optional)
//! - `COHERENCE_TIMEZONE`: IANA name used to show dose windows in local time
//! - `LOG_LEVEL`: logging level (default: "info")
//! - `COHERENCE_REQUEST_TIMEOUT_SECONDS`: per-request timeout (default: 30)

use std::env;
use std::time::Duration;

use chrono_tz::Tz;
use eyre::{Result, eyre};
use tracing::Level;

pub const PRODUCTION_API_URL: &str = "https://coherence-chat.herokuapp.com";
pub const DEVELOPMENT_API_URL: &str = "http://localhost:5000";

/// Configuration for the portal API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend, without a trailing slash
    pub api_url: String,

    /// Session token, sent as HTTP basic auth user name
    pub token: Option<String>,

    /// Timezone the patient lives in
    pub timezone: Option<Tz>,

    /// Log level for the application
    pub log_level: Level,

    /// Request timeout in seconds
    pub request_timeout: u64,
}

impl ClientConfig {
    /// A configuration pointing at `api_url` with every other setting at its default.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: None,
            timezone: None,
            log_level: Level::INFO,
            request_timeout: 30,
        }
    }

    /// Creates a new ClientConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if `COHERENCE_TIMEZONE` is set to an
    /// unknown timezone name.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup("COHERENCE_API_URL") {
            Some(url) => url,
            None if lookup("COHERENCE_ENV").is_some_and(|e| e.trim() == "production") => {
                PRODUCTION_API_URL.to_string()
            }
            None => DEVELOPMENT_API_URL.to_string(),
        };

        let token = lookup("COHERENCE_TOKEN").filter(|token| !token.is_empty());

        let timezone = lookup("COHERENCE_TIMEZONE")
            .map(|name| {
                name.parse::<Tz>()
                    .map_err(|e| eyre!("Invalid COHERENCE_TIMEZONE value {name:?}: {e}"))
            })
            .transpose()?;

        let log_level = match lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        let request_timeout = lookup("COHERENCE_REQUEST_TIMEOUT_SECONDS")
            .and_then(|secs| secs.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            token,
            timezone,
            log_level,
            request_timeout,
            ..Self::new(api_url)
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Full URL of an API route such as `patientData/new`.
    pub fn route_url(&self, route: &str) -> String {
        format!("{}/{}", self.api_url, route.trim_start_matches('/'))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}
