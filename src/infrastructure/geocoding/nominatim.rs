use crate::application::ports::ReverseGeocoder;
use crate::domain::value_objects::Coordinates;
use crate::shared::config::LocationConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = concat!("travel-journal/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    display_name: Option<String>,
}

/// Reverse geocoding against a Nominatim compatible `/reverse` endpoint.
pub struct NominatimGeocoder {
    base_url: String,
    accept_language: String,
    http: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, accept_language: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| AppError::ConfigurationError(err.to_string()))?;
        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            accept_language: accept_language.to_string(),
            http,
        })
    }

    /// `None` when geocoding is disabled in the config.
    pub fn from_config(config: &LocationConfig) -> Result<Option<Self>, AppError> {
        config
            .geocoder_url
            .as_deref()
            .map(|url| {
                Self::new(
                    url,
                    &config.accept_language,
                    Duration::from_secs(config.geocoder_timeout_secs),
                )
            })
            .transpose()
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<String>, AppError> {
        let response = self
            .http
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("format", "json".to_string()),
                ("lat", coordinates.latitude().to_string()),
                ("lon", coordinates.longitude().to_string()),
                ("zoom", "16".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .header(reqwest::header::ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network(format!("geocoder responded {status}")));
        }
        let body: ReverseResponse = response.json().await?;
        Ok(body
            .display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()))
    }
}
