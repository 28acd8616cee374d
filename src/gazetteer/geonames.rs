use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{GazetteerClient, GazetteerError, PlaceRecord};
use crate::config::GazetteerSettings;

/// GeoNames web service client (`childrenJSON` and `searchJSON`).
#[derive(Debug, Clone)]
pub struct GeoNamesClient {
    client: Client,
    base_url: String,
    username: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct GeoNamesResponse {
    #[serde(default)]
    geonames: Vec<PlaceRecord>,
    status: Option<ServiceStatus>,
}

#[derive(Debug, Deserialize)]
struct ServiceStatus {
    message: String,
    value: i64,
}

impl GeoNamesClient {
    /// Builds a client from configuration.
    pub fn try_new(settings: &GazetteerSettings) -> Result<Self, GazetteerError> {
        Self::new(
            &settings.base_url,
            &settings.username,
            &settings.country,
            settings.timeout_secs,
        )
    }

    /// Builds a client for `base_url`, authenticating as `username` and
    /// scoping searches to `country`.
    pub fn new(
        base_url: &str,
        username: &str,
        country: &str,
        timeout_secs: u64,
    ) -> Result<Self, GazetteerError> {
        if username.trim().is_empty() {
            return Err(GazetteerError::InvalidConfiguration(
                "`gazetteer.username` must be provided".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|err| {
                GazetteerError::InvalidConfiguration(format!("failed to create HTTP client: {err}"))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            country: country.to_string(),
        })
    }

    async fn fetch(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<PlaceRecord>, GazetteerError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(url = %url, "gazetteer_request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("username", self.username.as_str())])
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    GazetteerError::Request("request timed out".to_string())
                } else if err.is_connect() {
                    GazetteerError::Request(format!("connection failed: {err}"))
                } else {
                    GazetteerError::Request(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GazetteerError::Request(format!("HTTP {status}: {body}")));
        }

        let body: GeoNamesResponse = response
            .json()
            .await
            .map_err(|err| GazetteerError::Decode(err.to_string()))?;
        if let Some(status) = body.status {
            return Err(GazetteerError::Service {
                code: status.value,
                message: status.message,
            });
        }
        Ok(body.geonames)
    }
}

#[async_trait]
impl GazetteerClient for GeoNamesClient {
    async fn children(&self, parent_id: u64) -> Result<Vec<PlaceRecord>, GazetteerError> {
        let parent_id = parent_id.to_string();
        self.fetch("childrenJSON", &[("geonameId", parent_id.as_str())])
            .await
    }

    async fn search_places(
        &self,
        city: &str,
        state: &str,
    ) -> Result<Vec<PlaceRecord>, GazetteerError> {
        self.fetch(
            "searchJSON",
            &[
                ("q", city),
                ("adminName1", state),
                ("country", self.country.as_str()),
                ("featureClass", "P"),
            ],
        )
        .await
    }
}
