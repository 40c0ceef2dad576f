use std::time::Duration;

use form_lookup_core::{
    ConfigError, Engagement, EngagementSource, RemoteError, TableRow, TableRowSource,
};
use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;

use super::wire::{parse_engagements_page, parse_table_rows_page, EngagementsPage, TableRowsPage};

pub const DEFAULT_BASE_URL: &str = "https://api.hubapi.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Clone, PartialEq, Eq)]
pub struct HubSpotClientConfig {
    pub base_url: Url,
    pub access_token: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for HubSpotClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubSpotClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("access_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Thin HTTP client for the HubSpot engagements and HubDB endpoints.
///
/// The source traits are synchronous; requests are driven on the current
/// Tokio runtime through `block_in_place`, so callers must run on a
/// multi-threaded runtime.
#[derive(Clone)]
pub struct HubSpotClient {
    client: Client,
    base_url: Url,
    access_token: String,
}

impl std::fmt::Debug for HubSpotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubSpotClient")
            .field("base_url", &self.base_url.as_str())
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl HubSpotClient {
    pub fn new(config: HubSpotClientConfig) -> Result<Self, ConfigError> {
        if config.access_token.trim().is_empty() {
            return Err(ConfigError::Missing("HUBSPOT_ACCESS_TOKEN"));
        }
        if config.base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                name: "HUBSPOT_API_BASE_URL",
                message: format!("'{}' cannot carry a path", config.base_url),
            });
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| ConfigError::Invalid {
                name: "HUBSPOT_TIMEOUT_SECS",
                message: format!("failed to build http client: {error}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url,
            access_token: config.access_token.trim().to_string(),
        })
    }

    pub fn engagements_url(&self, contact_id: &str) -> Result<Url, RemoteError> {
        self.endpoint_url(&[
            "engagements",
            "v1",
            "engagements",
            "associated",
            "CONTACT",
            contact_id,
            "paged",
        ])
    }

    pub fn table_rows_url(&self, table_id: &str) -> Result<Url, RemoteError> {
        self.endpoint_url(&["cms", "v3", "hubdb", "tables", table_id, "rows"])
    }

    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Http(format!("invalid base url '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RemoteError> {
        let client = self.client.clone();
        let token = self.access_token.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                tracing::debug!(component = "hubspot_client", event = "request", url = %url);
                let response = client
                    .get(url)
                    .bearer_auth(token)
                    .header(header::ACCEPT, "application/json")
                    .send()
                    .await
                    .map_err(|error| RemoteError::Http(error.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(RemoteError::Status {
                        status: status.as_u16(),
                        body: truncate_body(&body),
                    });
                }

                response
                    .json::<T>()
                    .await
                    .map_err(|error| RemoteError::Decode(error.to_string()))
            })
        })
    }
}

impl EngagementSource for HubSpotClient {
    fn engagements_for_contact(
        &self,
        contact_id: &str,
    ) -> Result<Option<Vec<Engagement>>, RemoteError> {
        let page: EngagementsPage = self.get_json(self.engagements_url(contact_id)?)?;
        Ok(parse_engagements_page(page))
    }
}

impl TableRowSource for HubSpotClient {
    fn table_rows(&self, table_id: &str) -> Result<Vec<TableRow>, RemoteError> {
        let page: TableRowsPage = self.get_json(self.table_rows_url(table_id)?)?;
        Ok(parse_table_rows_page(page))
    }
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut truncated: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    truncated.push_str("...");
    truncated
}
