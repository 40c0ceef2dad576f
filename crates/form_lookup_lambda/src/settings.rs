use std::time::Duration;

use form_lookup_core::config::{DEFAULT_DATA_COLUMN, DEFAULT_FORM_ID_COLUMN, DEFAULT_TABLE_ID};
use form_lookup_core::{ConfigError, LookupConfig};
use reqwest::Url;

use crate::adapters::hubspot::{HubSpotClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

pub const ACCESS_TOKEN_VAR: &str = "HUBSPOT_ACCESS_TOKEN";
/// Secret name used by HubSpot-hosted custom code actions.
pub const LEGACY_ACCESS_TOKEN_VAR: &str = "secretName";
pub const BASE_URL_VAR: &str = "HUBSPOT_API_BASE_URL";
pub const TIMEOUT_SECS_VAR: &str = "HUBSPOT_TIMEOUT_SECS";
pub const TABLE_ID_VAR: &str = "HUBDB_TABLE_ID";
pub const FORM_ID_COLUMN_VAR: &str = "HUBDB_FORM_ID_COLUMN";
pub const DATA_COLUMN_VAR: &str = "HUBDB_DATA_COLUMN";
pub const OPTION_FIELD_VAR: &str = "HUBDB_OPTION_FIELD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub lookup: LookupConfig,
    pub client: HubSpotClientConfig,
}

impl Settings {
    /// Read settings from the process environment. Called once per invocation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let access_token = var(ACCESS_TOKEN_VAR)
            .or_else(|| var(LEGACY_ACCESS_TOKEN_VAR))
            .ok_or(ConfigError::Missing(ACCESS_TOKEN_VAR))?;

        let base_url_text = var(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(base_url_text.trim()).map_err(|error| ConfigError::Invalid {
            name: BASE_URL_VAR,
            message: format!("'{base_url_text}': {error}"),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                name: BASE_URL_VAR,
                message: format!("unsupported scheme '{}'", base_url.scheme()),
            });
        }

        let timeout = match var(TIMEOUT_SECS_VAR) {
            Some(text) => parse_timeout(&text)?,
            None => DEFAULT_TIMEOUT,
        };

        let lookup_config = LookupConfig {
            table_id: var(TABLE_ID_VAR).unwrap_or_else(|| DEFAULT_TABLE_ID.to_string()),
            form_id_column: var(FORM_ID_COLUMN_VAR)
                .unwrap_or_else(|| DEFAULT_FORM_ID_COLUMN.to_string()),
            data_column: var(DATA_COLUMN_VAR).unwrap_or_else(|| DEFAULT_DATA_COLUMN.to_string()),
            option_field: var(OPTION_FIELD_VAR),
        }
        .validate()?;

        Ok(Self {
            lookup: lookup_config,
            client: HubSpotClientConfig {
                base_url,
                access_token,
                timeout,
            },
        })
    }
}

fn parse_timeout(text: &str) -> Result<Duration, ConfigError> {
    let seconds: u64 = text.trim().parse().map_err(|error| ConfigError::Invalid {
        name: TIMEOUT_SECS_VAR,
        message: format!("'{text}': {error}"),
    })?;
    if seconds == 0 {
        return Err(ConfigError::Invalid {
            name: TIMEOUT_SECS_VAR,
            message: "must be at least 1 second".to_string(),
        });
    }
    Ok(Duration::from_secs(seconds))
}
