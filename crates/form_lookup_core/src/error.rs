use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;

/// Stable, machine-readable failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidEvent,
    NoEngagements,
    NoFormSubmission,
    #[serde(rename = "no_hubdb_rows")]
    NoHubDbRows,
    NoMatchingRow,
    RemoteCallFailed,
    Config,
}

impl FailureKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidEvent => "invalid_event",
            Self::NoEngagements => "no_engagements",
            Self::NoFormSubmission => "no_form_submission",
            Self::NoHubDbRows => "no_hubdb_rows",
            Self::NoMatchingRow => "no_matching_row",
            Self::RemoteCallFailed => "remote_call_failed",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Engagements,
    TableRows,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engagements => f.write_str("engagements"),
            Self::TableRows => f.write_str("hubdb rows"),
        }
    }
}

/// Failure talking to the CRM, independent of the HTTP client in use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Http(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid workflow event: {0}")]
    InvalidEvent(String),
    #[error("no engagements found for contact {contact_id}")]
    NoEngagements { contact_id: String },
    #[error("no form submission found for contact {contact_id}")]
    NoFormSubmission { contact_id: String },
    #[error("no rows found in hubdb table {table_id}")]
    NoHubDbRows { table_id: String },
    #[error("no row in hubdb table {table_id} where {column} = {form_id}")]
    NoMatchingRow {
        table_id: String,
        column: String,
        form_id: String,
    },
    #[error("{endpoint} request failed: {source}")]
    RemoteCallFailed {
        endpoint: Endpoint,
        #[source]
        source: RemoteError,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl LookupError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidEvent(_) => FailureKind::InvalidEvent,
            Self::NoEngagements { .. } => FailureKind::NoEngagements,
            Self::NoFormSubmission { .. } => FailureKind::NoFormSubmission,
            Self::NoHubDbRows { .. } => FailureKind::NoHubDbRows,
            Self::NoMatchingRow { .. } => FailureKind::NoMatchingRow,
            Self::RemoteCallFailed { .. } => FailureKind::RemoteCallFailed,
            Self::Config(_) => FailureKind::Config,
        }
    }

    /// Message handed across the workflow boundary, prefixed with the kind code.
    pub fn boundary_message(&self) -> String {
        format!("[{}] {}", self.kind(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_message_carries_kind_code() {
        let error = LookupError::NoMatchingRow {
            table_id: "29947477".to_string(),
            column: "form_id_column_name".to_string(),
            form_id: "F9".to_string(),
        };

        assert_eq!(error.kind(), FailureKind::NoMatchingRow);
        assert_eq!(
            error.boundary_message(),
            "[no_matching_row] no row in hubdb table 29947477 where form_id_column_name = F9"
        );
    }

    #[test]
    fn remote_failure_names_endpoint_and_keeps_source() {
        let error = LookupError::RemoteCallFailed {
            endpoint: Endpoint::TableRows,
            source: RemoteError::Status {
                status: 401,
                body: "unauthorized".to_string(),
            },
        };

        assert_eq!(error.kind(), FailureKind::RemoteCallFailed);
        assert!(error.to_string().starts_with("hubdb rows request failed"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn config_errors_convert() {
        let error = LookupError::from(ConfigError::Missing("HUBSPOT_ACCESS_TOKEN"));
        assert_eq!(error.kind(), FailureKind::Config);
        assert_eq!(error.to_string(), "HUBSPOT_ACCESS_TOKEN must be configured");
    }

    #[test]
    fn failure_kind_serializes_as_code() {
        let value = serde_json::to_value(FailureKind::NoHubDbRows).expect("serialize");
        assert_eq!(value, serde_json::json!("no_hubdb_rows"));
    }
}
