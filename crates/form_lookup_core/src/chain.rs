//! The form-submission lookup chain.
//!
//! Resolves a workflow event to output fields in two strictly sequential
//! remote steps: the contact's engagements, then the configured HubDB table.
//! The table is only read once a form-submission engagement has produced a
//! form id.

use serde_json::Value;

use crate::config::LookupConfig;
use crate::contract::{
    Engagement, OutputFields, TableRow, WorkflowEvent, EMAIL_INPUT_FIELD, PHONE_INPUT_FIELD,
};
use crate::error::{Endpoint, LookupError, RemoteError};

pub trait EngagementSource {
    /// `Ok(None)` when the CRM answered without a result collection.
    fn engagements_for_contact(
        &self,
        contact_id: &str,
    ) -> Result<Option<Vec<Engagement>>, RemoteError>;
}

pub trait TableRowSource {
    fn table_rows(&self, table_id: &str) -> Result<Vec<TableRow>, RemoteError>;
}

pub struct LookupChain<'a> {
    config: LookupConfig,
    engagements: &'a dyn EngagementSource,
    rows: &'a dyn TableRowSource,
}

impl<'a> LookupChain<'a> {
    pub fn new(
        config: LookupConfig,
        engagements: &'a dyn EngagementSource,
        rows: &'a dyn TableRowSource,
    ) -> Self {
        Self {
            config,
            engagements,
            rows,
        }
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn run(&self, event: &WorkflowEvent) -> Result<OutputFields, LookupError> {
        let result = self.resolve(event);
        if let Err(error) = &result {
            tracing::error!(
                component = "lookup_chain",
                event = "lookup_failed",
                kind = %error.kind(),
                contact_id = %event.contact_id(),
                error = %error,
            );
        }
        result
    }

    fn resolve(&self, event: &WorkflowEvent) -> Result<OutputFields, LookupError> {
        let contact_id = event.contact_id().trim();
        if contact_id.is_empty() {
            return Err(LookupError::InvalidEvent(
                "object.objectId cannot be empty".to_string(),
            ));
        }

        let engagements = self
            .engagements
            .engagements_for_contact(contact_id)
            .map_err(|source| LookupError::RemoteCallFailed {
                endpoint: Endpoint::Engagements,
                source,
            })?
            .unwrap_or_default();
        if engagements.is_empty() {
            return Err(LookupError::NoEngagements {
                contact_id: contact_id.to_string(),
            });
        }

        let form_id = find_form_submission(&engagements)
            .map(|engagement| engagement.id.clone())
            .ok_or_else(|| LookupError::NoFormSubmission {
                contact_id: contact_id.to_string(),
            })?;
        tracing::info!(
            component = "lookup_chain",
            event = "form_submission_found",
            contact_id,
            form_id = %form_id,
            engagements = engagements.len(),
        );

        let rows = self
            .rows
            .table_rows(&self.config.table_id)
            .map_err(|source| LookupError::RemoteCallFailed {
                endpoint: Endpoint::TableRows,
                source,
            })?;
        if rows.is_empty() {
            return Err(LookupError::NoHubDbRows {
                table_id: self.config.table_id.clone(),
            });
        }

        let row = find_matching_row(&rows, &self.config.form_id_column, &form_id).ok_or_else(
            || LookupError::NoMatchingRow {
                table_id: self.config.table_id.clone(),
                column: self.config.form_id_column.clone(),
                form_id: form_id.clone(),
            },
        )?;

        let hubdb_column_data = column_data(
            row,
            &self.config.data_column,
            self.config.option_field.as_deref(),
        );
        tracing::info!(
            component = "lookup_chain",
            event = "hubdb_row_matched",
            contact_id,
            form_id = %form_id,
            table_id = %self.config.table_id,
            hubdb_column_data = %hubdb_column_data,
        );

        Ok(OutputFields {
            email: event.input_field(EMAIL_INPUT_FIELD),
            phone: event.input_field(PHONE_INPUT_FIELD),
            hubdb_column_data,
        })
    }
}

/// First form submission in response order; no recency ordering is assumed.
pub fn find_form_submission(engagements: &[Engagement]) -> Option<&Engagement> {
    engagements
        .iter()
        .find(|engagement| engagement.is_form_submission())
}

pub fn find_matching_row<'r>(
    rows: &'r [TableRow],
    column: &str,
    form_id: &str,
) -> Option<&'r TableRow> {
    rows.iter().find(|row| row.column_equals(column, form_id))
}

pub fn column_data(row: &TableRow, column: &str, option_field: Option<&str>) -> Value {
    let Some(value) = row.value(column) else {
        return Value::Null;
    };

    match (value, option_field) {
        (Value::Object(option), Some(field)) => option.get(field).cloned().unwrap_or(Value::Null),
        _ => value.clone(),
    }
}
