use thiserror::Error;

pub const DEFAULT_TABLE_ID: &str = "29947477";
pub const DEFAULT_FORM_ID_COLUMN: &str = "form_id_column_name";
pub const DEFAULT_DATA_COLUMN: &str = "column_name";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
    #[error("{name} is invalid: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Which HubDB table to read and which columns hold the key and the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    pub table_id: String,
    pub form_id_column: String,
    pub data_column: String,
    /// When the data cell is a select option (`{"name", "label", ...}`), emit
    /// this field of it instead of the whole object.
    pub option_field: Option<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            table_id: DEFAULT_TABLE_ID.to_string(),
            form_id_column: DEFAULT_FORM_ID_COLUMN.to_string(),
            data_column: DEFAULT_DATA_COLUMN.to_string(),
            option_field: None,
        }
    }
}

impl LookupConfig {
    pub fn validate(self) -> Result<Self, ConfigError> {
        let table_id = required("HUBDB_TABLE_ID", &self.table_id)?;
        let form_id_column = required("HUBDB_FORM_ID_COLUMN", &self.form_id_column)?;
        let data_column = required("HUBDB_DATA_COLUMN", &self.data_column)?;

        if !table_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ConfigError::Invalid {
                name: "HUBDB_TABLE_ID",
                message: format!("'{table_id}' is not a table id or name"),
            });
        }

        let option_field = self
            .option_field
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Self {
            table_id,
            form_id_column,
            data_column,
            option_field,
        })
    }
}

fn required(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Missing(name));
    }
    Ok(trimmed.to_string())
}
