use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

pub const FORM_SUBMISSION_TYPE: &str = "FORM_SUBMISSION";
pub const EMAIL_INPUT_FIELD: &str = "email";
pub const PHONE_INPUT_FIELD: &str = "phone";

pub type InputFields = BTreeMap<String, Value>;

/// Inbound payload delivered to the workflow action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowEvent {
    pub object: WorkflowObject,
    #[serde(rename = "inputFields", default)]
    pub input_fields: InputFields,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowObject {
    #[serde(rename = "objectId", deserialize_with = "deserialize_identifier")]
    pub object_id: String,
    #[serde(
        rename = "objectType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub object_type: Option<String>,
}

impl WorkflowEvent {
    pub fn new(contact_id: impl Into<String>, input_fields: InputFields) -> Self {
        Self {
            object: WorkflowObject {
                object_id: contact_id.into(),
                object_type: None,
            },
            input_fields,
        }
    }

    pub fn contact_id(&self) -> &str {
        &self.object.object_id
    }

    /// Value of an input field, or `null` when the workflow did not supply it.
    pub fn input_field(&self, name: &str) -> Value {
        self.input_fields.get(name).cloned().unwrap_or(Value::Null)
    }
}

/// A CRM engagement reduced to the two fields the lookup reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Engagement {
    #[serde(deserialize_with = "deserialize_identifier")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Engagement {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }

    pub fn is_form_submission(&self) -> bool {
        self.kind == FORM_SUBMISSION_TYPE
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TableRow {
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
}

impl TableRow {
    pub fn new(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }

    pub fn value(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// True when `column` holds exactly `expected`. Strings compare verbatim,
    /// integers by their decimal rendering; other cell kinds never match.
    pub fn column_equals(&self, column: &str, expected: &str) -> bool {
        self.value(column)
            .and_then(cell_text)
            .is_some_and(|text| text == expected)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputFields {
    pub email: Value,
    pub phone: Value,
    pub hubdb_column_data: Value,
}

/// Envelope returned to the workflow engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowResponse {
    #[serde(rename = "outputFields")]
    pub output_fields: OutputFields,
}

impl From<OutputFields> for WorkflowResponse {
    fn from(output_fields: OutputFields) -> Self {
        Self { output_fields }
    }
}

pub fn cell_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) => Some(Cow::Borrowed(text.as_str())),
        Value::Number(number) if number.is_i64() || number.is_u64() => {
            Some(Cow::Owned(number.to_string()))
        }
        _ => None,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdentifierRepr {
    Text(String),
    Number(Number),
}

/// CRM identifiers show up as JSON numbers or strings depending on the
/// endpoint; both normalize to their string form.
pub fn deserialize_identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdentifierRepr::deserialize(deserializer)? {
        IdentifierRepr::Text(text) => text,
        IdentifierRepr::Number(number) => number.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn event_accepts_numeric_object_id() {
        let event: WorkflowEvent = serde_json::from_value(json!({
            "callbackId": "ap-123",
            "object": {"objectId": 123, "objectType": "CONTACT"},
            "inputFields": {"email": "a@x.com"}
        }))
        .expect("event should parse");

        assert_eq!(event.contact_id(), "123");
        assert_eq!(event.object.object_type.as_deref(), Some("CONTACT"));
        assert_eq!(event.input_field("email"), json!("a@x.com"));
        assert_eq!(event.input_field("phone"), Value::Null);
    }

    #[test]
    fn event_without_input_fields_defaults_to_empty() {
        let event: WorkflowEvent =
            serde_json::from_value(json!({"object": {"objectId": "55"}})).expect("event");
        assert!(event.input_fields.is_empty());
    }

    #[test]
    fn event_rejects_boolean_object_id() {
        let result = serde_json::from_value::<WorkflowEvent>(json!({"object": {"objectId": true}}));
        assert!(result.is_err());
    }

    #[test]
    fn column_equals_compares_integers_by_decimal_rendering() {
        let row = TableRow::new(BTreeMap::from([
            ("form_id".to_string(), json!(4021)),
            ("label".to_string(), json!("4021")),
            ("ratio".to_string(), json!(4021.0)),
        ]));

        assert!(row.column_equals("form_id", "4021"));
        assert!(row.column_equals("label", "4021"));
        assert!(!row.column_equals("ratio", "4021"));
        assert!(!row.column_equals("missing", "4021"));
    }

    #[test]
    fn column_equals_is_exact() {
        let row = TableRow::new(BTreeMap::from([("form_id".to_string(), json!("F1 "))]));
        assert!(!row.column_equals("form_id", "F1"));
    }

    #[test]
    fn response_serializes_output_fields_envelope() {
        let response = WorkflowResponse::from(OutputFields {
            email: json!("a@x.com"),
            phone: json!("555"),
            hubdb_column_data: json!("DATA1"),
        });

        assert_eq!(
            serde_json::to_value(response).expect("serialize"),
            json!({
                "outputFields": {
                    "email": "a@x.com",
                    "phone": "555",
                    "hubdb_column_data": "DATA1"
                }
            })
        );
    }
}
