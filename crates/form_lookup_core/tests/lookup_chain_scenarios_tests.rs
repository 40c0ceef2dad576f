use std::collections::BTreeMap;
use std::sync::Mutex;

use form_lookup_core::{
    Engagement, EngagementSource, FailureKind, LookupChain, LookupConfig, LookupError,
    RemoteError, TableRow, TableRowSource, WorkflowEvent,
};
use serde_json::{json, Value};

#[derive(Default)]
struct RecordingCrm {
    engagements: Option<Vec<Engagement>>,
    rows: Vec<TableRow>,
    engagement_calls: Mutex<Vec<String>>,
    table_calls: Mutex<Vec<String>>,
}

impl RecordingCrm {
    fn with(engagements: Option<Vec<Engagement>>, rows: Vec<TableRow>) -> Self {
        Self {
            engagements,
            rows,
            ..Self::default()
        }
    }

    fn engagement_calls(&self) -> Vec<String> {
        self.engagement_calls.lock().expect("poisoned mutex").clone()
    }

    fn table_calls(&self) -> Vec<String> {
        self.table_calls.lock().expect("poisoned mutex").clone()
    }
}

impl EngagementSource for RecordingCrm {
    fn engagements_for_contact(
        &self,
        contact_id: &str,
    ) -> Result<Option<Vec<Engagement>>, RemoteError> {
        self.engagement_calls
            .lock()
            .expect("poisoned mutex")
            .push(contact_id.to_string());
        Ok(self.engagements.clone())
    }
}

impl TableRowSource for RecordingCrm {
    fn table_rows(&self, table_id: &str) -> Result<Vec<TableRow>, RemoteError> {
        self.table_calls
            .lock()
            .expect("poisoned mutex")
            .push(table_id.to_string());
        Ok(self.rows.clone())
    }
}

fn scenario_event() -> WorkflowEvent {
    serde_json::from_value(json!({
        "object": {"objectId": "123"},
        "inputFields": {"email": "a@x.com", "phone": "555"}
    }))
    .expect("event fixture")
}

fn scenario_rows() -> Vec<TableRow> {
    vec![serde_json::from_value(json!({
        "values": {"form_id_column_name": "F1", "column_name": "DATA1"}
    }))
    .expect("row fixture")]
}

fn run(crm: &RecordingCrm) -> Result<form_lookup_core::OutputFields, LookupError> {
    LookupChain::new(LookupConfig::default(), crm, crm).run(&scenario_event())
}

#[test]
fn matching_form_submission_produces_output_fields() {
    let crm = RecordingCrm::with(
        Some(vec![Engagement::new("FORM_SUBMISSION", "F1")]),
        scenario_rows(),
    );

    let output = run(&crm).expect("lookup should succeed");

    assert_eq!(output.email, json!("a@x.com"));
    assert_eq!(output.phone, json!("555"));
    assert_eq!(output.hubdb_column_data, json!("DATA1"));
    assert_eq!(crm.engagement_calls(), vec!["123".to_string()]);
    assert_eq!(crm.table_calls().len(), 1);
}

#[test]
fn empty_engagements_fail_without_table_fetch() {
    let crm = RecordingCrm::with(Some(Vec::new()), scenario_rows());

    let error = run(&crm).expect_err("should fail");

    assert_eq!(error.kind(), FailureKind::NoEngagements);
    assert!(crm.table_calls().is_empty());
}

#[test]
fn absent_engagements_fail_without_table_fetch() {
    let crm = RecordingCrm::with(None, scenario_rows());

    let error = run(&crm).expect_err("should fail");

    assert_eq!(error.kind(), FailureKind::NoEngagements);
    assert!(crm.table_calls().is_empty());
}

#[test]
fn non_form_engagements_fail_without_table_fetch() {
    let crm = RecordingCrm::with(
        Some(vec![
            Engagement::new("EMAIL_OPEN", "E1"),
            Engagement::new("NOTE", "N1"),
        ]),
        scenario_rows(),
    );

    let error = run(&crm).expect_err("should fail");

    assert_eq!(error.kind(), FailureKind::NoFormSubmission);
    assert!(crm.table_calls().is_empty());
}

#[test]
fn unmatched_form_id_is_no_matching_row() {
    let crm = RecordingCrm::with(
        Some(vec![Engagement::new("FORM_SUBMISSION", "F9")]),
        scenario_rows(),
    );

    let error = run(&crm).expect_err("should fail");

    assert_eq!(error.kind(), FailureKind::NoMatchingRow);
    assert_eq!(crm.table_calls().len(), 1);
    assert!(error.boundary_message().contains("F9"));
}

#[test]
fn data_column_value_is_passed_through_verbatim() {
    let rows = vec![
        serde_json::from_value(json!({"values": {"form_id_column_name": "F0", "column_name": 1}}))
            .expect("row fixture"),
        serde_json::from_value(json!({
            "values": {
                "form_id_column_name": "F1",
                "column_name": {"name": "demo_request", "label": "Demo Request"}
            }
        }))
        .expect("row fixture"),
    ];
    let crm = RecordingCrm::with(Some(vec![Engagement::new("FORM_SUBMISSION", "F1")]), rows);

    let output = run(&crm).expect("lookup should succeed");

    assert_eq!(
        output.hubdb_column_data,
        json!({"name": "demo_request", "label": "Demo Request"})
    );
}

#[test]
fn numeric_engagement_id_matches_string_column() {
    let engagements: Vec<Engagement> =
        serde_json::from_value(json!([{"type": "FORM_SUBMISSION", "id": 4021}]))
            .expect("engagement fixture");
    let rows = vec![TableRow::new(BTreeMap::from([
        ("form_id_column_name".to_string(), json!("4021")),
        ("column_name".to_string(), json!("paid_search")),
    ]))];
    let crm = RecordingCrm::with(Some(engagements), rows);

    let output = run(&crm).expect("lookup should succeed");
    assert_eq!(output.hubdb_column_data, Value::from("paid_search"));
}
