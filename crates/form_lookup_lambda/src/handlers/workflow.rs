use form_lookup_core::{LookupChain, LookupError, WorkflowEvent, WorkflowResponse};
use serde_json::{json, Value};

/// Decode a workflow event, run the lookup chain and wrap the result in the
/// `outputFields` envelope.
pub fn handle_workflow_event(
    payload: Value,
    chain: &LookupChain<'_>,
) -> Result<WorkflowResponse, LookupError> {
    let event = decode_workflow_event(payload).inspect_err(|error| {
        tracing::error!(
            component = "workflow_handler",
            event = "invalid_event",
            kind = %error.kind(),
            error = %error,
        );
    })?;

    tracing::info!(
        component = "workflow_handler",
        event = "lookup_started",
        contact_id = %event.contact_id(),
        table_id = %chain.config().table_id,
    );

    let output_fields = chain.run(&event)?;
    Ok(WorkflowResponse::from(output_fields))
}

pub fn decode_workflow_event(payload: Value) -> Result<WorkflowEvent, LookupError> {
    let payload = unwrap_request_body(payload).map_err(LookupError::InvalidEvent)?;
    serde_json::from_value(payload)
        .map_err(|error| LookupError::InvalidEvent(format!("malformed workflow event: {error}")))
}

/// Events forwarded through an HTTP gateway arrive with the workflow payload
/// under `body`, either as an object or as a JSON string.
fn unwrap_request_body(payload: Value) -> Result<Value, String> {
    let Some(object) = payload.as_object() else {
        return Err("workflow event must be a JSON object".to_string());
    };

    if object.contains_key("object") {
        return Ok(payload);
    }

    let Some(body) = object.get("body") else {
        return Ok(payload);
    };

    match body {
        Value::Null => Ok(json!({})),
        Value::Object(_) => Ok(body.clone()),
        Value::String(text) => {
            serde_json::from_str(text).map_err(|error| format!("malformed JSON body: {error}"))
        }
        _ => Err("request body must be a JSON object".to_string()),
    }
}
