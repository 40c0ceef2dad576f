use form_lookup_core::{LookupChain, LookupError, WorkflowResponse};
use form_lookup_lambda::adapters::hubspot::HubSpotClient;
use form_lookup_lambda::handlers::workflow::handle_workflow_event;
use form_lookup_lambda::settings::Settings;
use form_lookup_lambda::telemetry::init_tracing;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<WorkflowResponse, Error> {
    let request_id = event.context.request_id.clone();

    let settings = Settings::from_env().map_err(|error| config_error(error.into()))?;
    let client = HubSpotClient::new(settings.client).map_err(|error| config_error(error.into()))?;
    let chain = LookupChain::new(settings.lookup, &client, &client);

    let response = handle_workflow_event(event.payload, &chain).map_err(boundary_error)?;
    tracing::info!(
        component = "workflow_lambda",
        event = "lookup_completed",
        request_id = %request_id,
    );
    Ok(response)
}

fn config_error(error: LookupError) -> Error {
    tracing::error!(
        component = "workflow_lambda",
        event = "misconfiguration",
        kind = %error.kind(),
        error = %error,
    );
    boundary_error(error)
}

fn boundary_error(error: LookupError) -> Error {
    Error::from(error.boundary_message())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    lambda_runtime::run(service_fn(handle_request)).await
}
