use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use form_lookup_core::{LookupChain, LookupError};
use form_lookup_lambda::adapters::hubspot::HubSpotClient;
use form_lookup_lambda::handlers::workflow::handle_workflow_event;
use form_lookup_lambda::settings::Settings;
use form_lookup_lambda::telemetry::init_tracing;
use serde_json::{json, Value};

/// Run the form lookup against live HubSpot with an event read from disk.
#[derive(Parser)]
#[command(name = "local_invoke")]
struct Args {
    /// Workflow event JSON file, or `-` for stdin
    #[arg(default_value = "-")]
    event: String,
    /// HubDB table id (overrides HUBDB_TABLE_ID)
    #[arg(long)]
    table_id: Option<String>,
    /// Print the response envelope on a single line
    #[arg(long)]
    compact: bool,
}

fn read_event(source: &str) -> Result<Value, String> {
    let text = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|error| format!("failed to read event from stdin: {error}"))?;
        buffer
    } else {
        let path = PathBuf::from(source);
        fs::read_to_string(&path)
            .map_err(|error| format!("failed to read event '{}': {error}", path.display()))?
    };

    serde_json::from_str(&text).map_err(|error| format!("event is not valid JSON: {error}"))
}

fn invoke(args: &Args) -> Result<Value, LookupError> {
    let payload = read_event(&args.event).map_err(LookupError::InvalidEvent)?;

    let mut settings = Settings::from_env()?;
    if let Some(table_id) = &args.table_id {
        settings.lookup.table_id = table_id.clone();
        settings.lookup = settings.lookup.validate()?;
    }

    let client = HubSpotClient::new(settings.client)?;
    let chain = LookupChain::new(settings.lookup, &client, &client);
    let response = handle_workflow_event(payload, &chain)?;

    serde_json::to_value(response).map_err(|error| {
        LookupError::InvalidEvent(format!("failed to serialize response: {error}"))
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    match invoke(&args) {
        Ok(response) => {
            let rendered = if args.compact {
                response.to_string()
            } else {
                serde_json::to_string_pretty(&response).unwrap_or_else(|_| response.to_string())
            };
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!(
                "{}",
                json!({
                    "kind": error.kind(),
                    "message": error.to_string(),
                })
            );
            ExitCode::FAILURE
        }
    }
}
