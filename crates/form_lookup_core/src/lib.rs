//! Domain primitives for the form-submission lookup workflow action.
//!
//! This crate owns the workflow event/output contract, the lookup
//! configuration, the failure taxonomy and the lookup chain itself. It
//! intentionally excludes HTTP clients and the Lambda runtime; remote access
//! goes through the [`chain::EngagementSource`] and [`chain::TableRowSource`]
//! traits, implemented by `form_lookup_lambda`.

pub mod chain;
pub mod config;
pub mod contract;
pub mod error;

pub use chain::{EngagementSource, LookupChain, TableRowSource};
pub use config::{ConfigError, LookupConfig};
pub use contract::{Engagement, OutputFields, TableRow, WorkflowEvent, WorkflowResponse};
pub use error::{Endpoint, FailureKind, LookupError, RemoteError};
