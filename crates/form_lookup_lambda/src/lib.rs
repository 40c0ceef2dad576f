//! HubSpot and AWS Lambda integration for the form lookup workflow action.
//!
//! This crate owns runtime integration details (the HTTP adapter, event
//! handling, environment settings and log setup). The lookup itself lives in
//! `form_lookup_core`.

pub mod adapters;
pub mod handlers;
pub mod settings;
pub mod telemetry;
