//! Core types and dispatch wiring for the civicbot fulfillment webhook.

/// Bundle of data-source ports the dispatcher talks to.
pub mod backend;
/// Inbound request parameters and their resolution into typed intents.
pub mod intent;
/// Domain models shared by the providers and the webhook.
pub mod model;
/// Traits describing the data-source interfaces.
pub mod ports;
/// User-facing reply texts and formatting rules.
pub mod reply;
/// Intent dispatcher used by the webhook endpoint.
pub mod service;

pub use backend::*;
pub use intent::*;
pub use model::*;
pub use ports::*;
pub use service::*;
