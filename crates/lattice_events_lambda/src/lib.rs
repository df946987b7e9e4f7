//! AWS-oriented adapters and handlers for the service-network event chain.
//!
//! This crate owns runtime integration details (Lambda handlers, provider
//! adapters, chain-event dispatch, and log setup) and exposes a single runtime
//! module boundary for the payload, configuration, and error primitives.

pub mod adapters;
pub mod dispatch;
pub mod handlers;
pub mod runtime;
pub mod telemetry;
