//! Shared service-network event primitives.
//!
//! This crate owns payload schemas, the notification envelope contract, tag
//! evaluation, chain events, and per-handler configuration. It intentionally
//! excludes AWS SDK and Lambda runtime concerns so every rule here can be
//! exercised without a cloud substrate.

pub mod config;
pub mod contract;
pub mod error;
pub mod events;
pub mod tags;
