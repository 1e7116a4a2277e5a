//! # IMS Infra-Common
//!
//! Shared infrastructure for the IMS session-control crates:
//!
//! - [`errors`]: the common error type used by infrastructure helpers
//! - [`logging`]: `tracing` subscriber setup driven by [`logging::LoggingConfig`]
//! - [`listeners`]: the identity-based [`ListenerRegistry`] every observer
//!   contract in the stack (routes, connectivity, transactions) is built on

pub mod errors;
pub mod listeners;
pub mod logging;

pub use errors::{Error, Result};
pub use listeners::{DeliveryReport, ListenerRegistry};
pub use logging::{LoggingConfig, LoggingSettings, setup_logging};
