//! Error types for transport routing

use thiserror::Error;

use crate::entity::EntityType;

/// Errors raised by routers and route tables
///
/// Missing routes are not errors; lookups return `None` for them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// A message or route was handed to the router of another entity type
    #[error("Wrong entity type: expected {expected}, got {actual} ({context})")]
    EntityTypeMismatch {
        expected: EntityType,
        actual: EntityType,
        context: String,
    },
}

pub type Result<T> = std::result::Result<T, RoutingError>;
