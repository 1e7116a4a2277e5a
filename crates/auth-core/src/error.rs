//! Error types for authentication material

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("AKA {field} has invalid length {actual} (expected {expected})")]
    InvalidLength {
        field: &'static str,
        actual: usize,
        expected: &'static str,
    },

    #[error("AKA response carries neither RES nor AUTS")]
    Empty,

    #[error("AKA response carries both RES and AUTS")]
    Ambiguous,
}

pub type Result<T> = std::result::Result<T, AuthError>;
