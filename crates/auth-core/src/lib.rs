//! # Auth-Core - Authentication material for the IMS core
//!
//! This crate holds the result of an IMS AKA (Authentication and Key
//! Agreement) challenge. The AKA computation itself happens elsewhere; the
//! request-signing step only consumes the immutable [`AkaResponse`].

pub mod aka;
pub mod error;

pub use aka::AkaResponse;
pub use error::{AuthError, Result};
