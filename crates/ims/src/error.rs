use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the facade
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Infra(#[from] ims_infra_common::Error),

    #[error(transparent)]
    Routing(#[from] ims_transport_core::RoutingError),

    #[error(transparent)]
    Transaction(#[from] ims_dialog_core::TransactionError),

    #[error(transparent)]
    Dialog(#[from] ims_dialog_core::DialogError),

    #[error(transparent)]
    Auth(#[from] ims_auth_core::AuthError),
}

pub type Result<T> = std::result::Result<T, Error>;
