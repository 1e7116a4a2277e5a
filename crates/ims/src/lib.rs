//! # IMS
//!
//! Session-control and transport-routing core of an IMS client stack.
//!
//! This crate ties the workspace together and re-exports its parts:
//!
//! - [`infra_common`]: logging setup and the listener registry
//! - [`auth_core`]: AKA response material
//! - [`transport_core`]: SIP/MSRP routing, message contexts, connectivity
//! - [`dialog_core`]: dialogs, transactions and their listeners
//!
//! [`ImsCore`] assembles routers, message contexts and a transaction manager
//! from an [`ImsConfig`].
//!
//! ```
//! use ims::prelude::*;
//!
//! let config = ImsConfig::from_toml_str("[msrp]\nmax_logged_body = 1024").unwrap();
//! let core: ImsCore<std::sync::Arc<dyn ImsMessage>> = ImsCore::new(config);
//! assert_eq!(core.context(EntityType::Msrp).message_rate(), 30);
//! ```

pub mod config;
pub mod error;
pub mod stack;

pub use config::{ConfigError, ImsConfig};
pub use error::{Error, Result};
pub use stack::ImsCore;

pub use ims_auth_core as auth_core;
pub use ims_dialog_core as dialog_core;
pub use ims_infra_common as infra_common;
pub use ims_transport_core as transport_core;

/// Re-export of common types for easier use
pub mod prelude {
    pub use crate::{ConfigError, Error, ImsConfig, ImsCore};
    pub use ims_auth_core::{AkaResponse, AuthError};
    pub use ims_dialog_core::prelude::*;
    pub use ims_dialog_core::{
        IncomingNotifyListener, NotifyEvent, NotifyInfo, NotifyInfoExtractor, NotifyServerListener,
        ReinviteInProgressListener, SubscriptionState,
    };
    pub use ims_infra_common::{ListenerRegistry, LoggingConfig, LoggingSettings};
    pub use ims_transport_core::prelude::*;
    pub use ims_transport_core::{
        ConnectivityChange, ConnectivityListener, ConnectivityStatus, MockConnectivity,
        MockNetworkInfo, MsrpMessageUtil, PlatformConnectivity, PlatformNetworkInfo,
        RouterEvent, RouterListener, SipMessageUtil, TransportProtocol,
    };
}
