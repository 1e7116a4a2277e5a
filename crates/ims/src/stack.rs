//! Assembly of the routing and transaction layers for one message type

use std::sync::Arc;
use tracing::info;

use ims_dialog_core::{Dialog, Transaction, TransactionKind, TransactionManager, TransactionResult};
use ims_infra_common::{LoggingConfig, setup_logging};
use ims_transport_core::{
    EntityType, ImsMessage, MessageContext, MessageRouter, Route, RouterSet, RoutingError,
};

use crate::config::ImsConfig;
use crate::error::Result;

/// Routers, message contexts and the transaction manager of one IMS stack
///
/// Transactions expire after the SIP message lifetime.
pub struct ImsCore<M> {
    config: ImsConfig,
    routers: RouterSet<M>,
    sip_context: MessageContext<M>,
    msrp_context: MessageContext<M>,
    transactions: TransactionManager<M>,
}

impl<M> ImsCore<M>
where
    M: ImsMessage + 'static,
{
    pub fn new(config: ImsConfig) -> Self {
        let sip_context = MessageContext::new(EntityType::Sip, config.sip.clone());
        let msrp_context = MessageContext::new(EntityType::Msrp, config.msrp.clone());
        let transactions =
            TransactionManager::with_message_lifetime(sip_context.message_lifetime());
        Self {
            config,
            routers: RouterSet::new(),
            sip_context,
            msrp_context,
            transactions,
        }
    }

    /// Install the global `tracing` subscriber from the `[logging]` section
    pub fn init_logging(&self) -> Result<()> {
        let logging = LoggingConfig::try_from(&self.config.logging)?;
        let app_name = logging.app_name.clone();
        setup_logging(logging)?;
        ims_infra_common::logging::log_welcome(&app_name, env!("CARGO_PKG_VERSION"));
        Ok(())
    }

    /// Register `router`, replacing any router of the same entity type
    pub fn with_router(self, router: MessageRouter<M>) -> Self {
        self.add_router(Arc::new(router));
        self
    }

    pub fn add_router(&self, router: Arc<MessageRouter<M>>) -> Option<Arc<MessageRouter<M>>> {
        info!("Adding {} router", router.entity_type());
        self.routers.register(router)
    }

    pub fn config(&self) -> &ImsConfig {
        &self.config
    }

    pub fn routers(&self) -> &RouterSet<M> {
        &self.routers
    }

    pub fn router(&self, entity_type: EntityType) -> Option<Arc<MessageRouter<M>>> {
        self.routers.router(entity_type)
    }

    pub fn route(&self, message: &M) -> std::result::Result<Option<Route>, RoutingError> {
        self.routers.route(message)
    }

    pub fn context(&self, entity_type: EntityType) -> &MessageContext<M> {
        match entity_type {
            EntityType::Sip => &self.sip_context,
            EntityType::Msrp => &self.msrp_context,
        }
    }

    /// Log rendering of `message` per its entity's context
    pub fn loggable_content(&self, message: &M) -> String {
        self.context(message.entity_type()).loggable_content(message)
    }

    pub fn transactions(&self) -> &TransactionManager<M> {
        &self.transactions
    }

    pub fn create_transaction(
        &self,
        kind: TransactionKind,
        dialog: Option<Arc<Dialog>>,
    ) -> TransactionResult<Arc<Transaction<M>>> {
        self.transactions.create(kind, dialog)
    }

    /// Fail transactions that outlived the SIP message lifetime
    pub fn expire_overdue(&self) -> usize {
        self.transactions.expire_overdue()
    }
}

impl<M> std::fmt::Debug for ImsCore<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImsCore")
            .field("config", &self.config)
            .field("transactions", &self.transactions)
            .finish()
    }
}
