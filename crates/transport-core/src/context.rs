//! Per-entity message parameters
//!
//! A [`MessageContext`] tells the transport layer how long a message of a
//! given entity type stays relevant, how many of them may be processed per
//! second, and how the message should be rendered into logs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::marker::PhantomData;
use std::time::Duration;

use crate::entity::EntityType;
use crate::message::ImsMessage;

/// Lifetime of a message (and of the transaction it belongs to)
pub const DEFAULT_MESSAGE_LIFETIME: Duration = Duration::from_secs(32);

/// Messages processed per second
pub const DEFAULT_MESSAGE_RATE: u32 = 30;

/// Bodies longer than this are summarized instead of logged
pub const DEFAULT_MAX_LOGGED_BODY: usize = 4096;

/// Message parameters as they appear in configuration files
///
/// ```toml
/// [msrp]
/// message_lifetime = 32
/// message_rate = 30
/// max_logged_body = 4096
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageContextConfig {
    /// Seconds in configuration files
    #[serde(with = "duration_secs")]
    pub message_lifetime: Duration,
    pub message_rate: u32,
    pub max_logged_body: usize,
}

impl Default for MessageContextConfig {
    fn default() -> Self {
        Self {
            message_lifetime: DEFAULT_MESSAGE_LIFETIME,
            message_rate: DEFAULT_MESSAGE_RATE,
            max_logged_body: DEFAULT_MAX_LOGGED_BODY,
        }
    }
}

mod duration_secs {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// Transport parameters for one entity type
#[derive(Debug, Clone)]
pub struct MessageContext<M> {
    entity_type: EntityType,
    config: MessageContextConfig,
    _message: PhantomData<fn(&M)>,
}

impl<M: ImsMessage> MessageContext<M> {
    pub fn new(entity_type: EntityType, config: MessageContextConfig) -> Self {
        Self {
            entity_type,
            config,
            _message: PhantomData,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn message_lifetime(&self) -> Duration {
        self.config.message_lifetime
    }

    pub fn message_rate(&self) -> u32 {
        self.config.message_rate
    }

    pub fn config(&self) -> &MessageContextConfig {
        &self.config
    }

    /// Text to log for `message`
    ///
    /// Messages with a body above `max_logged_body` bytes are replaced by
    /// their short description.
    pub fn loggable_content(&self, message: &M) -> String {
        match message.body() {
            Some(body) if body.len() > self.config.max_logged_body => {
                format!("Long body message! \r\n {}", message.short_description())
            }
            _ => message.build_content(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SendChunk {
        body: Vec<u8>,
    }

    impl ImsMessage for SendChunk {
        fn entity_type(&self) -> EntityType {
            EntityType::Msrp
        }

        fn short_description(&self) -> String {
            "MSRP SEND tx-1".to_string()
        }

        fn build_content(&self) -> String {
            format!("MSRP tx-1 SEND\r\n<{} bytes>", self.body.len())
        }

        fn body(&self) -> Option<&[u8]> {
            Some(&self.body[..])
        }
    }

    #[test]
    fn test_defaults() {
        let context: MessageContext<SendChunk> =
            MessageContext::new(EntityType::Msrp, MessageContextConfig::default());
        assert_eq!(context.message_lifetime(), Duration::from_secs(32));
        assert_eq!(context.message_rate(), 30);
        assert_eq!(context.entity_type(), EntityType::Msrp);
    }

    #[test]
    fn test_long_body_is_summarized() {
        let context = MessageContext::new(EntityType::Msrp, MessageContextConfig::default());

        let short = SendChunk { body: vec![b'a'; 4096] };
        assert_eq!(context.loggable_content(&short), "MSRP tx-1 SEND\r\n<4096 bytes>");

        let long = SendChunk { body: vec![b'a'; 4097] };
        assert_eq!(context.loggable_content(&long), "Long body message! \r\n MSRP SEND tx-1");
    }

    #[test]
    fn test_config_from_toml() {
        let config: MessageContextConfig =
            toml::from_str("message_lifetime = 64\nmax_logged_body = 10").unwrap();
        assert_eq!(config.message_lifetime, Duration::from_secs(64));
        assert_eq!(config.max_logged_body, 10);
        assert_eq!(config.message_rate, DEFAULT_MESSAGE_RATE);
    }
}
