use bytes::Bytes;

use super::dialog_state::SubscriptionState;

/// What a received NOTIFY reported about a subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyInfo {
    /// Event package, e.g. `refer` or `reg`
    pub event: String,
    pub subscription_state: SubscriptionState,
    /// Remaining subscription duration in seconds, if reported
    pub expires: Option<u32>,
    pub content_type: Option<String>,
    pub body: Option<Bytes>,
}

impl NotifyInfo {
    pub fn new(event: impl Into<String>, subscription_state: SubscriptionState) -> Self {
        Self {
            event: event.into(),
            subscription_state,
            expires: None,
            content_type: None,
            body: None,
        }
    }

    pub fn with_expires(mut self, expires: u32) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn with_body(mut self, content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.content_type = Some(content_type.into());
        self.body = Some(body.into());
        self
    }
}
