use async_trait::async_trait;

use crate::{
    domain::Address,
    messaging::types::SofaMessage,
    Result,
};

/// Chat-service port.
///
/// The adapter owns the transport; the core only needs a way to deliver a
/// message to one user. Replying to an event is a send to that event's user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send(&self, to: &Address, message: &SofaMessage) -> Result<()>;
}
