use async_trait::async_trait;
use tokio::sync::mpsc;

use gcb_core::{
    domain::Address,
    messaging::{port::MessagingPort, types::SofaMessage},
    Error, Result,
};

use crate::codec;

/// Write half of the chat-service connection.
///
/// Frames are queued onto a channel drained by the socket task in
/// [`router`](crate::router), so sends survive a reconnect as long as the
/// queue has capacity.
#[derive(Clone)]
pub struct SofaClient {
    tx: mpsc::Sender<String>,
}

impl SofaClient {
    /// Create a client plus the receiver the socket task drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl MessagingPort for SofaClient {
    async fn send(&self, to: &Address, message: &SofaMessage) -> Result<()> {
        let frame = codec::encode_message(to, message)?;
        self.tx
            .send(frame)
            .await
            .map_err(|_| Error::Messaging("chat service connection is closed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_frames_reach_the_receiver() {
        let (client, mut rx) = SofaClient::channel(4);
        client
            .send(&Address("0xb".to_string()), &SofaMessage::text("hi"))
            .await
            .unwrap();

        let frame = rx.recv().await.unwrap();
        assert!(frame.contains("\"recipient\":\"0xb\""));
        assert!(frame.contains("SOFA::Message:"));
    }

    #[tokio::test]
    async fn send_fails_once_the_socket_side_is_gone() {
        let (client, rx) = SofaClient::channel(4);
        drop(rx);

        let result = client
            .send(&Address("0xb".to_string()), &SofaMessage::text("hi"))
            .await;
        assert!(matches!(result, Err(Error::Messaging(_))));
    }
}
