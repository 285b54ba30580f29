//! Chat-service connection loop.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tracing::{info, warn};

use gcb_core::chat::GroupChat;

use crate::codec;

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Run the socket loop until the outbound channel is closed.
///
/// Inbound frames are decoded into events and dispatched to the service;
/// outbound frames queued by [`SofaClient`](crate::SofaClient) are written
/// to the socket. On a connection error the loop reconnects after a fixed
/// delay; queued outbound frames are kept across reconnects.
pub async fn run(
    url: &str,
    chat: Arc<GroupChat>,
    mut outbound: mpsc::Receiver<String>,
) -> anyhow::Result<()> {
    loop {
        match connect_and_stream(url, &chat, &mut outbound).await {
            Ok(()) => {
                info!("chat service session ended, shutting down");
                return Ok(());
            }
            Err(e) => {
                warn!("chat service disconnected: {e}; reconnecting in {RECONNECT_DELAY:?}");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

/// One socket session: connect, then pump frames both ways until an error
/// or until every `SofaClient` is dropped (graceful shutdown).
async fn connect_and_stream(
    url: &str,
    chat: &Arc<GroupChat>,
    outbound: &mut mpsc::Receiver<String>,
) -> anyhow::Result<()> {
    let (stream, _) = connect_async(url).await?;
    info!("connected to chat service at {url}");
    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            frame = outbound.recv() => {
                match frame {
                    Some(text) => write.send(WsMessage::Text(text)).await?,
                    None => return Ok(()),
                }
            }
            incoming = read.next() => {
                match incoming {
                    Some(Ok(WsMessage::Text(text))) => {
                        match codec::decode_event(&text) {
                            Ok(event) => {
                                // Handlers send through the outbound queue, so
                                // dispatch must not block this loop.
                                let chat = chat.clone();
                                tokio::spawn(async move { chat.on_event(event).await });
                            }
                            Err(e) => warn!("dropping undecodable frame: {e}"),
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) => {
                        anyhow::bail!("chat service closed the connection");
                    }
                    Some(Ok(_)) => {} // pings and binary frames are ignored
                    Some(Err(e)) => return Err(e.into()),
                    None => anyhow::bail!("chat service stream ended"),
                }
            }
        }
    }
}
