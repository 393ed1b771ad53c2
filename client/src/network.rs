//! WebSocket channel to the game server.
//!
//! Network I/O runs on the tokio runtime; the frame loop drains
//! inbound events through [`ConnectionChannel::pump`], which is the
//! only place snapshot data enters the [`StateStore`]. Outbound sends
//! are fire-and-forget: once the socket is gone they are dropped with
//! a warning, never surfaced as errors.

use crate::state::StateStore;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use serde::Serialize;
use shared::{ClientCommand, InputState, StatePatch, UpgradeStat};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

#[derive(Debug)]
pub enum ChannelEvent {
    Opened,
    Patch(StatePatch),
    Closed,
}

pub struct ConnectionChannel {
    outbound: Option<UnboundedSender<Message>>,
    inbound: UnboundedReceiver<ChannelEvent>,
}

impl ConnectionChannel {
    /// Opens the socket and spawns the reader/writer tasks. Exactly one
    /// connection lives at a time: replacing a channel drops the old
    /// one, which closes it.
    pub fn connect(
        handle: &Handle,
        server: &str,
        token: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let url = ws_url(server, token)?;
        info!("connecting to {}://{}", url.scheme(), url.host_str().unwrap_or("?"));

        let (socket, _response) = handle.block_on(connect_async(url.as_str()))?;
        let (mut write, mut read) = socket.split();

        let (tx_out, mut rx_out) = mpsc::unbounded_channel::<Message>();
        let (tx_in, rx_in) = mpsc::unbounded_channel::<ChannelEvent>();

        // The handshake succeeded; the pump will mark the store
        // authenticated on the next frame.
        let _ = tx_in.send(ChannelEvent::Opened);

        handle.spawn(async move {
            while let Some(message) = rx_out.recv().await {
                let closing = matches!(message, Message::Close(_));
                if write.send(message).await.is_err() {
                    break;
                }
                if closing {
                    break;
                }
            }
        });

        handle.spawn(async move {
            while let Some(frame) = read.next().await {
                match frame {
                    Ok(Message::Text(text)) => match serde_json::from_str::<StatePatch>(&text) {
                        Ok(patch) => {
                            if tx_in.send(ChannelEvent::Patch(patch)).is_err() {
                                return;
                            }
                        }
                        Err(e) => warn!("discarding malformed server payload: {}", e),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        error!("connection error: {}", e);
                        break;
                    }
                }
            }
            let _ = tx_in.send(ChannelEvent::Closed);
        });

        Ok(Self {
            outbound: Some(tx_out),
            inbound: rx_in,
        })
    }

    /// A channel that never opened. Sends drop with a warning and the
    /// pump never delivers anything, so the client keeps rendering the
    /// disconnected state instead of exiting.
    pub fn offline() -> Self {
        let (_tx_in, rx_in) = mpsc::unbounded_channel();
        Self {
            outbound: None,
            inbound: rx_in,
        }
    }

    /// Drains pending inbound events into the store. Called once per
    /// frame on the render loop, so all snapshot mutation happens on
    /// one sequential execution context.
    pub fn pump(&mut self, store: &mut StateStore) {
        while let Ok(event) = self.inbound.try_recv() {
            match event {
                ChannelEvent::Opened => {
                    info!("game socket open");
                    store.mark_connected();
                }
                ChannelEvent::Patch(patch) => {
                    debug!("applying snapshot patch");
                    store.apply_patch(patch);
                }
                ChannelEvent::Closed => {
                    warn!("disconnected from server; restart the client to reconnect");
                    store.mark_disconnected();
                    self.outbound = None;
                }
            }
        }
    }

    pub fn send_input(&self, input: &InputState) {
        self.send_json(input);
    }

    pub fn send_upgrade(&self, stat: UpgradeStat) {
        self.send_json(&ClientCommand::Upgrade { stat });
    }

    fn send_json<T: Serialize>(&self, payload: &T) {
        let Some(tx) = &self.outbound else {
            warn!("socket is not connected; dropping outbound message");
            return;
        };
        match serde_json::to_string(payload) {
            Ok(text) => {
                if tx.send(Message::Text(text)).is_err() {
                    warn!("socket task gone; dropping outbound message");
                }
            }
            Err(e) => warn!("failed to encode outbound message: {}", e),
        }
    }

    /// Queues a close frame and forgets the outbound handle; later
    /// sends become no-ops.
    pub fn close(&mut self) {
        if let Some(tx) = self.outbound.take() {
            let _ = tx.send(Message::Close(None));
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        outbound: Option<UnboundedSender<Message>>,
        inbound: UnboundedReceiver<ChannelEvent>,
    ) -> Self {
        Self { outbound, inbound }
    }

    #[cfg(test)]
    pub(crate) fn test_pair() -> (Self, UnboundedReceiver<Message>) {
        let (tx_out, rx_out) = mpsc::unbounded_channel();
        let (_tx_in, rx_in) = mpsc::unbounded_channel();
        (Self::from_parts(Some(tx_out), rx_in), rx_out)
    }
}

impl Drop for ConnectionChannel {
    fn drop(&mut self) {
        self.close();
    }
}

/// Builds `ws(s)://host/api/ws?token=<bearer>` from the HTTP base URL.
fn ws_url(server: &str, token: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(server)?;
    let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
    let _ = url.set_scheme(scheme);
    url.set_path("/api/ws");
    url.query_pairs_mut().clear().append_pair("token", token);
    Ok(url)
}
