use super::error::{ClientError, Result};
use evoplat_net::Outbound;
use futures::StreamExt;
use futures_util::sink::SinkExt;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

/// Connection bookkeeping shared with the socket pump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkState {
    pub connected: bool,
    pub frames_sent: usize,
    pub frames_received: usize,
    pub last_error: Option<String>,
}

/// Owns the optimizer WebSocket.
///
/// A background task pumps frames both ways: text frames from the socket go
/// to the inbound receiver handed out by [`NetworkManager::connect`], and
/// strings pushed into [`NetworkManager::sender`] go out as text frames.
#[derive(Clone)]
pub struct NetworkManager {
    tx: UnboundedSender<String>,
    state: Arc<Mutex<NetworkState>>,
}

impl NetworkManager {
    pub async fn connect(url: &str) -> Result<(Self, UnboundedReceiver<String>)> {
        let (ws_stream, _) = connect_async(url).await?;
        tracing::info!(url = %url, "Connected to optimizer channel");

        let state = Arc::new(Mutex::new(NetworkState {
            connected: true,
            ..Default::default()
        }));
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<String>();
        let state_clone = state.clone();

        tokio::spawn(async move {
            let (mut ws_sender, mut ws_receiver) = ws_stream.split();

            loop {
                tokio::select! {
                    Some(msg) = rx.recv() => {
                        if let Err(e) = ws_sender.send(Message::Text(msg)).await {
                            Self::record_error(&state_clone, &e.to_string());
                            break;
                        }
                        Self::update(&state_clone, |s| s.frames_sent += 1);
                    }
                    frame = ws_receiver.next() => match frame {
                        Some(Ok(Message::Text(txt))) => {
                            Self::update(&state_clone, |s| s.frames_received += 1);
                            if inbound_tx.send(txt).is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            Self::record_error(&state_clone, &e.to_string());
                            break;
                        }
                    },
                    else => break,
                }
            }

            ws_sender.close().await.ok();
            Self::update(&state_clone, |s| s.connected = false);
            tracing::info!("Optimizer channel closed");
        });

        Ok((Self { tx, state }, inbound_rx))
    }

    fn update(state: &Arc<Mutex<NetworkState>>, f: impl FnOnce(&mut NetworkState)) {
        if let Ok(mut s) = state.lock() {
            f(&mut s);
        }
    }

    fn record_error(state: &Arc<Mutex<NetworkState>>, error: &str) {
        tracing::warn!(error = %error, "Optimizer channel failed");
        Self::update(state, |s| s.last_error = Some(error.to_string()));
    }

    /// Queue for raw outbound text frames.
    #[must_use]
    pub fn sender(&self) -> UnboundedSender<String> {
        self.tx.clone()
    }

    pub fn send(&self, msg: &Outbound) -> Result<()> {
        let txt = msg.to_json()?;
        self.tx.send(txt).map_err(|_| ClientError::ChannelClosed)
    }

    #[must_use]
    pub fn get_state(&self) -> NetworkState {
        self.state
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}
