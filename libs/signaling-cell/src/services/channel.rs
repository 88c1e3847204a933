// libs/signaling-cell/src/services/channel.rs
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use shared_config::AppConfig;

use crate::error::SignalingError;
use crate::models::{ChannelEvent, ChannelState, CloseReason, SignalMessage};

pub type MessageHandler = Box<dyn Fn(SignalMessage) + Send + Sync>;
pub type ChannelEventReceiver = broadcast::Receiver<ChannelEvent>;

/// Message-passing channel for session negotiation, scoped to one local
/// identity over one underlying WebSocket connection.
///
/// Lifecycle is `Idle → Connecting → Open → Closed` with no reconnection: a
/// closed channel stays closed and a fresh instance is created for the next
/// session. Sends attempted while the connection is not open fail with
/// `ChannelClosed` and are logged — call setup is best-effort, so nothing is
/// buffered or retried.
///
/// Inbound frames are read by a single task, so the registered handler is
/// invoked once per message, in arrival order, never concurrently.
pub struct SignalingChannel {
    local_id: String,
    ws_base_url: String,
    connect_timeout: Duration,
    state: Arc<RwLock<ChannelState>>,
    outbound: Arc<RwLock<Option<mpsc::UnboundedSender<SignalMessage>>>>,
    handler: Arc<RwLock<Option<MessageHandler>>>,
    events: broadcast::Sender<ChannelEvent>,
    tasks: std::sync::Mutex<Vec<JoinHandle<()>>>,
}

impl SignalingChannel {
    pub fn new(config: &AppConfig, local_id: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(100);

        Self {
            local_id: local_id.into(),
            ws_base_url: config.ws_base_url.trim_end_matches('/').to_string(),
            connect_timeout: Duration::from_secs(config.signaling_connect_timeout_secs),
            state: Arc::new(RwLock::new(ChannelState::Idle)),
            outbound: Arc::new(RwLock::new(None)),
            handler: Arc::new(RwLock::new(None)),
            events,
            tasks: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    pub async fn state(&self) -> ChannelState {
        *self.state.read().await
    }

    /// Open the connection addressed by the local identity.
    pub async fn connect(&self) -> Result<(), SignalingError> {
        {
            let mut state = self.state.write().await;
            match *state {
                ChannelState::Idle => *state = ChannelState::Connecting,
                ChannelState::Connecting | ChannelState::Open => {
                    debug!("Signaling channel for {} already connected", self.local_id);
                    return Ok(());
                }
                ChannelState::Closed => return Err(SignalingError::ChannelClosed),
            }
        }

        let url = format!("{}/{}", self.ws_base_url, self.local_id);
        debug!("Connecting signaling channel to {}", url);

        let ws = match timeout(self.connect_timeout, connect_async(url.as_str())).await {
            Ok(Ok((ws, _response))) => ws,
            Ok(Err(e)) => {
                *self.state.write().await = ChannelState::Closed;
                return Err(SignalingError::Network(e.to_string()));
            }
            Err(_) => {
                *self.state.write().await = ChannelState::Closed;
                return Err(SignalingError::Network(format!("Connect to {url} timed out")));
            }
        };

        let (mut sink, mut stream) = ws.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<SignalMessage>();

        *self.outbound.write().await = Some(tx);
        *self.state.write().await = ChannelState::Open;
        info!("Signaling channel open for {}", self.local_id);

        let writer = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                match serde_json::to_string(&message) {
                    Ok(frame) => {
                        if let Err(e) = sink.send(Message::Text(frame)).await {
                            warn!("Failed to transmit signal: {}", e);
                            break;
                        }
                    }
                    Err(e) => warn!("Dropping unserializable signal: {}", e),
                }
            }
            let _ = sink.close().await;
        });

        let state = Arc::clone(&self.state);
        let outbound = Arc::clone(&self.outbound);
        let handler = Arc::clone(&self.handler);
        let events = self.events.clone();
        let local_id = self.local_id.clone();

        let reader = tokio::spawn(async move {
            let reason = loop {
                match stream.next().await {
                    Some(Ok(Message::Text(frame))) => dispatch_frame(&handler, &events, &frame).await,
                    Some(Ok(Message::Close(_))) | None => break CloseReason::Remote,
                    Some(Ok(_)) => {} // binary and ping/pong frames are not signaling traffic
                    Some(Err(e)) => break CloseReason::TransportError(e.to_string()),
                }
            };
            warn!("Signaling connection for {} lost: {:?}", local_id, reason);
            release(&state, &outbound, &handler).await;
            let _ = events.send(ChannelEvent::Closed(reason));
        });

        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.push(writer);
            tasks.push(reader);
        }

        Ok(())
    }

    /// Transmit one message; returns as soon as it is handed to the writer.
    /// No delivery acknowledgment exists — transport is at-most-once.
    pub async fn send(&self, message: SignalMessage) -> Result<(), SignalingError> {
        if *self.state.read().await != ChannelState::Open {
            warn!(
                "Dropping outbound {} signal to {}: channel not open",
                message.signal_type, message.to
            );
            return Err(SignalingError::ChannelClosed);
        }

        let outbound = self.outbound.read().await;
        match outbound.as_ref() {
            Some(tx) => tx
                .send(message)
                .map_err(|_| SignalingError::ChannelClosed),
            None => Err(SignalingError::ChannelClosed),
        }
    }

    /// Register the inbound-message callback, replacing any previous one.
    pub async fn on_message<F>(&self, handler: F)
    where
        F: Fn(SignalMessage) + Send + Sync + 'static,
    {
        *self.handler.write().await = Some(Box::new(handler));
    }

    /// Subscribe to channel notifications (messages and connection loss).
    pub fn subscribe(&self) -> ChannelEventReceiver {
        self.events.subscribe()
    }

    /// Release the connection. Idempotent; after this every send fails.
    pub async fn close(&self) {
        {
            let mut state = self.state.write().await;
            if *state == ChannelState::Closed {
                return;
            }
            *state = ChannelState::Closed;
        }

        self.outbound.write().await.take();
        *self.handler.write().await = None;
        let _ = self.events.send(ChannelEvent::Closed(CloseReason::Local));

        // The writer drains out once its sender is gone; the reader must not
        // deliver anything against a closed channel.
        if let Ok(mut tasks) = self.tasks.lock() {
            for task in tasks.drain(..) {
                task.abort();
            }
        }

        info!("Signaling channel for {} closed", self.local_id);
    }
}

impl Drop for SignalingChannel {
    fn drop(&mut self) {
        if let Ok(tasks) = self.tasks.get_mut() {
            for task in tasks.drain(..) {
                task.abort();
            }
        }
    }
}

async fn dispatch_frame(
    handler: &Arc<RwLock<Option<MessageHandler>>>,
    events: &broadcast::Sender<ChannelEvent>,
    frame: &str,
) {
    match serde_json::from_str::<SignalMessage>(frame) {
        Ok(message) => {
            if let Some(callback) = handler.read().await.as_ref() {
                callback(message.clone());
            }
            let _ = events.send(ChannelEvent::Message(message));
        }
        // Third-party transport: frames that do not parse are dropped, never
        // surfaced to the caller.
        Err(e) => warn!("Dropping malformed signaling frame: {}", e),
    }
}

async fn release(
    state: &Arc<RwLock<ChannelState>>,
    outbound: &Arc<RwLock<Option<mpsc::UnboundedSender<SignalMessage>>>>,
    handler: &Arc<RwLock<Option<MessageHandler>>>,
) {
    *state.write().await = ChannelState::Closed;
    outbound.write().await.take();
    *handler.write().await = None;
}
