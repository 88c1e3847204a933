//! Shared test helpers: backend response fixtures and a scripted in-process
//! WebSocket server for signaling tests.

use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{accept_async, tungstenite::Message};

use shared_config::AppConfig;

pub struct TestConfig {
    pub api_base_url: String,
    pub ws_base_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3999/api".to_string(),
            ws_base_url: "ws://localhost:3999/ws".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_api_base_url(url: impl Into<String>) -> Self {
        Self {
            api_base_url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_ws_base_url(url: impl Into<String>) -> Self {
        Self {
            ws_base_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            ws_base_url: self.ws_base_url.clone(),
            request_timeout_secs: 5,
            signaling_connect_timeout_secs: 5,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Canned backend bodies matching the shapes the cells normalize.
pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn appointment_row(
        id: Value,
        doctor_name: Option<&str>,
        date: &str,
        time: &str,
        description: &str,
        status: Option<&str>,
    ) -> Value {
        let mut row = json!({
            "id": id,
            "date": date,
            "time": time,
            "description": description,
        });
        if let Some(name) = doctor_name {
            row["doctor_name"] = json!(name);
        }
        if let Some(status) = status {
            row["status"] = json!(status);
        }
        row
    }

    pub fn login_response(id: Value, email: &str, name: &str, token: Option<&str>) -> Value {
        let mut body = json!({
            "message": "Login successful",
            "user": {
                "id": id,
                "email": email,
                "name": name,
                "avatar": null,
            },
        });
        if let Some(token) = token {
            body["token"] = json!(token);
        }
        body
    }

    pub fn perception_row(id: Value, appointment_id: Value, title: &str, note: &str) -> Value {
        json!({
            "id": id,
            "appointment_id": appointment_id,
            "title": title,
            "note": note,
            "created_at": "2026-02-10T14:45:00",
        })
    }

    pub fn profile_upload_response(image_path: &str) -> Value {
        json!({
            "message": "Profile image updated",
            "profile": { "image_path": image_path },
        })
    }
}

enum ServerCommand {
    SendText(String),
    Close,
}

/// One-connection WebSocket server driven from the test body.
///
/// Accepts a single client, records every inbound text frame, and sends or
/// closes on command.
pub struct SignalingTestServer {
    addr: SocketAddr,
    control: mpsc::UnboundedSender<ServerCommand>,
    received: Arc<Mutex<Vec<String>>>,
}

impl SignalingTestServer {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind signaling test listener");
        let addr = listener.local_addr().expect("signaling test listener addr");
        let (control, mut commands) = mpsc::unbounded_channel();
        let received = Arc::new(Mutex::new(Vec::new()));
        let inbound = Arc::clone(&received);

        tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let Ok(mut ws) = accept_async(stream).await else {
                return;
            };
            loop {
                tokio::select! {
                    cmd = commands.recv() => match cmd {
                        Some(ServerCommand::SendText(text)) => {
                            if ws.send(Message::Text(text)).await.is_err() {
                                break;
                            }
                        }
                        Some(ServerCommand::Close) | None => {
                            let _ = ws.close(None).await;
                            break;
                        }
                    },
                    frame = ws.next() => match frame {
                        Some(Ok(Message::Text(text))) => inbound.lock().await.push(text),
                        Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                        Some(Ok(_)) => {}
                    },
                }
            }
        });

        Self {
            addr,
            control,
            received,
        }
    }

    /// Base URL to hand to `AppConfig::ws_base_url`; the channel appends `/{local_id}`.
    pub fn ws_base_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn send_text(&self, text: impl Into<String>) {
        let _ = self.control.send(ServerCommand::SendText(text.into()));
    }

    pub fn close(&self) {
        let _ = self.control.send(ServerCommand::Close);
    }

    pub async fn received(&self) -> Vec<String> {
        self.received.lock().await.clone()
    }
}
