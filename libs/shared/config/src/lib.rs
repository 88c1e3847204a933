use std::env;
use tracing::warn;

const DEFAULT_API_BASE_URL: &str = "https://clinic-backend-s2lx.onrender.com/api";
const DEFAULT_WS_BASE_URL: &str = "wss://clinic-backend-s2lx.onrender.com/ws";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SIGNALING_CONNECT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub ws_base_url: String,
    pub request_timeout_secs: u64,
    pub signaling_connect_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("CLINIC_API_BASE_URL").unwrap_or_else(|_| {
                warn!("CLINIC_API_BASE_URL not set, using default");
                DEFAULT_API_BASE_URL.to_string()
            }),
            ws_base_url: env::var("CLINIC_WS_BASE_URL").unwrap_or_else(|_| {
                warn!("CLINIC_WS_BASE_URL not set, using default");
                DEFAULT_WS_BASE_URL.to_string()
            }),
            request_timeout_secs: parse_secs("CLINIC_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            signaling_connect_timeout_secs: parse_secs(
                "CLINIC_SIGNALING_CONNECT_TIMEOUT_SECS",
                DEFAULT_SIGNALING_CONNECT_TIMEOUT_SECS,
            ),
        };

        if !config.is_configured() {
            warn!("Client not fully configured - missing base URLs");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty() && !self.ws_base_url.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            ws_base_url: DEFAULT_WS_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            signaling_connect_timeout_secs: DEFAULT_SIGNALING_CONNECT_TIMEOUT_SECS,
        }
    }
}

fn parse_secs(var: &str, default: u64) -> u64 {
    match env::var(var) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} is not a valid number of seconds, using default", var);
            default
        }),
        Err(_) => default,
    }
}
