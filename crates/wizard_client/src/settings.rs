use std::env;
use std::time::Duration;

use wizard_logging::wizard_warn;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

pub const ENV_API_URL: &str = "EEG_API_URL";
pub const ENV_CONNECT_TIMEOUT: &str = "EEG_API_CONNECT_TIMEOUT_SECS";
pub const ENV_REQUEST_TIMEOUT: &str = "EEG_API_REQUEST_TIMEOUT_SECS";

/// Where the backend lives and how patient to be with it.
///
/// `None` timeouts leave the transport defaults in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
    pub max_image_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: None,
            request_timeout: None,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl ApiSettings {
    /// Defaults overridden by any `EEG_API_*` variables that are set.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(url) = env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                settings = settings.with_base_url(url);
            }
        }
        settings.connect_timeout = secs_from_env(ENV_CONNECT_TIMEOUT);
        settings.request_timeout = secs_from_env(ENV_REQUEST_TIMEOUT);
        settings
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim().trim_end_matches('/').to_string();
        self
    }
}

fn secs_from_env(name: &str) -> Option<Duration> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            wizard_warn!("Ignoring {}={:?}: expected a positive number of seconds", name, raw);
            None
        }
    }
}
