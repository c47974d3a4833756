use serde::Deserialize;
use std::time::Duration;

use crate::models::auth::SocialProvider;
use crate::services::polling::PollPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Backend origin (e.g., "https://api.example.com"). `/api/v1` is appended.
    pub api_url: String,

    /// Bearer token for authenticated calls. Optional; most reads are public.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Naver OAuth client ID
    #[serde(default)]
    pub naver_client_id: Option<String>,

    /// Kakao OAuth client ID
    #[serde(default)]
    pub kakao_client_id: Option<String>,

    /// Status requests issued before a diagnosis times out
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,

    /// Delay between diagnosis status requests
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_poll_max_attempts() -> u32 {
    PollPolicy::DEFAULT_MAX_ATTEMPTS
}

fn default_poll_interval_ms() -> u64 {
    PollPolicy::DEFAULT_INTERVAL.as_millis() as u64
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Config pointing at `api_url` with every other field defaulted.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_token: None,
            naver_client_id: None,
            kakao_client_id: None,
            poll_max_attempts: default_poll_max_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Base path every request is resolved against.
    pub fn api_base(&self) -> String {
        format!("{}/api/v1", self.api_url.trim_end_matches('/'))
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            self.poll_max_attempts,
            Duration::from_millis(self.poll_interval_ms),
        )
    }

    /// OAuth client id registered for `provider`, if configured.
    pub fn client_id_for(&self, provider: SocialProvider) -> Option<&str> {
        match provider {
            SocialProvider::Naver => self.naver_client_id.as_deref(),
            SocialProvider::Kakao => self.kakao_client_id.as_deref(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
