use crate::config::ClientConfig;
use crate::services::{
    announcements::AnnouncementApi,
    auth::AuthApi,
    client::{ApiClient, ApiError},
    community::CommunityApi,
    diagnosis::DiagnosisApi,
    diary::DiaryApi,
    plants::PlantApi,
    polling::PollPolicy,
};
use crate::session::Session;

/// Every API client, sharing one connection pool and one credential.
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: ApiClient,
    pub poll_policy: PollPolicy,
    pub diagnosis: DiagnosisApi,
    pub plants: PlantApi,
    pub community: CommunityApi,
    pub diary: DiaryApi,
    pub announcements: AnnouncementApi,
    pub auth: AuthApi,
}

impl AppState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            poll_policy: PollPolicy::default(),
            diagnosis: DiagnosisApi::new(client.clone()),
            plants: PlantApi::new(client.clone()),
            community: CommunityApi::new(client.clone()),
            diary: DiaryApi::new(client.clone()),
            announcements: AnnouncementApi::new(client.clone()),
            auth: AuthApi::new(client.clone()),
            client,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut state = Self::new(ApiClient::new(config)?);
        state.poll_policy = config.poll_policy();
        Ok(state)
    }

    /// Same clients, authenticated as `session`.
    pub fn with_session(&self, session: &Session) -> Self {
        let client = self.client.with_credential(session.credential().clone());
        Self {
            poll_policy: self.poll_policy,
            ..Self::new(client)
        }
    }
}
