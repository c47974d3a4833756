use garde::Validate;

use crate::models::announcement::{
    sort_for_display, Announcement, AnnouncementEnvelope, AnnouncementForm, AnnouncementList,
};
use crate::services::client::{Ack, ApiClient, ApiError};
use crate::services::validation::SubmitError;

/// Client for site announcements. Writes require an admin credential.
#[derive(Debug, Clone)]
pub struct AnnouncementApi {
    client: ApiClient,
}

impl AnnouncementApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Published announcements, pinned first.
    pub async fn list(&self) -> Result<Vec<Announcement>, ApiError> {
        let list: AnnouncementList = self.client.get("/announcements").await?;
        let mut announcements = list.announcements;
        sort_for_display(&mut announcements);
        Ok(announcements)
    }

    pub async fn get(&self, announcement_id: u64) -> Result<Announcement, ApiError> {
        let envelope: AnnouncementEnvelope = self
            .client
            .get(&format!("/announcements/{}", announcement_id))
            .await?;
        Ok(envelope.announcement)
    }

    pub async fn create(&self, form: &AnnouncementForm) -> Result<Announcement, SubmitError> {
        form.validate()?;
        let envelope: AnnouncementEnvelope = self.client.post("/announcements", form).await?;
        Ok(envelope.announcement)
    }

    pub async fn update(
        &self,
        announcement_id: u64,
        form: &AnnouncementForm,
    ) -> Result<Announcement, SubmitError> {
        form.validate()?;
        let envelope: AnnouncementEnvelope = self
            .client
            .put(&format!("/announcements/{}", announcement_id), form)
            .await?;
        Ok(envelope.announcement)
    }

    pub async fn delete(&self, announcement_id: u64) -> Result<Ack, ApiError> {
        self.client
            .delete(&format!("/announcements/{}", announcement_id))
            .await
    }
}
