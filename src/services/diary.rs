use garde::Validate;
use reqwest::multipart::Form;

use crate::models::diary::{Diary, DiaryEntry, EntryForm, NewDiary};
use crate::services::client::{Ack, ApiClient, ApiError};
use crate::services::validation::{encode_image_urls, ImageUpload, SubmitError};

/// Client for the personal growth diary.
#[derive(Debug, Clone)]
pub struct DiaryApi {
    client: ApiClient,
}

impl DiaryApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// All diaries of the signed-in user, newest first.
    pub async fn diaries(&self) -> Result<Vec<Diary>, ApiError> {
        self.client.get("/diary").await
    }

    pub async fn diary(&self, diary_id: u64) -> Result<Diary, ApiError> {
        self.client.get(&format!("/diary/{}", diary_id)).await
    }

    pub async fn create_diary(&self, diary: &NewDiary) -> Result<Diary, SubmitError> {
        diary.validate()?;
        tracing::info!(plant_id = diary.plant_id, nickname = %diary.plant_nickname, "Creating diary");
        Ok(self.client.post("/diary", diary).await?)
    }

    pub async fn add_entry(
        &self,
        diary_id: u64,
        entry: &EntryForm,
        images: &[ImageUpload],
    ) -> Result<DiaryEntry, SubmitError> {
        entry.validate()?;
        let form = entry_fields(entry, images)?;
        tracing::info!(diary_id, images = images.len(), "Adding diary entry");
        Ok(self
            .client
            .post_multipart(&format!("/diary/{}/entries", diary_id), form)
            .await?)
    }

    /// Replace an entry. `existing_images` lists the URLs to keep.
    pub async fn update_entry(
        &self,
        diary_id: u64,
        entry_id: u64,
        entry: &EntryForm,
        images: &[ImageUpload],
        existing_images: &[String],
    ) -> Result<DiaryEntry, SubmitError> {
        entry.validate()?;
        let mut form = entry_fields(entry, images)?;
        if !existing_images.is_empty() {
            form = form.text("existing_images", encode_image_urls(existing_images)?);
        }
        tracing::info!(diary_id, entry_id, images = images.len(), "Updating diary entry");
        Ok(self
            .client
            .put_multipart(&format!("/diary/{}/entries/{}", diary_id, entry_id), form)
            .await?)
    }

    pub async fn delete_entry(&self, diary_id: u64, entry_id: u64) -> Result<Ack, ApiError> {
        self.client
            .delete(&format!("/diary/{}/entries/{}", diary_id, entry_id))
            .await
    }
}

fn entry_fields(entry: &EntryForm, images: &[ImageUpload]) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in entry.fields() {
        form = form.text(name, value);
    }
    for image in images {
        form = form.part("images", image.to_part()?);
    }
    Ok(form)
}
