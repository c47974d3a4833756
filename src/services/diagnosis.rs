use reqwest::multipart::Form;

use crate::models::diagnosis::{
    AnalyzeResponse, DiagnosisRecord, DiagnosisReport, DiagnosisResult, DiagnosisSnapshot, JobId,
    Location,
};
use crate::services::client::{ApiClient, ApiError};
use crate::services::polling::{poll_diagnosis, CancelSignal, PollError, PollPolicy};
use crate::services::validation::ImageUpload;

/// Client for the AI plant diagnosis endpoints.
#[derive(Debug, Clone)]
pub struct DiagnosisApi {
    client: ApiClient,
}

impl DiagnosisApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Submit an image for analysis. Location is attached only when known.
    pub async fn analyze(
        &self,
        image: &ImageUpload,
        location: Option<Location>,
    ) -> Result<AnalyzeResponse, ApiError> {
        let mut form = Form::new().part("image", image.to_part()?);
        if let Some(loc) = location {
            form = form
                .text("latitude", loc.latitude.to_string())
                .text("longitude", loc.longitude.to_string());
        }

        tracing::info!(
            file = image.file_name(),
            size = image.bytes().len(),
            with_location = location.is_some(),
            "Submitting image for diagnosis"
        );
        metrics::counter!("diagnosis_jobs_submitted").increment(1);

        self.client.post_multipart("/diagnosis/analyze", form).await
    }

    /// Read one status snapshot.
    pub async fn result(&self, job_id: &JobId) -> Result<DiagnosisSnapshot, ApiError> {
        self.client
            .get(&format!("/diagnosis/result/{}", job_id))
            .await
    }

    /// Poll a submitted job until it resolves.
    pub async fn wait_for_result(
        &self,
        job_id: &JobId,
        policy: PollPolicy,
        cancel: &CancelSignal,
    ) -> Result<DiagnosisResult, PollError> {
        poll_diagnosis(job_id, policy, cancel, || self.result(job_id)).await
    }

    /// Submit, poll, and summarise in one call.
    pub async fn analyze_and_wait(
        &self,
        image: &ImageUpload,
        location: Option<Location>,
        policy: PollPolicy,
        cancel: &CancelSignal,
    ) -> Result<DiagnosisReport, DiagnosisError> {
        let submitted = self.analyze(image, location).await?;
        let job_id = submitted.diagnosis_id.ok_or(DiagnosisError::MissingJobId)?;

        tracing::info!(job_id = %job_id, "Diagnosis started, polling for result");

        let result = self.wait_for_result(&job_id, policy, cancel).await?;
        Ok(DiagnosisReport::from(&result))
    }

    /// The signed-in user's most recent diagnoses.
    pub async fn history(&self) -> Result<Vec<DiagnosisRecord>, ApiError> {
        self.client.get("/diagnosis/history").await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DiagnosisError {
    #[error("Failed to submit image: {0}")]
    Submit(#[from] ApiError),

    #[error("Server accepted the image but returned no diagnosis id")]
    MissingJobId,

    #[error(transparent)]
    Poll(#[from] PollError),
}
