use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::Display;

/// Normalised confidence below which a diagnosis is treated as "plant not
/// identified" and only the short notice is shown.
pub const IDENTIFICATION_CONFIDENCE_THRESHOLD: u8 = 80;

/// Confidence reported when the backend omits it.
pub const DEFAULT_CONFIDENCE: u8 = 50;

/// Fallback plant name for results without one.
pub const UNKNOWN_PLANT_NAME: &str = "식물";

/// Notice shown for results under the identification threshold.
pub const UNIDENTIFIED_NOTICE: &str = "식물이 식별되지 않았어요";

/// Opaque diagnosis identifier assigned by the backend.
///
/// The backend currently emits numeric IDs; strings are accepted so the
/// client does not depend on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(Self(s)),
            serde_json::Value::Number(n) => Ok(Self(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "expected diagnosis id as number or string, got {other}"
            ))),
        }
    }
}

/// Server-side status of a diagnosis job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DiagnosisStatus {
    Processing,
    Completed,
    Failed,
    /// Any status this client does not know; polled like `processing`.
    #[serde(other)]
    Unknown,
}

/// Response of `POST /diagnosis/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub diagnosis_id: Option<JobId>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseAssessment {
    pub disease_name: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisSuggestion {
    pub message: String,
}

/// One read-only snapshot from `GET /diagnosis/result/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisSnapshot {
    #[serde(default)]
    pub id: Option<JobId>,
    pub status: DiagnosisStatus,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub plant_name: Option<String>,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub is_healthy: Option<bool>,
    #[serde(default)]
    pub health_confidence: Option<f64>,
    #[serde(default)]
    pub diseases: Option<Vec<DiseaseAssessment>>,
    #[serde(default)]
    pub suggestions: Option<Vec<DiagnosisSuggestion>>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload of a job that reached `completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub plant_name: Option<String>,
    pub scientific_name: Option<String>,
    pub confidence: Option<f64>,
    pub is_healthy: bool,
    pub health_confidence: Option<f64>,
    pub diseases: Vec<DiseaseAssessment>,
    pub suggestions: Vec<DiagnosisSuggestion>,
    pub image_url: Option<String>,
}

impl From<DiagnosisSnapshot> for DiagnosisResult {
    fn from(snapshot: DiagnosisSnapshot) -> Self {
        Self {
            plant_name: snapshot.plant_name,
            scientific_name: snapshot.scientific_name,
            confidence: snapshot.confidence,
            is_healthy: snapshot.is_healthy.unwrap_or(false),
            health_confidence: snapshot.health_confidence,
            diseases: snapshot.diseases.unwrap_or_default(),
            suggestions: snapshot.suggestions.unwrap_or_default(),
            image_url: snapshot.image_url,
        }
    }
}

/// Past diagnosis as returned by `GET /diagnosis/history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    #[serde(alias = "ID")]
    pub id: JobId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub plant_name: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub is_healthy: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Warning,
}

/// Whether a report is confident enough to show as an identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identification {
    Identified,
    Unidentified,
}

/// Caller-facing summary of a completed diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisReport {
    pub plant_name: String,
    pub confidence: u8,
    pub health_status: HealthStatus,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub image_url: Option<String>,
}

impl From<&DiagnosisResult> for DiagnosisReport {
    fn from(result: &DiagnosisResult) -> Self {
        let plant_name = result
            .plant_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_PLANT_NAME)
            .to_string();

        let confidence = result
            .confidence
            .map(clamp_percent)
            .unwrap_or(DEFAULT_CONFIDENCE);

        Self {
            plant_name,
            confidence,
            health_status: if result.is_healthy {
                HealthStatus::Healthy
            } else {
                HealthStatus::Warning
            },
            issues: result
                .diseases
                .iter()
                .map(|d| format!("{} ({}% 확률)", d.disease_name, d.confidence.round()))
                .collect(),
            recommendations: result.suggestions.iter().map(|s| s.message.clone()).collect(),
            image_url: result.image_url.clone(),
        }
    }
}

impl DiagnosisReport {
    /// Classify against [`IDENTIFICATION_CONFIDENCE_THRESHOLD`] after
    /// normalising, so a fractional server confidence rounded to 1 reads as 100%.
    pub fn identification(&self) -> Identification {
        identification_for(normalize_confidence(&ConfidenceValue::Number(f64::from(
            self.confidence,
        ))))
    }
}

fn clamp_percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Raw confidence as it may appear in a payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfidenceValue {
    Number(f64),
    Text(String),
}

/// Normalise a confidence to a 0-100 integer percentage.
///
/// Fractions in `[0, 1]` are scaled, values up to 100 are rounded, text such
/// as `"91%"` is parsed. Anything else is unknown.
pub fn normalize_confidence(value: &ConfidenceValue) -> Option<u8> {
    match value {
        ConfidenceValue::Text(text) => {
            let parsed: f64 = text.replace('%', "").trim().parse().ok()?;
            parsed.is_finite().then(|| clamp_percent(parsed))
        }
        ConfidenceValue::Number(n) if (0.0..=1.0).contains(n) => Some(clamp_percent(n * 100.0)),
        ConfidenceValue::Number(n) if (0.0..=100.0).contains(n) => Some(clamp_percent(*n)),
        ConfidenceValue::Number(_) => None,
    }
}

/// Apply [`IDENTIFICATION_CONFIDENCE_THRESHOLD`]. Unknown confidence is
/// shown in full.
pub fn identification_for(confidence: Option<u8>) -> Identification {
    match confidence {
        Some(c) if c < IDENTIFICATION_CONFIDENCE_THRESHOLD => Identification::Unidentified,
        _ => Identification::Identified,
    }
}

/// Optional capture location attached to an analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}
