//! Bounded, fixed-interval polling of a diagnosis job.
//!
//! The backend analyses an uploaded image asynchronously. After submission the
//! client reads status snapshots until the job reports `completed` or
//! `failed`, the attempt budget runs out, or the caller cancels.
//!
//! - One status request per attempt, strictly sequential.
//! - Constant interval between attempts; no backoff and no jitter.
//! - Request errors count as attempts and are retried while budget remains.
//! - A fired [`CancelSignal`] ends the loop immediately, including while a
//!   request is in flight, and nothing is delivered afterwards.

use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::sleep;

use crate::models::diagnosis::{DiagnosisResult, DiagnosisSnapshot, DiagnosisStatus, JobId};
use crate::services::client::ApiError;

/// Message used when a failed job carries no error of its own.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Analysis failed";

/// Message for a job still processing when the attempt budget runs out.
pub const TIMEOUT_MESSAGE: &str = "Analysis timeout - please try again";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Total status requests allowed, at least 1.
    pub max_attempts: u32,
    pub interval: Duration,
}

impl PollPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_INTERVAL)
    }
}

/// Owner side of a cancellation signal. Dropping it cancels.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.tx.send_replace(true);
    }
}

/// Observer side of a [`CancelHandle`]; cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            // Sender gone without cancelling: this signal can no longer fire.
            std::future::pending::<()>().await;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// The backend reported the job as failed.
    #[error("{0}")]
    Failed(String),

    /// The job was still processing when the budget ran out.
    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout { attempts: u32 },

    /// The last attempt errored and the budget ran out.
    #[error("Diagnosis status unavailable after {attempts} attempts: {source}")]
    Unreachable {
        attempts: u32,
        #[source]
        source: ApiError,
    },

    #[error("Diagnosis polling cancelled")]
    Cancelled,
}

/// Poll `fetch` until the job identified by `job_id` resolves.
///
/// `fetch` performs exactly one status request per call.
pub async fn poll_diagnosis<F, Fut>(
    job_id: &JobId,
    policy: PollPolicy,
    cancel: &CancelSignal,
    mut fetch: F,
) -> Result<DiagnosisResult, PollError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<DiagnosisSnapshot, ApiError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let started = Instant::now();
    let mut attempts = 0;

    loop {
        if cancel.is_cancelled() {
            tracing::info!(job_id = %job_id, attempts, "Diagnosis polling cancelled");
            return Err(PollError::Cancelled);
        }

        attempts += 1;
        metrics::counter!("diagnosis_poll_attempts_total").increment(1);
        tracing::debug!(job_id = %job_id, attempt = attempts, max_attempts, "Checking diagnosis status");

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(job_id = %job_id, attempts, "Diagnosis polling cancelled mid-request");
                return Err(PollError::Cancelled);
            }
            outcome = fetch() => outcome,
        };

        match outcome {
            Ok(snapshot) => match snapshot.status {
                DiagnosisStatus::Completed => {
                    metrics::counter!("diagnosis_jobs_completed").increment(1);
                    metrics::histogram!("diagnosis_wait_seconds")
                        .record(started.elapsed().as_secs_f64());
                    tracing::info!(
                        job_id = %job_id,
                        attempts,
                        plant = snapshot.plant_name.as_deref().unwrap_or(""),
                        confidence = snapshot.confidence,
                        "Diagnosis completed"
                    );
                    return Ok(DiagnosisResult::from(snapshot));
                }
                DiagnosisStatus::Failed => {
                    let message = snapshot
                        .error_message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
                    metrics::counter!("diagnosis_jobs_failed").increment(1);
                    tracing::warn!(job_id = %job_id, attempts, error = %message, "Diagnosis failed");
                    return Err(PollError::Failed(message));
                }
                DiagnosisStatus::Processing | DiagnosisStatus::Unknown => {
                    if attempts >= max_attempts {
                        metrics::counter!("diagnosis_jobs_timed_out").increment(1);
                        tracing::warn!(job_id = %job_id, attempts, "Diagnosis timed out");
                        return Err(PollError::Timeout { attempts });
                    }
                    tracing::trace!(job_id = %job_id, status = %snapshot.status, "Diagnosis still running");
                }
            },
            Err(e) => {
                if attempts >= max_attempts {
                    metrics::counter!("diagnosis_jobs_timed_out").increment(1);
                    tracing::error!(job_id = %job_id, attempts, error = %e, "Diagnosis status unavailable, giving up");
                    return Err(PollError::Unreachable {
                        attempts,
                        source: e,
                    });
                }
                tracing::warn!(job_id = %job_id, attempt = attempts, error = %e, "Status check failed, will retry");
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(job_id = %job_id, attempts, "Diagnosis polling cancelled");
                return Err(PollError::Cancelled);
            }
            _ = sleep(policy.interval) => {}
        }
    }
}
