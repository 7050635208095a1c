use anyhow::{Context, Result};
use aws_sdk_s3::{primitives::ByteStream, Client as S3Client};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::VitalSigns;

/// Retry policy for background uploads: exponential backoff with a cap.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 200,
            max_delay_ms: 5000,
            backoff_factor: 2.0,
        }
    }
}

/// Best-effort mirror of submissions to remote object storage.
///
/// Runs detached from the request that produced the submission; no outcome
/// here ever fails or delays the user-visible prediction response.
#[derive(Debug, Clone)]
pub struct ArchiveService {
    client: S3Client,
    bucket_name: String,
    retry: RetryConfig,
}

impl ArchiveService {
    pub fn new(client: S3Client, bucket_name: String) -> Self {
        Self {
            client,
            bucket_name,
            retry: RetryConfig::default(),
        }
    }

    pub fn payload_key(submission_id: Uuid) -> String {
        format!("user_data/user_data_{submission_id}.json")
    }

    pub fn chart_key(submission_id: Uuid) -> String {
        format!("visualizations/visualization_{submission_id}.png")
    }

    /// Upload the submission payload and its chart with bounded retries,
    /// logging the terminal outcome.
    pub async fn archive_submission(
        &self,
        submission_id: Uuid,
        vitals: VitalSigns,
        chart_path: PathBuf,
    ) {
        let payload = match serde_json::to_string(&vitals) {
            Ok(payload) => payload,
            Err(e) => {
                error!(%submission_id, "failed to serialize submission payload: {e}");
                return;
            }
        };

        let mut delay_ms = self.retry.initial_delay_ms;
        for attempt in 1..=self.retry.max_attempts {
            match self.upload_once(submission_id, &payload, &chart_path).await {
                Ok(()) => {
                    info!(%submission_id, "archived submission to bucket {}", self.bucket_name);
                    return;
                }
                Err(e) if attempt < self.retry.max_attempts => {
                    warn!(
                        %submission_id,
                        attempt,
                        "archival attempt failed, retrying in {delay_ms}ms: {e:#}"
                    );
                    sleep(Duration::from_millis(delay_ms)).await;
                    delay_ms = ((delay_ms as f64 * self.retry.backoff_factor) as u64)
                        .min(self.retry.max_delay_ms);
                }
                Err(e) => {
                    error!(
                        %submission_id,
                        "giving up on archival after {} attempts: {e:#}",
                        self.retry.max_attempts
                    );
                }
            }
        }
    }

    async fn upload_once(
        &self,
        submission_id: Uuid,
        payload_json: &str,
        chart_path: &Path,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(Self::payload_key(submission_id))
            .body(ByteStream::from(payload_json.as_bytes().to_vec()))
            .content_type("application/json")
            .send()
            .await
            .context("failed to upload submission payload")?;

        let chart_body = ByteStream::from_path(chart_path)
            .await
            .with_context(|| format!("failed to read chart artifact {}", chart_path.display()))?;

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(Self::chart_key(submission_id))
            .body(chart_body)
            .content_type("image/png")
            .send()
            .await
            .context("failed to upload chart image")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_keys_are_keyed_by_submission() {
        let id = Uuid::new_v4();
        assert_eq!(
            ArchiveService::payload_key(id),
            format!("user_data/user_data_{id}.json")
        );
        assert_eq!(
            ArchiveService::chart_key(id),
            format!("visualizations/visualization_{id}.png")
        );
    }

    #[test]
    fn test_retry_defaults() {
        let retry = RetryConfig::default();
        assert_eq!(retry.max_attempts, 3);
        assert!(retry.initial_delay_ms < retry.max_delay_ms);
    }
}
