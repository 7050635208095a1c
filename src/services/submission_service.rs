use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{HealthSubmission, NewHealthSubmission};

/// Append-only store of completed prediction submissions.
#[derive(Debug, Clone)]
pub struct SubmissionService {
    db: SqlitePool,
}

impl SubmissionService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Persist one submission. The row is durable once this returns; the
    /// caller only proceeds to chart rendering and archival afterwards.
    pub async fn create(&self, submission: NewHealthSubmission) -> Result<HealthSubmission> {
        let vitals = submission.vitals;

        let stored = sqlx::query_as::<_, HealthSubmission>(
            "INSERT INTO health_submissions
                 (id, age, systolic_bp, diastolic_bp, blood_sugar, body_temp, heart_rate, result_label, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id, age, systolic_bp, diastolic_bp, blood_sugar, body_temp, heart_rate, result_label, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(vitals.age)
        .bind(vitals.systolic_bp)
        .bind(vitals.diastolic_bp)
        .bind(vitals.blood_sugar)
        .bind(vitals.body_temp)
        .bind(vitals.heart_rate)
        .bind(submission.label.as_str())
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(stored)
    }

    pub async fn list_recent(&self, limit: i64) -> Result<Vec<HealthSubmission>> {
        let submissions = sqlx::query_as::<_, HealthSubmission>(
            "SELECT id, age, systolic_bp, diastolic_bp, blood_sugar, body_temp, heart_rate, result_label, created_at
             FROM health_submissions ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(submissions)
    }
}
