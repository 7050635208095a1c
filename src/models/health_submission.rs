use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::RiskLabel;

/// The six vital-sign measurements a prediction request carries, in the
/// fixed order the classifier was trained on. Serializes with the original
/// form field names so archived payloads keep their shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    #[serde(rename = "Age")]
    pub age: i32,
    #[serde(rename = "SystolicBP")]
    pub systolic_bp: i32,
    #[serde(rename = "DiastolicBP")]
    pub diastolic_bp: i32,
    #[serde(rename = "BS")]
    pub blood_sugar: f64,
    #[serde(rename = "BodyTemp")]
    pub body_temp: i32,
    #[serde(rename = "HeartRate")]
    pub heart_rate: i32,
}

impl VitalSigns {
    /// Axis labels for the chart, matching the feature order.
    pub const FEATURE_LABELS: [&'static str; 6] = [
        "Age",
        "SystolicBP",
        "DiastolicBP",
        "BS",
        "BodyTemp",
        "HeartRate",
    ];

    pub fn values(&self) -> [f64; 6] {
        [
            f64::from(self.age),
            f64::from(self.systolic_bp),
            f64::from(self.diastolic_bp),
            self.blood_sugar,
            f64::from(self.body_temp),
            f64::from(self.heart_rate),
        ]
    }

    /// Single-row feature matrix for the classifier.
    pub fn to_feature_row(&self) -> Array2<f64> {
        ndarray::arr2(&[self.values()])
    }
}

/// One persisted `/predict` submission: inputs plus the derived label.
/// Append-only; never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HealthSubmission {
    pub id: Uuid,
    pub age: i32,
    pub systolic_bp: i32,
    pub diastolic_bp: i32,
    pub blood_sugar: f64,
    pub body_temp: i32,
    pub heart_rate: i32,
    pub result_label: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct NewHealthSubmission {
    pub vitals: VitalSigns,
    pub label: RiskLabel,
}
