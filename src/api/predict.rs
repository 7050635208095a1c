use axum::{extract::State, response::Html, Form};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use super::errors::ApiError;
use super::pages::{escape_html, layout};
use super::routes::AppState;
use crate::models::{NewHealthSubmission, RiskLabel, VitalSigns};
use crate::services::ChartService;

/// Raw form fields; parsed explicitly so a malformed or missing field is a
/// 400 naming the offender instead of a generic rejection.
#[derive(Debug, Deserialize)]
pub struct PredictForm {
    #[serde(rename = "Age")]
    pub age: Option<String>,
    #[serde(rename = "SystolicBP")]
    pub systolic_bp: Option<String>,
    #[serde(rename = "DiastolicBP")]
    pub diastolic_bp: Option<String>,
    #[serde(rename = "BS")]
    pub blood_sugar: Option<String>,
    #[serde(rename = "BodyTemp")]
    pub body_temp: Option<String>,
    #[serde(rename = "HeartRate")]
    pub heart_rate: Option<String>,
}

fn require_num<T: FromStr>(name: &str, raw: Option<String>) -> Result<T, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::Validation(format!("missing field {name}")))?;
    raw.trim()
        .parse::<T>()
        .map_err(|_| ApiError::Validation(format!("field {name} must be numeric")))
}

impl PredictForm {
    pub fn into_vitals(self) -> Result<VitalSigns, ApiError> {
        Ok(VitalSigns {
            age: require_num("Age", self.age)?,
            systolic_bp: require_num("SystolicBP", self.systolic_bp)?,
            diastolic_bp: require_num("DiastolicBP", self.diastolic_bp)?,
            blood_sugar: require_num("BS", self.blood_sugar)?,
            body_temp: require_num("BodyTemp", self.body_temp)?,
            heart_rate: require_num("HeartRate", self.heart_rate)?,
        })
    }
}

/// The prediction pipeline: validate, classify, persist, render the chart,
/// queue best-effort archival, respond.
#[tracing::instrument(skip(state, form))]
pub async fn predict_health(
    State(state): State<AppState>,
    Form(form): Form<PredictForm>,
) -> Result<Html<String>, ApiError> {
    let vitals = form.into_vitals()?;

    let class = state.model.predict(&vitals);
    let label = RiskLabel::from_class(class);

    // The row must be durable before any later step runs.
    let submission = state
        .submissions
        .create(NewHealthSubmission { vitals, label })
        .await?;
    info!(submission_id = %submission.id, class, label = label.as_str(), "stored submission");

    // Rendering is synchronous CPU and disk work; keep it off the async
    // workers so concurrent requests are not stalled behind it.
    let charts = state.charts.clone();
    let submission_id = submission.id;
    let chart_path =
        tokio::task::spawn_blocking(move || charts.render(submission_id, &vitals))
            .await
            .map_err(anyhow::Error::from)??;

    let archival_note = match &state.archive {
        Some(archive) => {
            let archive = Arc::clone(archive);
            tokio::spawn(async move {
                archive
                    .archive_submission(submission_id, vitals, chart_path)
                    .await;
            });
            None
        }
        None => Some("Remote archival is not configured; this submission was stored locally only."),
    };

    let payload_json = serde_json::to_string(&vitals).map_err(anyhow::Error::from)?;
    let chart_file = ChartService::chart_file_name(submission.id);

    Ok(Html(render_prediction(
        label,
        &payload_json,
        &chart_file,
        archival_note,
    )))
}

fn render_prediction(
    label: RiskLabel,
    payload_json: &str,
    chart_file: &str,
    archival_note: Option<&str>,
) -> String {
    let note_html = archival_note
        .map(|note| format!("<p class=\"notice\">{}</p>", escape_html(note)))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Prediction Result</h1>
  <p class="result">{}</p>
  <h2>Your inputs</h2>
  <pre>{}</pre>
  <img src="/static/{}" alt="Bar chart of the submitted measurements" width="640" height="480">
  {}
  <p><a href="/">Make another prediction</a></p>"#,
        escape_html(label.message()),
        escape_html(payload_json),
        escape_html(chart_file),
        note_html
    );

    layout("Prediction", None, &body)
}
