mod common;

use axum::http::StatusCode;
use common::{body_string, form_post, test_app};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

const VALID_FORM: &str = "Age=30&SystolicBP=120&DiastolicBP=80&BS=100&BodyTemp=98&HeartRate=70";

#[tokio::test]
async fn predict_stores_submission_and_renders_chart() {
    let app = test_app(1).await;

    let response = app
        .router
        .clone()
        .oneshot(form_post("/predict", VALID_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Your Health is on Low Risk"));
    // The payload echo keeps the original field names (HTML-escaped quotes).
    assert!(body.contains("&quot;Age&quot;:30"));

    let submissions = app.state.submissions.list_recent(10).await.unwrap();
    assert_eq!(submissions.len(), 1);
    let stored = &submissions[0];
    assert_eq!(stored.age, 30);
    assert_eq!(stored.systolic_bp, 120);
    assert_eq!(stored.diastolic_bp, 80);
    assert_eq!(stored.blood_sugar, 100.0);
    assert_eq!(stored.body_temp, 98);
    assert_eq!(stored.heart_rate, 70);
    assert_eq!(stored.result_label, "low_risk");

    // The chart artifact exists under the submission's own name, and the
    // response references it.
    let chart_name = format!("visualization_{}.png", stored.id);
    let chart_path = app.static_dir.path().join(&chart_name);
    assert!(chart_path.exists());
    assert!(std::fs::metadata(&chart_path).unwrap().len() > 0);
    assert!(body.contains(&format!("/static/{chart_name}")));
}

#[tokio::test]
async fn classifier_classes_map_to_the_three_labels() {
    for (class, message, stored_label) in [
        (1usize, "Your Health is on Low Risk", "low_risk"),
        (2, "Your Health is on Mid Risk", "mid_risk"),
        // Anything outside 1 and 2 collapses into high risk.
        (0, "Your Health is on High Risk", "high_risk"),
        (99, "Your Health is on High Risk", "high_risk"),
    ] {
        let app = test_app(class).await;

        let response = app
            .router
            .clone()
            .oneshot(form_post("/predict", VALID_FORM))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains(message), "class {class} should render {message}");

        let submissions = app.state.submissions.list_recent(1).await.unwrap();
        assert_eq!(submissions[0].result_label, stored_label);
    }
}

#[tokio::test]
async fn chart_is_produced_regardless_of_classifier_output() {
    // High-risk classifier, same canonical inputs: the chart must still
    // reflect exactly the submitted six values.
    let app = test_app(99).await;

    let response = app
        .router
        .clone()
        .oneshot(form_post("/predict", VALID_FORM))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let submissions = app.state.submissions.list_recent(1).await.unwrap();
    let chart_path = app
        .static_dir
        .path()
        .join(format!("visualization_{}.png", submissions[0].id));
    assert!(chart_path.exists());
}

#[tokio::test]
async fn malformed_field_is_rejected_without_storing_anything() {
    let app = test_app(1).await;

    let response = app
        .router
        .clone()
        .oneshot(form_post(
            "/predict",
            "Age=thirty&SystolicBP=120&DiastolicBP=80&BS=100&BodyTemp=98&HeartRate=70",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_string(response).await;
    assert!(body.contains("Age"));

    assert!(app.state.submissions.list_recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_field_is_rejected_without_storing_anything() {
    let app = test_app(1).await;

    let response = app
        .router
        .clone()
        .oneshot(form_post(
            "/predict",
            "Age=30&SystolicBP=120&DiastolicBP=80&BS=100&BodyTemp=98",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_string(response).await;
    assert!(body.contains("HeartRate"));

    assert!(app.state.submissions.list_recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn prediction_notes_when_archival_is_disabled() {
    // Test state carries no archive service, mirroring a deployment
    // without S3_BUCKET.
    let app = test_app(1).await;

    let response = app
        .router
        .clone()
        .oneshot(form_post("/predict", VALID_FORM))
        .await
        .unwrap();

    let body = body_string(response).await;
    assert!(body.contains("Remote archival is not configured"));
}

#[tokio::test]
async fn submissions_accumulate_without_overwriting() {
    let app = test_app(1).await;

    for _ in 0..3 {
        let response = app
            .router
            .clone()
            .oneshot(form_post("/predict", VALID_FORM))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let submissions = app.state.submissions.list_recent(10).await.unwrap();
    assert_eq!(submissions.len(), 3);

    // Every submission gets its own chart file; identical inputs in the
    // same second can no longer collide.
    for submission in &submissions {
        let chart_path = app
            .static_dir
            .path()
            .join(format!("visualization_{}.png", submission.id));
        assert!(chart_path.exists());
    }
}
