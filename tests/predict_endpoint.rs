// HTTP surface tests: form page, JSON predict, status, health

use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::json;
use tower::ServiceExt; // for .oneshot()

use churnwatch::artifacts::{
    sha256_hex, ArtifactManifest, ClassifierArtifact, OneHotArtifact, ScalerArtifact,
    CLASSIFIER_FILE, MANIFEST_FILE, OHE_GENERAL_FILE, OHE_PAYMENT_FILE, SCALED_COLUMNS,
    SCALER_FILE,
};
use churnwatch::churnweb::build_router;
use churnwatch::predictor_core::PredictorCore;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Write a minimal consistent bundle: classifier with zero coefficients
/// scores every row at exactly 0.5.
fn write_bundle(dir: &Path) {
    let addon = &["No", "Yes", "No internet service"][..];
    let general_fields: [(&str, &[&str]); 9] = [
        ("MultipleLines", &["No", "Yes", "No phone service"]),
        ("InternetService", &["DSL", "Fiber optic", "No"]),
        ("OnlineSecurity", addon),
        ("OnlineBackup", addon),
        ("DeviceProtection", addon),
        ("TechSupport", addon),
        ("StreamingTV", addon),
        ("StreamingMovies", addon),
        ("Contract", &["Month-to-month", "One year", "Two year"]),
    ];
    let general = OneHotArtifact {
        columns: general_fields.iter().map(|(f, _)| f.to_string()).collect(),
        categories: general_fields.iter().map(|(_, c)| strings(c)).collect(),
    };
    let payment = OneHotArtifact {
        columns: vec!["PaymentMethod".to_string()],
        categories: vec![strings(&[
            "Electronic check",
            "Mailed check",
            "Bank transfer (automatic)",
            "Credit card (automatic)",
        ])],
    };
    let scaler = ScalerArtifact {
        columns: SCALED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        center: vec![12.0, 70.0, 840.0],
        scale: vec![24.0, 30.0, 2266.0],
    };

    let mut feature_names_in: Vec<String> = strings(&[
        "gender",
        "SeniorCitizen",
        "Partner",
        "Dependents",
        "tenure",
        "PhoneService",
        "PaperlessBilling",
        "MonthlyCharges",
        "TotalCharges",
    ]);
    for encoder in [&general, &payment] {
        for (field, categories) in encoder.columns.iter().zip(&encoder.categories) {
            for category in categories {
                feature_names_in.push(format!("{field}_{category}"));
            }
        }
    }
    let classifier = ClassifierArtifact {
        model_id: "churn-logit-demo".to_string(),
        trained_at: Utc::now(),
        coefficients: vec![0.0; feature_names_in.len()],
        feature_names_in,
        intercept: 0.0,
    };

    let files = [
        (CLASSIFIER_FILE, serde_json::to_vec(&classifier).unwrap()),
        (SCALER_FILE, serde_json::to_vec(&scaler).unwrap()),
        (OHE_GENERAL_FILE, serde_json::to_vec(&general).unwrap()),
        (OHE_PAYMENT_FILE, serde_json::to_vec(&payment).unwrap()),
    ];
    let mut manifest = ArtifactManifest {
        training_run: "run-demo-001".to_string(),
        created_at: Utc::now(),
        artifacts: Default::default(),
    };
    for (name, bytes) in &files {
        manifest.artifacts.insert(name.to_string(), sha256_hex(bytes));
        fs::write(dir.join(name), bytes).expect("write artifact");
    }
    fs::write(dir.join(MANIFEST_FILE), serde_json::to_vec(&manifest).unwrap())
        .expect("write manifest");
}

fn test_app(dir: &Path) -> Router {
    write_bundle(dir);
    let core = PredictorCore::load(dir).expect("core loads");
    build_router(Arc::new(core))
}

fn profile_payload() -> serde_json::Value {
    json!({
        "gender": "Female",
        "SeniorCitizen": "No",
        "Partner": "Yes",
        "Dependents": "No",
        "tenure": 12,
        "PhoneService": "Yes",
        "MultipleLines": "No",
        "InternetService": "Fiber optic",
        "OnlineSecurity": "No",
        "OnlineBackup": "No",
        "DeviceProtection": "No",
        "TechSupport": "No",
        "StreamingTV": "Yes",
        "StreamingMovies": "No",
        "Contract": "Month-to-month",
        "PaperlessBilling": "Yes",
        "PaymentMethod": "Electronic check",
        "MonthlyCharges": 70.0
    })
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn predict_returns_200_with_tier_on_valid_payload() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(dir.path());

    let req = Request::builder()
        .uri("/api/churn/predict")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(profile_payload().to_string()))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["probability"], 0.5);
    assert_eq!(body["tier"], "High");
    assert_eq!(body["percent"], "50.0%");
    assert_eq!(body["verdict"], "HIGH RISK: CHURN");
    assert_eq!(body["total_charges"], 840.0);
}

#[tokio::test]
async fn predict_rejects_unknown_categorical_value() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(dir.path());

    let mut payload = profile_payload();
    payload["InternetService"] = json!("Satellite");

    let req = Request::builder()
        .uri("/api/churn/predict")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    // Closed enums reject the value at deserialization.
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn predict_clamps_out_of_range_numerics() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(dir.path());

    let mut payload = profile_payload();
    payload["tenure"] = json!(500);
    payload["MonthlyCharges"] = json!(1000.0);

    let req = Request::builder()
        .uri("/api/churn/predict")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    // clamped to tenure 72 * 150.0/month
    assert_eq!(body["total_charges"], 10800.0);
}

#[tokio::test]
async fn form_rejects_non_finite_monthly_charges() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(dir.path());

    // urlencoded floats accept "NaN" where JSON cannot; it must never
    // reach the classifier and render as a "NaN%" verdict.
    let form_body = "gender=Male&SeniorCitizen=No&Partner=No&Dependents=No&tenure=12\
                     &PhoneService=Yes&MultipleLines=No&InternetService=DSL\
                     &OnlineSecurity=No&OnlineBackup=No&DeviceProtection=No\
                     &TechSupport=No&StreamingTV=No&StreamingMovies=No\
                     &Contract=Month-to-month&PaperlessBilling=Yes\
                     &PaymentMethod=Electronic%20check&MonthlyCharges=NaN";

    let req = Request::builder()
        .uri("/predict")
        .method("POST")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form_body))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error body")
        .contains("MonthlyCharges"));
}

#[tokio::test]
async fn versioned_alias_matches_primary_route() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(dir.path());

    let req = Request::builder()
        .uri("/v1/churn/predict")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(profile_payload().to_string()))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn status_reports_model() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(dir.path());

    let req = Request::builder()
        .uri("/api/churn/status")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["model_id"], "churn-logit-demo");
    assert_eq!(body["feature_count"], 40);
}

#[tokio::test]
async fn health_endpoints_respond() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(dir.path());

    let health = app
        .clone()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    let ready = app
        .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
    let body = body_json(ready).await;
    assert_eq!(body["ready"], true);
}

#[tokio::test]
async fn form_page_presents_all_fields() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(dir.path());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("Monthly Charges"));
    assert!(page.contains("Bank transfer (automatic)"));
    assert!(page.contains("name=\"tenure\""));
    assert!(page.contains("Total Charges"));
}

#[tokio::test]
async fn form_submission_renders_verdict() {
    let dir = tempfile::tempdir().expect("temp dir");
    let app = test_app(dir.path());

    let form_body = "gender=Male&SeniorCitizen=No&Partner=No&Dependents=No&tenure=12\
                     &PhoneService=Yes&MultipleLines=No&InternetService=DSL\
                     &OnlineSecurity=No&OnlineBackup=No&DeviceProtection=No\
                     &TechSupport=No&StreamingTV=No&StreamingMovies=No\
                     &Contract=Month-to-month&PaperlessBilling=Yes\
                     &PaymentMethod=Electronic%20check&MonthlyCharges=70.0";

    let req = Request::builder()
        .uri("/predict")
        .method("POST")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form_body))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("HIGH RISK: CHURN"));
    assert!(page.contains("50.0%"));
    assert!(page.contains("840.00"));
}
