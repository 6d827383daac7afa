//! HTTP surface: the single-page form, the JSON prediction API, and
//! health endpoints
//!
//! The form at `/` presents the 19 profile fields with their fixed legal
//! value sets and numeric bounds, previews the derived TotalCharges
//! before submission, and posts to `/predict` for a rendered verdict.
//! `/api/churn/predict` is the same operation JSON-in/JSON-out. One
//! submission is one synchronous request; the predictor core is shared
//! read-only.

use std::sync::Arc;

use axum::{
    extract::{Extension, Form},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::api_errors::AppError;
use crate::predictor_core::{Prediction, PredictorCore};
use crate::profile::{
    field_catalog, CustomerProfile, MONTHLY_CHARGES_DEFAULT, MONTHLY_CHARGES_MAX,
    MONTHLY_CHARGES_MIN, MONTHLY_CHARGES_STEP, TENURE_DEFAULT, TENURE_MAX, TENURE_MIN,
};

/// Build the full router around a loaded predictor core.
pub fn build_router(core: Arc<PredictorCore>) -> Router {
    Router::new()
        // form submit/render cycle
        .route("/", get(index))
        .route("/predict", post(predict_form))
        // JSON API
        .route("/api/churn/predict", post(predict_json))
        .route("/api/churn/status", get(status))
        // versioned aliases
        .route("/v1/churn/predict", post(predict_json))
        .route("/v1/churn/status", get(status))
        // health endpoints
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .layer(CorsLayer::permissive())
        .layer(Extension(core))
}

#[axum::debug_handler]
async fn predict_json(
    Extension(core): Extension<Arc<PredictorCore>>,
    Json(profile): Json<CustomerProfile>,
) -> Result<Json<Prediction>, AppError> {
    let profile = profile.clamped()?;
    let prediction = core.predict(&profile)?;
    Ok(Json(prediction))
}

#[axum::debug_handler]
async fn predict_form(
    Extension(core): Extension<Arc<PredictorCore>>,
    Form(profile): Form<CustomerProfile>,
) -> Result<Html<String>, AppError> {
    let profile = profile.clamped()?;
    let prediction = core.predict(&profile)?;
    Ok(Html(render_verdict(&prediction)))
}

#[axum::debug_handler]
async fn status(Extension(core): Extension<Arc<PredictorCore>>) -> Json<serde_json::Value> {
    Json(core.status())
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn readyz(Extension(core): Extension<Arc<PredictorCore>>) -> Json<serde_json::Value> {
    // Artifacts load before the router exists, so a serving process is
    // ready by construction; report the model it is ready with.
    Json(serde_json::json!({
        "ready": true,
        "model_id": core.bundle().classifier.model_id,
    }))
}

async fn index() -> Html<String> {
    Html(render_form())
}

const PAGE_STYLE: &str = "body{font-family:sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem}\
fieldset{border:1px solid #ccc;margin-bottom:1rem}label{display:inline-block;min-width:11rem}\
.field{margin:0.4rem 0}.total{font-weight:bold}.verdict{font-size:1.4rem;margin:1rem 0}";

/// Render the input form from the field catalog: every categorical field
/// is a closed selection, both numeric fields carry bounds and a step.
fn render_form() -> String {
    let mut page = String::with_capacity(8 * 1024);
    page.push_str("<!doctype html><html><head><title>Customer Churn Predictor</title><style>");
    page.push_str(PAGE_STYLE);
    page.push_str("</style></head><body><h1>Customer Churn Predictor</h1>");
    page.push_str("<p>Enter a customer profile to estimate the probability they will churn.</p>");
    page.push_str("<form method=\"post\" action=\"/predict\"><fieldset>");

    for field in field_catalog() {
        page.push_str("<div class=\"field\"><label>");
        page.push_str(field.prompt);
        page.push_str("</label>");
        if field.choices.len() <= 2 {
            for choice in field.choices {
                page.push_str(&format!(
                    "<label><input type=\"radio\" name=\"{}\" value=\"{}\"{}> {}</label>",
                    field.name,
                    choice,
                    if *choice == field.choices[0] { " checked" } else { "" },
                    choice
                ));
            }
        } else {
            page.push_str(&format!("<select name=\"{}\">", field.name));
            for choice in field.choices {
                page.push_str(&format!("<option value=\"{choice}\">{choice}</option>"));
            }
            page.push_str("</select>");
        }
        page.push_str("</div>");
    }

    page.push_str(&format!(
        "<div class=\"field\"><label>Tenure (months)</label>\
         <input type=\"range\" id=\"tenure\" name=\"tenure\" min=\"{TENURE_MIN}\" max=\"{TENURE_MAX}\" \
         value=\"{TENURE_DEFAULT}\" oninput=\"recalc()\"> <output id=\"tenure_out\">{TENURE_DEFAULT}</output></div>"
    ));
    page.push_str(&format!(
        "<div class=\"field\"><label>Monthly Charges</label>\
         <input type=\"number\" id=\"monthly\" name=\"MonthlyCharges\" min=\"{MONTHLY_CHARGES_MIN}\" \
         max=\"{MONTHLY_CHARGES_MAX}\" step=\"{MONTHLY_CHARGES_STEP}\" value=\"{MONTHLY_CHARGES_DEFAULT}\" \
         oninput=\"recalc()\"></div>"
    ));
    page.push_str(
        "<div class=\"field total\">Total Charges: <span id=\"total\"></span></div>\
         </fieldset><button type=\"submit\">Predict</button></form>",
    );
    // TotalCharges is derived, never entered: preview tenure * monthly
    // before submission, exactly as the server recomputes it.
    page.push_str(
        "<script>function recalc(){var t=document.getElementById('tenure');\
         var m=document.getElementById('monthly');\
         document.getElementById('tenure_out').textContent=t.value;\
         document.getElementById('total').textContent=(t.value*m.value).toFixed(2);}\
         recalc();</script></body></html>",
    );
    page
}

fn render_verdict(prediction: &Prediction) -> String {
    format!(
        "<!doctype html><html><head><title>Churn Prediction</title><style>{PAGE_STYLE}</style>\
         </head><body><h1>Churn Prediction</h1>\
         <div class=\"verdict\">{} ({})</div>\
         <p>Churn probability: {:.4}</p>\
         <p>Total charges: {:.2}</p>\
         <p>Model: {} &middot; prediction {}</p>\
         <p><a href=\"/\">Score another customer</a></p></body></html>",
        prediction.verdict,
        prediction.percent,
        prediction.score.probability,
        prediction.total_charges,
        prediction.model_id,
        prediction.prediction_id,
    )
}
