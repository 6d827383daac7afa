//! Core prediction runtime
//!
//! Owns the loaded artifact bundle and runs the synchronous
//! encode -> classify -> tier sequence for one profile per call. The core
//! is constructed once at startup and shared read-only behind an `Arc`;
//! nothing mutates an artifact after load, so concurrent submissions need
//! no locking. The only mutable state is a prediction counter kept for
//! the status report.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::artifacts::ArtifactBundle;
use crate::encoder::encode;
use crate::errors::ChurnResult;
use crate::profile::CustomerProfile;
use crate::risk::RiskScore;

/// Result of one submission.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub prediction_id: String,
    pub predicted_at: DateTime<Utc>,
    pub model_id: String,
    #[serde(flatten)]
    pub score: RiskScore,
    /// Probability formatted for display, one decimal.
    pub percent: String,
    pub verdict: String,
    /// Derived input echoed back: tenure * MonthlyCharges.
    pub total_charges: f64,
}

#[derive(Debug)]
pub struct PredictorCore {
    bundle: ArtifactBundle,
    runtime_id: String,
    loaded_at: DateTime<Utc>,
    prediction_count: AtomicU64,
}

impl PredictorCore {
    /// Load the four artifacts from `artifact_dir` and build the core.
    /// Any load failure is fatal to startup.
    pub fn load(artifact_dir: &Path) -> ChurnResult<Self> {
        let bundle = ArtifactBundle::load(artifact_dir)?;
        info!(
            model_id = %bundle.classifier.model_id,
            training_run = %bundle.manifest.training_run,
            "Predictor core initialized"
        );
        Ok(Self {
            bundle,
            runtime_id: format!("churnwatch-{}", Uuid::new_v4().simple()),
            loaded_at: Utc::now(),
            prediction_count: AtomicU64::new(0),
        })
    }

    /// Build a core around an already-verified bundle.
    pub fn with_bundle(bundle: ArtifactBundle) -> Self {
        Self {
            bundle,
            runtime_id: format!("churnwatch-{}", Uuid::new_v4().simple()),
            loaded_at: Utc::now(),
            prediction_count: AtomicU64::new(0),
        }
    }

    pub fn bundle(&self) -> &ArtifactBundle {
        &self.bundle
    }

    /// Run one synchronous prediction. The profile is consumed as-is; the
    /// caller clamps numeric inputs at the collection boundary.
    pub fn predict(&self, profile: &CustomerProfile) -> ChurnResult<Prediction> {
        let encoded = encode(profile, &self.bundle)?;
        debug!(columns = encoded.len(), "Profile encoded");

        let probability = self.bundle.classifier.predict_proba(&encoded.values)?;
        let score = RiskScore::new(probability);

        self.prediction_count.fetch_add(1, Ordering::Relaxed);

        let prediction = Prediction {
            prediction_id: Uuid::new_v4().to_string(),
            predicted_at: Utc::now(),
            model_id: self.bundle.classifier.model_id.clone(),
            percent: score.percent(),
            verdict: score.tier.verdict().to_string(),
            total_charges: profile.total_charges(),
            score,
        };

        info!(
            prediction_id = %prediction.prediction_id,
            probability = probability,
            tier = ?score.tier,
            "Prediction complete"
        );

        Ok(prediction)
    }

    /// Runtime status for the status endpoint and the `inspect` command.
    pub fn status(&self) -> serde_json::Value {
        serde_json::json!({
            "runtime_id": self.runtime_id,
            "model_id": self.bundle.classifier.model_id,
            "training_run": self.bundle.manifest.training_run,
            "trained_at": self.bundle.classifier.trained_at,
            "feature_count": self.bundle.classifier.feature_names_in.len(),
            "loaded_at": self.loaded_at,
            "prediction_count": self.prediction_count.load(Ordering::Relaxed),
        })
    }
}
