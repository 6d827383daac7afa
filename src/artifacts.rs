//! Pre-fitted artifact loading
//!
//! Four opaque artifacts are produced offline by the training run and
//! loaded here exactly once at startup: the classifier, the numeric
//! scaler, and two independently fitted one-hot encoders. All four are
//! read-only for the process lifetime; there is no write path.
//!
//! A manifest names the training run and carries a SHA-256 digest per
//! artifact file. Any missing file, corrupt JSON, digest mismatch, or
//! internally inconsistent artifact aborts the load.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::errors::{ChurnError, ChurnResult};
use crate::feature_frame::FeatureFrame;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const OHE_GENERAL_FILE: &str = "ohe_general.json";
pub const OHE_PAYMENT_FILE: &str = "ohe_payment.json";

/// The three numeric columns the scaler was fitted on, in fit order.
pub const SCALED_COLUMNS: [&str; 3] = ["tenure", "MonthlyCharges", "TotalCharges"];

/// Manifest for one training run: which artifact files belong together
/// and what their digests were when the run was sealed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub training_run: String,
    pub created_at: DateTime<Utc>,
    /// file name -> lowercase hex SHA-256 of the file contents
    pub artifacts: HashMap<String, String>,
}

/// Fitted standard scaler: per-column center and scale, applied as
/// `(x - center) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub columns: Vec<String>,
    pub center: Vec<f64>,
    pub scale: Vec<f64>,
}

impl ScalerArtifact {
    fn validate(&self) -> ChurnResult<()> {
        if self.columns.len() != self.center.len() || self.columns.len() != self.scale.len() {
            return Err(ChurnError::artifact(
                SCALER_FILE,
                format!(
                    "column/parameter length mismatch: {} columns, {} centers, {} scales",
                    self.columns.len(),
                    self.center.len(),
                    self.scale.len()
                ),
            ));
        }
        if self.columns != SCALED_COLUMNS {
            return Err(ChurnError::artifact(
                SCALER_FILE,
                format!(
                    "scaler fitted on {:?}, expected {:?}",
                    self.columns, SCALED_COLUMNS
                ),
            ));
        }
        if let Some(i) = self.scale.iter().position(|s| *s == 0.0 || !s.is_finite()) {
            return Err(ChurnError::artifact(
                SCALER_FILE,
                format!("degenerate scale for column {}", self.columns[i]),
            ));
        }
        Ok(())
    }

    /// Scale the fitted columns in place, leaving every other column of
    /// the frame untouched.
    pub fn transform(&self, frame: &mut FeatureFrame) -> ChurnResult<()> {
        for (i, column) in self.columns.iter().enumerate() {
            let raw = frame.get(column).ok_or_else(|| {
                ChurnError::schema_mismatch(format!("scaler column {column} absent from row"))
            })?;
            frame.set(column, (raw - self.center[i]) / self.scale[i])?;
        }
        Ok(())
    }
}

/// Fitted one-hot encoder: the (field, categories) pairs observed at fit
/// time, in fit order. Category order is the hidden schema contract that
/// decides column identity; it is stored explicitly and never re-derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotArtifact {
    pub columns: Vec<String>,
    pub categories: Vec<Vec<String>>,
}

impl OneHotArtifact {
    fn validate(&self, file: &str) -> ChurnResult<()> {
        if self.columns.len() != self.categories.len() {
            return Err(ChurnError::artifact(
                file,
                format!(
                    "{} columns but {} category lists",
                    self.columns.len(),
                    self.categories.len()
                ),
            ));
        }
        if let Some(i) = self.categories.iter().position(|c| c.is_empty()) {
            return Err(ChurnError::artifact(
                file,
                format!("no fit-time categories for column {}", self.columns[i]),
            ));
        }
        Ok(())
    }

    /// Expand the given (field, value) pairs into indicator columns named
    /// `{field}_{category}`, one per fit-time category, exactly one of
    /// which is 1 per field.
    ///
    /// A value outside the fit-time category set fails loudly: the trained
    /// model has no "unknown" concept, so dropping it would silently
    /// produce a wrong row.
    pub fn transform(&self, values: &[(&str, &str)]) -> ChurnResult<Vec<(String, f64)>> {
        let supplied: HashMap<&str, &str> = values.iter().copied().collect();

        let width: usize = self.categories.iter().map(Vec::len).sum();
        let mut out = Vec::with_capacity(width);

        for (field, categories) in self.columns.iter().zip(&self.categories) {
            let value: &str = supplied.get(field.as_str()).copied().ok_or_else(|| {
                ChurnError::schema_mismatch(format!(
                    "encoder fitted on {field} but the input record has no such field"
                ))
            })?;
            if !categories.iter().any(|c| c.as_str() == value) {
                return Err(ChurnError::unknown_category(field.clone(), value));
            }
            for category in categories {
                let hot = if category.as_str() == value { 1.0 } else { 0.0 };
                out.push((format!("{field}_{category}"), hot));
            }
        }
        Ok(out)
    }

    /// Total number of indicator columns this encoder produces.
    pub fn output_width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }
}

/// The trained churn classifier, treated as a black box: it declares the
/// feature names it was trained on (in order) and maps a matching row to
/// a probability of the positive (churn) class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub model_id: String,
    pub trained_at: DateTime<Utc>,
    /// Training-time column order; the encode pipeline must reproduce
    /// exactly this set and order.
    pub feature_names_in: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl ClassifierArtifact {
    fn validate(&self) -> ChurnResult<()> {
        if self.feature_names_in.is_empty() {
            return Err(ChurnError::artifact(
                CLASSIFIER_FILE,
                "classifier declares no input features",
            ));
        }
        if self.feature_names_in.len() != self.coefficients.len() {
            return Err(ChurnError::artifact(
                CLASSIFIER_FILE,
                format!(
                    "{} feature names but {} coefficients",
                    self.feature_names_in.len(),
                    self.coefficients.len()
                ),
            ));
        }
        // A duplicated name would let reindex pass its length check while
        // silently dropping a merged column.
        let mut seen = HashSet::with_capacity(self.feature_names_in.len());
        if let Some(dup) = self.feature_names_in.iter().find(|n| !seen.insert(n.as_str())) {
            return Err(ChurnError::artifact(
                CLASSIFIER_FILE,
                format!("duplicate feature name {dup}"),
            ));
        }
        Ok(())
    }

    /// Probability of the positive class for one encoded row, in [0, 1].
    pub fn predict_proba(&self, row: &[f64]) -> ChurnResult<f64> {
        if row.len() != self.coefficients.len() {
            return Err(ChurnError::predict(format!(
                "row has {} values, classifier expects {}",
                row.len(),
                self.coefficients.len()
            )));
        }
        let linear: f64 = self.intercept
            + row
                .iter()
                .zip(&self.coefficients)
                .map(|(x, w)| x * w)
                .sum::<f64>();
        Ok(1.0 / (1.0 + (-linear).exp()))
    }
}

/// All four artifacts of one training run, loaded together and immutable
/// afterwards.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub manifest: ArtifactManifest,
    pub classifier: ClassifierArtifact,
    pub scaler: ScalerArtifact,
    pub encoder_general: OneHotArtifact,
    pub encoder_payment: OneHotArtifact,
}

impl ArtifactBundle {
    /// Load and verify the bundle from an artifact directory.
    pub fn load(dir: &Path) -> ChurnResult<Self> {
        info!(dir = %dir.display(), "Loading artifact bundle");

        let manifest_bytes = fs::read(dir.join(MANIFEST_FILE)).map_err(|e| {
            ChurnError::artifact(MANIFEST_FILE, format!("cannot read manifest: {e}"))
        })?;
        let manifest: ArtifactManifest = serde_json::from_slice(&manifest_bytes)
            .map_err(|e| ChurnError::artifact(MANIFEST_FILE, format!("corrupt manifest: {e}")))?;

        let classifier: ClassifierArtifact =
            read_verified(dir, CLASSIFIER_FILE, &manifest)?;
        classifier.validate()?;

        let scaler: ScalerArtifact = read_verified(dir, SCALER_FILE, &manifest)?;
        scaler.validate()?;

        let encoder_general: OneHotArtifact = read_verified(dir, OHE_GENERAL_FILE, &manifest)?;
        encoder_general.validate(OHE_GENERAL_FILE)?;

        let encoder_payment: OneHotArtifact = read_verified(dir, OHE_PAYMENT_FILE, &manifest)?;
        encoder_payment.validate(OHE_PAYMENT_FILE)?;

        info!(
            training_run = %manifest.training_run,
            model_id = %classifier.model_id,
            features = classifier.feature_names_in.len(),
            "Artifact bundle loaded"
        );

        Ok(Self {
            manifest,
            classifier,
            scaler,
            encoder_general,
            encoder_payment,
        })
    }
}

/// Lowercase hex SHA-256 of a byte slice.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn read_verified<T: serde::de::DeserializeOwned>(
    dir: &Path,
    file: &str,
    manifest: &ArtifactManifest,
) -> ChurnResult<T> {
    let expected = manifest.artifacts.get(file).ok_or_else(|| {
        ChurnError::artifact(file, "file not listed in manifest")
    })?;

    let bytes = fs::read(dir.join(file))
        .map_err(|e| ChurnError::artifact(file, format!("cannot read: {e}")))?;

    let actual = sha256_hex(&bytes);
    if actual != *expected {
        return Err(ChurnError::artifact(
            file,
            format!("digest mismatch: manifest {expected}, file {actual}"),
        ));
    }

    serde_json::from_slice(&bytes)
        .map_err(|e| ChurnError::artifact(file, format!("corrupt artifact: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaler() -> ScalerArtifact {
        ScalerArtifact {
            columns: SCALED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            center: vec![12.0, 70.0, 840.0],
            scale: vec![24.0, 30.0, 2266.0],
        }
    }

    #[test]
    fn test_scaler_transforms_only_fitted_columns() {
        let mut frame = FeatureFrame::new();
        frame.insert("gender", 1.0).unwrap();
        frame.insert("tenure", 36.0).unwrap();
        frame.insert("MonthlyCharges", 100.0).unwrap();
        frame.insert("TotalCharges", 3600.0).unwrap();

        scaler().transform(&mut frame).unwrap();

        assert_eq!(frame.get("gender"), Some(1.0));
        assert_eq!(frame.get("tenure"), Some(1.0));
        assert_eq!(frame.get("MonthlyCharges"), Some(1.0));
        assert!((frame.get("TotalCharges").unwrap() - (3600.0 - 840.0) / 2266.0).abs() < 1e-12);
    }

    #[test]
    fn test_scaler_rejects_wrong_columns() {
        let mut bad = scaler();
        bad.columns[0] = "Tenure".to_string();
        assert!(bad.validate().is_err());

        let mut degenerate = scaler();
        degenerate.scale[1] = 0.0;
        assert!(degenerate.validate().is_err());
    }

    #[test]
    fn test_one_hot_exactly_one_per_field() {
        let encoder = OneHotArtifact {
            columns: vec!["Contract".to_string()],
            categories: vec![vec![
                "Month-to-month".to_string(),
                "One year".to_string(),
                "Two year".to_string(),
            ]],
        };

        let out = encoder.transform(&[("Contract", "One year")]).unwrap();
        assert_eq!(
            out,
            vec![
                ("Contract_Month-to-month".to_string(), 0.0),
                ("Contract_One year".to_string(), 1.0),
                ("Contract_Two year".to_string(), 0.0),
            ]
        );
        assert_eq!(out.iter().map(|(_, v)| v).sum::<f64>(), 1.0);
    }

    #[test]
    fn test_one_hot_unknown_category_fails_loudly() {
        let encoder = OneHotArtifact {
            columns: vec!["PaymentMethod".to_string()],
            categories: vec![vec!["Electronic check".to_string()]],
        };
        let err = encoder
            .transform(&[("PaymentMethod", "Mailed check")])
            .unwrap_err();
        assert!(matches!(err, ChurnError::UnknownCategory { .. }));
        assert!(err.to_string().contains("Mailed check"));
    }

    #[test]
    fn test_classifier_sigmoid_bounds() {
        let model = ClassifierArtifact {
            model_id: "m".to_string(),
            trained_at: Utc::now(),
            feature_names_in: vec!["a".to_string(), "b".to_string()],
            coefficients: vec![1.0, -1.0],
            intercept: 0.0,
        };

        let p = model.predict_proba(&[0.0, 0.0]).unwrap();
        assert_eq!(p, 0.5);

        let hi = model.predict_proba(&[100.0, 0.0]).unwrap();
        let lo = model.predict_proba(&[0.0, 100.0]).unwrap();
        assert!(hi > 0.999 && hi <= 1.0);
        assert!(lo < 0.001 && lo >= 0.0);

        assert!(model.predict_proba(&[1.0]).is_err());
    }

    #[test]
    fn test_classifier_rejects_duplicate_feature_names() {
        let model = ClassifierArtifact {
            model_id: "m".to_string(),
            trained_at: Utc::now(),
            feature_names_in: vec![
                "tenure".to_string(),
                "MonthlyCharges".to_string(),
                "tenure".to_string(),
            ],
            coefficients: vec![0.1, 0.2, 0.3],
            intercept: 0.0,
        };
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate feature name tenure"));
    }

    #[test]
    fn test_load_rejects_digest_mismatch() {
        let dir = tempfile::tempdir().expect("temp dir");
        let manifest = ArtifactManifest {
            training_run: "run-001".to_string(),
            created_at: Utc::now(),
            artifacts: [(CLASSIFIER_FILE.to_string(), "0".repeat(64))]
                .into_iter()
                .collect(),
        };
        fs::write(
            dir.path().join(MANIFEST_FILE),
            serde_json::to_vec(&manifest).unwrap(),
        )
        .unwrap();
        fs::write(dir.path().join(CLASSIFIER_FILE), b"{}").unwrap();

        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("digest mismatch"));
    }

    #[test]
    fn test_load_rejects_missing_manifest() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, ChurnError::ArtifactLoad { .. }));
    }
}
