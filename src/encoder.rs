//! Feature encoding pipeline
//!
//! Reproduces, at inference time, the exact column set, column order, and
//! value transforms the classifier saw at training time:
//!
//! 1. binary-map gender plus the five Yes/No fields
//! 2. one-hot the nine general categorical fields via the first fitted
//!    encoder
//! 3. one-hot PaymentMethod via the second, independently fitted encoder
//! 4. merge, dropping the raw categorical columns, with collisions fatal
//! 5. scale tenure, MonthlyCharges and TotalCharges in place
//! 6. reorder every column to the classifier's declared training order
//!
//! Each step is pure and deterministic; encoding the same profile twice
//! yields bit-identical output. The two encoders must stay independent
//! because their fit-time category order decides column identity.

use crate::artifacts::ArtifactBundle;
use crate::errors::ChurnResult;
use crate::feature_frame::FeatureFrame;
use crate::profile::CustomerProfile;

/// One encoded row in the classifier's declared column order.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFeatures {
    pub columns: Vec<String>,
    pub values: Vec<f64>,
}

impl EncodedFeatures {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Encode one profile against the loaded artifacts.
pub fn encode(profile: &CustomerProfile, bundle: &ArtifactBundle) -> ChurnResult<EncodedFeatures> {
    let capacity = 9 + bundle.encoder_general.output_width() + bundle.encoder_payment.output_width();
    let mut frame = FeatureFrame::with_capacity(capacity);

    // Steps 1 + 4a: binary-mapped and numeric columns, raw categorical
    // columns never enter the frame.
    for (name, value) in profile.retained_columns() {
        frame.insert(name, value)?;
    }

    // Step 2: general one-hot block.
    for (name, value) in bundle
        .encoder_general
        .transform(&profile.general_categorical())?
    {
        frame.insert(name, value)?;
    }

    // Step 3: payment one-hot block.
    for (name, value) in bundle
        .encoder_payment
        .transform(&profile.payment_categorical())?
    {
        frame.insert(name, value)?;
    }

    // Step 5: scale the three numeric columns in place.
    bundle.scaler.transform(&mut frame)?;

    // Step 6: reorder to the training-time schema. Missing or extra
    // columns mean the artifacts are mismatched and fail here.
    let schema = &bundle.classifier.feature_names_in;
    let values = frame.reindex(schema)?;

    Ok(EncodedFeatures {
        columns: schema.clone(),
        values,
    })
}
