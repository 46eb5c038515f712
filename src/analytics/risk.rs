//! Readmission risk: the trained classifier and its rule-based fallback.

use linfa::dataset::DatasetBase;
use linfa::prelude::Fit;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2};

use super::features::{ConditionEncoder, RiskFeatures, DEFAULT_CONDITION};
use super::AnalyticsError;

const MAX_ITERATIONS: u64 = 1000;

/// Probability above which the risk flag is raised, on both the
/// trained and the rule-based path.
pub const RISK_THRESHOLD: f64 = 0.5;

/// Logistic classifier over engineered patient features plus a one-hot
/// condition block. Retrained from scratch on every training pass.
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    encoder: ConditionEncoder,
    model: FittedLogisticRegression<f64, i32>,
}

impl RiskClassifier {
    /// Fit from engineered rows and 0/1 readmission outcomes.
    ///
    /// Fails when the outcomes do not span two classes or the solver
    /// rejects the data; callers treat any failure as "no risk model".
    pub fn fit(rows: &[RiskFeatures], outcomes: &[i32]) -> Result<Self, AnalyticsError> {
        if rows.is_empty() || rows.len() != outcomes.len() {
            return Err(AnalyticsError::Fit(format!(
                "risk training needs matching feature/outcome rows, got {}/{}",
                rows.len(),
                outcomes.len()
            )));
        }
        let encoder = ConditionEncoder::fit(rows.iter().map(|r| r.condition.clone()));
        let width = encoder.width();
        let flat: Vec<f64> = rows.iter().flat_map(|r| encoder.encode(r)).collect();
        let x = Array2::from_shape_vec((rows.len(), width), flat)
            .map_err(|e| AnalyticsError::Fit(e.to_string()))?;
        let y = Array1::from(outcomes.to_vec());
        let model = LogisticRegression::default()
            .max_iterations(MAX_ITERATIONS)
            .fit(&DatasetBase::new(x, y))
            .map_err(|e| AnalyticsError::Fit(e.to_string()))?;
        Ok(Self { encoder, model })
    }

    /// Positive-class (readmission) probability for one patient.
    pub fn predict_probability(&self, features: &RiskFeatures) -> f64 {
        let row = self.encoder.encode(features);
        let x = Array2::from_shape_vec((1, row.len()), row).expect("single row shape");
        self.model.predict_probabilities(&x)[0]
    }
}

/// Deterministic weighted score used when no classifier is available:
/// age, smoking, hypertension and the presence of any named condition
/// each contribute, normalized into [0, 0.99].
pub fn rule_based_score(features: &RiskFeatures) -> f64 {
    let mut score = features.age / 100.0;
    if features.smoker > 0.5 {
        score += 0.8;
    }
    if features.high_bp > 0.5 {
        score += 1.2;
    }
    if features.condition != DEFAULT_CONDITION {
        score += 1.5;
    }
    (score / 6.0).min(0.99)
}
