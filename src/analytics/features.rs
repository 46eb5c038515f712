//! Feature engineering for the readmission risk model.
//!
//! Raw patient records arrive with gaps and loosely-typed fields; the
//! same defaulting rules apply at training and at inference so the
//! classifier always sees the schema it was fitted on:
//! age 50 and heart rate 75 when missing, smoking coerced to 0/1, a
//! hypertension flag derived from the `"SYS/DIA"` blood-pressure
//! string, and the literal condition category `"None"` when absent.

pub const DEFAULT_AGE: f64 = 50.0;
pub const DEFAULT_HEART_RATE: f64 = 75.0;
pub const DEFAULT_CONDITION: &str = "None";

/// Systolic threshold above which the hypertension flag trips.
const SYSTOLIC_LIMIT: i64 = 140;
/// Diastolic threshold above which the hypertension flag trips.
const DIASTOLIC_LIMIT: i64 = 90;

/// Engineered feature row for one patient.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskFeatures {
    pub age: f64,
    pub smoker: f64,
    pub hr: f64,
    pub high_bp: f64,
    pub condition: String,
}

impl RiskFeatures {
    /// Apply the defaulting rules to raw, possibly-missing fields.
    pub fn from_raw(
        age: Option<f64>,
        smoker: bool,
        hr: Option<f64>,
        bp: Option<&str>,
        condition: Option<&str>,
    ) -> Self {
        Self {
            age: age.unwrap_or(DEFAULT_AGE),
            smoker: if smoker { 1.0 } else { 0.0 },
            hr: hr.unwrap_or(DEFAULT_HEART_RATE),
            high_bp: bp.map(high_bp_flag).unwrap_or(0.0),
            condition: condition
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(DEFAULT_CONDITION)
                .to_string(),
        }
    }
}

/// 1 iff the string parses as `"SYS/DIA"` with systolic > 140 or
/// diastolic > 90; unparsable input defaults the flag to 0.
pub fn high_bp_flag(bp: &str) -> f64 {
    let mut parts = bp.split('/');
    let systolic = parts.next().and_then(|p| p.trim().parse::<i64>().ok());
    let diastolic = parts.next().and_then(|p| p.trim().parse::<i64>().ok());
    match (systolic, diastolic) {
        (Some(sys), Some(dia)) if sys > SYSTOLIC_LIMIT || dia > DIASTOLIC_LIMIT => 1.0,
        (Some(_), Some(_)) => 0.0,
        _ => 0.0,
    }
}

/// Coerce the loosely-written smoker column (`True`, `false`, `1`, ...)
/// to a boolean.
pub fn coerce_smoker(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1")
}

/// One-hot encoder over the condition categories seen at training time.
///
/// Categories are sorted for a deterministic column order. Unknown
/// categories at inference encode to all zeros rather than erroring.
#[derive(Debug, Clone)]
pub struct ConditionEncoder {
    categories: Vec<String>,
}

impl ConditionEncoder {
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let distinct: std::collections::BTreeSet<String> =
            values.into_iter().map(Into::into).collect();
        Self {
            categories: distinct.into_iter().collect(),
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Width of an encoded row: one-hot block plus the four numeric
    /// features.
    pub fn width(&self) -> usize {
        self.categories.len() + 4
    }

    /// Encode a feature row as `[one-hot(condition)..., age, smoker,
    /// hr, high_bp]` — categorical block first, numeric passthrough
    /// after, matching the training layout.
    pub fn encode(&self, features: &RiskFeatures) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.width());
        for category in &self.categories {
            row.push(if *category == features.condition { 1.0 } else { 0.0 });
        }
        row.push(features.age);
        row.push(features.smoker);
        row.push(features.hr);
        row.push(features.high_bp);
        row
    }
}
