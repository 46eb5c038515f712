//! Per-entity time regressors.
//!
//! Each medicine or disease with enough history gets its own least
//! squares fit over (month position → observed count). The estimator
//! is deliberately opaque to callers: fit, then ask for a clamped
//! integer prediction at a position.

use linfa::dataset::DatasetBase;
use linfa::prelude::{Fit, Predict};
use linfa_linear::{FittedLinearRegression, LinearRegression};
use ndarray::{Array1, Array2};

use super::AnalyticsError;

/// A regressor over a single feature: the dense month position.
#[derive(Debug, Clone)]
pub struct MonthlyRegressor {
    model: FittedLinearRegression<f64>,
}

impl MonthlyRegressor {
    /// Fit on (position, observed count) pairs.
    pub fn fit(positions: &[usize], counts: &[f64]) -> Result<Self, AnalyticsError> {
        debug_assert_eq!(positions.len(), counts.len());
        let x = Array2::from_shape_vec(
            (positions.len(), 1),
            positions.iter().map(|&p| p as f64).collect(),
        )
        .map_err(|e| AnalyticsError::Fit(e.to_string()))?;
        let y = Array1::from(counts.to_vec());
        let model = LinearRegression::default()
            .fit(&DatasetBase::new(x, y))
            .map_err(|e| AnalyticsError::Fit(e.to_string()))?;
        Ok(Self { model })
    }

    /// Predicted count at a month position, clamped to ≥ 0 and rounded
    /// to the nearest integer.
    pub fn predict_count(&self, position: usize) -> u32 {
        let x = Array2::from_shape_vec((1, 1), vec![position as f64]).expect("1x1 shape");
        let predicted = self.model.predict(&x)[0];
        predicted.max(0.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_a_rising_trend() {
        let model = MonthlyRegressor::fit(&[0, 1, 2, 3], &[10.0, 20.0, 30.0, 40.0]).unwrap();
        assert_eq!(model.predict_count(4), 50);
    }

    #[test]
    fn predictions_vary_across_positions() {
        let model = MonthlyRegressor::fit(&[0, 1, 2], &[100.0, 150.0, 200.0]).unwrap();
        assert_ne!(model.predict_count(0), model.predict_count(2));
    }

    #[test]
    fn negative_extrapolation_clamps_to_zero() {
        // Steeply falling series: positions past the data go negative
        // before clamping.
        let model = MonthlyRegressor::fit(&[0, 1, 2], &[30.0, 15.0, 0.0]).unwrap();
        assert_eq!(model.predict_count(10), 0);
    }

    #[test]
    fn constant_series_predicts_the_constant() {
        let model = MonthlyRegressor::fit(&[0, 1, 2], &[42.0, 42.0, 42.0]).unwrap();
        assert_eq!(model.predict_count(5), 42);
    }
}
