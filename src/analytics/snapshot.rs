//! The immutable result of one training pass, and the slot it is
//! published through.
//!
//! Handlers never read half-trained state: a training pass builds a
//! complete `ModelSnapshot` off to the side and `SnapshotStore`
//! replaces the published `Arc` in one swap. Readers keep whatever
//! snapshot they grabbed for the rest of their request.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};

use super::month::MonthIndex;
use super::regression::MonthlyRegressor;
use super::risk::RiskClassifier;

/// Constant demand fallback when an entity has neither a model nor a
/// historical mean.
pub const DEFAULT_DEMAND: u32 = 50;

/// Constant case-count fallback for model-less diseases.
pub const DEFAULT_CASES: u32 = 20;

/// Everything one training pass produces, internally consistent:
/// the key set of each model map equals its catalog.
pub struct ModelSnapshot {
    pub month_index: MonthIndex,
    pub medicines: Vec<String>,
    pub diseases: Vec<String>,
    pub demand_models: HashMap<String, Option<MonthlyRegressor>>,
    pub disease_models: HashMap<String, Option<MonthlyRegressor>>,
    /// Historical mean demand per medicine, the fallback for entities
    /// that did not qualify for a model.
    pub demand_means: HashMap<String, f64>,
    pub risk_model: Option<RiskClassifier>,
    pub trained_at: DateTime<Utc>,
}

impl ModelSnapshot {
    /// Demand prediction for one medicine at a resolved month position.
    pub fn predict_demand(&self, medicine: &str, position: usize) -> u32 {
        if let Some(Some(model)) = self.demand_models.get(medicine) {
            return model.predict_count(position);
        }
        self.demand_means
            .get(medicine)
            .map(|mean| mean.max(0.0).round() as u32)
            .unwrap_or(DEFAULT_DEMAND)
    }

    /// Case-count prediction for one disease at a resolved position.
    pub fn predict_cases(&self, disease: &str, position: usize) -> u32 {
        match self.disease_models.get(disease) {
            Some(Some(model)) => model.predict_count(position),
            _ => DEFAULT_CASES,
        }
    }
}

/// The single swappable reference holding the published snapshot.
pub struct SnapshotStore {
    current: RwLock<Arc<ModelSnapshot>>,
}

impl SnapshotStore {
    pub fn new(initial: ModelSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// The currently published snapshot.
    pub fn get(&self) -> Arc<ModelSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Publish a new snapshot atomically. In-flight readers keep the
    /// snapshot they already hold.
    pub fn publish(&self, snapshot: ModelSnapshot) -> Arc<ModelSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = snapshot.clone();
        snapshot
    }
}
