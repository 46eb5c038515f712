//! The training pipeline: historical CSVs in, one snapshot out.
//!
//! The month index is derived solely from the demand dataset. Missing
//! files are degraded operation, not errors: the service stays
//! queryable on synthetic months and default catalogs. A risk-fit
//! failure is isolated to the risk sub-model — demand and disease
//! training are unaffected.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;

use crate::config::DataPaths;
use crate::storage::history;

use super::features::{coerce_smoker, RiskFeatures};
use super::month::MonthIndex;
use super::regression::MonthlyRegressor;
use super::risk::RiskClassifier;
use super::snapshot::ModelSnapshot;
use super::AnalyticsError;

/// Entities with fewer observations than this get no model.
pub const MIN_OBSERVATIONS: usize = 3;

/// Catalog served when no demand data exists yet.
const FALLBACK_MEDICINES: [&str; 2] = [
    "Paracetamol 500mg Tablets",
    "Amoxicillin 250mg Capsules",
];

/// Catalog served when no disease data exists yet.
const FALLBACK_DISEASES: [&str; 2] = ["Influenza", "Dengue"];

/// Run a full training pass over the current historical datasets.
pub fn train(paths: &DataPaths) -> Result<ModelSnapshot, AnalyticsError> {
    let demand = train_demand(paths)?;
    let (diseases, disease_models) = train_disease(paths, &demand.month_index)?;
    let risk_model = train_risk(paths)?;

    tracing::info!(
        medicines = demand.medicines.len(),
        diseases = diseases.len(),
        months = demand.month_index.len(),
        risk_model = risk_model.is_some(),
        "training pass complete"
    );

    Ok(ModelSnapshot {
        month_index: demand.month_index,
        medicines: demand.medicines,
        diseases,
        demand_models: demand.models,
        disease_models,
        demand_means: demand.means,
        risk_model,
        trained_at: Utc::now(),
    })
}

struct DemandPart {
    month_index: MonthIndex,
    medicines: Vec<String>,
    models: HashMap<String, Option<MonthlyRegressor>>,
    means: HashMap<String, f64>,
}

fn train_demand(paths: &DataPaths) -> Result<DemandPart, AnalyticsError> {
    let path = paths.demand_csv();
    if !path.exists() {
        tracing::warn!(path = %path.display(), "no demand dataset; serving synthetic months");
        let medicines: Vec<String> = FALLBACK_MEDICINES.iter().map(|s| s.to_string()).collect();
        let models = medicines.iter().map(|m| (m.clone(), None)).collect();
        return Ok(DemandPart {
            month_index: MonthIndex::synthetic(),
            medicines,
            models,
            means: HashMap::new(),
        });
    }

    let rows = history::read_demand(&path)?;
    let month_index = MonthIndex::from_labels(rows.iter().map(|r| r.month.clone()));
    let medicines: Vec<String> = rows
        .iter()
        .map(|r| r.medicine.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut models = HashMap::new();
    let mut means = HashMap::new();
    for medicine in &medicines {
        let mut positions = Vec::new();
        let mut counts = Vec::new();
        for row in rows.iter().filter(|r| &r.medicine == medicine) {
            if let Some(position) = month_index.position(&row.month) {
                positions.push(position);
                counts.push(row.demand);
            }
        }
        if !counts.is_empty() {
            means.insert(
                medicine.clone(),
                counts.iter().sum::<f64>() / counts.len() as f64,
            );
        }
        models.insert(medicine.clone(), fit_entity(medicine, &positions, &counts));
    }

    Ok(DemandPart {
        month_index,
        medicines,
        models,
        means,
    })
}

fn train_disease(
    paths: &DataPaths,
    month_index: &MonthIndex,
) -> Result<(Vec<String>, HashMap<String, Option<MonthlyRegressor>>), AnalyticsError> {
    let path = paths.disease_csv();
    if !path.exists() {
        tracing::warn!(path = %path.display(), "no disease dataset; serving default catalog");
        let diseases: Vec<String> = FALLBACK_DISEASES.iter().map(|s| s.to_string()).collect();
        let models = diseases.iter().map(|d| (d.clone(), None)).collect();
        return Ok((diseases, models));
    }

    let rows = history::read_disease(&path)?;
    let diseases: Vec<String> = rows
        .iter()
        .map(|r| r.disease.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut models = HashMap::new();
    for disease in &diseases {
        let mut positions = Vec::new();
        let mut counts = Vec::new();
        // Disease months outside the demand-derived index carry no
        // usable time feature; such rows are skipped.
        for row in rows.iter().filter(|r| &r.disease == disease) {
            if let Some(position) = month_index.position(&row.month) {
                positions.push(position);
                counts.push(row.cases);
            }
        }
        models.insert(disease.clone(), fit_entity(disease, &positions, &counts));
    }

    Ok((diseases, models))
}

/// Fit one entity's regressor, or record "no model" below the
/// observation floor. A solver failure degrades to "no model" too.
fn fit_entity(entity: &str, positions: &[usize], counts: &[f64]) -> Option<MonthlyRegressor> {
    if counts.len() < MIN_OBSERVATIONS {
        return None;
    }
    match MonthlyRegressor::fit(positions, counts) {
        Ok(model) => Some(model),
        Err(err) => {
            tracing::warn!(entity, %err, "regressor fit failed; falling back to mean");
            None
        }
    }
}

/// Fit the risk classifier. Missing data and fit failures both yield
/// `None` — only a read failure of an existing file is an error.
fn train_risk(paths: &DataPaths) -> Result<Option<RiskClassifier>, AnalyticsError> {
    let path = paths.risk_csv();
    if !path.exists() {
        return Ok(None);
    }

    let rows = history::read_risk(&path)?;
    let mut features = Vec::with_capacity(rows.len());
    let mut outcomes = Vec::with_capacity(rows.len());
    for row in &rows {
        features.push(RiskFeatures::from_raw(
            row.age,
            coerce_smoker(row.is_smoker.as_deref().unwrap_or("")),
            row.hr,
            row.bp.as_deref(),
            row.condition.as_deref(),
        ));
        outcomes.push(row.readmitted);
    }

    match RiskClassifier::fit(&features, &outcomes) {
        Ok(model) => Ok(Some(model)),
        Err(err) => {
            tracing::warn!(%err, "risk model training failed; rule-based scoring active");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> (tempfile::TempDir, DataPaths) {
        let tmp = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(tmp.path());
        (tmp, paths)
    }

    fn write_demand(paths: &DataPaths, body: &str) {
        std::fs::write(paths.demand_csv(), body).unwrap();
    }

    #[test]
    fn missing_files_degrade_to_synthetic_snapshot() {
        let (_tmp, paths) = paths();
        let snap = train(&paths).unwrap();

        assert_eq!(snap.month_index.len(), 12);
        assert_eq!(snap.medicines, FALLBACK_MEDICINES);
        assert_eq!(snap.diseases, FALLBACK_DISEASES);
        assert!(snap.demand_models.values().all(Option::is_none));
        assert!(snap.risk_model.is_none());
    }

    #[test]
    fn month_index_covers_exactly_the_demand_months() {
        let (_tmp, paths) = paths();
        write_demand(
            &paths,
            "month,medicine,demand\n2025-02,A,10\n2025-01,A,20\n2025-02,B,5\n",
        );
        let snap = train(&paths).unwrap();
        assert_eq!(snap.month_index.labels(), ["2025-01", "2025-02"]);
    }

    #[test]
    fn model_store_key_set_equals_catalog() {
        let (_tmp, paths) = paths();
        write_demand(
            &paths,
            "month,medicine,demand\n2025-01,A,10\n2025-02,A,20\n2025-03,A,30\n2025-01,B,5\n",
        );
        let snap = train(&paths).unwrap();

        let mut keys: Vec<&String> = snap.demand_models.keys().collect();
        keys.sort();
        let catalog: Vec<&String> = snap.medicines.iter().collect();
        assert_eq!(keys, catalog);
    }

    #[test]
    fn observation_floor_gates_model_fitting() {
        let (_tmp, paths) = paths();
        // A has three observations, B only two.
        write_demand(
            &paths,
            "month,medicine,demand\n\
             2025-01,A,10\n2025-02,A,20\n2025-03,A,30\n\
             2025-01,B,40\n2025-02,B,60\n",
        );
        let snap = train(&paths).unwrap();

        assert!(snap.demand_models["A"].is_some());
        assert!(snap.demand_models["B"].is_none());

        // B falls back to its historical mean.
        assert_eq!(snap.predict_demand("B", 0), 50);
        // A gets a genuine trend: predictions differ across positions.
        assert_ne!(snap.predict_demand("A", 0), snap.predict_demand("A", 2));
    }

    #[test]
    fn risk_fit_failure_is_isolated() {
        let (_tmp, paths) = paths();
        write_demand(
            &paths,
            "month,medicine,demand\n2025-01,A,10\n2025-02,A,20\n2025-03,A,30\n",
        );
        // Single-class outcomes: the classifier cannot fit.
        std::fs::write(
            paths.risk_csv(),
            "age,gender,condition,isSmoker,hr,bp,risk_score,readmitted\n\
             70,Male,Diabetes,True,90,150/95,3.1,1\n\
             65,Female,Cardiac,True,85,160/100,3.0,1\n",
        )
        .unwrap();

        let snap = train(&paths).unwrap();
        assert!(snap.risk_model.is_none());
        assert!(snap.demand_models["A"].is_some());
    }

    #[test]
    fn risk_classifier_trains_on_two_class_data() {
        let (_tmp, paths) = paths();
        write_demand(
            &paths,
            "month,medicine,demand\n2025-01,A,10\n2025-02,A,20\n2025-03,A,30\n",
        );
        std::fs::write(
            paths.risk_csv(),
            "age,gender,condition,isSmoker,hr,bp,risk_score,readmitted\n\
             78,Male,Cardiac,True,95,160/100,3.5,1\n\
             70,Female,Diabetes,True,90,150/95,3.1,1\n\
             82,Male,Hypertension,False,88,155/92,3.2,1\n\
             25,Female,None,False,70,110/70,0.5,0\n\
             30,Male,None,False,72,120/80,0.6,0\n\
             22,Female,None,False,68,115/75,0.4,0\n",
        )
        .unwrap();

        let snap = train(&paths).unwrap();
        assert!(snap.risk_model.is_some());
    }

    #[test]
    fn disease_rows_with_unknown_months_are_skipped() {
        let (_tmp, paths) = paths();
        write_demand(
            &paths,
            "month,medicine,demand\n2025-01,A,10\n2025-02,A,20\n",
        );
        // Influenza has three rows but only two within the index.
        std::fs::write(
            paths.disease_csv(),
            "month,disease,cases\n2025-01,Influenza,40\n2025-02,Influenza,50\n2019-07,Influenza,60\n",
        )
        .unwrap();

        let snap = train(&paths).unwrap();
        assert!(snap.disease_models["Influenza"].is_none());
        assert_eq!(snap.predict_cases("Influenza", 0), 20);
    }
}
