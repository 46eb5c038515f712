use std::env;
use std::path::{Path, PathBuf};

/// Application-level constants
pub const APP_NAME: &str = "MediSys Analytics";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Port the HTTP server binds when `MEDISYS_PORT` is unset.
pub const DEFAULT_PORT: u16 = 5001;

/// Environment variable controlling the bound port.
pub const PORT_ENV: &str = "MEDISYS_PORT";

/// Environment variable overriding the data root directory.
pub const DATA_DIR_ENV: &str = "MEDISYS_DATA_DIR";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    "info,medisys_analytics=debug".to_string()
}

/// Resolve the port to bind from the environment.
pub fn port_from_env() -> u16 {
    env::var(PORT_ENV)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// All on-disk locations the service reads and writes.
///
/// Historical CSVs live directly under the root; append-only event
/// logs live under `<root>/data/`. Constructed once at startup (or per
/// test with a temp root) and threaded through `AppState`.
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root from `MEDISYS_DATA_DIR`, falling back to the working directory.
    pub fn from_env() -> Self {
        let root = env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical demand training data: `month,medicine,demand`.
    pub fn demand_csv(&self) -> PathBuf {
        self.root.join("synthetic_medicine_demand.csv")
    }

    /// Canonical disease training data: `month,disease,cases`.
    pub fn disease_csv(&self) -> PathBuf {
        self.root.join("synthetic_disease_trends.csv")
    }

    /// Canonical patient risk training data.
    pub fn risk_csv(&self) -> PathBuf {
        self.root.join("synthetic_patient_risk.csv")
    }

    /// Directory holding the append-only event logs.
    pub fn events_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    /// Active demand event log, consumed by merge-and-retrain.
    pub fn demand_events_csv(&self) -> PathBuf {
        self.events_dir().join("synthetic_medicine_demand_events.csv")
    }

    /// Admission event log. Ingested but not yet folded into training data.
    pub fn admissions_events_csv(&self) -> PathBuf {
        self.events_dir().join("admissions_events.csv")
    }

    /// Catch-all log for payloads that match no known event type.
    pub fn raw_events_log(&self) -> PathBuf {
        self.events_dir().join("raw_events.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_logs_under_data_subdir() {
        let paths = DataPaths::new("/srv/analytics");
        assert!(paths.demand_events_csv().starts_with("/srv/analytics/data"));
        assert!(paths.admissions_events_csv().starts_with("/srv/analytics/data"));
        assert!(paths.raw_events_log().ends_with("raw_events.log"));
    }

    #[test]
    fn historical_csvs_under_root() {
        let paths = DataPaths::new("/srv/analytics");
        assert_eq!(
            paths.demand_csv(),
            PathBuf::from("/srv/analytics/synthetic_medicine_demand.csv")
        );
        assert!(paths.disease_csv().starts_with("/srv/analytics"));
        assert!(paths.risk_csv().starts_with("/srv/analytics"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.6.0");
    }

    #[test]
    fn port_defaults_when_env_unset() {
        assert_eq!(DEFAULT_PORT, 5001);
    }
}
