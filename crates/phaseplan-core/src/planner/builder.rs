//! Builder for creating and configuring Planner instances.

use std::path::{Path, PathBuf};

use tokio::task;

use super::Planner;
use crate::{
    config::MissionConfig,
    db::Database,
    error::{MissionError, Result},
};

/// Builder for creating and configuring Planner instances.
#[derive(Debug, Clone, Default)]
pub struct PlannerBuilder {
    database_path: Option<PathBuf>,
    config: Option<MissionConfig>,
    config_path: Option<PathBuf>,
}

impl PlannerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses `$XDG_DATA_HOME/phaseplan/phaseplan.db`.
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses `config` instead of loading one.
    pub fn with_config(mut self, config: MissionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Loads the configuration from a JSON file.
    ///
    /// If neither this nor [`with_config`](Self::with_config) is used,
    /// `$XDG_CONFIG_HOME/phaseplan/config.json` is read when it exists.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.config_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Builds the configured planner instance.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::FileSystem` if the database directory cannot be
    /// created, `MissionError::Configuration` for an unreadable configuration
    /// and `MissionError::Database` if database initialization fails.
    pub async fn build(self) -> Result<Planner> {
        let config = match (self.config, self.config_path) {
            (Some(config), _) => {
                config.validate()?;
                config
            }
            (None, Some(path)) => MissionConfig::from_file(path)?,
            (None, None) => MissionConfig::load_default()?,
        };

        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| MissionError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), MissionError>(())
        })
        .await
        .map_err(|e| MissionError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(Planner::new(db_path, config))
    }

    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("phaseplan")
            .place_data_file("phaseplan.db")
            .map_err(|e| MissionError::XdgDirectory(e.to_string()))
    }
}
