//! Builder for creating and configuring WorkflowEngine instances.

use std::path::{Path, PathBuf};

use tokio::task;

use super::WorkflowEngine;
use crate::{
    db::Database,
    error::{Result, WorkflowError},
    workflow::StepTable,
};

/// Builder for creating and configuring WorkflowEngine instances.
#[derive(Debug, Clone)]
pub struct WorkflowEngineBuilder {
    database_path: Option<PathBuf>,
    steps: StepTable,
}

impl WorkflowEngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            steps: StepTable::default(),
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/socorro/socorro.db` or `~/.local/share/socorro/socorro.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Replaces the default towing step table, for deployments running with
    /// different SLA windows.
    pub fn with_step_table(mut self, steps: StepTable) -> Self {
        self.steps = steps;
        self
    }

    /// Builds the configured engine instance.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::FileSystem` if the database path is invalid
    /// Returns `WorkflowError::Database` if database initialization fails
    pub async fn build(self) -> Result<WorkflowEngine> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WorkflowError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        let steps = self.steps.clone();
        task::spawn_blocking(move || {
            let _db = Database::with_step_table(&db_path_clone, steps)?;
            Ok::<(), WorkflowError>(())
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(WorkflowEngine::new(db_path, self.steps))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("socorro")
            .place_data_file("socorro.db")
            .map_err(|e| WorkflowError::XdgDirectory(e.to_string()))
    }
}

impl Default for WorkflowEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
