//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::config::{ConfigLoader, WinringConfig};
use crate::error::{ApiError, StorageError};
use crate::labels::apply_label;
use crate::reconcile::dedupe_order;
use crate::scenario::{run_scenario_with_store, Scenario};
use crate::store::{KeyValueStore, OrderingStore, SledKeyValueStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{info, info_span, warn};

use crate::cli::parse::{Commands, LabelCommands, OrderCommands};
use crate::cli::{
    command_name, format_labels_json, format_labels_text, format_order_json, format_order_text,
    format_scenario_report_json, format_scenario_report_text,
};

/// Runtime context for CLI execution: config, the ordering store and the
/// runtime the async store API is driven on.
pub struct RunContext {
    config: WinringConfig,
    backend: Arc<dyn KeyValueStore>,
    store: OrderingStore,
    runtime: Runtime,
}

impl RunContext {
    /// Load config (explicit file or global layering), apply the store
    /// override and open the sled store.
    pub fn new(config_path: Option<PathBuf>, store_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let mut config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        if let Some(path) = store_path {
            config.storage.path = Some(path);
        }
        config.ensure_valid()?;

        let path = config.storage.resolve_path();
        std::fs::create_dir_all(&path).map_err(StorageError::from)?;
        let backend = SledKeyValueStore::new(&path)?;
        info!(path = %path.display(), "Opened ordering store");

        Self::with_backend(config, Arc::new(backend))
    }

    /// Run context over an already-open backend
    pub fn with_backend(
        config: WinringConfig,
        backend: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to start runtime: {}", e)))?;
        Ok(Self {
            config,
            store: OrderingStore::new(backend.clone()),
            backend,
            runtime,
        })
    }

    pub fn config(&self) -> &WinringConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let name = command_name(command);
        let span = info_span!("command", name = %name);
        let _entered = span.enter();

        let started = Instant::now();
        let result = self.runtime.block_on(self.execute_inner(command));
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => info!(duration_ms, "Command completed"),
            Err(e) => warn!(duration_ms, error = %e, "Command failed"),
        }
        result
    }

    async fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Order { command } => self.handle_order_command(command).await,
            Commands::Label { command } => self.handle_label_command(command).await,
            Commands::Simulate { script, format } => {
                let scenario = Scenario::load(script)?;
                let report = run_scenario_with_store(&scenario, self.backend.clone()).await?;
                if format == "json" {
                    format_scenario_report_json(&report)
                } else {
                    Ok(format_scenario_report_text(&report))
                }
            }
        }
    }

    async fn handle_order_command(&self, command: &OrderCommands) -> Result<String, ApiError> {
        match command {
            OrderCommands::Show { format } => {
                let order = self.store.read_order().await?;
                if format == "json" {
                    format_order_json(order.as_deref())
                } else {
                    let labels = self.store.read_labels().await?;
                    Ok(format_order_text(order.as_deref(), &labels))
                }
            }
            OrderCommands::Set { ids } => {
                let order = dedupe_order(ids);
                self.store.write_order(&order).await?;
                Ok(format!("Saved window order ({} windows).", order.len()))
            }
            OrderCommands::Clear => {
                self.store.write_order(&[]).await?;
                Ok("Window order cleared.".to_string())
            }
        }
    }

    async fn handle_label_command(&self, command: &LabelCommands) -> Result<String, ApiError> {
        match command {
            LabelCommands::List { format } => {
                let labels = self.store.read_labels().await?;
                if format == "json" {
                    format_labels_json(&labels)
                } else {
                    Ok(format_labels_text(&labels))
                }
            }
            LabelCommands::Set { id, label, derived } => {
                let mut labels = self.store.read_labels().await?;
                let applied = apply_label(&mut labels, *id, label, derived);
                self.store.write_labels(&labels).await?;
                Ok(match applied {
                    Some(label) => format!("Window {} labelled \"{}\".", id, label),
                    None => format!("Window {} label removed.", id),
                })
            }
            LabelCommands::Clear { id } => {
                let mut labels = self.store.read_labels().await?;
                if labels.remove(&id.to_string()).is_none() {
                    return Ok(format!("Window {} has no label.", id));
                }
                self.store.write_labels(&labels).await?;
                Ok(format!("Window {} label removed.", id))
            }
        }
    }
}
