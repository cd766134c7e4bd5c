//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the simulation.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use defense_content::{ContentFactory, TemplateCatalog};
use defense_core::{EngineConfig, World};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::simulation::Simulation;
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Used when no data directory is configured.
    pub engine: EngineConfig,
    /// Directory holding `config.toml` and `actors.ron`.
    pub data_dir: Option<PathBuf>,
    pub starting_gold: i64,
    /// Step automatically at this period. `None` steps only on request.
    pub tick_interval: Option<Duration>,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            data_dir: None,
            starting_gold: 0,
            tick_interval: None,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DEFENSE_DATA_DIR` - Content directory (default: none, built-in defaults)
    /// - `DEFENSE_STARTING_GOLD` - Initial gold balance (default: 0)
    /// - `DEFENSE_TICK_MS` - Automatic step period in milliseconds (default: manual stepping)
    /// - `DEFENSE_EVENT_BUFFER` - Per-topic event capacity (default: 100)
    /// - `DEFENSE_COMMAND_BUFFER` - Command queue size (default: 32)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.data_dir = env::var("DEFENSE_DATA_DIR").ok().map(PathBuf::from);

        if let Some(gold) = read_env::<i64>("DEFENSE_STARTING_GOLD") {
            config.starting_gold = gold;
        }

        // A zero period would spin; treat it as manual stepping.
        config.tick_interval = read_env::<u64>("DEFENSE_TICK_MS")
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis);

        if let Some(capacity) = read_env::<usize>("DEFENSE_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("DEFENSE_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    let raw = env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable environment variable");
            None
        }
    }
}

/// Main runtime that orchestrates the simulation
///
/// Runtime owns the worker task. [`RuntimeHandle`] provides a cloneable
/// façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for the worker to drain; outstanding handle clones must be
    /// dropped first.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    world: Option<World>,
    catalog: Option<TemplateCatalog>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            world: None,
            catalog: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide an initial world instead of an empty one
    pub fn initial_world(mut self, world: World) -> Self {
        self.world = Some(world);
        self
    }

    /// Provide templates directly instead of loading them from the data directory
    pub fn templates(mut self, catalog: TemplateCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Build the runtime and spawn its worker
    ///
    /// Must be called inside a tokio runtime.
    pub fn build(self) -> Result<Runtime> {
        let factory = self.config.data_dir.as_ref().map(ContentFactory::new);

        let engine_config = match &factory {
            Some(factory) => factory.load_config()?,
            None => self.config.engine.clone(),
        };
        let catalog = match (self.catalog, &factory) {
            (Some(catalog), _) => catalog,
            (None, Some(factory)) => factory.load_templates()?,
            (None, None) => TemplateCatalog::new(),
        };
        let world = self.world.unwrap_or_else(|| World::new(engine_config));

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let simulation = Simulation::new(world, catalog, self.config.starting_gold);
        let sim_worker = SimulationWorker::new(simulation, command_rx, event_bus);
        let tick_interval = self.config.tick_interval;

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run(tick_interval).await;
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_step_manually() {
        let config = RuntimeConfig::default();
        assert!(config.tick_interval.is_none());
        assert!(config.data_dir.is_none());
        assert_eq!(config.engine, EngineConfig::default());
    }
}
