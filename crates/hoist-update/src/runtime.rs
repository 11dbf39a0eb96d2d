//! Runtime handle and reload
//!
//! Deactivating extensions in the manifest is not enough: handlers they
//! registered stay live until the runtime is rebuilt. The reloader produces a
//! fresh handle in which no extension code participates.

use tracing::info;

use crate::events::PhaseEventBus;

/// Live runtime: loaded extensions and the event bus they populate
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    generation: u64,
    extensions: Vec<String>,
    events: PhaseEventBus,
}

impl RuntimeHandle {
    pub fn new(extensions: Vec<String>, events: PhaseEventBus) -> Self {
        Self {
            generation: 0,
            extensions,
            events,
        }
    }

    /// Incremented on every reload
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Extensions loaded into this runtime
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn events(&self) -> &PhaseEventBus {
        &self.events
    }

    pub fn has_extensions(&self) -> bool {
        !self.extensions.is_empty() || !self.events.extension_origins().is_empty()
    }
}

impl Default for RuntimeHandle {
    fn default() -> Self {
        Self::new(Vec::new(), PhaseEventBus::new())
    }
}

/// Rebuilds the runtime with extensions excluded
pub trait RuntimeReloader: Send + Sync {
    fn reload_without_extensions(&self, current: &RuntimeHandle) -> anyhow::Result<RuntimeHandle>;
}

/// Reloader for a statically linked platform
///
/// Core handlers survive the reload; everything an extension contributed is
/// dropped.
#[derive(Debug, Default)]
pub struct StaticRuntimeReloader;

impl RuntimeReloader for StaticRuntimeReloader {
    fn reload_without_extensions(&self, current: &RuntimeHandle) -> anyhow::Result<RuntimeHandle> {
        let next = RuntimeHandle {
            generation: current.generation + 1,
            extensions: Vec::new(),
            events: current.events.without_extensions(),
        };

        info!(
            "Runtime reloaded without extensions (generation {} -> {}, {} handler(s) kept)",
            current.generation,
            next.generation,
            next.events.len()
        );

        Ok(next)
    }
}
