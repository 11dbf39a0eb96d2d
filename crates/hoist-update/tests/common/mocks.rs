//! Test doubles for the update controller seams

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use hoist_core::types::UpdateInfo;
use hoist_extensions::{ExtensionLifecycle, ExtensionSummary};
use hoist_update::{
    HandlerDecision, PhaseEvent, PhaseHandler, RuntimeHandle, RuntimeReloader, UpdateError,
    VersionOracle,
};

/// In-memory extension registry with failure injection
#[derive(Default)]
pub struct MockLifecycle {
    extensions: Mutex<BTreeMap<String, ExtensionSummary>>,
    failing: Mutex<HashSet<String>>,
    deactivate_calls: Mutex<Vec<String>>,
    installed_calls: AtomicUsize,
}

impl MockLifecycle {
    pub fn new(installed: Vec<ExtensionSummary>) -> Self {
        Self {
            extensions: Mutex::new(installed.into_iter().map(|e| (e.name.clone(), e)).collect()),
            ..Self::default()
        }
    }

    /// Make deactivating or activating `name` fail until cleared
    pub fn fail_on(&self, name: &str) {
        self.failing.lock().unwrap().insert(name.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// Every deactivation attempt in call order, failed ones included
    pub fn deactivate_calls(&self) -> Vec<String> {
        self.deactivate_calls.lock().unwrap().clone()
    }

    /// How often the installed set was read
    pub fn installed_calls(&self) -> usize {
        self.installed_calls.load(Ordering::SeqCst)
    }

    pub fn clear_calls(&self) {
        self.deactivate_calls.lock().unwrap().clear();
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.extensions
            .lock()
            .unwrap()
            .get(name)
            .map(|e| e.active)
            .unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.extensions
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.active)
            .count()
    }

    fn set_active(&self, name: &str, active: bool) -> Result<bool> {
        if self.failing.lock().unwrap().contains(name) {
            return Err(anyhow!("injected failure for {}", name));
        }

        let mut extensions = self.extensions.lock().unwrap();
        let ext = extensions
            .get_mut(name)
            .ok_or_else(|| anyhow!("extension {} is not installed", name))?;
        let changed = ext.active != active;
        ext.active = active;
        Ok(changed)
    }
}

impl ExtensionLifecycle for MockLifecycle {
    fn installed(&self) -> Result<Vec<ExtensionSummary>> {
        self.installed_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.extensions.lock().unwrap().values().cloned().collect())
    }

    fn deactivate(&self, name: &str) -> Result<bool> {
        self.deactivate_calls.lock().unwrap().push(name.to_string());
        self.set_active(name, false)
    }

    fn activate(&self, name: &str) -> Result<bool> {
        self.set_active(name, true)
    }
}

/// Oracle answering with fixed update info
pub struct MockOracle {
    info: Option<UpdateInfo>,
    calls: AtomicUsize,
}

impl MockOracle {
    pub fn new(info: UpdateInfo) -> Self {
        Self {
            info: Some(info),
            calls: AtomicUsize::new(0),
        }
    }

    /// Oracle whose release source cannot be reached
    pub fn unreachable() -> Self {
        Self {
            info: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VersionOracle for MockOracle {
    async fn check_for_updates(&self) -> hoist_update::Result<UpdateInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.info
            .clone()
            .ok_or_else(|| UpdateError::transport("connection refused"))
    }
}

/// Shared log of dispatched events
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<(String, PhaseEvent)>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler recording into this log under `name`
    pub fn handler(&self, name: &str) -> RecordingHandler {
        RecordingHandler {
            name: name.to_string(),
            log: self.clone(),
            veto: None,
        }
    }

    /// Handler recording into this log and vetoing every event
    pub fn vetoing_handler(&self, name: &str, reason: &str) -> RecordingHandler {
        RecordingHandler {
            name: name.to_string(),
            log: self.clone(),
            veto: Some(reason.to_string()),
        }
    }

    /// How often `handler` saw an event named `event`
    pub fn count(&self, handler: &str, event: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(h, e)| h == handler && e.name() == event)
            .count()
    }

    pub fn events(&self) -> Vec<(String, PhaseEvent)> {
        self.0.lock().unwrap().clone()
    }
}

pub struct RecordingHandler {
    name: String,
    log: EventLog,
    veto: Option<String>,
}

impl PhaseHandler for RecordingHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, event: &PhaseEvent) -> Result<HandlerDecision> {
        self.log
            .0
            .lock()
            .unwrap()
            .push((self.name.clone(), event.clone()));
        Ok(match &self.veto {
            Some(reason) => HandlerDecision::veto(reason.clone()),
            None => HandlerDecision::Accept,
        })
    }
}

/// Reloader that always fails
#[derive(Default)]
pub struct FailingReloader {
    calls: AtomicUsize,
}

impl FailingReloader {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RuntimeReloader for FailingReloader {
    fn reload_without_extensions(&self, _current: &RuntimeHandle) -> Result<RuntimeHandle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("container rebuild failed"))
    }
}
