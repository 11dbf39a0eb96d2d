//! Update phase events
//!
//! Handlers subscribe to the pre- and post-prepare events. Any handler may
//! veto an event; dispatch stops at the first veto and the update aborts.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, UpdateError, UpdatePhase};

/// Event published around the deactivation sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PhaseEvent {
    /// Before any extension is touched
    UpdatePrePrepare {
        current_version: String,
        target_version: String,
    },
    /// After deactivation finished and the runtime was reloaded
    UpdatePostPrepare {
        current_version: String,
        target_version: String,
    },
}

impl PhaseEvent {
    pub fn pre_prepare(current: impl Into<String>, target: impl Into<String>) -> Self {
        Self::UpdatePrePrepare {
            current_version: current.into(),
            target_version: target.into(),
        }
    }

    pub fn post_prepare(current: impl Into<String>, target: impl Into<String>) -> Self {
        Self::UpdatePostPrepare {
            current_version: current.into(),
            target_version: target.into(),
        }
    }

    /// Event name as seen by subscribers
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdatePrePrepare { .. } => "update.pre_prepare",
            Self::UpdatePostPrepare { .. } => "update.post_prepare",
        }
    }

    pub fn phase(&self) -> UpdatePhase {
        match self {
            Self::UpdatePrePrepare { .. } => UpdatePhase::PrePrepare,
            Self::UpdatePostPrepare { .. } => UpdatePhase::PostPrepare,
        }
    }

    pub fn current_version(&self) -> &str {
        match self {
            Self::UpdatePrePrepare {
                current_version, ..
            }
            | Self::UpdatePostPrepare {
                current_version, ..
            } => current_version,
        }
    }

    pub fn target_version(&self) -> &str {
        match self {
            Self::UpdatePrePrepare { target_version, .. }
            | Self::UpdatePostPrepare { target_version, .. } => target_version,
        }
    }
}

/// Answer of a handler to a phase event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerDecision {
    Accept,
    Veto { reason: String },
}

impl HandlerDecision {
    pub fn veto(reason: impl Into<String>) -> Self {
        Self::Veto {
            reason: reason.into(),
        }
    }
}

/// Subscriber to update phase events
pub trait PhaseHandler: Send + Sync {
    /// Name reported when the handler vetoes or fails
    fn name(&self) -> &str;

    fn handle(&self, event: &PhaseEvent) -> anyhow::Result<HandlerDecision>;
}

/// Handler built from a closure
pub struct FnHandler<F> {
    name: String,
    f: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&PhaseEvent) -> anyhow::Result<HandlerDecision> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> PhaseHandler for FnHandler<F>
where
    F: Fn(&PhaseEvent) -> anyhow::Result<HandlerDecision> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, event: &PhaseEvent) -> anyhow::Result<HandlerDecision> {
        (self.f)(event)
    }
}

/// Handler that logs every event and never vetoes
#[derive(Debug, Default)]
pub struct TracingHandler;

impl PhaseHandler for TracingHandler {
    fn name(&self) -> &str {
        "tracing"
    }

    fn handle(&self, event: &PhaseEvent) -> anyhow::Result<HandlerDecision> {
        info!(
            "{}: {} -> {}",
            event.name(),
            event.current_version(),
            event.target_version()
        );
        Ok(HandlerDecision::Accept)
    }
}

/// Who contributed a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOrigin {
    Core,
    Extension(String),
}

#[derive(Clone)]
struct Registration {
    origin: HandlerOrigin,
    handler: Arc<dyn PhaseHandler>,
}

/// Ordered set of phase handlers
#[derive(Clone, Default)]
pub struct PhaseEventBus {
    registrations: Vec<Registration>,
}

impl PhaseEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler owned by the platform itself
    pub fn register_core(&mut self, handler: impl PhaseHandler + 'static) {
        self.register(HandlerOrigin::Core, Arc::new(handler));
    }

    /// Register a handler contributed by an extension
    pub fn register_for_extension(
        &mut self,
        extension: impl Into<String>,
        handler: impl PhaseHandler + 'static,
    ) {
        self.register(HandlerOrigin::Extension(extension.into()), Arc::new(handler));
    }

    pub fn register(&mut self, origin: HandlerOrigin, handler: Arc<dyn PhaseHandler>) {
        debug!("Registering phase handler {} ({:?})", handler.name(), origin);
        self.registrations.push(Registration { origin, handler });
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Extensions that contributed at least one handler
    pub fn extension_origins(&self) -> Vec<&str> {
        let mut origins: Vec<&str> = self
            .registrations
            .iter()
            .filter_map(|r| match &r.origin {
                HandlerOrigin::Extension(name) => Some(name.as_str()),
                HandlerOrigin::Core => None,
            })
            .collect();
        origins.sort_unstable();
        origins.dedup();
        origins
    }

    /// Copy of this bus with every extension-contributed handler removed
    pub fn without_extensions(&self) -> Self {
        Self {
            registrations: self
                .registrations
                .iter()
                .filter(|r| r.origin == HandlerOrigin::Core)
                .cloned()
                .collect(),
        }
    }

    /// Deliver an event to each handler in registration order
    pub fn dispatch(&self, event: &PhaseEvent) -> Result<()> {
        debug!(
            "Dispatching {} to {} handler(s)",
            event.name(),
            self.registrations.len()
        );

        for registration in &self.registrations {
            let handler = &registration.handler;
            let decision = handler
                .handle(event)
                .map_err(|source| UpdateError::HandlerFailed {
                    phase: event.phase(),
                    handler: handler.name().to_string(),
                    source,
                })?;

            if let HandlerDecision::Veto { reason } = decision {
                warn!("{} vetoed by {}: {}", event.name(), handler.name(), reason);
                return Err(UpdateError::Aborted {
                    phase: event.phase(),
                    handler: handler.name().to_string(),
                    reason,
                });
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for PhaseEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.registrations
                    .iter()
                    .map(|r| (r.handler.name(), &r.origin)),
            )
            .finish()
    }
}
