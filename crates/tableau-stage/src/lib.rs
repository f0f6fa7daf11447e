//! # Stages
//!
//! A stage is a top-level unit of application flow ("title screen",
//! "settings", "editor"...) with explicit entry and exit points. The
//! [`StageManager`] owns every stage instance, keeps exactly one active, and
//! holds a stack of suspended ones:
//!
//! - [`StageManager::switch_stage`] is a hard reset: every suspended stage and
//!   the active one are cleaned up, then the target starts.
//! - [`StageManager::transfer_stage`] pauses the active stage, remembers an
//!   optional resume callback for it, and starts the target on top.
//! - [`StageManager::return_stage`] cleans up the active stage and resumes the
//!   most recently suspended one.
//!
//! The manager is generic over the host context `C` handed to every hook, so
//! the state machine does not depend on the engine that drives it.
//!
//! ```rust
//! use tableau_stage::*;
//!
//! struct Title;
//! impl Stage<Vec<&'static str>> for Title {
//!     fn start(&mut self, log: &mut Vec<&'static str>) {
//!         log.push("title started");
//!     }
//! }
//!
//! let mut log = Vec::new();
//! let mut stages: StageManager<Vec<&'static str>> = StageManager::new();
//! stages.insert("title", Box::new(Title));
//! stages.switch_stage("title", &mut log).unwrap();
//! assert_eq!(log, ["title started"]);
//! ```

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tableau_core::RawEvent;
use thiserror::Error;

/// Lifecycle hooks of a stage. None of them are meant to be called by user
/// code directly; flow is directed through the [`StageManager`].
#[allow(unused_variables)]
pub trait Stage<C> {
    /// Entering the stage, either fresh or after a cleanup.
    fn start(&mut self, cx: &mut C) {}

    /// Runs every frame the stage is active, before dispatch. May filter or
    /// rewrite the frame's raw events.
    fn handle_events(&mut self, events: Vec<RawEvent>, cx: &mut C) -> Vec<RawEvent> {
        events
    }

    /// Runs every frame the stage is active.
    fn update(&mut self, dt: Duration, cx: &mut C) {}

    /// Suspended with the possibility of a later `resume`.
    fn pause(&mut self, cx: &mut C) {}

    /// The stage can't be returned to without another `start`.
    fn cleanup(&mut self, cx: &mut C) {}

    /// Returned to from a suspended state. The manager runs the stored resume
    /// callback right after this.
    fn resume(&mut self, cx: &mut C) {}
}

pub type ResumeFn<C> = Box<dyn FnOnce(&mut C)>;

/// Builds a fresh stage instance.
pub type StageFactory<C> = fn() -> Box<dyn Stage<C>>;

/// Static registration table: stage name to factory.
pub type StageTable<C> = [(&'static str, StageFactory<C>)];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    #[error("no stage named `{0}`")]
    UnknownStage(String),
    #[error("no stage is active")]
    NoActiveStage,
    #[error("stage `{0}` is already active or suspended")]
    AlreadyOnStack(String),
}

struct Slot<C> {
    stage: Box<dyn Stage<C>>,
    on_resume: Option<ResumeFn<C>>,
}

/// The registered names and the active/suspended layout of a
/// [`StageManager`], without the stage instances.
///
/// The `switch`/`transfer`/`step_back` methods apply the same checks and
/// bookkeeping as the manager but run no hooks, so a host can predict the
/// outcome of navigation it has to postpone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StageStack {
    names: HashSet<String>,
    current: Option<String>,
    suspended: Vec<String>,
}

impl StageStack {
    pub fn contains(&self, key: &str) -> bool {
        self.names.contains(key)
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Suspended stage names, bottom of the stack first.
    pub fn suspended(&self) -> &[String] {
        &self.suspended
    }

    pub fn is_on_stack(&self, key: &str) -> bool {
        self.current.as_deref() == Some(key) || self.suspended.iter().any(|s| s == key)
    }

    pub fn check_switch(&self, key: &str) -> Result<(), StageError> {
        if !self.contains(key) {
            return Err(StageError::UnknownStage(key.to_string()));
        }
        Ok(())
    }

    pub fn check_transfer(&self, key: &str) -> Result<(), StageError> {
        self.check_switch(key)?;
        if self.is_on_stack(key) {
            return Err(StageError::AlreadyOnStack(key.to_string()));
        }
        if self.current.is_none() {
            return Err(StageError::NoActiveStage);
        }
        Ok(())
    }

    pub fn switch(&mut self, key: &str) -> Result<(), StageError> {
        self.check_switch(key)?;
        self.suspended.clear();
        self.current = Some(key.to_string());
        Ok(())
    }

    pub fn transfer(&mut self, key: &str) -> Result<(), StageError> {
        self.check_transfer(key)?;
        self.suspended.extend(self.current.take());
        self.current = Some(key.to_string());
        Ok(())
    }

    /// Makes the most recently suspended stage current. `false` when nothing
    /// is suspended.
    pub fn step_back(&mut self) -> bool {
        let Some(next) = self.suspended.pop() else {
            return false;
        };
        self.current = Some(next);
        true
    }
}

pub struct StageManager<C> {
    slots: HashMap<String, Slot<C>>,
    stack: StageStack,
}

impl<C> Default for StageManager<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> StageManager<C> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            stack: StageStack::default(),
        }
    }

    /// Instantiates every entry of `table` once.
    pub fn from_table(table: &StageTable<C>) -> Self {
        let mut manager = Self::new();
        for (name, factory) in table {
            manager.insert(*name, factory());
        }
        manager
    }

    /// Registers a stage. Replacing an existing name is only allowed while
    /// that stage is neither active nor suspended.
    pub fn insert(&mut self, key: impl Into<String>, stage: Box<dyn Stage<C>>) {
        let key = key.into();
        if self.stack.is_on_stack(&key) {
            log::warn!("stage `{key}` is live; ignoring re-registration");
            return;
        }
        self.stack.names.insert(key.clone());
        self.slots.insert(
            key,
            Slot {
                stage,
                on_resume: None,
            },
        );
    }

    pub fn contains(&self, key: &str) -> bool {
        self.stack.contains(key)
    }

    pub fn current_stage(&self) -> Option<&str> {
        self.stack.current()
    }

    /// Suspended stage names, bottom of the stack first.
    pub fn suspended(&self) -> &[String] {
        self.stack.suspended()
    }

    /// Snapshot of the registry and the stack.
    pub fn stack(&self) -> &StageStack {
        &self.stack
    }

    fn slot(&mut self, key: &str) -> &mut Slot<C> {
        self.slots
            .get_mut(key)
            .unwrap_or_else(|| unreachable!("stage `{key}` vanished from the registry"))
    }

    /// Activates the first stage.
    pub fn boot(&mut self, start_key: &str, cx: &mut C) -> Result<(), StageError> {
        self.switch_stage(start_key, cx)
    }

    /// Switches to an entirely new stage, cleaning up every suspended stage
    /// and the active one so no state lingers.
    pub fn switch_stage(&mut self, key: &str, cx: &mut C) -> Result<(), StageError> {
        self.stack.check_switch(key)?;
        log::info!("stage: switch {:?} -> {key}", self.stack.current);

        for name in std::mem::take(&mut self.stack.suspended) {
            let slot = self.slot(&name);
            slot.on_resume = None;
            slot.stage.cleanup(cx);
        }
        if let Some(prev) = self.stack.current.take() {
            self.slot(&prev).stage.cleanup(cx);
        }

        self.stack.current = Some(key.to_string());
        self.slot(key).stage.start(cx);
        Ok(())
    }

    /// Suspends the active stage and starts `key` on top of it. `on_resume`
    /// runs once the suspended stage is returned to.
    pub fn transfer_stage(
        &mut self,
        key: &str,
        on_resume: Option<ResumeFn<C>>,
        cx: &mut C,
    ) -> Result<(), StageError> {
        self.stack.check_transfer(key)?;
        let Some(prev) = self.stack.current.take() else {
            return Err(StageError::NoActiveStage);
        };
        log::info!("stage: transfer {prev} -> {key}");

        let slot = self.slot(&prev);
        slot.on_resume = on_resume;
        slot.stage.pause(cx);
        self.stack.suspended.push(prev);

        self.stack.current = Some(key.to_string());
        self.slot(key).stage.start(cx);
        Ok(())
    }

    /// Returns to the most recently suspended stage. Returns `false` without
    /// touching anything when nothing is suspended.
    pub fn return_stage(&mut self, cx: &mut C) -> bool {
        let Some(next) = self.stack.suspended.pop() else {
            return false;
        };
        log::info!("stage: return {:?} -> {next}", self.stack.current);

        if let Some(prev) = self.stack.current.take() {
            self.slot(&prev).stage.cleanup(cx);
        }
        self.stack.current = Some(next.clone());

        let slot = self.slot(&next);
        slot.stage.resume(cx);
        if let Some(cb) = slot.on_resume.take() {
            cb(cx);
        }
        true
    }

    /// Lets the active stage filter the frame's raw events.
    pub fn handle_events(&mut self, events: Vec<RawEvent>, cx: &mut C) -> Vec<RawEvent> {
        match self.stack.current.clone() {
            Some(key) => self.slot(&key).stage.handle_events(events, cx),
            None => events,
        }
    }

    pub fn update(&mut self, dt: Duration, cx: &mut C) {
        if let Some(key) = self.stack.current.clone() {
            self.slot(&key).stage.update(dt, cx);
        }
    }
}
