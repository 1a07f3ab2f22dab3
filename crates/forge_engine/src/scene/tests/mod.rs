//! Cross-module scene scenarios
//!
//! Shared fixtures for the hierarchy and lifecycle tests.

mod hierarchy;

use crate::registry::Registry;
use crate::scene::{Capabilities, Component, ComponentBase, GameObject};
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared journal of `(label, hook)` pairs
pub(super) type Journal = Arc<Mutex<Vec<(String, &'static str)>>>;

/// Component that writes every hook it receives to a journal
pub(super) struct Recorder {
    base: ComponentBase,
    label: String,
    journal: Journal,
}

impl Recorder {
    pub(super) fn new(registry: &Registry, label: &str, journal: &Journal) -> Self {
        Self {
            base: ComponentBase::new(registry, label),
            label: label.to_string(),
            journal: journal.clone(),
        }
    }

    fn record(&self, hook: &'static str) {
        self.journal.lock().push((self.label.clone(), hook));
    }
}

impl Component for Recorder {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn on_awake(&mut self) {
        self.record("awake");
    }

    fn on_start(&mut self) {
        self.record("start");
    }

    fn on_update(&mut self) {
        self.record("update");
    }

    fn on_late_update(&mut self) {
        self.record("late_update");
    }

    fn on_fixed_update(&mut self) {
        self.record("fixed_update");
    }

    fn on_gui_render(&mut self) {
        self.record("gui_render");
    }

    fn on_graph_update(&mut self) {
        self.record("graph_update");
    }

    fn on_parent_changed(&mut self) {
        self.record("parent_changed");
    }
}

/// Object named `label` carrying a [`Recorder`] with the same label
pub(super) fn recorded(registry: &Registry, label: &str, journal: &Journal) -> GameObject {
    let mut object = GameObject::new(registry, label);
    object.add_component(Box::new(Recorder::new(registry, label, journal)));
    object
}

/// Drain the journal, keeping only entries for `hook`
pub(super) fn take_hook(journal: &Journal, hook: &str) -> Vec<String> {
    journal
        .lock()
        .drain(..)
        .filter(|(_, h)| *h == hook)
        .map(|(label, _)| label)
        .collect()
}
