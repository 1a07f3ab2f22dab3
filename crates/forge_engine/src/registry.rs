//! Instance identifier registry
//!
//! Hands out process-unique [`InstanceId`]s for game objects and components.
//! The registry is a cheap cloneable handle; every clone shares the same
//! table, so ids stay unique across all scenes built from one registry.

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};
use std::sync::Arc;

new_key_type! {
    /// Unique identifier of a game object or component
    pub struct InstanceId;
}

/// What an instance id was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceKind {
    /// A game object
    Object,
    /// A component attached to a game object
    Component,
}

#[derive(Debug, Clone)]
struct InstanceRecord {
    kind: InstanceKind,
    name: String,
}

/// Shared issuer of instance ids
#[derive(Debug, Clone, Default)]
pub struct Registry {
    inner: Arc<Mutex<SlotMap<InstanceId, InstanceRecord>>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh id
    pub fn assign(&self, kind: InstanceKind, name: impl Into<String>) -> InstanceId {
        let name = name.into();
        let id = self.inner.lock().insert(InstanceRecord { kind, name });
        log::trace!("Assigned {:?} id {:?}", kind, id);
        id
    }

    /// Release ids so they no longer report as live. Returns how many were live.
    pub fn release(&self, ids: &[InstanceId]) -> usize {
        let mut table = self.inner.lock();
        let released = ids.iter().filter(|id| table.remove(**id).is_some()).count();
        log::debug!("Released {} of {} instance ids", released, ids.len());
        released
    }

    /// Whether `id` is currently live
    pub fn is_live(&self, id: InstanceId) -> bool {
        self.inner.lock().contains_key(id)
    }

    /// Name recorded when `id` was issued
    pub fn name(&self, id: InstanceId) -> Option<String> {
        self.inner.lock().get(id).map(|r| r.name.clone())
    }

    /// Kind recorded when `id` was issued
    pub fn kind(&self, id: InstanceId) -> Option<InstanceKind> {
        self.inner.lock().get(id).map(|r| r.kind)
    }

    /// Number of live ids
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether no ids are live
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
