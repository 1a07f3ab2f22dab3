//! Scene graph
//!
//! Stores game objects as payloads of a descriptor [`Graph`] hanging under a
//! synthetic root object, and keeps flattened caches of the reachable (active)
//! objects, their descriptors and their components. Per-frame dispatch and
//! rendering read the caches only.
//!
//! Structural changes (add, move, remove) rebuild the caches immediately.
//! Activity and component changes only mark the graph dirty; the next
//! [`SceneGraph::refresh`] rebuilds.

use super::component::{ComponentRef, Message};
use super::object::GameObject;
use crate::core::config::SceneConfig;
use crate::foundation::math::Mat4;
use crate::graph::{Descriptor, Graph, GraphError};
use crate::registry::{InstanceId, Registry};
use parking_lot::{MappedRwLockReadGuard, MappedRwLockWriteGuard};
use std::collections::HashMap;

/// Observer told about every cache rebuild
pub trait SceneGraphListener: Send {
    /// Called with the freshly flattened object list, in traversal order
    fn on_scene_graph_update(&mut self, objects: &[InstanceId]);
}

/// Scene graph errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Underlying graph rejected the operation
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The object is not attached to this scene graph
    #[error("descriptor not found for object with ID: {0:?}")]
    ObjectNotFound(InstanceId),

    /// The object (or one in its subtree) is already in the scene graph
    #[error("object already attached: {0:?}")]
    AlreadyAttached(InstanceId),

    /// The root object cannot be removed or moved
    #[error("the root object cannot be removed or moved")]
    RootObject,
}

/// Hierarchy of game objects with flattened traversal caches
pub struct SceneGraph {
    name: String,
    graph: Graph<GameObject>,
    registry: Registry,
    root: InstanceId,
    root_descriptor: Descriptor,
    objects: Vec<InstanceId>,
    descriptors: Vec<Descriptor>,
    components: Vec<ComponentRef>,
    dirty: bool,
    revision: u64,
    listener: Option<Box<dyn SceneGraphListener>>,
}

impl SceneGraph {
    /// Create a scene graph holding only its root object
    pub fn new(registry: Registry, config: &SceneConfig) -> Result<Self, SceneError> {
        let graph = Graph::with_limit(config.max_objects);

        let mut root = GameObject::new(&registry, config.root_name.clone());
        root.set_attached(true);
        let root_id = root.id();
        let root_descriptor = graph.add_vertex(root)?;

        let mut scene_graph = Self {
            name: config.name.clone(),
            graph,
            registry,
            root: root_id,
            root_descriptor,
            objects: Vec::new(),
            descriptors: Vec::new(),
            components: Vec::new(),
            dirty: true,
            revision: 0,
            listener: None,
        };
        scene_graph.update();

        log::debug!("Created scene graph '{}'", scene_graph.name);
        Ok(scene_graph)
    }

    /// Scene graph name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the root object
    pub fn root(&self) -> InstanceId {
        self.root
    }

    /// Registry that issued the ids in this graph
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Number of objects in the graph, root and inactive objects included
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    /// Whether the graph holds nothing but its root. [`len`](Self::len)
    /// is 1 in that case.
    pub fn has_only_root(&self) -> bool {
        self.graph.len() == 1
    }

    /// Whether `id` is attached to this graph
    pub fn contains(&self, id: InstanceId) -> bool {
        self.graph.has_vertex_with_identity(id)
    }

    /// Graph descriptor of an attached object
    pub fn descriptor(&self, id: InstanceId) -> Option<Descriptor> {
        self.graph.descriptor_by_identity(id)
    }

    fn descriptor_of(&self, id: InstanceId) -> Result<Descriptor, SceneError> {
        self.descriptor(id).ok_or(SceneError::ObjectNotFound(id))
    }

    /// Attach `object`, and every child it already owns, under `parent`
    /// (the root when `None`). Returns the object's id.
    ///
    /// The whole subtree is checked before anything is attached, so a
    /// rejected call leaves the graph unchanged.
    pub fn add_object(
        &mut self,
        object: GameObject,
        parent: Option<InstanceId>,
    ) -> Result<InstanceId, SceneError> {
        let parent_id = parent.unwrap_or(self.root);
        let parent_descriptor = self.descriptor_of(parent_id)?;

        let incoming = object.subtree_ids();
        if let Some(&attached) = incoming.iter().find(|&&id| self.contains(id)) {
            return Err(SceneError::AlreadyAttached(attached));
        }
        if self.graph.len() + incoming.len() > self.graph.limit() {
            return Err(GraphError::DescriptorLimitReached.into());
        }

        let id = object.id();
        let mut pending = vec![(object, parent_descriptor, parent_id)];
        while let Some((mut current, parent_descriptor, parent_id)) = pending.pop() {
            let current_id = current.id();
            let children = current.take_detached_children();

            current.set_parent(Some(parent_id));
            current.set_attached(true);
            if current_id == id {
                current.parent_changed();
            }

            let descriptor = self.graph.add_vertex(current)?;
            self.graph.add_edge(parent_descriptor, descriptor)?;
            self.graph
                .with_node_mut(parent_descriptor, |p| p.link_child(current_id))?;

            // Reverse so siblings attach in insertion order.
            for child in children.into_iter().rev() {
                pending.push((child, descriptor, current_id));
            }
        }

        log::debug!(
            "Attached {:?} with {} objects under {:?} in '{}'",
            id,
            incoming.len(),
            parent_id,
            self.name
        );
        self.update();
        Ok(id)
    }

    /// Remove an object and its whole subtree, inactive objects included.
    /// Returns how many objects were removed.
    pub fn remove_object(&mut self, id: InstanceId) -> Result<usize, SceneError> {
        if id == self.root {
            return Err(SceneError::RootObject);
        }
        let descriptor = self.descriptor_of(id)?;
        let parent = self.graph.with_node(descriptor, |o| o.parent())?;

        let removed = self.graph.delete_vertex(descriptor)?;

        if let Some(parent_descriptor) = parent.and_then(|p| self.descriptor(p)) {
            self.graph
                .with_node_mut(parent_descriptor, |p| p.unlink_child(id))?;
        }

        // Deepest first, the removed object last.
        let mut object_ids = Vec::with_capacity(removed.len());
        let mut component_ids = Vec::new();
        for object in removed.iter().rev() {
            object_ids.push(object.id());
            component_ids.extend(object.component_refs().map(|r| r.component));
        }
        self.registry.release(&object_ids);
        self.registry.release(&component_ids);

        log::debug!("Removed {:?} ({} objects) from '{}'", id, removed.len(), self.name);
        self.update();
        Ok(removed.len())
    }

    /// Reparent an attached object under `new_parent`, keeping its subtree
    pub fn move_object(&mut self, id: InstanceId, new_parent: InstanceId) -> Result<(), SceneError> {
        if id == self.root {
            return Err(SceneError::RootObject);
        }
        let descriptor = self.descriptor_of(id)?;
        let parent_descriptor = self.descriptor_of(new_parent)?;

        let old_parent = self.graph.with_node(descriptor, |o| o.parent())?;
        if old_parent == Some(new_parent) {
            return Ok(());
        }

        self.graph.move_vertex(descriptor, parent_descriptor)?;

        if let Some(old_descriptor) = old_parent.and_then(|p| self.descriptor(p)) {
            self.graph.with_node_mut(old_descriptor, |p| p.unlink_child(id))?;
        }
        self.graph
            .with_node_mut(parent_descriptor, |p| p.link_child(id))?;
        self.graph.with_node_mut(descriptor, |o| {
            o.set_parent(Some(new_parent));
            o.parent_changed();
        })?;

        log::debug!("Moved {:?} under {:?} in '{}'", id, new_parent, self.name);
        self.update();
        Ok(())
    }

    /// Rebuild the flattened caches from a pruned traversal of the root,
    /// notify the listener, then send [`Message::GraphUpdate`] to every
    /// cached object.
    pub fn update(&mut self) {
        let mut objects = Vec::with_capacity(self.objects.len());
        let mut descriptors = Vec::with_capacity(self.descriptors.len());
        let mut components = Vec::with_capacity(self.components.len());

        self.graph.walk(self.root_descriptor, false, |d, object| {
            objects.push(object.id());
            descriptors.push(d);
            components.extend(object.component_refs());
        });

        self.objects = objects;
        self.descriptors = descriptors;
        self.components = components;
        self.dirty = false;
        self.revision += 1;

        log::trace!(
            "Rebuilt '{}' caches: {} objects, {} components (revision {})",
            self.name,
            self.objects.len(),
            self.components.len(),
            self.revision
        );

        if let Some(listener) = self.listener.as_mut() {
            listener.on_scene_graph_update(&self.objects);
        }
        self.send_message(Message::GraphUpdate);
    }

    /// Rebuild only if something marked the caches dirty. Returns whether a
    /// rebuild happened.
    pub fn refresh(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.update();
        true
    }

    /// Whether the caches are stale
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the caches stale
    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    /// Number of cache rebuilds so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Install the rebuild observer
    pub fn set_listener(&mut self, listener: Box<dyn SceneGraphListener>) {
        self.listener = Some(listener);
    }

    /// Cached active objects in traversal order
    pub fn objects(&self) -> &[InstanceId] {
        &self.objects
    }

    /// Descriptors matching [`SceneGraph::objects`]
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Cached components of the active objects in traversal order
    pub fn components(&self) -> &[ComponentRef] {
        &self.components
    }

    /// Ids below `id` in pre-order, `id` itself excluded. Empty if `id` is
    /// not attached.
    pub fn descendants(&self, id: InstanceId, include_disabled: bool) -> Vec<InstanceId> {
        let Some(start) = self.descriptor(id) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        self.graph.walk(start, include_disabled, |d, object| {
            if d != start {
                out.push(object.id());
            }
        });
        out
    }

    /// Parent, grandparent and so on up to the root
    pub fn ancestors(&self, id: InstanceId) -> Result<Vec<InstanceId>, SceneError> {
        let mut descriptor = self.descriptor_of(id)?;
        let mut out = Vec::new();
        while let Ok(parent) = self.graph.parent(descriptor) {
            out.push(self.graph.with_node(parent, |o| o.id())?);
            descriptor = parent;
        }
        Ok(out)
    }

    /// Read access to an attached object
    pub fn object(&self, id: InstanceId) -> Option<MappedRwLockReadGuard<'_, GameObject>> {
        let descriptor = self.descriptor(id)?;
        self.graph.node_at_vertex(descriptor).ok()
    }

    /// Write access to an attached object. Changes made through the guard
    /// cannot be observed, so the caches are marked dirty up front.
    pub fn object_mut(&mut self, id: InstanceId) -> Option<MappedRwLockWriteGuard<'_, GameObject>> {
        let descriptor = self.descriptor(id)?;
        self.dirty = true;
        self.graph.node_at_vertex_mut(descriptor).ok()
    }

    /// Run `f` against an attached object
    pub fn with_object<R>(&self, id: InstanceId, f: impl FnOnce(&GameObject) -> R) -> Result<R, SceneError> {
        let descriptor = self.descriptor_of(id)?;
        Ok(self.graph.with_node(descriptor, f)?)
    }

    /// Run `f` against an attached object mutably. Marks the caches dirty
    /// if `f` changed its activity or component list.
    pub fn with_object_mut<R>(
        &mut self,
        id: InstanceId,
        f: impl FnOnce(&mut GameObject) -> R,
    ) -> Result<R, SceneError> {
        let descriptor = self.descriptor_of(id)?;
        let (result, changed) = self.graph.with_node_mut(descriptor, |object| {
            let before = object.generation();
            let result = f(object);
            (result, object.generation() != before)
        })?;

        if changed {
            self.dirty = true;
        }
        Ok(result)
    }

    /// Set an object's active flag. Returns whether it changed. A change
    /// only marks the caches dirty; no message is sent.
    pub fn set_active(&mut self, id: InstanceId, active: bool) -> Result<bool, SceneError> {
        let descriptor = self.descriptor_of(id)?;
        if !self.graph.with_node_mut(descriptor, |o| o.set_active(active))? {
            return Ok(false);
        }

        self.dirty = true;
        Ok(true)
    }

    /// Whether the object and all of its ancestors are active
    pub fn is_active_in_hierarchy(&self, id: InstanceId) -> bool {
        self.descriptor(id)
            .map_or(false, |d| self.graph.vertex_active(d))
    }

    /// Send `message` to every cached object in traversal order
    pub fn send_message(&self, message: Message) {
        for &descriptor in &self.descriptors {
            if let Err(err) = self.graph.with_node_mut(descriptor, |o| o.send_message(message)) {
                log::warn!("Skipping {:?} for descriptor {}: {}", message, descriptor, err);
            }
        }
    }

    /// Components of every active descendant of `id`, in pre-order
    pub fn components_in_children(&self, id: InstanceId) -> Result<Vec<ComponentRef>, SceneError> {
        let start = self.descriptor_of(id)?;
        let mut refs = Vec::new();
        self.graph.walk(start, false, |d, object| {
            if d != start {
                refs.extend(object.component_refs());
            }
        });
        Ok(refs)
    }

    /// Components of every ancestor of `id`, nearest first
    pub fn components_in_parent(&self, id: InstanceId) -> Result<Vec<ComponentRef>, SceneError> {
        let mut refs = Vec::new();
        for ancestor in self.ancestors(id)? {
            let descriptor = self.descriptor_of(ancestor)?;
            self.graph
                .with_node(descriptor, |o| refs.extend(o.component_refs()))?;
        }
        Ok(refs)
    }

    /// Recompute world matrices of the cached objects, parents before
    /// children. Returns how many transforms were updated.
    pub fn propagate_transforms(&self) -> usize {
        let mut worlds: HashMap<InstanceId, Mat4> = HashMap::with_capacity(self.objects.len());

        for &descriptor in &self.descriptors {
            let result = self.graph.with_node_mut(descriptor, |object| {
                let parent_world = object
                    .parent()
                    .and_then(|p| worlds.get(&p))
                    .copied()
                    .unwrap_or_else(Mat4::identity);
                object.transform_mut().update_world(&parent_world);
                (object.id(), *object.transform().world_matrix())
            });

            match result {
                Ok((id, world)) => {
                    worlds.insert(id, world);
                }
                Err(err) => log::warn!("Skipping transform of descriptor {}: {}", descriptor, err),
            }
        }
        worlds.len()
    }
}
