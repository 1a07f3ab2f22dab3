//! Game objects
//!
//! A [`GameObject`] owns a [`Transform`] and an ordered list of components.
//! Before it is added to a [`SceneGraph`](super::SceneGraph) it also owns
//! its children directly, so whole subtrees can be assembled off-graph and
//! attached in one call. Once attached, the graph owns every object and
//! hierarchy links are plain ids.

use super::component::{self, AsAny, Component, ComponentRef, Message};
use super::transform::Transform;
use crate::graph::Node;
use crate::registry::{InstanceId, InstanceKind, Registry};

/// A node of the scene hierarchy
pub struct GameObject {
    id: InstanceId,
    name: String,
    active: bool,
    transform: Transform,
    components: Vec<Box<dyn Component>>,
    children: Vec<InstanceId>,
    parent: Option<InstanceId>,
    attached: bool,
    detached_children: Vec<GameObject>,
    generation: u64,
}

impl GameObject {
    /// Create an active, unattached object with an identity transform
    pub fn new(registry: &Registry, name: impl Into<String>) -> Self {
        let name = name.into();
        let id = registry.assign(InstanceKind::Object, name.clone());
        let mut transform = Transform::new(registry);
        transform.base_mut().set_owner(Some(id));

        Self {
            id,
            name,
            active: true,
            transform,
            components: Vec::new(),
            children: Vec::new(),
            parent: None,
            attached: false,
            detached_children: Vec::new(),
            generation: 0,
        }
    }

    /// Instance id
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the object
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The object's own active flag. Inherited activity is answered by
    /// [`SceneGraph::is_active_in_hierarchy`](super::SceneGraph::is_active_in_hierarchy).
    pub fn active(&self) -> bool {
        self.active
    }

    /// Set the active flag, returning whether it changed.
    ///
    /// Objects inside a scene graph should be toggled through
    /// [`SceneGraph::set_active`](super::SceneGraph::set_active) so the
    /// flattened caches follow.
    pub fn set_active(&mut self, active: bool) -> bool {
        if self.active == active {
            return false;
        }
        self.active = active;
        self.generation += 1;
        log::debug!("Object '{}' active = {}", self.name, active);
        true
    }

    /// Parent object, if any
    pub fn parent(&self) -> Option<InstanceId> {
        self.parent
    }

    /// Child ids in order
    pub fn children(&self) -> &[InstanceId] {
        &self.children
    }

    /// Whether the object lives in a scene graph
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Counter bumped on activity and component list changes
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The transform component
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// The transform component, mutably
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Replace the transform. Returns the old one, or gives `transform`
    /// back unchanged if it is the same instance.
    pub fn set_transform(&mut self, mut transform: Transform) -> Transform {
        if transform.instance_id() == self.transform.instance_id() {
            return transform;
        }

        transform.base_mut().set_owner(Some(self.id));
        component::notify_parent_changed(&mut transform);
        let mut old = std::mem::replace(&mut self.transform, transform);
        old.base_mut().set_owner(None);
        self.generation += 1;
        old
    }

    /// Attach a component. Returns `false` if it is already attached here.
    pub fn add_component(&mut self, mut component: Box<dyn Component>) -> bool {
        let id = component.instance_id();
        if self.components().any(|c| c.instance_id() == id) {
            return false;
        }

        component.base_mut().set_owner(Some(self.id));
        component::notify_parent_changed(component.as_mut());
        self.components.push(component);
        self.generation += 1;
        true
    }

    /// Detach a component by id. The last component takes its slot, so the
    /// order of the remaining components is not preserved. The transform
    /// cannot be removed.
    pub fn remove_component(&mut self, id: InstanceId) -> Option<Box<dyn Component>> {
        if id == self.transform.instance_id() {
            log::warn!("Refusing to remove the transform of '{}'", self.name);
            return None;
        }

        let index = self.components.iter().position(|c| c.instance_id() == id)?;
        let mut removed = self.components.swap_remove(index);
        removed.base_mut().set_owner(None);
        self.generation += 1;
        Some(removed)
    }

    /// First component of type `T`, the transform included
    pub fn component<T: Component>(&self) -> Option<&T> {
        self.components().find_map(|c| c.as_any().downcast_ref::<T>())
    }

    /// First component of type `T`, mutably
    pub fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        if self.transform.as_any().is::<T>() {
            return self.transform.as_any_mut().downcast_mut::<T>();
        }
        self.components
            .iter_mut()
            .find_map(|c| c.as_mut().as_any_mut().downcast_mut::<T>())
    }

    /// All components, transform first
    pub fn components(&self) -> impl Iterator<Item = &dyn Component> + '_ {
        std::iter::once(&self.transform as &dyn Component)
            .chain(self.components.iter().map(|c| c.as_ref()))
    }

    /// Flat references to all components, transform first
    pub fn component_refs(&self) -> impl Iterator<Item = ComponentRef> + '_ {
        let object = self.id;
        self.components().map(move |c| ComponentRef {
            object,
            component: c.instance_id(),
        })
    }

    /// Number of components, transform included
    pub fn component_count(&self) -> usize {
        1 + self.components.len()
    }

    /// Adopt `child` before this object is attached to a scene graph.
    ///
    /// Returns `false` if the child is already present. Attached objects
    /// refuse; use [`SceneGraph::add_object`](super::SceneGraph::add_object).
    pub fn add_child(&mut self, mut child: GameObject) -> bool {
        if self.attached {
            log::warn!(
                "Ignoring add_child on attached object '{}'; use SceneGraph::add_object",
                self.name
            );
            return false;
        }
        if child.id == self.id || self.children.contains(&child.id) {
            return false;
        }

        child.parent = Some(self.id);
        child.parent_changed();
        self.children.push(child.id);
        self.detached_children.push(child);
        true
    }

    /// Release an off-graph child
    pub fn remove_child(&mut self, id: InstanceId) -> Option<GameObject> {
        if self.attached {
            log::warn!(
                "Ignoring remove_child on attached object '{}'; use SceneGraph::remove_object",
                self.name
            );
            return None;
        }

        let index = self.detached_children.iter().position(|c| c.id == id)?;
        let mut child = self.detached_children.remove(index);
        self.children.retain(|&c| c != id);
        child.parent = None;
        child.parent_changed();
        Some(child)
    }

    /// Off-graph child by id
    pub fn detached_child(&self, id: InstanceId) -> Option<&GameObject> {
        self.detached_children.iter().find(|c| c.id == id)
    }

    /// Dispatch a lifecycle message to every listening component.
    ///
    /// Inactive objects ignore messages; `Activate` is delivered as `Awake`.
    pub fn send_message(&mut self, message: Message) {
        if !self.active {
            return;
        }
        let message = match message {
            Message::Activate => Message::Awake,
            other => other,
        };

        component::deliver(&mut self.transform, message);
        for c in &mut self.components {
            component::deliver(c.as_mut(), message);
        }
    }

    /// Components of all off-graph descendants in pre-order.
    ///
    /// Attached objects answer through
    /// [`SceneGraph::components_in_children`](super::SceneGraph::components_in_children).
    pub fn components_in_children(&self) -> Vec<ComponentRef> {
        let mut refs = Vec::new();
        let mut stack: Vec<&GameObject> = self.detached_children.iter().rev().collect();
        while let Some(object) = stack.pop() {
            refs.extend(object.component_refs());
            stack.extend(object.detached_children.iter().rev());
        }
        refs
    }

    /// Ids of this object and every off-graph descendant, pre-order
    pub(crate) fn subtree_ids(&self) -> Vec<InstanceId> {
        let mut ids = Vec::new();
        let mut stack = vec![self];
        while let Some(object) = stack.pop() {
            ids.push(object.id);
            stack.extend(object.detached_children.iter().rev());
        }
        ids
    }

    pub(crate) fn take_detached_children(&mut self) -> Vec<GameObject> {
        std::mem::take(&mut self.detached_children)
    }

    pub(crate) fn link_child(&mut self, id: InstanceId) {
        if !self.children.contains(&id) {
            self.children.push(id);
        }
    }

    pub(crate) fn unlink_child(&mut self, id: InstanceId) {
        self.children.retain(|&c| c != id);
    }

    pub(crate) fn set_parent(&mut self, parent: Option<InstanceId>) {
        self.parent = parent;
    }

    pub(crate) fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }

    pub(crate) fn parent_changed(&mut self) {
        component::notify_parent_changed(&mut self.transform);
        for c in &mut self.components {
            component::notify_parent_changed(c.as_mut());
        }
    }
}

impl Node for GameObject {
    type Id = InstanceId;

    fn id(&self) -> InstanceId {
        self.id
    }

    fn active(&self) -> bool {
        self.active
    }
}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("active", &self.active)
            .field("components", &self.component_count())
            .field("children", &self.children)
            .field("parent", &self.parent)
            .field("attached", &self.attached)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::component::{Capabilities, ComponentBase};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct Probe {
        base: ComponentBase,
        awakes: Arc<AtomicU32>,
        updates: Arc<AtomicU32>,
        parent_changes: Arc<AtomicU32>,
    }

    impl Probe {
        fn new(registry: &Registry) -> Self {
            Self {
                base: ComponentBase::new(registry, "probe"),
                awakes: Arc::default(),
                updates: Arc::default(),
                parent_changes: Arc::default(),
            }
        }
    }

    impl Component for Probe {
        fn base(&self) -> &ComponentBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut ComponentBase {
            &mut self.base
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::AWAKE | Capabilities::UPDATE | Capabilities::PARENT_CHANGED
        }

        fn on_awake(&mut self) {
            self.awakes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_update(&mut self) {
            self.updates.fetch_add(1, Ordering::SeqCst);
        }

        fn on_parent_changed(&mut self) {
            self.parent_changes.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Tag {
        base: ComponentBase,
    }

    impl Component for Tag {
        fn base(&self) -> &ComponentBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut ComponentBase {
            &mut self.base
        }
    }

    #[test]
    fn test_new_object_has_transform_first() {
        let registry = Registry::new();
        let object = GameObject::new(&registry, "ship");

        assert!(object.active());
        assert_eq!(object.component_count(), 1);
        let first = object.components().next().unwrap();
        assert!(first.as_any().is::<Transform>());
        assert_eq!(first.owner(), Some(object.id()));
        assert!(object.component::<Transform>().is_some());
    }

    #[test]
    fn test_add_component_dedupes_and_sets_owner() {
        let registry = Registry::new();
        let mut object = GameObject::new(&registry, "ship");
        let probe = Probe::new(&registry);
        let parent_changes = probe.parent_changes.clone();
        let probe_id = probe.instance_id();

        assert!(object.add_component(Box::new(probe)));
        assert_eq!(parent_changes.load(Ordering::SeqCst), 1);
        assert_eq!(object.component::<Probe>().unwrap().owner(), Some(object.id()));

        let transform_id = object.transform().instance_id();
        let refs: Vec<_> = object.component_refs().map(|r| r.component).collect();
        assert_eq!(refs, vec![transform_id, probe_id]);
    }

    #[test]
    fn test_remove_component_swaps_and_clears_owner() {
        let registry = Registry::new();
        let mut object = GameObject::new(&registry, "ship");
        let tags: Vec<Tag> = (0..3)
            .map(|_| Tag { base: ComponentBase::new(&registry, "tag") })
            .collect();
        let ids: Vec<_> = tags.iter().map(|t| t.instance_id()).collect();
        for tag in tags {
            object.add_component(Box::new(tag));
        }

        let removed = object.remove_component(ids[0]).unwrap();
        assert_eq!(removed.owner(), None);
        let remaining: Vec<_> = object.component_refs().skip(1).map(|r| r.component).collect();
        assert_eq!(remaining, vec![ids[2], ids[1]]);
        assert!(object.remove_component(ids[0]).is_none());
    }

    #[test]
    fn test_transform_cannot_be_removed() {
        let registry = Registry::new();
        let mut object = GameObject::new(&registry, "ship");
        let transform_id = object.transform().instance_id();

        assert!(object.remove_component(transform_id).is_none());
        assert_eq!(object.component_count(), 1);
    }

    #[test]
    fn test_set_transform_replaces_component_zero() {
        let registry = Registry::new();
        let mut object = GameObject::new(&registry, "ship");
        let replacement = Transform::new(&registry);
        let new_id = replacement.instance_id();

        let old = object.set_transform(replacement);

        assert_eq!(old.owner(), None);
        assert_eq!(object.transform().instance_id(), new_id);
        assert_eq!(object.transform().owner(), Some(object.id()));
        assert!(object.transform().is_world_dirty());
    }

    #[test]
    fn test_send_message_rules() {
        let registry = Registry::new();
        let mut object = GameObject::new(&registry, "ship");
        let probe = Probe::new(&registry);
        let (awakes, updates) = (probe.awakes.clone(), probe.updates.clone());
        object.add_component(Box::new(probe));

        object.send_message(Message::Activate);
        object.send_message(Message::Update);
        object.send_message(Message::LateUpdate);
        assert_eq!(awakes.load(Ordering::SeqCst), 1);
        assert_eq!(updates.load(Ordering::SeqCst), 1);

        object.set_active(false);
        object.send_message(Message::Update);
        assert_eq!(updates.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_active_reports_change() {
        let registry = Registry::new();
        let mut object = GameObject::new(&registry, "ship");
        let generation = object.generation();

        assert!(!object.set_active(true));
        assert_eq!(object.generation(), generation);
        assert!(object.set_active(false));
        assert!(object.generation() > generation);
    }

    #[test]
    fn test_off_graph_children() {
        let registry = Registry::new();
        let mut ship = GameObject::new(&registry, "ship");
        let mut turret = GameObject::new(&registry, "turret");
        let barrel = GameObject::new(&registry, "barrel");
        let barrel_id = barrel.id();
        let barrel_transform = barrel.transform().instance_id();
        assert!(turret.add_child(barrel));
        let turret_id = turret.id();
        let turret_transform = turret.transform().instance_id();

        assert!(ship.add_child(turret));
        assert_eq!(ship.children(), &[turret_id]);
        assert_eq!(ship.detached_child(turret_id).unwrap().parent(), Some(ship.id()));
        assert_eq!(ship.subtree_ids(), vec![ship.id(), turret_id, barrel_id]);

        let refs: Vec<_> = ship.components_in_children().iter().map(|r| r.component).collect();
        assert_eq!(refs, vec![turret_transform, barrel_transform]);

        let turret = ship.remove_child(turret_id).unwrap();
        assert_eq!(turret.parent(), None);
        assert!(ship.children().is_empty());
        assert!(ship.remove_child(turret_id).is_none());
    }

    #[test]
    fn test_attached_object_rejects_add_child() {
        let registry = Registry::new();
        let mut ship = GameObject::new(&registry, "ship");
        ship.set_attached(true);

        assert!(!ship.add_child(GameObject::new(&registry, "turret")));
        assert!(ship.children().is_empty());
    }
}
