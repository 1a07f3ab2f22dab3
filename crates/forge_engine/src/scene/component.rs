//! Components and lifecycle messages
//!
//! A component declares which lifecycle messages it wants through a
//! [`Capabilities`] set. Dispatch is a bit test followed by a call to the
//! matching hook; hooks it does not declare are never invoked.

use crate::registry::{InstanceId, InstanceKind, Registry};
use bitflags::bitflags;
use std::any::Any;

bitflags! {
    /// Lifecycle hooks a component listens for
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u16 {
        /// `on_awake`, also used for activation
        const AWAKE = 1 << 0;
        /// `on_start`
        const START = 1 << 1;
        /// `on_update`
        const UPDATE = 1 << 2;
        /// `on_late_update`
        const LATE_UPDATE = 1 << 3;
        /// `on_fixed_update`
        const FIXED_UPDATE = 1 << 4;
        /// `on_gui_render`
        const GUI_RENDER = 1 << 5;
        /// `on_graph_update`
        const GRAPH_UPDATE = 1 << 6;
        /// `on_parent_changed`
        const PARENT_CHANGED = 1 << 7;

        /// The usual set for gameplay scripts
        const SCRIPT = Self::AWAKE.bits()
            | Self::START.bits()
            | Self::UPDATE.bits()
            | Self::LATE_UPDATE.bits()
            | Self::FIXED_UPDATE.bits();
    }
}

/// Lifecycle message broadcast to game objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    /// The object became active; delivered to components as awake
    Activate,
    /// First frame after the scene starts
    Start,
    /// Object is awake
    Awake,
    /// Per-frame update
    Update,
    /// Per-frame update after all `Update` calls
    LateUpdate,
    /// Fixed-step simulation tick
    FixedUpdate,
    /// Overlay drawing pass
    GuiRender,
    /// The flattened scene graph was rebuilt
    GraphUpdate,
}

impl Message {
    /// Capability a component must declare to receive this message.
    ///
    /// `Activate` maps to nothing: objects translate it to `Awake` before
    /// dispatching.
    pub fn capability(self) -> Capabilities {
        match self {
            Message::Activate => Capabilities::empty(),
            Message::Start => Capabilities::START,
            Message::Awake => Capabilities::AWAKE,
            Message::Update => Capabilities::UPDATE,
            Message::LateUpdate => Capabilities::LATE_UPDATE,
            Message::FixedUpdate => Capabilities::FIXED_UPDATE,
            Message::GuiRender => Capabilities::GUI_RENDER,
            Message::GraphUpdate => Capabilities::GRAPH_UPDATE,
        }
    }
}

/// Identity and ownership shared by every component
#[derive(Debug, Clone)]
pub struct ComponentBase {
    id: InstanceId,
    owner: Option<InstanceId>,
}

impl ComponentBase {
    /// Register a new component identity
    pub fn new(registry: &Registry, name: impl Into<String>) -> Self {
        Self {
            id: registry.assign(InstanceKind::Component, name),
            owner: None,
        }
    }

    /// Instance id of the component
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Game object the component is attached to
    pub fn owner(&self) -> Option<InstanceId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<InstanceId>) {
        self.owner = owner;
    }
}

/// Upcast helper for downcasting components to their concrete type
pub trait AsAny: Any {
    /// View as `&dyn Any`
    fn as_any(&self) -> &dyn Any;
    /// View as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behaviour attached to a game object.
///
/// Every hook defaults to a no-op; a hook only runs when the matching bit is
/// set in [`Component::capabilities`].
pub trait Component: AsAny + Send + Sync {
    /// Shared identity data
    fn base(&self) -> &ComponentBase;

    /// Shared identity data, mutably
    fn base_mut(&mut self) -> &mut ComponentBase;

    /// Hooks this component listens for
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Instance id of the component
    fn instance_id(&self) -> InstanceId {
        self.base().id()
    }

    /// Game object the component is attached to
    fn owner(&self) -> Option<InstanceId> {
        self.base().owner()
    }

    /// Called on awake and on activation
    fn on_awake(&mut self) {}

    /// Called once when the scene starts
    fn on_start(&mut self) {}

    /// Called every frame
    fn on_update(&mut self) {}

    /// Called every frame after `on_update`
    fn on_late_update(&mut self) {}

    /// Called on every fixed-step tick
    fn on_fixed_update(&mut self) {}

    /// Called during the overlay pass
    fn on_gui_render(&mut self) {}

    /// Called after the scene graph caches are rebuilt
    fn on_graph_update(&mut self) {}

    /// Called when the owner or the owner's parent changes
    fn on_parent_changed(&mut self) {}
}

/// Deliver `message` to `component` if it declares the capability.
/// Returns whether a hook ran.
pub(crate) fn deliver(component: &mut dyn Component, message: Message) -> bool {
    let wanted = message.capability();
    if wanted.is_empty() || !component.capabilities().contains(wanted) {
        return false;
    }

    match message {
        Message::Awake => component.on_awake(),
        Message::Start => component.on_start(),
        Message::Update => component.on_update(),
        Message::LateUpdate => component.on_late_update(),
        Message::FixedUpdate => component.on_fixed_update(),
        Message::GuiRender => component.on_gui_render(),
        Message::GraphUpdate => component.on_graph_update(),
        Message::Activate => return false,
    }
    true
}

/// Fire `on_parent_changed` if the component listens for it
pub(crate) fn notify_parent_changed(component: &mut dyn Component) {
    if component.capabilities().contains(Capabilities::PARENT_CHANGED) {
        component.on_parent_changed();
    }
}

/// Flattened reference to a component inside the scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentRef {
    /// Owning game object
    pub object: InstanceId,
    /// The component itself
    pub component: InstanceId,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        base: ComponentBase,
        caps: Capabilities,
        updates: u32,
        awakes: u32,
    }

    impl Component for Counter {
        fn base(&self) -> &ComponentBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut ComponentBase {
            &mut self.base
        }

        fn capabilities(&self) -> Capabilities {
            self.caps
        }

        fn on_update(&mut self) {
            self.updates += 1;
        }

        fn on_awake(&mut self) {
            self.awakes += 1;
        }
    }

    fn counter(caps: Capabilities) -> Counter {
        Counter {
            base: ComponentBase::new(&Registry::new(), "counter"),
            caps,
            updates: 0,
            awakes: 0,
        }
    }

    #[test]
    fn test_deliver_respects_capabilities() {
        let mut c = counter(Capabilities::UPDATE);

        assert!(deliver(&mut c, Message::Update));
        assert!(!deliver(&mut c, Message::Awake));
        assert!(!deliver(&mut c, Message::LateUpdate));
        assert_eq!(c.updates, 1);
        assert_eq!(c.awakes, 0);
    }

    #[test]
    fn test_activate_is_never_delivered_directly() {
        let mut c = counter(Capabilities::all());

        assert!(!deliver(&mut c, Message::Activate));
        assert_eq!(c.awakes, 0);
    }

    #[test]
    fn test_script_capabilities() {
        assert!(Capabilities::SCRIPT.contains(Message::FixedUpdate.capability()));
        assert!(!Capabilities::SCRIPT.contains(Message::GuiRender.capability()));
        assert!(Message::Activate.capability().is_empty());
    }

    #[test]
    fn test_downcast_through_trait_object() {
        let boxed: Box<dyn Component> = Box::new(counter(Capabilities::empty()));

        assert!(boxed.as_ref().as_any().downcast_ref::<Counter>().is_some());
        assert_eq!(boxed.owner(), None);
    }
}
