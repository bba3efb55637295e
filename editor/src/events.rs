//! Scene and GUI events and the bus that delivers them
//!
//! The bus is an explicit object handed to the components that need it.
//! Receivers are held weakly, so dropping a component also ends its
//! registration.

use crate::object::ObjectRef;
use scene_engine::prelude::Scene;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{trace, warn};

/// What happened to a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneEventKind {
    ObjectAdded,
    ObjectRemoved,
    ObjectChanged,
    ObjectPicked,
    ObjectReparented,
    ObjectRenamed,
    NewSceneCreated,
}

impl SceneEventKind {
    pub fn channel(self) -> &'static str {
        match self {
            SceneEventKind::ObjectAdded => "scene.object_added",
            SceneEventKind::ObjectRemoved => "scene.object_removed",
            SceneEventKind::ObjectChanged => "scene.object_changed",
            SceneEventKind::ObjectPicked => "scene.object_picked",
            SceneEventKind::ObjectReparented => "scene.object_reparented",
            SceneEventKind::ObjectRenamed => "scene.object_renamed",
            SceneEventKind::NewSceneCreated => "scene.new_scene_created",
        }
    }
}

/// What happened in the editor layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuiEventKind {
    LayoutChanged,
    TabChanged,
    FormChanged,
}

impl GuiEventKind {
    pub fn channel(self) -> &'static str {
        match self {
            GuiEventKind::LayoutChanged => "gui.layout_changed",
            GuiEventKind::TabChanged => "gui.tab_changed",
            GuiEventKind::FormChanged => "gui.form_changed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneEvent {
    pub kind: SceneEventKind,
    pub object: ObjectRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuiEvent {
    pub kind: GuiEventKind,
    /// Element the event is about (tab name, form id), if any
    pub target: Option<String>,
}

/// Event delivered through the [`EventBus`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Scene(SceneEvent),
    Gui(GuiEvent),
}

impl Event {
    pub fn scene(kind: SceneEventKind, object: ObjectRef) -> Self {
        Event::Scene(SceneEvent { kind, object })
    }

    pub fn gui(kind: GuiEventKind, target: Option<String>) -> Self {
        Event::Gui(GuiEvent { kind, target })
    }

    /// Channel name used by [`EventBus::on`]
    pub fn channel(&self) -> &'static str {
        match self {
            Event::Scene(event) => event.kind.channel(),
            Event::Gui(event) => event.kind.channel(),
        }
    }
}

/// Component reacting to events it did not initiate
pub trait EventReceiver {
    /// Handle an event; the return value is advisory and never stops delivery
    fn on_event(&mut self, event: &Event, scene: &Scene) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type ChannelCallback = Rc<RefCell<dyn FnMut(&Event, &Scene)>>;

struct Subscription {
    id: SubscriptionId,
    channel: String,
    callback: ChannelCallback,
}

/// Synchronous publish/subscribe channel
#[derive(Default)]
pub struct EventBus {
    receivers: RefCell<Vec<(ReceiverId, Weak<RefCell<dyn EventReceiver>>)>>,
    subscriptions: RefCell<Vec<Subscription>>,
    next_id: Cell<u64>,
}

impl EventBus {
    /// Create a new bus, shared by the components it is injected into
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// Register a receiver; it stays registered until unregistered or dropped
    pub fn register<R: EventReceiver + 'static>(&self, receiver: &Rc<RefCell<R>>) -> ReceiverId {
        let receiver: Rc<RefCell<dyn EventReceiver>> = receiver.clone();
        let id = ReceiverId(self.next_id());
        self.receivers
            .borrow_mut()
            .push((id, Rc::downgrade(&receiver)));
        trace!(receiver = ?id, "Registered event receiver");
        id
    }

    /// Remove a receiver; returns false if it was not registered
    pub fn unregister(&self, id: ReceiverId) -> bool {
        let mut receivers = self.receivers.borrow_mut();
        let before = receivers.len();
        receivers.retain(|(receiver_id, _)| *receiver_id != id);
        before != receivers.len()
    }

    /// Subscribe a callback to a single channel, e.g. `"scene.object_added"`
    pub fn on<F>(&self, channel: &str, callback: F) -> SubscriptionId
    where
        F: FnMut(&Event, &Scene) + 'static,
    {
        let id = SubscriptionId(self.next_id());
        self.subscriptions.borrow_mut().push(Subscription {
            id,
            channel: channel.to_string(),
            callback: Rc::new(RefCell::new(callback)),
        });
        id
    }

    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|subscription| subscription.id != id);
        before != subscriptions.len()
    }

    /// Number of receivers still alive
    pub fn receiver_count(&self) -> usize {
        self.receivers
            .borrow()
            .iter()
            .filter(|(_, receiver)| receiver.strong_count() > 0)
            .count()
    }

    /// Deliver `event` to every receiver, then to the channel subscribers
    ///
    /// Receivers and subscribers are snapshotted first: registrations made
    /// while dispatching take effect from the next send. Returns how many
    /// receivers reported the event as handled.
    pub fn send(&self, event: &Event, scene: &Scene) -> usize {
        let receivers: Vec<_> = {
            let mut receivers = self.receivers.borrow_mut();
            receivers.retain(|(_, receiver)| receiver.strong_count() > 0);
            receivers
                .iter()
                .filter_map(|(id, receiver)| receiver.upgrade().map(|r| (*id, r)))
                .collect()
        };

        let mut handled = 0;
        for (id, receiver) in receivers {
            match receiver.try_borrow_mut() {
                Ok(mut receiver) => {
                    if receiver.on_event(event, scene) {
                        handled += 1;
                    }
                }
                Err(_) => {
                    warn!(receiver = ?id, "Skipping receiver already handling an event");
                }
            }
        }

        let channel = event.channel();
        let callbacks: Vec<_> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|subscription| subscription.channel == channel)
            .map(|subscription| (subscription.id, subscription.callback.clone()))
            .collect();

        for (id, callback) in callbacks {
            match callback.try_borrow_mut() {
                Ok(mut callback) => (*callback)(event, scene),
                Err(_) => {
                    warn!(subscription = ?id, "Skipping re-entrant channel callback");
                }
            }
        }

        trace!(channel = channel, handled = handled, "Dispatched event");
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
        handled: bool,
    }

    impl EventReceiver for Recorder {
        fn on_event(&mut self, _event: &Event, _scene: &Scene) -> bool {
            self.log.borrow_mut().push(self.name);
            self.handled
        }
    }

    fn recorder(
        name: &'static str,
        log: &Rc<RefCell<Vec<&'static str>>>,
        handled: bool,
    ) -> Rc<RefCell<Recorder>> {
        Rc::new(RefCell::new(Recorder {
            name,
            log: log.clone(),
            handled,
        }))
    }

    fn added() -> Event {
        Event::scene(SceneEventKind::ObjectAdded, ObjectRef::Scene)
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let bus = EventBus::new();
        let scene = Scene::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = recorder("first", &log, true);
        let second = recorder("second", &log, false);
        let third = recorder("third", &log, true);
        bus.register(&first);
        bus.register(&second);
        bus.register(&third);

        // Handled receivers do not stop propagation
        let handled = bus.send(&added(), &scene);
        assert_eq!(handled, 2);
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        let bus = EventBus::new();
        let scene = Scene::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let kept = recorder("kept", &log, false);
        let dropped = recorder("dropped", &log, false);
        bus.register(&kept);
        bus.register(&dropped);
        assert_eq!(bus.receiver_count(), 2);

        drop(dropped);
        bus.send(&added(), &scene);
        assert_eq!(*log.borrow(), vec!["kept"]);
        assert_eq!(bus.receiver_count(), 1);
    }

    #[test]
    fn test_unregister() {
        let bus = EventBus::new();
        let scene = Scene::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let receiver = recorder("r", &log, false);
        let id = bus.register(&receiver);
        assert!(bus.unregister(id));
        assert!(!bus.unregister(id));

        bus.send(&added(), &scene);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_channel_subscription_filters_by_name() {
        let bus = EventBus::new();
        let scene = Scene::new();
        let seen = Rc::new(Cell::new(0));

        let counter = seen.clone();
        let id = bus.on("gui.layout_changed", move |event, _| {
            assert_eq!(event.channel(), "gui.layout_changed");
            counter.set(counter.get() + 1);
        });

        bus.send(&added(), &scene);
        bus.send(&Event::gui(GuiEventKind::LayoutChanged, None), &scene);
        assert_eq!(seen.get(), 1);

        assert!(bus.off(id));
        bus.send(&Event::gui(GuiEventKind::LayoutChanged, None), &scene);
        assert_eq!(seen.get(), 1);
    }

    struct SelfRemover {
        bus: Rc<EventBus>,
        id: Option<ReceiverId>,
        calls: usize,
    }

    impl EventReceiver for SelfRemover {
        fn on_event(&mut self, _event: &Event, _scene: &Scene) -> bool {
            self.calls += 1;
            if let Some(id) = self.id.take() {
                self.bus.unregister(id);
            }
            false
        }
    }

    #[test]
    fn test_unregister_during_dispatch_applies_to_next_send() {
        let bus = EventBus::new();
        let scene = Scene::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let remover = Rc::new(RefCell::new(SelfRemover {
            bus: bus.clone(),
            id: None,
            calls: 0,
        }));
        let id = bus.register(&remover);
        remover.borrow_mut().id = Some(id);
        let after = recorder("after", &log, false);
        bus.register(&after);

        bus.send(&added(), &scene);
        bus.send(&added(), &scene);

        assert_eq!(remover.borrow().calls, 1);
        assert_eq!(*log.borrow(), vec!["after", "after"]);
    }
}
