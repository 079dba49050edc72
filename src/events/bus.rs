// Event Bus - Fan-out of music events to gameplay and UI listeners
// Handlers run synchronously inside the emitting tick; channels decouple async consumers

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::types::{EventKind, MusicEvent};

/// Callback invoked for each matching event
pub type EventHandler = Box<dyn FnMut(&MusicEvent) + Send>;

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    /// None listens to every event
    kind: Option<EventKind>,
    once: bool,
    handler: EventHandler,
}

/// Synchronous publish/subscribe bus for `MusicEvent`s
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    channels: Vec<UnboundedSender<MusicEvent>>,
    next_id: u64,
    debug_mode: bool,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus {
            subscriptions: Vec::new(),
            channels: Vec::new(),
            next_id: 0,
            debug_mode: false,
        }
    }

    /// Log every emitted event at debug level
    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.debug_mode = enabled;
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Listen to every event
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&MusicEvent) + Send + 'static,
    {
        self.register(None, false, Box::new(handler))
    }

    /// Listen to one kind of event
    pub fn subscribe_to<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&MusicEvent) + Send + 'static,
    {
        self.register(Some(kind), false, Box::new(handler))
    }

    /// Listen to the next event of one kind, then drop the handler
    pub fn once<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&MusicEvent) + Send + 'static,
    {
        self.register(Some(kind), true, Box::new(handler))
    }

    /// Returns false when the id was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Remove every handler bound to `kind`. Catch-all handlers stay.
    pub fn clear(&mut self, kind: EventKind) {
        self.subscriptions.retain(|s| s.kind != Some(kind));
    }

    /// Remove every handler and close every channel
    pub fn clear_all(&mut self) {
        self.subscriptions.clear();
        self.channels.clear();
    }

    /// Receiver that gets a copy of every event. Closed receivers are pruned
    /// on the next emit.
    pub fn channel(&mut self) -> UnboundedReceiver<MusicEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.channels.push(tx);
        rx
    }

    /// Number of handlers that would see an event of `kind`
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.subscriptions
            .iter()
            .filter(|s| s.kind.map_or(true, |k| k == kind))
            .count()
    }

    pub fn emit(&mut self, event: MusicEvent) {
        if self.debug_mode {
            log::debug!("[EventBus] {:?}", event);
        }

        let kind = event.kind();
        let mut fired_once = Vec::new();

        for sub in self.subscriptions.iter_mut() {
            if sub.kind.map_or(true, |k| k == kind) {
                (sub.handler)(&event);
                if sub.once {
                    fired_once.push(sub.id);
                }
            }
        }

        if !fired_once.is_empty() {
            self.subscriptions.retain(|s| !fired_once.contains(&s.id));
        }

        self.channels.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn register(&mut self, kind: Option<EventKind>, once: bool, handler: EventHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kind, once, handler });
        id
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .field("channels", &self.channels.len())
            .field("debug_mode", &self.debug_mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<MusicEvent>>>, impl FnMut(&MusicEvent) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |e: &MusicEvent| sink.lock().unwrap().push(e.clone()))
    }

    #[test]
    fn test_subscribe_sees_everything() {
        let mut bus = EventBus::new();
        let (seen, handler) = recorder();
        bus.subscribe(handler);

        bus.emit(MusicEvent::Kick { time: 0.0 });
        bus.emit(MusicEvent::Bar { bar: 1 });

        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_subscribe_to_filters_by_kind() {
        let mut bus = EventBus::new();
        let (seen, handler) = recorder();
        bus.subscribe_to(EventKind::Snare, handler);

        bus.emit(MusicEvent::Kick { time: 0.0 });
        bus.emit(MusicEvent::Snare { time: 0.25 });

        let seen = seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[MusicEvent::Snare { time: 0.25 }]);
    }

    #[test]
    fn test_once_fires_a_single_time() {
        let mut bus = EventBus::new();
        let (seen, handler) = recorder();
        bus.once(EventKind::Bar, handler);

        bus.emit(MusicEvent::Bar { bar: 0 });
        bus.emit(MusicEvent::Bar { bar: 1 });

        assert_eq!(seen.lock().unwrap().as_slice(), &[MusicEvent::Bar { bar: 0 }]);
        assert_eq!(bus.listener_count(EventKind::Bar), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        let (seen, handler) = recorder();
        let id = bus.subscribe(handler);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(MusicEvent::Kick { time: 0.0 });
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_clear_kind_keeps_catch_all() {
        let mut bus = EventBus::new();
        let (all, all_handler) = recorder();
        let (kicks, kick_handler) = recorder();
        bus.subscribe(all_handler);
        bus.subscribe_to(EventKind::Kick, kick_handler);

        bus.clear(EventKind::Kick);
        bus.emit(MusicEvent::Kick { time: 0.0 });

        assert_eq!(all.lock().unwrap().len(), 1);
        assert!(kicks.lock().unwrap().is_empty());

        bus.clear_all();
        assert_eq!(bus.listener_count(EventKind::Kick), 0);
    }

    #[test]
    fn test_channel_receives_copies() {
        let mut bus = EventBus::new();
        let mut rx = bus.channel();

        bus.emit(MusicEvent::TempoChange { bpm: 140.0 });
        bus.emit(MusicEvent::Section { section: crate::arranger::Section::Drop });

        assert_eq!(rx.try_recv().unwrap(), MusicEvent::TempoChange { bpm: 140.0 });
        assert_eq!(rx.try_recv().unwrap().kind(), EventKind::Section);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_channel_is_pruned() {
        let mut bus = EventBus::new();
        let rx = bus.channel();
        drop(rx);

        bus.emit(MusicEvent::Kick { time: 0.0 });
        assert_eq!(format!("{:?}", bus), "EventBus { subscriptions: 0, channels: 0, debug_mode: false }");
    }
}
