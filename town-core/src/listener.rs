//! Subscription and synchronous fan-out of town mutation events.

use std::sync::Arc;

use crate::conversation_area::ConversationArea;
use crate::player::Player;

/// A lifecycle event fanned out to every subscribed listener after a mutation
/// commits. Events carry a snapshot of the affected player or area, not a live
/// handle, so listeners can't accidentally alias controller-owned state.
#[derive(Debug, Clone, PartialEq)]
pub enum TownEvent {
    /// Fired once, after a successful `add_player`.
    PlayerJoined(Player),
    /// Fired once, after `destroy_session` removes a player.
    PlayerDisconnected(Player),
    /// Fired once per `update_player_location` call, including no-op movements,
    /// always after any area events it produced.
    PlayerMoved(Player),
    /// Fired whenever an area's occupant list changes and the area still exists.
    ConversationAreaUpdated(ConversationArea),
    /// Fired when an area's occupant count drops to zero and it is removed.
    ConversationAreaDestroyed(ConversationArea),
    /// Fired exactly once per controller, during `disconnect_all_players`.
    TownDestroyed,
}

/// Receives [`TownEvent`]s for one town. Implementations must not call back into the
/// controller that invoked them — the controller does not defend against reentrancy.
pub trait TownListener: Send + Sync {
    fn on_event(&self, event: &TownEvent);
}

/// A deduplicated set of listener subscriptions, fanned out to synchronously and in
/// registration order. Add/remove are idempotent by identity (`Arc` pointer).
#[derive(Default)]
pub struct ListenerSet {
    listeners: Vec<Arc<dyn TownListener>>,
}

impl ListenerSet {

    pub fn new() -> Self {
        Self { listeners: Vec::new() }
    }

    /// Add a listener, ignoring the call if an identical `Arc` is already present.
    pub fn add(&mut self, listener: Arc<dyn TownListener>) {
        if !self.listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            self.listeners.push(listener);
        }
    }

    /// Remove a listener by identity. A listener removed here will not observe any
    /// mutation whose fan-out has not yet begun.
    pub fn remove(&mut self, listener: &Arc<dyn TownListener>) {
        self.listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// Fan out one event to every currently subscribed listener, in registration
    /// order.
    pub fn dispatch(&self, event: &TownEvent) {
        for listener in &self.listeners {
            listener.on_event(event);
        }
    }

}

#[cfg(test)]
mod tests {

    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingListener(AtomicUsize);

    impl TownListener for CountingListener {
        fn on_event(&self, _event: &TownEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn add_is_idempotent_by_identity() {
        let mut set = ListenerSet::new();
        let listener: Arc<dyn TownListener> = Arc::new(CountingListener(AtomicUsize::new(0)));
        set.add(listener.clone());
        set.add(listener.clone());
        assert_eq!(set.listeners.len(), 1);
    }

    #[test]
    fn removed_listener_does_not_see_future_events() {
        let mut set = ListenerSet::new();
        let listener = Arc::new(CountingListener(AtomicUsize::new(0)));
        let dyn_listener: Arc<dyn TownListener> = listener.clone();
        set.add(dyn_listener.clone());
        set.dispatch(&TownEvent::TownDestroyed);
        set.remove(&dyn_listener);
        set.dispatch(&TownEvent::TownDestroyed);
        assert_eq!(listener.0.load(Ordering::SeqCst), 1);
    }

}
