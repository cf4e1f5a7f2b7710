//! The authoritative per-town state machine: players, sessions, conversation areas,
//! and the fan-out of mutation events to subscribed listeners.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use arcstr::ArcStr;
use tracing::{debug, info, instrument, warn};

use crate::broker::{BrokerError, TownTokenBroker};
use crate::conversation_area::{AreaLabel, ConversationArea, NewConversationArea};
use crate::listener::{ListenerSet, TownEvent, TownListener};
use crate::location::Location;
use crate::player::{Player, PlayerId};
use crate::session::{Session, SessionToken};

/// Opaque, process-unique town identifier.
pub type TownId = ArcStr;

/// The mutable state guarded by the controller's single coarse mutex. A public
/// method holds this lock for its entire duration, including listener fan-out, so
/// that one mutation's events always complete before the next mutation starts.
struct ControllerState {
    friendly_name: String,
    is_publicly_listed: bool,
    update_password: ArcStr,
    players: HashMap<PlayerId, Player>,
    sessions: HashMap<SessionToken, Session>,
    areas: HashMap<AreaLabel, ConversationArea>,
    listeners: ListenerSet,
}

/// Authoritative state machine for one town. Cheap to clone via `Arc` since all
/// mutable state lives behind the inner mutex; the registry and every adapter share
/// one instance per town.
pub struct TownController {
    id: TownId,
    broker: Arc<dyn TownTokenBroker>,
    state: Mutex<ControllerState>,
    /// Set once by `disconnect_all_players`. Checked by `add_player` after its
    /// suspension point so a town deleted mid-join fails the join instead of
    /// resurrecting state.
    torn_down: AtomicBool,
}

impl TownController {

    pub fn new(
        id: TownId,
        friendly_name: String,
        is_publicly_listed: bool,
        update_password: ArcStr,
        broker: Arc<dyn TownTokenBroker>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            broker,
            state: Mutex::new(ControllerState {
                friendly_name,
                is_publicly_listed,
                update_password,
                players: HashMap::new(),
                sessions: HashMap::new(),
                areas: HashMap::new(),
                listeners: ListenerSet::new(),
            }),
            torn_down: AtomicBool::new(false),
        })
    }

    pub fn id(&self) -> &TownId {
        &self.id
    }

    pub fn friendly_name(&self) -> String {
        self.lock_state().friendly_name.clone()
    }

    pub fn is_publicly_listed(&self) -> bool {
        self.lock_state().is_publicly_listed
    }

    /// Number of players currently connected, used by the registry's town listing.
    pub fn occupancy(&self) -> usize {
        self.lock_state().players.len()
    }

    pub fn add_listener(&self, listener: Arc<dyn TownListener>) {
        self.lock_state().listeners.add(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn TownListener>) {
        self.lock_state().listeners.remove(listener);
    }

    /// Snapshot of every player currently in the town, e.g. for a joining client's
    /// initial state.
    pub fn players(&self) -> Vec<Player> {
        self.lock_state().players.values().cloned().collect()
    }

    /// Snapshot of every live conversation area.
    pub fn conversation_areas(&self) -> Vec<ConversationArea> {
        self.lock_state().areas.values().cloned().collect()
    }

    pub fn get_session_by_token(&self, token: &SessionToken) -> Option<Session> {
        self.lock_state().sessions.get(token).cloned()
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Request a media token for `player`, then add it and its session to the town,
    /// emitting `PlayerJoined`. The broker call is made with the controller lock
    /// released; if the town is torn down while it is in flight, the join fails and
    /// no state changes.
    #[instrument(skip(self, player), fields(town = %self.id, player = %player.id))]
    pub fn add_player(&self, player: Player) -> Result<Session, BrokerError> {

        if self.torn_down.load(Ordering::Acquire) {
            return Err(BrokerError::Unavailable("town no longer exists".into()));
        }

        let media_token = self.broker.get_token(&self.id, &player.id)?;

        let mut state = self.lock_state();

        // Re-check under the lock: `disconnect_all_players` sets this flag in the
        // same critical section where it clears state, so holding `state` here
        // makes this check atomic with respect to a concurrent teardown.
        if self.torn_down.load(Ordering::Acquire) {
            return Err(BrokerError::Unavailable("town was deleted while joining".into()));
        }

        let session = Session::new(player.id.clone(), self.id.clone(), media_token);
        state.sessions.insert(session.token.clone(), session.clone());
        state.players.insert(player.id.clone(), player.clone());
        state.listeners.dispatch(&TownEvent::PlayerJoined(player));

        info!("player joined");
        Ok(session)
    }

    /// Destroy a session, evicting its player from any active conversation area and
    /// removing it from the town. A no-op if the token is unknown.
    #[instrument(skip(self, token), fields(town = %self.id))]
    pub fn destroy_session(&self, token: &SessionToken) {
        let mut state = self.lock_state();

        let Some(session) = state.sessions.remove(token) else {
            debug!("destroy_session called with unknown token");
            return;
        };

        let area_event = Self::reconcile_membership(&mut state, &session.player_id, None);

        let Some(player) = state.players.remove(&session.player_id) else {
            warn!("session referenced a player missing from the player set");
            return;
        };

        for event in area_event {
            state.listeners.dispatch(&event);
        }
        state.listeners.dispatch(&TownEvent::PlayerDisconnected(player));
    }

    /// Tear down the town: emit `TownDestroyed` once, then drop every player,
    /// session, and area. No further events are emitted for any prior mutation.
    #[instrument(skip(self), fields(town = %self.id))]
    pub fn disconnect_all_players(&self) {
        let mut state = self.lock_state();
        state.listeners.dispatch(&TownEvent::TownDestroyed);
        state.players.clear();
        state.sessions.clear();
        state.areas.clear();
        // Set while still holding `state`, so a concurrent `add_player`'s re-check
        // under the same lock can never observe "not torn down" after this point.
        self.torn_down.store(true, Ordering::Release);
    }

    /// Accept or reject a new conversation area. On acceptance, admits every player
    /// already standing inside its bounds with no current active area, and emits
    /// exactly one `ConversationAreaUpdated`.
    #[instrument(skip(self, new_area), fields(town = %self.id, label = %new_area.label))]
    pub fn add_conversation_area(&self, new_area: NewConversationArea) -> bool {
        if new_area.label.trim().is_empty() || new_area.topic.trim().is_empty() {
            return false;
        }

        let mut state = self.lock_state();

        if state.areas.contains_key(&new_area.label) {
            return false;
        }
        if state.areas.values().any(|existing| existing.bounds.overlaps(&new_area.bounds)) {
            return false;
        }

        let mut area = ConversationArea {
            label: new_area.label,
            topic: new_area.topic,
            bounds: new_area.bounds,
            occupants: Vec::new(),
        };

        for player in state.players.values_mut() {
            if player.active_area.is_none() && area.bounds.contains(player.location.x, player.location.y) {
                area.occupants.push(player.id.clone());
                player.active_area = Some(area.label.clone());
            }
        }

        state.areas.insert(area.label.clone(), area.clone());
        state.listeners.dispatch(&TownEvent::ConversationAreaUpdated(area));

        true
    }

    /// The center of the state machine: commit a player's new location, reconcile
    /// its conversation-area membership against the client-asserted label (trusted
    /// over geometry once it names a real area, only vetoed when the label is
    /// missing or the position plainly isn't inside it), and fan out at most two
    /// area events followed by exactly one `PlayerMoved`.
    ///
    /// A no-op if `player_id` is not currently in the town.
    #[instrument(skip(self, new_location), fields(town = %self.id, player = %player_id))]
    pub fn update_player_location(&self, player_id: &PlayerId, new_location: Location) {
        let mut state = self.lock_state();

        if !state.players.contains_key(player_id) {
            return;
        }

        // The client's asserted label is trusted whenever it names a real area,
        // regardless of whether the new position is actually inside that area's
        // bounds: geometry only matters to resolve a label that doesn't exist.
        let next_label = match &new_location.conversation_label {
            None => None,
            Some(label) if state.areas.contains_key(label) => Some(label.clone()),
            Some(_) => None,
        };

        state.players.get_mut(player_id).unwrap().location = new_location;

        for event in Self::reconcile_membership(&mut state, player_id, next_label) {
            state.listeners.dispatch(&event);
        }

        let moved = state.players.get(player_id).unwrap().clone();
        state.listeners.dispatch(&TownEvent::PlayerMoved(moved));
    }

    /// Update the town's friendly name and/or public-listing flag, after checking
    /// `password` against the town's update password.
    pub fn update_town(
        &self,
        password: &str,
        new_friendly_name: Option<String>,
        new_is_public: Option<bool>,
    ) -> bool {
        let mut state = self.lock_state();
        if state.update_password.as_str() != password {
            return false;
        }
        if let Some(name) = new_friendly_name {
            state.friendly_name = name;
        }
        if let Some(is_public) = new_is_public {
            state.is_publicly_listed = is_public;
        }
        true
    }

    /// Check `password` against the town's update password, without mutating
    /// anything. Used by the registry to authenticate deletion before tearing down.
    pub fn check_password(&self, password: &str) -> bool {
        self.lock_state().update_password.as_str() == password
    }

    /// Move `player_id` out of `prev` (if any) and into `next` (if any), mutating
    /// occupant lists and the player's `active_area`, and returning the area events
    /// this produces in emission order. Does not touch the player's location or
    /// emit `PlayerMoved`; callers own those per §4.5/§4.6.
    fn reconcile_membership(
        state: &mut ControllerState,
        player_id: &PlayerId,
        next: Option<AreaLabel>,
    ) -> Vec<TownEvent> {
        let prev = state.players.get(player_id).and_then(|p| p.active_area.clone());

        match (prev, next) {
            (None, None) => Vec::new(),

            (None, Some(next_label)) => {
                let area = state.areas.get_mut(&next_label)
                    .expect("next area must exist: resolved from a live area lookup");
                area.occupants.push(player_id.clone());
                let snapshot = area.clone();
                state.players.get_mut(player_id).unwrap().active_area = Some(next_label);
                vec![TownEvent::ConversationAreaUpdated(snapshot)]
            }

            (Some(prev_label), Some(next_label)) if prev_label == next_label => Vec::new(),

            (Some(prev_label), None) => {
                state.players.get_mut(player_id).unwrap().active_area = None;
                Self::remove_occupant(state, &prev_label, player_id)
            }

            (Some(prev_label), Some(next_label)) => {
                let mut events = Vec::with_capacity(2);

                let area = state.areas.get_mut(&next_label)
                    .expect("next area must exist: resolved from a live area lookup");
                area.occupants.push(player_id.clone());
                events.push(TownEvent::ConversationAreaUpdated(area.clone()));
                state.players.get_mut(player_id).unwrap().active_area = Some(next_label);

                events.extend(Self::remove_occupant(state, &prev_label, player_id));
                events
            }
        }
    }

    /// Remove `player_id` from area `label`'s occupant list, destroying the area if
    /// it is now empty. Returns the single resulting event.
    fn remove_occupant(state: &mut ControllerState, label: &AreaLabel, player_id: &PlayerId) -> Vec<TownEvent> {
        let area = state.areas.get_mut(label).expect("prev area must still exist");
        area.occupants.retain(|id| id != player_id);

        if area.occupants.is_empty() {
            let area = state.areas.remove(label).unwrap();
            vec![TownEvent::ConversationAreaDestroyed(area)]
        } else {
            vec![TownEvent::ConversationAreaUpdated(area.clone())]
        }
    }

}
