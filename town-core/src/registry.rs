//! Process-wide directory multiplexing town controllers by town id.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use arcstr::ArcStr;
use tracing::{info, instrument};

use crate::broker::TownTokenBroker;
use crate::controller::{TownController, TownId};
use crate::ids::generate_opaque_id;

/// A registry entry: the controller plus the bookkeeping the registry itself owns
/// (the controller has no notion of a display cap on itself).
struct TownEntry {
    controller: Arc<TownController>,
    max_occupancy: usize,
}

/// One row of [`TownRegistry::list_towns`].
#[derive(Debug, Clone, PartialEq)]
pub struct TownListing {
    pub town_id: TownId,
    pub friendly_name: String,
    pub current_occupancy: usize,
    pub max_occupancy: usize,
}

/// Process-wide directory of active town controllers. Prefer one explicit instance
/// shared by all adapters over a language-enforced singleton.
pub struct TownRegistry {
    towns: Mutex<HashMap<TownId, TownEntry>>,
    broker: Arc<dyn TownTokenBroker>,
}

impl TownRegistry {

    pub fn new(broker: Arc<dyn TownTokenBroker>) -> Self {
        Self { towns: Mutex::new(HashMap::new()), broker }
    }

    /// Create and register a new town, returning its controller and the freshly
    /// generated update password (never stored anywhere outside the controller
    /// itself — the caller must relay it to whoever asked to create the town).
    #[instrument(skip(self))]
    pub fn create_town(&self, friendly_name: String, is_publicly_listed: bool, max_occupancy: usize) -> (Arc<TownController>, ArcStr) {
        let town_id = generate_opaque_id();
        let password = generate_opaque_id();

        let controller = TownController::new(
            town_id.clone(),
            friendly_name,
            is_publicly_listed,
            password.clone(),
            self.broker.clone(),
        );

        self.towns.lock().unwrap_or_else(|p| p.into_inner()).insert(
            town_id,
            TownEntry { controller: controller.clone(), max_occupancy },
        );

        info!(town = %controller.id(), "town created");
        (controller, password)
    }

    /// O(1): `ArcStr`'s `Hash`/`Borrow<str>` impls are defined to agree with `str`'s,
    /// so a `HashMap<TownId, _>` can be queried directly with a `&str` key.
    pub fn get_controller_for_town(&self, town_id: &str) -> Option<Arc<TownController>> {
        self.towns.lock().unwrap_or_else(|p| p.into_inner())
            .get(town_id)
            .map(|entry| entry.controller.clone())
    }

    /// Every known town id, public or private. For adapter-side bookkeeping (e.g.
    /// resolving a session token back to its town) — never exposed to clients
    /// directly, unlike [`TownRegistry::list_towns`].
    pub fn town_ids(&self) -> Vec<TownId> {
        self.towns.lock().unwrap_or_else(|p| p.into_inner()).keys().cloned().collect()
    }

    /// Snapshot of every publicly-listed town. Private towns are never returned.
    pub fn list_towns(&self) -> Vec<TownListing> {
        self.towns.lock().unwrap_or_else(|p| p.into_inner())
            .values()
            .filter(|entry| entry.controller.is_publicly_listed())
            .map(|entry| TownListing {
                town_id: entry.controller.id().clone(),
                friendly_name: entry.controller.friendly_name(),
                current_occupancy: entry.controller.occupancy(),
                max_occupancy: entry.max_occupancy,
            })
            .collect()
    }

    /// Update a town's friendly name and/or public-listing flag, authenticated by
    /// its update password.
    pub fn update_town(
        &self,
        town_id: &str,
        password: &str,
        new_friendly_name: Option<String>,
        new_is_public: Option<bool>,
    ) -> bool {
        match self.get_controller_for_town(town_id) {
            Some(controller) => controller.update_town(password, new_friendly_name, new_is_public),
            None => false,
        }
    }

    /// Delete a town, authenticated by its update password. Disconnects every
    /// player first so listeners observe `TownDestroyed` before the town
    /// disappears from the registry.
    #[instrument(skip(self, password))]
    pub fn delete_town(&self, town_id: &str, password: &str) -> bool {
        let mut towns = self.towns.lock().unwrap_or_else(|p| p.into_inner());

        let Some(entry) = towns.get(town_id) else { return false };
        if !entry.controller.check_password(password) {
            return false;
        }
        let controller = entry.controller.clone();

        controller.disconnect_all_players();
        towns.remove(town_id);

        info!(town = %town_id, "town deleted");
        true
    }

}

#[cfg(test)]
mod tests {

    use crate::broker::BrokerError;
    use crate::player::Player;
    use crate::location::{Location, Rotation};

    use super::*;

    struct StubBroker;

    impl TownTokenBroker for StubBroker {
        fn get_token(&self, _town_id: &str, _player_id: &str) -> Result<String, BrokerError> {
            Ok("token".to_string())
        }
    }

    fn registry() -> TownRegistry {
        TownRegistry::new(Arc::new(StubBroker))
    }

    #[test]
    fn create_then_lookup_round_trips() {
        let reg = registry();
        let (controller, _password) = reg.create_town("My Town".into(), true, 50);
        let found = reg.get_controller_for_town(controller.id()).unwrap();
        assert_eq!(found.id(), controller.id());
    }

    #[test]
    fn list_towns_only_returns_public_ones() {
        let reg = registry();
        let (public_town, _) = reg.create_town("Public".into(), true, 10);
        let (_private_town, _) = reg.create_town("Private".into(), false, 10);

        let listings = reg.list_towns();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].town_id, *public_town.id());
    }

    #[test]
    fn list_towns_reports_live_occupancy() {
        let reg = registry();
        let (controller, _) = reg.create_town("Public".into(), true, 10);
        controller.add_player(Player::new("p", Location::new(0.0, 0.0, Rotation::Front, false))).unwrap();

        let listings = reg.list_towns();
        assert_eq!(listings[0].current_occupancy, 1);
        assert_eq!(listings[0].max_occupancy, 10);
    }

    #[test]
    fn update_town_requires_correct_password() {
        let reg = registry();
        let (controller, password) = reg.create_town("Old Name".into(), true, 10);
        assert!(!reg.update_town(controller.id(), "wrong", Some("New Name".into()), None));
        assert!(reg.update_town(controller.id(), &password, Some("New Name".into()), None));
        assert_eq!(controller.friendly_name(), "New Name");
    }

    #[test]
    fn delete_town_requires_password_and_removes_it() {
        let reg = registry();
        let (controller, password) = reg.create_town("Doomed".into(), true, 10);
        let town_id = controller.id().clone();

        assert!(!reg.delete_town(&town_id, "wrong"));
        assert!(reg.get_controller_for_town(&town_id).is_some());

        assert!(reg.delete_town(&town_id, &password));
        assert!(reg.get_controller_for_town(&town_id).is_none());
    }

    #[test]
    fn deleting_unknown_town_is_false() {
        let reg = registry();
        assert!(!reg.delete_town("no-such-town", "whatever"));
    }

    #[test]
    fn town_ids_includes_private_towns() {
        let reg = registry();
        let (public_town, _) = reg.create_town("Public".into(), true, 10);
        let (private_town, _) = reg.create_town("Private".into(), false, 10);

        let ids = reg.town_ids();
        assert!(ids.contains(public_town.id()));
        assert!(ids.contains(private_town.id()));
    }

}
