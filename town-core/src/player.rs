//! Avatar identity tracked by a town controller.

use arcstr::ArcStr;

use crate::ids::generate_opaque_id;
use crate::location::Location;

/// Opaque, stable identifier for a player within a town.
pub type PlayerId = ArcStr;

/// A connected avatar. The controller is the sole mutator of a player's fields once
/// it has been added; `active_area` is a back-reference into the area the player's
/// id currently appears in the occupant list of, never an owning handle.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Stable id, generated once at construction.
    pub id: PlayerId,
    /// Display name chosen by the client.
    pub username: String,
    /// Current location on the town's plane.
    pub location: Location,
    /// Label of the conversation area this player currently occupies, if any.
    pub active_area: Option<ArcStr>,
}

impl Player {

    /// Construct a new player with a freshly generated id and no active area.
    pub fn new(username: impl Into<String>, location: Location) -> Self {
        Self {
            id: generate_opaque_id(),
            username: username.into(),
            location,
            active_area: None,
        }
    }

}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::location::Rotation;

    #[test]
    fn new_player_has_no_active_area() {
        let p = Player::new("alice", Location::new(0.0, 0.0, Rotation::Front, false));
        assert!(p.active_area.is_none());
    }

}
