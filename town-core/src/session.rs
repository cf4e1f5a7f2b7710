//! Opaque client session handles.

use arcstr::ArcStr;

use crate::ids::generate_opaque_id;
use crate::player::PlayerId;

/// Opaque, unguessable session token. Compared by exact equality only.
pub type SessionToken = ArcStr;

/// A session binds one player to one town for the lifetime of a client connection.
/// Created by [`crate::controller::TownController::add_player`], destroyed by
/// `destroy_session` or `disconnect_all_players`.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: SessionToken,
    pub player_id: PlayerId,
    pub town_id: ArcStr,
    /// Whatever the media-token broker returned for this player, opaque to the core.
    pub media_token: String,
}

impl Session {
    pub fn new(player_id: PlayerId, town_id: ArcStr, media_token: String) -> Self {
        Self {
            token: generate_opaque_id(),
            player_id,
            town_id,
            media_token,
        }
    }
}
