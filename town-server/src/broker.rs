//! A stand-in media-token broker. A real deployment would call out to an external
//! provider's API; this crate only needs to demonstrate the seam.

use town_core::ids::generate_opaque_id;
use town_core::{BrokerError, TownTokenBroker};

/// Always succeeds, returning a freshly generated opaque string in place of a real
/// provider's credential.
pub struct StubTokenBroker;

impl TownTokenBroker for StubTokenBroker {
    fn get_token(&self, _town_id: &str, _player_id: &str) -> Result<String, BrokerError> {
        Ok(generate_opaque_id().to_string())
    }
}
