//! Authoritative in-memory session core for a multiplayer virtual-town server.
//!
//! A [`controller::TownController`] owns one town's players, sessions and
//! conversation areas and fans out mutation events to listeners synchronously.
//! A [`registry::TownRegistry`] multiplexes controllers by town id for a whole
//! process. Transport, REST, persistence, and the real media-token provider are
//! all adapters that sit outside this crate.

pub mod broker;
pub mod controller;
pub mod conversation_area;
pub mod geometry;
pub mod ids;
pub mod listener;
pub mod location;
pub mod player;
pub mod registry;
pub mod session;

pub use broker::{BrokerError, TownTokenBroker};
pub use controller::{TownController, TownId};
pub use conversation_area::{AreaLabel, ConversationArea, NewConversationArea};
pub use geometry::BoundingBox;
pub use listener::{ListenerSet, TownEvent, TownListener};
pub use location::{Location, Rotation};
pub use player::{Player, PlayerId};
pub use registry::{TownListing, TownRegistry};
pub use session::{Session, SessionToken};
