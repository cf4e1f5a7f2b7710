//! Rectangular zones where co-located avatars share a topic-labeled conversation.

use arcstr::ArcStr;

use crate::geometry::BoundingBox;
use crate::player::PlayerId;

/// Label uniquely identifying a conversation area within a town.
pub type AreaLabel = ArcStr;

/// A request to create a conversation area, before the controller has validated and
/// accepted it.
#[derive(Debug, Clone)]
pub struct NewConversationArea {
    pub label: AreaLabel,
    pub topic: String,
    pub bounds: BoundingBox,
}

impl NewConversationArea {
    pub fn new(label: impl Into<AreaLabel>, topic: impl Into<String>, bounds: BoundingBox) -> Self {
        Self { label: label.into(), topic: topic.into(), bounds }
    }
}

/// A live conversation area tracked by a [`crate::controller::TownController`]. Holds
/// occupant ids, not player handles, so that `Player` and `ConversationArea` don't
/// own each other.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationArea {
    /// Non-empty, unique within the town.
    pub label: AreaLabel,
    /// Non-empty topic string shown to clients.
    pub topic: String,
    /// Rectangle this area covers.
    pub bounds: BoundingBox,
    /// Ids of players currently inside, in join order.
    pub occupants: Vec<PlayerId>,
}
