//! Avatar location and facing.

use arcstr::ArcStr;

/// The four facing directions an avatar's sprite can render as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Front,
    Back,
    Left,
    Right,
}

/// A player's position on the town's 2D plane, plus the client-asserted conversation
/// area membership hint carried alongside movement updates.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub rotation: Rotation,
    pub moving: bool,
    /// The label of the conversation area the client believes it is in, if any. This
    /// is trusted over pure geometry when it names a real area; see
    /// [`crate::controller::TownController::update_player_location`].
    pub conversation_label: Option<ArcStr>,
}

impl Location {
    pub fn new(x: f64, y: f64, rotation: Rotation, moving: bool) -> Self {
        Self { x, y, rotation, moving, conversation_label: None }
    }

    pub fn with_conversation_label(mut self, label: impl Into<ArcStr>) -> Self {
        self.conversation_label = Some(label.into());
        self
    }
}
