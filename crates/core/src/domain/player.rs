// Player Domain Model

use serde::{Deserialize, Serialize};

/// Player identity (opaque, supplied by the caller)
pub type PlayerId = String;

/// An admitted participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Presentation only, never used for identity
    pub display_name: String,
    pub joined_at: i64, // epoch ms
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, display_name: impl Into<String>, joined_at: i64) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            joined_at,
        }
    }
}
