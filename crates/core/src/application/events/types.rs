// Domain events published on the bus

use super::Event;
use crate::domain::ScopeKey;
use serde::{Deserialize, Serialize};

/// A match began for the scope; its first queue is about to be drafted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStarted {
    pub scope: ScopeKey,
    pub match_id: String,
}

/// The scope's match ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFinished {
    pub scope: ScopeKey,
    pub match_id: String,
}

impl Event for MatchStarted {
    const NAME: &'static str = "match_started";
}

impl Event for MatchFinished {
    const NAME: &'static str = "match_finished";
}
