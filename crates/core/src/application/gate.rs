// Admission gate - per-scope open/closed flag consulted before joins

use crate::domain::ScopeKey;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::info;

/// Whether joins are accepted, per scope
///
/// Scopes that were never set report the configured default.
#[derive(Debug)]
pub struct ScopeGate {
    states: RwLock<HashMap<ScopeKey, bool>>,
    default_open: bool,
}

impl ScopeGate {
    pub fn new(default_open: bool) -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
            default_open,
        }
    }

    pub fn is_open(&self, scope: &str) -> bool {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(scope)
            .copied()
            .unwrap_or(self.default_open)
    }

    /// Record the scope's state, returning the previous one
    pub fn set(&self, scope: &str, open: bool) -> bool {
        let previous = self
            .states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(scope.to_string(), open)
            .unwrap_or(self.default_open);

        if previous != open {
            info!(scope = %scope, open, "Gate changed");
        }
        previous
    }
}

impl Default for ScopeGate {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_scope_reports_default() {
        assert!(ScopeGate::new(true).is_open("chan"));
        assert!(!ScopeGate::new(false).is_open("chan"));
    }

    #[test]
    fn test_set_returns_previous_state() {
        let gate = ScopeGate::new(false);

        assert!(!gate.set("chan", true));
        assert!(gate.is_open("chan"));
        assert!(gate.set("chan", false));
        assert!(!gate.is_open("chan"));
        assert!(!gate.is_open("other"));
    }
}
