// Seed Service - synthetic players for demos and load checks

use crate::application::constants::{
    QueueDefaults, DEFAULT_MOCK_PREFIX, DEFAULT_SEED_COUNT, MAX_MOCK_PREFIX_LEN, MAX_SEED_COUNT,
};
use crate::application::queue_manager::QueueManager;
use crate::domain::{QueueError, QueueErrorKind};
use crate::error::{AppError, Result};
use crate::port::IdProvider;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a seed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub prefix: String,
    pub requested: usize,
    pub joined: usize,
    /// Queues in the scope once seeding finished
    pub queues: usize,
}

pub struct SeedService {
    manager: Arc<QueueManager>,
    id_provider: Arc<dyn IdProvider>,
    defaults: QueueDefaults,
}

impl SeedService {
    pub fn new(
        manager: Arc<QueueManager>,
        id_provider: Arc<dyn IdProvider>,
        defaults: QueueDefaults,
    ) -> Self {
        Self {
            manager,
            id_provider,
            defaults,
        }
    }

    /// Join `count` synthetic players (default 12) named after `prefix` (default "mock")
    ///
    /// Ids are `"{prefix}:{unique}"` so `clear` can find them again; display names are
    /// `"{prefix}-NN"`.
    pub fn seed(&self, scope: &str, count: Option<usize>, prefix: Option<&str>) -> Result<SeedReport> {
        let count = count.unwrap_or(DEFAULT_SEED_COUNT);
        let prefix = prefix.unwrap_or(DEFAULT_MOCK_PREFIX);
        validate_scope(scope)?;
        validate_prefix(prefix)?;
        if count == 0 || count > MAX_SEED_COUNT {
            return Err(AppError::Validation(format!(
                "count must be between 1 and {}, got {}",
                MAX_SEED_COUNT, count
            )));
        }

        self.manager.ensure_first_queue(
            scope,
            &self.defaults.first_queue_name,
            self.defaults.capacity,
        )?;

        let mut joined = 0;
        for n in 1..=count {
            let player_id = format!("{}:{}", prefix, self.id_provider.generate_id());
            let display_name = format!("{}-{:02}", prefix, n);
            match self
                .manager
                .join_any(scope, &player_id, &display_name, self.defaults.capacity)
            {
                Ok(_) => joined += 1,
                Err(e) if e.is(QueueErrorKind::AlreadyIn) => {
                    warn!(scope = %scope, player_id = %player_id, "Seed id collided, skipped");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let queues = self.manager.queues(scope).map_or(0, |queues| queues.len());
        info!(scope = %scope, prefix = %prefix, joined, queues, "Scope seeded");
        Ok(SeedReport {
            prefix: prefix.to_string(),
            requested: count,
            joined,
            queues,
        })
    }

    /// Remove every synthetic player carrying `prefix` (default "mock")
    ///
    /// A scope without queues has nothing to clear and reports zero.
    pub fn clear(&self, scope: &str, prefix: Option<&str>) -> Result<usize> {
        let prefix = prefix.unwrap_or(DEFAULT_MOCK_PREFIX);
        validate_scope(scope)?;
        validate_prefix(prefix)?;

        let marker = format!("{}:", prefix);
        let removed = match self
            .manager
            .remove_matching(scope, |player| player.id.starts_with(&marker))
        {
            Ok(removed) => removed,
            Err(QueueError::NotFound { .. }) => 0,
            Err(e) => return Err(e.into()),
        };

        info!(scope = %scope, prefix = %prefix, removed, "Synthetic players cleared");
        Ok(removed)
    }
}

fn validate_scope(scope: &str) -> Result<()> {
    if scope.trim().is_empty() {
        return Err(AppError::Validation("scope must not be empty".to_string()));
    }
    Ok(())
}

fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(AppError::Validation("prefix must not be empty".to_string()));
    }
    if prefix.len() > MAX_MOCK_PREFIX_LEN {
        return Err(AppError::Validation(format!(
            "prefix longer than {} characters",
            MAX_MOCK_PREFIX_LEN
        )));
    }
    if !prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::Validation(format!(
            "prefix '{}' may only contain letters, digits, '-' and '_'",
            prefix
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::id_provider::SequentialIdProvider;
    use crate::port::time_provider::ManualTimeProvider;

    fn service() -> (Arc<QueueManager>, SeedService) {
        let manager = Arc::new(QueueManager::new(Arc::new(ManualTimeProvider::new(0))));
        let service = SeedService::new(
            manager.clone(),
            Arc::new(SequentialIdProvider::default()),
            QueueDefaults::default(),
        );
        (manager, service)
    }

    #[test]
    fn test_seed_defaults_fill_overflow_queues() {
        let (manager, service) = service();

        let report = service.seed("chan", None, None).unwrap();

        assert_eq!(report.joined, 12);
        assert_eq!(report.queues, 3);
        assert_eq!(report.prefix, "mock");
        let queues = manager.queues("chan").unwrap();
        assert_eq!(queues[0].name, "Queue #1");
        assert_eq!(queues[0].players[0].id, "mock:1");
        assert_eq!(queues[0].players[0].display_name, "mock-01");
        assert_eq!(queues[2].players[1].display_name, "mock-12");
    }

    #[test]
    fn test_seed_validation() {
        let (manager, service) = service();

        for (count, prefix) in [
            (Some(0), None),
            (Some(MAX_SEED_COUNT + 1), None),
            (Some(3), Some("")),
            (Some(3), Some("bad prefix")),
            (Some(3), Some("bad:prefix")),
        ] {
            let err = service.seed("chan", count, prefix).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{:?}", err);
        }
        let long = "x".repeat(MAX_MOCK_PREFIX_LEN + 1);
        assert!(service.seed("chan", Some(1), Some(&long)).is_err());
        assert!(service.seed(" ", Some(1), None).is_err());

        assert_eq!(manager.stats().scopes, 0);
    }

    #[test]
    fn test_clear_removes_only_matching_prefix() {
        let (manager, service) = service();
        manager.join_any("chan", "real-1", "Real", 5).unwrap();
        service.seed("chan", Some(6), Some("bot")).unwrap();
        service.seed("chan", Some(2), None).unwrap();

        assert_eq!(service.clear("chan", Some("bot")).unwrap(), 6);

        let queues = manager.queues("chan").unwrap();
        assert_eq!(queues.len(), 1);
        assert_eq!(queues[0].len(), 3);
        assert_eq!(queues[0].players[0].id, "real-1");
        assert_eq!(service.clear("chan", None).unwrap(), 2);
    }

    #[test]
    fn test_clear_on_unknown_scope_reports_zero() {
        let (_, service) = service();
        assert_eq!(service.clear("nowhere", None).unwrap(), 0);
    }
}
