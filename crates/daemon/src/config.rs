//! Daemon configuration from `LINEUP_*` environment variables
//!
//! Every setting has a default. Values that fail to parse fall back to the default and
//! leave a warning in `DaemonConfig::warnings`, which `main` logs once tracing is up.

use lineup_api_rpc::RpcServerConfig;
use lineup_core::application::constants::MATCH_EVENT_DEDUPE_WINDOW_MS;
use lineup_core::application::{LifecycleConfig, ManagerConfig, PrunePolicy, QueueDefaults};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub rpc: RpcServerConfig,
    pub manager: ManagerConfig,
    pub defaults: QueueDefaults,
    pub lifecycle: LifecycleConfig,
    pub gate_default_open: bool,
    pub log_format: LogFormat,
    /// Daily rolling log files are written here when set
    pub log_dir: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl DaemonConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map instead of the environment)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut reader = Reader {
            lookup,
            warnings: Vec::new(),
        };
        let defaults = RpcServerConfig::default();

        let host = reader
            .text("LINEUP_RPC_HOST")
            .unwrap_or(defaults.host);
        let port = reader.parsed("LINEUP_RPC_PORT", defaults.port);

        let default_queue = QueueDefaults::default();
        let capacity = reader.positive("LINEUP_DEFAULT_CAPACITY", default_queue.capacity);
        let first_queue_name = reader
            .text("LINEUP_FIRST_QUEUE_NAME")
            .unwrap_or(default_queue.first_queue_name);
        let prune_policy = reader.parsed("LINEUP_PRUNE_POLICY", PrunePolicy::default());
        let gate_default_open = reader.gate("LINEUP_GATE_DEFAULT", true);
        let pop_count = reader.positive("LINEUP_MATCH_POP_COUNT", capacity);
        let dedupe_window_ms =
            reader.parsed("LINEUP_MATCH_DEDUPE_MS", MATCH_EVENT_DEDUPE_WINDOW_MS);

        let log_format = match reader.text("LINEUP_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") | None => LogFormat::Pretty,
            Some(other) => {
                reader.warn("LINEUP_LOG_FORMAT", other);
                LogFormat::Pretty
            }
        };
        let log_dir = reader
            .text("LINEUP_LOG_DIR")
            .map(|dir| PathBuf::from(shellexpand::tilde(&dir).into_owned()));

        let defaults = QueueDefaults {
            first_queue_name,
            capacity,
        };
        Self {
            rpc: RpcServerConfig { host, port },
            manager: ManagerConfig {
                prune_policy,
                default_capacity: capacity,
            },
            lifecycle: LifecycleConfig {
                defaults: defaults.clone(),
                pop_count,
                dedupe_window_ms,
            },
            defaults,
            gate_default_open,
            log_format,
            log_dir,
            warnings: reader.warnings,
        }
    }
}

struct Reader<F> {
    lookup: F,
    warnings: Vec<String>,
}

impl<F> Reader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Trimmed, non-empty value
    fn text(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn parsed<T: FromStr>(&mut self, key: &str, default: T) -> T {
        match self.text(key) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                self.warn(key, &raw);
                default
            }),
            None => default,
        }
    }

    fn positive(&mut self, key: &str, default: usize) -> usize {
        match self.parsed(key, default) {
            0 => {
                self.warn(key, "0");
                default
            }
            value => value,
        }
    }

    fn gate(&mut self, key: &str, default: bool) -> bool {
        match self.text(key).map(|raw| raw.to_ascii_lowercase()).as_deref() {
            Some("open") | Some("true") => true,
            Some("closed") | Some("false") => false,
            Some(other) => {
                self.warn(key, other);
                default
            }
            None => default,
        }
    }

    fn warn(&mut self, key: &str, raw: &str) {
        self.warnings
            .push(format!("{}={:?} is invalid, using the default", key, raw));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> DaemonConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DaemonConfig::from_lookup(move |key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = config(&[]);

        assert_eq!(config.rpc.host, "127.0.0.1");
        assert_eq!(config.rpc.port, 9630);
        assert_eq!(config.defaults.capacity, 5);
        assert_eq!(config.defaults.first_queue_name, "Queue #1");
        assert_eq!(config.manager.prune_policy, PrunePolicy::KeepFirst);
        assert_eq!(config.lifecycle.pop_count, 5);
        assert_eq!(config.lifecycle.dedupe_window_ms, 3_000);
        assert!(config.gate_default_open);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.log_dir.is_none());
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = config(&[
            ("LINEUP_RPC_PORT", "7000"),
            ("LINEUP_DEFAULT_CAPACITY", "10"),
            ("LINEUP_FIRST_QUEUE_NAME", "Lobby"),
            ("LINEUP_PRUNE_POLICY", "remove-all"),
            ("LINEUP_GATE_DEFAULT", "closed"),
            ("LINEUP_LOG_FORMAT", "json"),
            ("LINEUP_LOG_DIR", "/var/log/lineup"),
        ]);

        assert_eq!(config.rpc.port, 7000);
        assert_eq!(config.manager.default_capacity, 10);
        assert_eq!(config.lifecycle.defaults.first_queue_name, "Lobby");
        // Pop count follows the capacity unless set explicitly
        assert_eq!(config.lifecycle.pop_count, 10);
        assert_eq!(config.manager.prune_policy, PrunePolicy::RemoveAll);
        assert!(!config.gate_default_open);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/lineup")));
    }

    #[test]
    fn test_invalid_values_fall_back_with_warnings() {
        let config = config(&[
            ("LINEUP_RPC_PORT", "not-a-port"),
            ("LINEUP_DEFAULT_CAPACITY", "0"),
            ("LINEUP_PRUNE_POLICY", "sometimes"),
            ("LINEUP_GATE_DEFAULT", "maybe"),
        ]);

        assert_eq!(config.rpc.port, 9630);
        assert_eq!(config.defaults.capacity, 5);
        assert_eq!(config.manager.prune_policy, PrunePolicy::KeepFirst);
        assert!(config.gate_default_open);
        assert_eq!(config.warnings.len(), 4);
    }

    #[test]
    fn test_log_dir_expands_tilde() {
        let config = config(&[("LINEUP_LOG_DIR", "~/lineup-logs")]);
        let dir = config.log_dir.unwrap();
        assert!(dir.ends_with("lineup-logs"));
    }
}
