// Panic isolation for event subscribers
use std::panic::{catch_unwind, UnwindSafe};
use tracing::error;

/// Result of a panic-guarded execution
#[derive(Debug, PartialEq, Eq)]
pub enum PanicGuardResult<T> {
    /// Execution completed
    Success(T),
    /// Execution panicked, with the recovered panic message
    Panicked(String),
}

impl<T> PanicGuardResult<T> {
    pub fn is_panicked(&self) -> bool {
        matches!(self, PanicGuardResult::Panicked(_))
    }
}

/// Execute a closure with panic isolation
///
/// A panic inside `f` is caught, logged under `context` and returned as
/// `PanicGuardResult::Panicked`, so one misbehaving handler cannot take down the
/// publisher or the handlers after it.
///
/// # Example
/// ```text
/// let result = execute_guarded("match-started", || panic!("boom"));
/// assert!(result.is_panicked());
/// ```
pub fn execute_guarded<F, T>(context: &str, f: F) -> PanicGuardResult<T>
where
    F: FnOnce() -> T + UnwindSafe,
{
    match catch_unwind(f) {
        Ok(result) => PanicGuardResult::Success(result),
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };

            error!(context = %context, panic_msg = %panic_msg, "Guarded handler panicked");
            PanicGuardResult::Panicked(panic_msg)
        }
    }
}
