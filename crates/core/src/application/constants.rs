// Worker constants (ADR: No magic values)
use std::time::Duration;

/// Grace period between SIGTERM and SIGKILL for a cancelled or timed out job (5s)
pub const GRACEFUL_SHUTDOWN_TIMEOUT_MS: i64 = 5000;

/// How often a terminating child is polled for exit (100ms)
pub const KILL_POLL_INTERVAL: Duration = Duration::from_millis(100);
