// Dispatcher constants (no magic values)
use std::time::Duration;

/// Minimum spacing between the end of one dispatch and the start of the next (5s)
pub const RATE_LIMIT_INTERVAL: Duration = Duration::from_millis(5000);
