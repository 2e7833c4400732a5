pub mod types;

use chrono::Utc;

/// Current wall-clock time as integer milliseconds since the Unix epoch.
///
/// All timestamps in the pipeline are integer milliseconds; this is the
/// single place they are read from the clock.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
