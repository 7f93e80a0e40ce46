//! Clock helpers

use chrono::Utc;

/// Current time as epoch milliseconds, the unit every persisted timestamp
/// uses
#[must_use]
pub fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}
