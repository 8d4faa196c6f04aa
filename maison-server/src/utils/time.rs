//! Time helpers
//!
//! Timestamps are stored as RFC3339 strings (UTC, millisecond precision) so
//! that lexicographic comparison in queries matches chronological order.

use chrono::{SecondsFormat, Utc};

/// Current UTC time as a storage timestamp
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current UTC year (for order code minting)
pub fn current_year() -> i32 {
    use chrono::Datelike;
    Utc::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_timestamps_sort_lexicographically() {
        let a = now_rfc3339();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = now_rfc3339();
        assert!(a < b);
    }
}
