use chrono::{DateTime, Utc};

/// Current wall-clock time in UTC.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Milliseconds elapsed between `since` and now, saturating at zero when the
/// clock went backwards.
pub fn elapsed_millis(since: DateTime<Utc>) -> i64 {
    (now_utc() - since).num_milliseconds().max(0)
}
