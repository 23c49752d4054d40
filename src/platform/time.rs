//! Wall-clock helpers for both targets

use chrono::{DateTime, SecondsFormat, Utc};

/// Current UTC time
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current time as an ISO-8601 string (millisecond precision, `Z` suffix)
pub fn now_iso() -> String {
    to_iso(now())
}

pub fn to_iso(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Milliseconds since the epoch, used to seed rounds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    now().timestamp_millis() as f64
}
