//! Platform abstraction layer
//!
//! Wall-clock access for the session convenience API. The engine itself
//! never calls this; it only sees caller-supplied timestamps.

/// Current time in Unix milliseconds (browser clock)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Current time in Unix milliseconds (system clock)
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
