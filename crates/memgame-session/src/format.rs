//! Display formatting shared with the views.
//!
//! Views render these strings verbatim, so the exact output is part of the
//! public contract.

use chrono::{DateTime, Local};

fn local(millis: i64) -> DateTime<Local> {
    DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .with_timezone(&Local)
}

/// `DD/MM/YYYY` in local time.
pub fn format_date_simple(millis: i64) -> String {
    local(millis).format("%d/%m/%Y").to_string()
}

/// `YYYY-MM-DD HH:MM:SS` (24 h, zero-padded) in local time. This is the
/// layout the save endpoint expects.
pub fn format_timestamp(millis: i64) -> String {
    local(millis).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Decimal seconds: whole seconds, a dot, then the remaining milliseconds
/// padded to three digits. `1234` → `"1.234"`.
pub fn format_timer(millis: u64) -> String {
    format!("{}.{:03}", millis / 1000, millis % 1000)
}
