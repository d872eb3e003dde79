use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub(crate) const REFRESH_OPEN: &str = "<em>Last refresh:";
pub(crate) const REFRESH_CLOSE: &str = "</em>";

/// Display string for `now`, e.g. `Saturday, October 17, 2026 14:05 (UTC+02:00)`.
pub fn refresh_timestamp(now: DateTime<Utc>, tz: Tz) -> String {
    let local = now.with_timezone(&tz);
    format!(
        "{} (UTC{})",
        local.format("%A, %B %-d, %Y %H:%M"),
        local.format("%:z")
    )
}

/// The first complete `<em>Last refresh: …</em>` element in `text`.
pub(crate) fn find_marker(text: &str) -> Option<&str> {
    let open = text.find(REFRESH_OPEN)?;
    let close = text[open..].find(REFRESH_CLOSE)? + REFRESH_CLOSE.len();
    Some(&text[open..open + close])
}

/// Replace the value of the first refresh marker. Documents without one are
/// returned as-is.
pub fn stamp(document: &str, display_timestamp: &str) -> String {
    let Some(open) = document.find(REFRESH_OPEN) else {
        return document.to_string();
    };
    let value_start = open + REFRESH_OPEN.len();
    let Some(close) = document[value_start..].find(REFRESH_CLOSE) else {
        return document.to_string();
    };
    let value_end = value_start + close;

    let mut out = String::with_capacity(document.len() + display_timestamp.len());
    out.push_str(&document[..value_start]);
    out.push(' ');
    out.push_str(display_timestamp);
    out.push_str(&document[value_end..]);
    out
}
