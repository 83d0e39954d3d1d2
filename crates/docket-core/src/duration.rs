//! Human-readable elapsed-time rendering for processing durations.

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Render a millisecond duration as its two largest non-zero units,
/// most significant first: `"2d 5h"`, `"3h 12m"`, `"45s"`.
///
/// `None` (no recorded duration) renders as `"Not started"`; anything
/// under one second (including negative inputs, clamped) renders as `"0s"`.
#[must_use]
pub fn format_duration(ms: Option<i64>) -> String {
    let Some(ms) = ms else {
        return "Not started".to_string();
    };
    let ms = ms.max(0);

    let days = ms / MS_PER_DAY;
    let hours = (ms % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;

    let units = [
        (days, "d"),
        (hours, "h"),
        (minutes, "m"),
        (seconds, "s"),
    ];

    let rendered: Vec<String> = units
        .iter()
        .filter(|(value, _)| *value > 0)
        .take(2)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect();

    if rendered.is_empty() {
        "0s".to_string()
    } else {
        rendered.join(" ")
    }
}
