//! Opt-in per-command timing collection.
//!
//! Enabled by the `--timing` flag or the `DOCKET_TIMING` env var; samples
//! are thread-local and drained into a [`TimingReport`] at command exit.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde_json::json;

thread_local! {
    static SAMPLES: RefCell<Vec<(String, Duration)>> = const { RefCell::new(Vec::new()) };
}

static TIMING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Returns true when `DOCKET_TIMING` enables timing collection.
///
/// Supported truthy values: `1`, `true`, `yes`, `on` (case-insensitive).
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var("DOCKET_TIMING")
        .ok()
        .is_some_and(|value| is_truthy(value.as_str()))
}

/// Enable or disable timing collection.
pub fn set_timing_enabled(enabled: bool) {
    TIMING_ENABLED.store(enabled, Ordering::Relaxed);
    if !enabled {
        clear_timings();
    }
}

/// Returns true when timing collection is currently enabled.
#[must_use]
pub fn is_timing_enabled() -> bool {
    TIMING_ENABLED.load(Ordering::Relaxed)
}

/// Clears all recorded timings for the current thread.
pub fn clear_timings() {
    SAMPLES.with(|samples| samples.borrow_mut().clear());
}

/// Execute a closure while recording its duration.
///
/// Timing is recorded only when enabled via [`set_timing_enabled`].
pub fn timed<R>(name: &str, f: impl FnOnce() -> R) -> R {
    if !is_timing_enabled() {
        return f();
    }

    let started = Instant::now();
    let result = f();
    let elapsed = started.elapsed();
    SAMPLES.with(|samples| samples.borrow_mut().push((name.to_string(), elapsed)));
    result
}

/// Timing statistics for a single named operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpTiming {
    pub name: String,
    pub count: usize,
    pub total: Duration,
    pub mean: Duration,
    pub max: Duration,
}

/// Aggregated timing report across instrumented operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingReport {
    pub operations: Vec<OpTiming>,
}

/// Drain the current thread's samples into an aggregated report.
#[must_use]
pub fn collect_report() -> TimingReport {
    let samples = SAMPLES.with(|samples| std::mem::take(&mut *samples.borrow_mut()));

    let mut grouped: BTreeMap<String, Vec<Duration>> = BTreeMap::new();
    for (name, elapsed) in samples {
        grouped.entry(name).or_default().push(elapsed);
    }

    let operations = grouped
        .into_iter()
        .map(|(name, values)| {
            let count = values.len();
            let total: Duration = values.iter().sum();
            let max = values.iter().copied().max().unwrap_or(Duration::ZERO);
            let mean = if count == 0 {
                Duration::ZERO
            } else {
                total / u32::try_from(count).unwrap_or(u32::MAX)
            };
            OpTiming {
                name,
                count,
                total,
                mean,
                max,
            }
        })
        .collect();

    TimingReport { operations }
}

impl TimingReport {
    /// Returns true when no timing samples were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Render the timing report as JSON.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let operations = self
            .operations
            .iter()
            .map(|op| {
                json!({
                    "name": op.name,
                    "count": op.count,
                    "total_us": op.total.as_micros(),
                    "mean_us": op.mean.as_micros(),
                    "max_us": op.max.as_micros(),
                })
            })
            .collect::<Vec<_>>();

        json!({ "operations": operations })
    }

    /// Render the timing report as a simple table for terminal output.
    #[must_use]
    pub fn display_table(&self) -> String {
        if self.operations.is_empty() {
            return "No timing samples recorded.".to_string();
        }

        let mut out = String::new();
        out.push_str("operation                    count     total      mean       max\n");
        out.push_str("----------------------------------------------------------------\n");

        for op in &self.operations {
            out.push_str(&format!(
                "{:<28} {:>6} {:>9} {:>9} {:>9}\n",
                op.name,
                op.count,
                render_elapsed(op.total),
                render_elapsed(op.mean),
                render_elapsed(op.max)
            ));
        }

        out
    }
}

fn render_elapsed(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros >= 1_000_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else if micros >= 1_000 {
        format!("{}.{:03}ms", micros / 1_000, micros % 1_000)
    } else {
        format!("{micros}µs")
    }
}

fn is_truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("1")
        || value.eq_ignore_ascii_case("true")
        || value.eq_ignore_ascii_case("yes")
        || value.eq_ignore_ascii_case("on")
}
