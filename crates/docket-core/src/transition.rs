//! Demand status transitions with exactly-once timestamp capture.
//!
//! The engine is permissive: any target status is accepted, including jumps
//! that skip stages. The timestamp rules are the safety net: a demand
//! finalized without ever entering an active status simply records no
//! completion timestamps.

use crate::duration::format_duration;
use crate::model::demand::{Demand, Status};

/// The result of applying a status change to a demand.
///
/// Carries the updated value plus what was captured during this call, so a
/// caller can surface a change description without diffing fields itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The updated demand.
    pub demand: Demand,
    /// The status before this call.
    pub previous_status: Status,
    /// `processing_started_at_ms` was recorded by this call.
    pub started_processing: bool,
    /// `completed_at_ms` and `processing_duration_ms` were recorded by this call.
    pub completed: bool,
}

impl Transition {
    /// One-line description of the change, suitable for a notification
    /// surface or a TUI status line.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.completed {
            format!(
                "status updated to {}; processing took {}",
                self.demand.status,
                format_duration(self.demand.processing_duration_ms)
            )
        } else {
            format!("status updated to {}", self.demand.status)
        }
    }
}

/// Compute the demand's next state for a requested status change.
///
/// Pure: the input is not mutated and the clock is an argument. Rules,
/// applied atomically with the status change:
///
/// - entering `InProgress` or `Forwarded` sets `processing_started_at_ms`
///   the first time only;
/// - entering `Finalized` sets `completed_at_ms` and the derived
///   `processing_duration_ms` the first time only, and only when processing
///   has started;
/// - every other field passes through unchanged.
///
/// The duration is stored at capture time so later clock changes cannot
/// retroactively alter history.
#[must_use]
pub fn apply_transition(demand: &Demand, target: Status, now_ms: i64) -> Transition {
    let previous_status = demand.status;
    let mut updated = demand.clone();
    updated.status = target;

    let mut started_processing = false;
    if target.starts_processing() && updated.processing_started_at_ms.is_none() {
        updated.processing_started_at_ms = Some(now_ms);
        started_processing = true;
    }

    let mut completed = false;
    if target.is_terminal()
        && updated.completed_at_ms.is_none()
        && let Some(started_at) = updated.processing_started_at_ms
    {
        updated.completed_at_ms = Some(now_ms);
        updated.processing_duration_ms = Some(now_ms - started_at);
        completed = true;
    }

    Transition {
        demand: updated,
        previous_status,
        started_processing,
        completed,
    }
}

/// [`apply_transition`] against the wall clock.
#[must_use]
pub fn apply_transition_now(demand: &Demand, target: Status) -> Transition {
    apply_transition(demand, target, chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::apply_transition;
    use crate::model::demand::{Demand, DemandDraft, Priority, Status};

    fn pending_demand(created_at_ms: i64) -> Demand {
        Demand::create(
            "dm-0f0f0f0f",
            DemandDraft {
                title: "Review contract".to_string(),
                priority: Priority::High,
                ..DemandDraft::default()
            },
            created_at_ms,
        )
    }

    #[test]
    fn entering_in_progress_captures_start_once() {
        let demand = pending_demand(100);

        let first = apply_transition(&demand, Status::InProgress, 250);
        assert_eq!(first.demand.status, Status::InProgress);
        assert_eq!(first.demand.processing_started_at_ms, Some(250));
        assert!(first.started_processing);

        // Second call at a later clock: the original timestamp stands.
        let second = apply_transition(&first.demand, Status::InProgress, 900);
        assert_eq!(second.demand.processing_started_at_ms, Some(250));
        assert!(!second.started_processing);
    }

    #[test]
    fn forwarding_also_captures_start() {
        let demand = pending_demand(100);
        let forwarded = apply_transition(&demand, Status::Forwarded, 300);
        assert_eq!(forwarded.demand.processing_started_at_ms, Some(300));
        assert!(forwarded.started_processing);

        // Moving to in-progress afterwards does not overwrite it.
        let started = apply_transition(&forwarded.demand, Status::InProgress, 700);
        assert_eq!(started.demand.processing_started_at_ms, Some(300));
    }

    #[test]
    fn finalize_captures_completion_once() {
        let demand = pending_demand(100);
        let started = apply_transition(&demand, Status::InProgress, 200);
        let confirmed = apply_transition(&started.demand, Status::Confirmed, 350);

        let done = apply_transition(&confirmed.demand, Status::Finalized, 500);
        assert_eq!(done.demand.completed_at_ms, Some(500));
        assert_eq!(done.demand.processing_duration_ms, Some(300));
        assert!(done.completed);

        // A repeat finalize is a no-op on both fields.
        let again = apply_transition(&done.demand, Status::Finalized, 9_999);
        assert_eq!(again.demand.completed_at_ms, Some(500));
        assert_eq!(again.demand.processing_duration_ms, Some(300));
        assert!(!again.completed);
    }

    #[test]
    fn finalize_without_start_records_nothing() {
        // The permissive jump pending -> finalized is accepted, but with no
        // processing start there is nothing to measure.
        let demand = pending_demand(100);
        let done = apply_transition(&demand, Status::Finalized, 500);
        assert_eq!(done.demand.status, Status::Finalized);
        assert!(done.demand.completed_at_ms.is_none());
        assert!(done.demand.processing_duration_ms.is_none());
        assert!(!done.completed);
    }

    #[test]
    fn duration_present_iff_both_endpoints_present() {
        let demand = pending_demand(0);
        let states = [
            apply_transition(&demand, Status::Finalized, 10).demand,
            apply_transition(&demand, Status::InProgress, 10).demand,
            {
                let started = apply_transition(&demand, Status::InProgress, 10);
                apply_transition(&started.demand, Status::Finalized, 50).demand
            },
        ];

        for state in &states {
            assert_eq!(
                state.processing_duration_ms.is_some(),
                state.processing_started_at_ms.is_some() && state.completed_at_ms.is_some(),
            );
        }
    }

    #[test]
    fn other_fields_pass_through() {
        let mut demand = pending_demand(100);
        demand.category = Some("collections".to_string());
        demand.assignee = Some("imani".to_string());

        let moved = apply_transition(&demand, Status::Confirmed, 400);
        assert_eq!(moved.previous_status, Status::Pending);
        assert_eq!(moved.demand.id, demand.id);
        assert_eq!(moved.demand.title, demand.title);
        assert_eq!(moved.demand.category, demand.category);
        assert_eq!(moved.demand.assignee, demand.assignee);
        assert_eq!(moved.demand.created_at_ms, 100);
    }

    #[test]
    fn full_lifecycle_records_expected_timeline() {
        let t0 = 1_000;
        let (t1, t2, t3) = (2_000, 3_000, 65_000);

        let demand = pending_demand(t0);
        let started = apply_transition(&demand, Status::InProgress, t1);
        let confirmed = apply_transition(&started.demand, Status::Confirmed, t2);
        let done = apply_transition(&confirmed.demand, Status::Finalized, t3);

        assert_eq!(done.demand.processing_started_at_ms, Some(t1));
        assert_eq!(done.demand.completed_at_ms, Some(t3));
        assert_eq!(done.demand.processing_duration_ms, Some(t3 - t1));
        assert_eq!(done.summary(), "status updated to finalized; processing took 1m 3s");
    }

    #[test]
    fn summary_reports_plain_status_change() {
        let demand = pending_demand(0);
        let moved = apply_transition(&demand, Status::Forwarded, 10);
        assert_eq!(moved.summary(), "status updated to forwarded");
    }
}
