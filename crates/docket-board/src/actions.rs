//! Board action affordances.
//!
//! Which forward transitions each column offers is a static table, not
//! something computed from item state. The transition engine itself stays
//! permissive; this table is what the board and TUI consult before showing
//! a button or accepting a key.

use docket_core::model::demand::Status;
use serde::Serialize;

/// A forward action a board column can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardAction {
    Start,
    Forward,
    Confirm,
    Finalize,
}

impl BoardAction {
    /// The status this action transitions into.
    #[must_use]
    pub const fn target(self) -> Status {
        match self {
            Self::Start => Status::InProgress,
            Self::Forward => Status::Forwarded,
            Self::Confirm => Status::Confirmed,
            Self::Finalize => Status::Finalized,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Forward => "forward",
            Self::Confirm => "confirm",
            Self::Finalize => "finalize",
        }
    }
}

impl std::fmt::Display for BoardAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The forward actions offered from a column.
///
/// - `Pending` offers forward and start.
/// - `InProgress` and `Forwarded` offer confirm.
/// - `Confirmed` offers finalize.
/// - `Finalized` is terminal and offers nothing.
#[must_use]
pub const fn offered_actions(status: Status) -> &'static [BoardAction] {
    match status {
        Status::Pending => &[BoardAction::Forward, BoardAction::Start],
        Status::InProgress | Status::Forwarded => &[BoardAction::Confirm],
        Status::Confirmed => &[BoardAction::Finalize],
        Status::Finalized => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardAction, offered_actions};
    use docket_core::model::demand::Status;

    #[test]
    fn affordance_table_matches_column_contract() {
        assert_eq!(
            offered_actions(Status::Pending),
            &[BoardAction::Forward, BoardAction::Start]
        );
        assert_eq!(offered_actions(Status::InProgress), &[BoardAction::Confirm]);
        assert_eq!(offered_actions(Status::Forwarded), &[BoardAction::Confirm]);
        assert_eq!(offered_actions(Status::Confirmed), &[BoardAction::Finalize]);
        assert!(offered_actions(Status::Finalized).is_empty());
    }

    #[test]
    fn offered_actions_always_move_forward() {
        for status in Status::ALL {
            for action in offered_actions(status) {
                assert!(
                    action.target() > status,
                    "{status} offers {action}, which does not advance the lifecycle"
                );
            }
        }
    }

    #[test]
    fn labels_and_targets_line_up() {
        assert_eq!(BoardAction::Start.target(), Status::InProgress);
        assert_eq!(BoardAction::Forward.target(), Status::Forwarded);
        assert_eq!(BoardAction::Confirm.target(), Status::Confirmed);
        assert_eq!(BoardAction::Finalize.target(), Status::Finalized);
        assert_eq!(BoardAction::Finalize.to_string(), "finalize");
    }
}
