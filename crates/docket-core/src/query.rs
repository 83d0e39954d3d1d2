//! Filtering and ordering of demand collections.
//!
//! [`select_and_order`] is the one entry point: it takes a snapshot and a
//! [`DemandQuery`] and returns a new, ordered vector. It never mutates its
//! input and a given (items, query) pair always produces the same output.
//!
//! Query options arriving from partially-initialized UI state parse lossily:
//! an unrecognized sort field falls back to `created`, an unrecognized
//! priority filter falls back to `all`. A stale select widget should not
//! take the board down.

use crate::model::demand::{Demand, Priority, Status};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Sort key for demand listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Priority,
    #[default]
    Created,
    Duration,
}

impl SortField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::Created => "created",
            Self::Duration => "duration",
        }
    }

    /// Parse a sort field, falling back to [`SortField::Created`] on
    /// unrecognized input.
    #[must_use]
    pub fn parse_lossy(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "priority" => Self::Priority,
            "created" | "created-at" | "created_at" => Self::Created,
            "duration" | "processing" | "processing-duration" => Self::Duration,
            other => {
                tracing::debug!(field = other, "unknown sort field, falling back to created");
                Self::Created
            }
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Parse a sort order, falling back to ascending on unrecognized input.
    #[must_use]
    pub fn parse_lossy(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "desc" | "descending" => Self::Desc,
            "asc" | "ascending" => Self::Asc,
            other => {
                tracing::debug!(order = other, "unknown sort order, falling back to asc");
                Self::Asc
            }
        }
    }
}

/// Priority restriction: everything, or exactly one priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    One(Priority),
}

impl PriorityFilter {
    /// Parse a priority filter, falling back to [`PriorityFilter::All`] on
    /// unrecognized input.
    #[must_use]
    pub fn parse_lossy(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        if normalized.is_empty() || normalized == "all" {
            return Self::All;
        }
        Priority::from_str(&normalized).map_or_else(
            |_| {
                tracing::debug!(filter = normalized, "unknown priority filter, falling back to all");
                Self::All
            },
            Self::One,
        )
    }

    #[must_use]
    pub fn matches(self, priority: Priority) -> bool {
        match self {
            Self::All => true,
            Self::One(wanted) => priority == wanted,
        }
    }

    /// Cycle `all -> low -> medium -> high -> all`, for UI toggles.
    #[must_use]
    pub fn cycled(self) -> Self {
        match self {
            Self::All => Self::One(Priority::Low),
            Self::One(Priority::Low) => Self::One(Priority::Medium),
            Self::One(Priority::Medium) => Self::One(Priority::High),
            Self::One(Priority::High) => Self::All,
        }
    }
}

impl std::fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::One(priority) => f.write_str(priority.as_str()),
        }
    }
}

/// The full filter/sort configuration for one listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemandQuery {
    /// Case-insensitive substring matched against title, description,
    /// category, and assignee. Empty matches everything.
    pub text: String,
    pub priority: PriorityFilter,
    /// Single-status restriction, used for board column population.
    pub status: Option<Status>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl DemandQuery {
    /// Returns `true` if the demand satisfies every active criterion.
    #[must_use]
    pub fn matches(&self, demand: &Demand) -> bool {
        if let Some(status) = self.status
            && demand.status != status
        {
            return false;
        }
        if !self.priority.matches(demand.priority) {
            return false;
        }
        matches_text(demand, &self.text)
    }
}

fn matches_text(demand: &Demand, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    let haystacks = [
        Some(demand.title.as_str()),
        demand.description.as_deref(),
        demand.category.as_deref(),
        demand.assignee.as_deref(),
    ];
    haystacks
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

fn compare(a: &Demand, b: &Demand, field: SortField) -> Ordering {
    match field {
        SortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortField::Created => a.created_at_ms.cmp(&b.created_at_ms),
        // Absent durations sort as zero.
        SortField::Duration => a
            .processing_duration_ms
            .unwrap_or(0)
            .cmp(&b.processing_duration_ms.unwrap_or(0)),
    }
}

/// Select the demands matching `query` and return them in sorted order.
///
/// The sort is stable: demands that compare equal keep their input order.
#[must_use]
pub fn select_and_order(demands: &[Demand], query: &DemandQuery) -> Vec<Demand> {
    let mut selected: Vec<Demand> = demands
        .iter()
        .filter(|demand| query.matches(demand))
        .cloned()
        .collect();

    selected.sort_by(|a, b| {
        let ordering = compare(a, b, query.sort_field);
        match query.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    selected
}
