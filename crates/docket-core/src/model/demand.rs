use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The five lifecycle statuses of a demand.
///
/// The derived ordering follows the lifecycle: `Pending` sorts first and
/// `Finalized` last. The legacy `completed` value found in older store files
/// is accepted on read and normalized to [`Status::Finalized`]; it is never
/// written back.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Pending,
    InProgress,
    Forwarded,
    Confirmed,
    #[serde(alias = "completed")]
    Finalized,
}

impl Status {
    /// All statuses in lifecycle order, which is also the board's column order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::InProgress,
        Self::Forwarded,
        Self::Confirmed,
        Self::Finalized,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Forwarded => "forwarded",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }

    /// Returns `true` for the terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finalized)
    }

    /// Returns `true` for statuses that mark a demand as being worked:
    /// entering one of these captures `processing_started_at_ms`.
    #[must_use]
    pub const fn starts_processing(self) -> bool {
        matches!(self, Self::InProgress | Self::Forwarded)
    }
}

/// Demand priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Numeric rank used for sorting: high=3, medium=2, low=1.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

/// All persisted fields for a demand.
///
/// `status` is intended to change only through
/// [`crate::transition::apply_transition`], which owns the timestamp-capture
/// rules; the three processing fields are set exactly once each and never
/// recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Demand {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Status,
    pub category: Option<String>,
    pub assignee: Option<String>,
    pub created_at_ms: i64,
    pub processing_started_at_ms: Option<i64>,
    pub completed_at_ms: Option<i64>,
    pub processing_duration_ms: Option<i64>,
}

impl Default for Demand {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            description: None,
            priority: Priority::Medium,
            status: Status::Pending,
            category: None,
            assignee: None,
            created_at_ms: 0,
            processing_started_at_ms: None,
            completed_at_ms: None,
            processing_duration_ms: None,
        }
    }
}

/// The validated creation payload produced by an intake form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub category: Option<String>,
    pub assignee: Option<String>,
}

impl Demand {
    /// Wrap a draft into a new demand: `Pending`, created now, no processing
    /// timestamps.
    #[must_use]
    pub fn create(id: impl Into<String>, draft: DemandDraft, now_ms: i64) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            category: draft.category,
            assignee: draft.assignee,
            created_at_ms: now_ms,
            ..Self::default()
        }
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in-progress" | "in_progress" | "inprogress" => Ok(Self::InProgress),
            "forwarded" => Ok(Self::Forwarded),
            "confirmed" => Ok(Self::Confirmed),
            // "completed" is the legacy synonym for the terminal status.
            "finalized" | "completed" => Ok(Self::Finalized),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseEnumError {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}
