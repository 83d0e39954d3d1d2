use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Machine-readable error codes surfaced alongside CLI errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    DemandNotFound,
    AmbiguousId,
    InvalidEnumValue,
    CorruptStore,
    StoreIoFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::DemandNotFound => "E2001",
            Self::AmbiguousId => "E2002",
            Self::InvalidEnumValue => "E2003",
            Self::CorruptStore => "E3001",
            Self::StoreIoFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Project not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::DemandNotFound => "Demand not found",
            Self::AmbiguousId => "Ambiguous demand ID",
            Self::InvalidEnumValue => "Invalid status/priority value",
            Self::CorruptStore => "Corrupt demand store",
            Self::StoreIoFailed => "Demand store read/write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `dkt init` to initialize this directory."),
            Self::ConfigParseError => Some("Fix syntax in .docket/config.toml and retry."),
            Self::DemandNotFound => None,
            Self::AmbiguousId => Some("Use a longer ID prefix to disambiguate."),
            Self::InvalidEnumValue => Some("Use one of the documented status/priority values."),
            Self::CorruptStore => {
                Some("Restore .docket/demands.json from backup or fix the JSON by hand.")
            }
            Self::StoreIoFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failures raised by the local demand store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not a docket project: no .docket directory above {}", search_root.display())]
    NotInitialized { search_root: PathBuf },

    #[error("corrupt demand store at {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("demand store i/o failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// The stable code for this failure.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized { .. } => ErrorCode::NotInitialized,
            Self::Corrupt { .. } => ErrorCode::CorruptStore,
            Self::Io { .. } => ErrorCode::StoreIoFailed,
        }
    }
}
