/// Category run state definitions
///
/// This module defines the states one category passes through while it is
/// fetched, extracted and persisted.
use std::fmt;

/// Represents the current state of a category run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryState {
    // ===== Active States =====
    /// Nothing has happened yet
    Idle,

    /// Page batch is in flight
    Fetching,

    /// Fetched pages are being parsed into product records
    Extracting,

    /// Extracted records are being upserted
    Persisting,

    // ===== Terminal States =====
    /// Every fetched page was extracted and every record had an upsert attempt
    Done,

    /// The whole batch failed at the transport level, or the store could not
    /// be opened
    Failed,
}

impl CategoryState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if the run completed normally
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if `next` is a legal successor of this state
    ///
    /// `Failed` is reachable from `Idle` (store open failure) and from
    /// `Fetching` (total transport failure) only.
    pub fn can_transition_to(&self, next: CategoryState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Fetching)
                | (Self::Idle, Self::Failed)
                | (Self::Fetching, Self::Extracting)
                | (Self::Fetching, Self::Failed)
                | (Self::Extracting, Self::Persisting)
                | (Self::Persisting, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Persisting => "persisting",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CategoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
