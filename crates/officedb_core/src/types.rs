//! Core type definitions for officedb.

use std::fmt;

/// Lifecycle state of a [`Database`](crate::Database).
///
/// ```text
/// Uninitialized --connect--> FirstRun | Ready | Failed
/// FirstRun --add_company + switch_company--> Ready
/// Ready --switch_company--> Ready | Failed
/// Failed --connect--> FirstRun | Ready | Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreState {
    /// `connect` has not been called yet.
    Uninitialized,
    /// The data root has no current company.
    FirstRun,
    /// A company is active and all its collections are open.
    Ready,
    /// The last `connect` failed.
    Failed,
}

impl StoreState {
    /// Returns true if record operations are allowed.
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for StoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::FirstRun => "first-run",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Reservation scope of the identifier allocator.
///
/// Documents are scoped per document type; extension records per kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdScope {
    /// Article ids.
    Articles,
    /// Customer ids.
    Customers,
    /// Ids of one document type.
    Documents(String),
    /// Ids of one extension kind, by element name.
    Extension(String),
}

impl fmt::Display for IdScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Articles => f.write_str("Articles"),
            Self::Customers => f.write_str("Customers"),
            Self::Documents(kind) => write!(f, "Documents/{kind}"),
            Self::Extension(kind) => write!(f, "{kind}s"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_display() {
        assert_eq!(IdScope::Articles.to_string(), "Articles");
        assert_eq!(
            IdScope::Documents("Invoice".into()).to_string(),
            "Documents/Invoice"
        );
        assert_eq!(IdScope::Extension("Project".into()).to_string(), "Projects");
    }

    #[test]
    fn only_ready_is_ready() {
        assert!(StoreState::Ready.is_ready());
        assert!(!StoreState::FirstRun.is_ready());
        assert!(!StoreState::Failed.is_ready());
        assert!(!StoreState::Uninitialized.is_ready());
    }
}
