use core_paging::LoadDirection;
use core_store::StoreError;
use search_traits::FetchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// Remote fetch failed. Stores are left untouched, so retrying
    /// re-resolves the same token.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    /// A directional load found a cached boundary item with no key
    /// record. Keys are committed in the same transaction as their
    /// items, so this means the caller issued a prepend/append before
    /// any successful refresh.
    #[error("No remote key recorded for repo {repo_id}")]
    MissingBoundaryKey { repo_id: i64 },

    /// A directional load was issued against an empty cache.
    #[error("Cannot {direction} with an empty cache")]
    EmptyPagingState { direction: LoadDirection },

    #[error("Sync cancelled")]
    Cancelled,
}

impl SyncError {
    /// Whether re-issuing the same request can succeed.
    ///
    /// Fetch failures are the retryable class; everything else points at
    /// a sequencing bug or a dead session and retrying will not help.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SyncError::Fetch(_))
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_errors_are_recoverable() {
        let err = SyncError::Fetch(FetchError::Network("connection reset".to_string()));
        assert!(err.is_recoverable());

        let err = SyncError::Fetch(FetchError::Protocol {
            status: 403,
            message: "rate limited".to_string(),
        });
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_invariant_violations_are_fatal() {
        assert!(!SyncError::MissingBoundaryKey { repo_id: 7 }.is_recoverable());
        assert!(!SyncError::EmptyPagingState {
            direction: LoadDirection::Append
        }
        .is_recoverable());
        assert!(!SyncError::Cancelled.is_recoverable());
    }
}
