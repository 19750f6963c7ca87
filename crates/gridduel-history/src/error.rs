//! Error type for the history seam.

/// A failed history write.
///
/// The core's reaction depends on where the failure happened: fatal during
/// session setup and termination, logged and ignored for per-move appends.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The store rejected or could not complete the write.
    #[error("history write failed: {0}")]
    WriteFailed(String),

    /// The store is unreachable.
    #[error("history store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_cause() {
        let err = HistoryError::WriteFailed("disk full".into());
        assert!(err.to_string().contains("disk full"));

        let err = HistoryError::Unavailable("connection refused".into());
        assert!(err.to_string().contains("connection refused"));
    }
}
