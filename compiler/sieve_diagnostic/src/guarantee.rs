//! Proof that an error diagnostic was recorded.

/// Zero-sized witness that at least one error was emitted.
///
/// Only [`DiagnosticQueue`](crate::queue::DiagnosticQueue) hands these out,
/// so a function returning `Result<T, ErrorGuaranteed>` cannot fail silently.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub(crate) fn new() -> Self {
        ErrorGuaranteed(())
    }

    /// A witness for an error count, if it is non-zero.
    pub fn from_error_count(count: usize) -> Option<Self> {
        (count > 0).then(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error_count() {
        assert!(ErrorGuaranteed::from_error_count(0).is_none());
        assert!(ErrorGuaranteed::from_error_count(3).is_some());
    }
}
