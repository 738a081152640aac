/// Errors caused by how the tree is built or queried.
///
/// Broken internal invariants are not reported here; they panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A sequence contains the token `0`, which is reserved for the terminal symbol.
    #[error("Sequence {sequence} contains the reserved token 0 at position {position}")]
    ReservedToken { sequence: usize, position: usize },

    /// A query refers to a sequence the tree does not hold.
    #[error("Sequence index {index} is out of range for a tree over {count} sequences")]
    SequenceOutOfRange { index: usize, count: usize },

    /// The minimal maximal pair length must be positive.
    #[error("Minimal maximal pair length must be at least 1")]
    InvalidMinimalPairLength,
}

pub type Result<T> = std::result::Result<T, Error>;
