//! Error types for building, proving and verifying content trees.
//!
//! A lookup that does not find the requested content is not an error: path
//! derivation returns `Ok(None)` and content verification returns `Ok(false)`.
use thiserror::Error;

use crate::content::ContentError;

/// Failures of the underlying hash primitive.
#[derive(Debug, Error)]
pub enum HashError {
    /// The digest produced a different number of bytes than the hash type holds.
    #[error("digest output length mismatch (expected {expected}, got {actual})")]
    OutputLength {
        /// Length of the configured hash type.
        expected: usize,
        /// Length the digest actually produced.
        actual: usize,
    },

    /// The hash backend could not process the input.
    #[error("hash backend: {0}")]
    Backend(String),
}

/// Errors that can occur when working with a content merkle tree.
#[derive(Debug, Error)]
pub enum MerkleTreeError {
    /// Tree construction was attempted with zero items.
    #[error("cannot construct tree with no content")]
    EmptyInput,

    /// An item failed to produce its digest.
    #[error("content hash failed for item {index}: {source}")]
    ContentHash {
        /// Position of the item (input order at build time, sorted leaf
        /// order during verification).
        index: usize,
        /// Error returned by the item.
        #[source]
        source: ContentError,
    },

    /// An item's equality capability failed.
    #[error("content comparison failed: {0}")]
    ContentComparison(#[source] ContentError),

    /// The hash strategy failed.
    #[error("hash primitive: {0}")]
    HashPrimitive(#[from] HashError),

    /// A proof was assembled from sequences of different lengths.
    #[error("malformed proof ({cohashes} cohashes, {directions} directions)")]
    MalformedProof {
        /// Number of sibling digests supplied.
        cohashes: usize,
        /// Number of direction bits supplied.
        directions: usize,
    },
}

/// Result type alias for tree operations.
pub type MerkleTreeResult<T> = Result<T, MerkleTreeError>;
