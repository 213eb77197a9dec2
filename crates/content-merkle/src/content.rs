//! Content capability implemented by the items stored in a tree.
use sha3::{Digest, Keccak256};

use crate::hasher::MerkleHash;

/// Error reported by a content item's own capabilities.
pub type ContentError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Something that can be committed to by a tree.
///
/// The tree never looks inside an item beyond these two operations.
pub trait Content<H: MerkleHash> {
    /// Computes the digest of this item.
    fn content_hash(&self) -> Result<H, ContentError>;

    /// Tests whether this item is the same content as `other`.
    fn content_eq(&self, other: &Self) -> Result<bool, ContentError>;
}

/// Opaque byte string hashed with Keccak-256 and compared bytewise.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ByteContent(Vec<u8>);

impl ByteContent {
    /// Wraps a byte string.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the wrapped bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Unwraps into the byte vector.
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for ByteContent {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ByteContent {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Content<[u8; 32]> for ByteContent {
    fn content_hash(&self) -> Result<[u8; 32], ContentError> {
        Ok(Keccak256::digest(&self.0).into())
    }

    fn content_eq(&self, other: &Self) -> Result<bool, ContentError> {
        Ok(self.0 == other.0)
    }
}
