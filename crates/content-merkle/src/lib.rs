//! Sorted binary Merkle tree over content items.
//!
//! The tree hashes every item, sorts the leaf digests, and folds them pairwise
//! into a single root.  Pairs are combined as `H(min || max)`, and a level with
//! an odd count promotes its last node unchanged.  The root therefore commits
//! to the set of item digests regardless of input order.
//!
//! ```rust
//! use strata_content_merkle::{ByteContent, Content, ContentMerkleTree};
//!
//! let items: Vec<ByteContent> = ["a", "b", "c"].into_iter().map(ByteContent::new).collect();
//! let tree = ContentMerkleTree::new(items.clone()).unwrap();
//!
//! let proof = tree.get_path(&items[2]).unwrap().expect("item is in the tree");
//! let leaf = items[2].content_hash().unwrap();
//! assert!(proof.verify_with_root(tree.strategy(), tree.root(), &leaf).unwrap());
//! assert!(tree.verify_tree().unwrap());
//! ```
//!
//! # Modules
//!
//! - `hasher`: digest trait and pluggable hash strategies
//! - `content`: the capability items implement to be stored
//! - `proof`: [`MerkleProof`] with its [`Direction`] bits
//! - `tree`: [`ContentMerkleTree`] and its builder
//!
//! # Feature Flags
//!
//! - `serde`: Serialize/Deserialize for [`MerkleProof`] and [`Direction`]
//! - `borsh`: Borsh encoding for the same types

// stupid linter issue
#[cfg(test)]
use criterion as _;
#[cfg(test)]
use proptest as _;

mod builder;
pub mod content;
pub mod error;
pub mod hasher;
mod node;
pub mod proof;
pub mod tree;

use hasher::DigestStrategy;
use sha2::Sha256;
use sha3::Keccak256;

/// Legacy Keccak-256 strategy, the default for new trees.
pub type Keccak256Strategy = DigestStrategy<Keccak256, 32>;

/// SHA-256 strategy.
pub type Sha256Strategy = DigestStrategy<Sha256, 32>;

pub use content::{ByteContent, Content, ContentError};
pub use error::{HashError, MerkleTreeError, MerkleTreeResult};
pub use hasher::{HashStrategy, MerkleHash};
pub use proof::{Direction, MerkleProof};
pub use tree::{ContentMerkleTree, MerkleTreeBuilder};
