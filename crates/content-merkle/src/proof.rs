//! Inclusion proofs for content trees.

use crate::error::{HashError, MerkleTreeError, MerkleTreeResult};
use crate::hasher::{HashStrategy, MerkleHash};

/// Operand position of the running digest in one sorted-combine step.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "borsh", derive(borsh::BorshSerialize, borsh::BorshDeserialize))]
#[cfg_attr(feature = "borsh", borsh(use_discriminant = true))]
#[repr(u8)]
pub enum Direction {
    /// Running digest is the smaller operand and is hashed first.
    Left = 0,

    /// Running digest is the larger operand and is hashed second.
    Right = 1,
}

impl Direction {
    /// Direction of `current` when combined with `sibling`.
    ///
    /// Equal digests produce the same bytes either way and count as `Left`.
    pub fn of<H: MerkleHash>(current: &H, sibling: &H) -> Self {
        if current <= sibling {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// Returns the bit encoding, 0 for left and 1 for right.
    pub fn as_bit(self) -> u8 {
        self as u8
    }

    /// Parses a bit, returning `None` for anything other than 0 or 1.
    pub fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            _ => None,
        }
    }
}

/// Proof that some leaf digest is committed to by a root.
///
/// Steps are ordered leaf to root.  Levels where the leaf's ancestor had no
/// sibling contribute no step.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "borsh", derive(borsh::BorshSerialize, borsh::BorshDeserialize))]
pub struct MerkleProof<H>
where
    H: MerkleHash,
{
    /// Sibling hashes required for proof.
    pub(crate) cohashes: Vec<H>,

    /// Position of the running digest at each step.
    pub(crate) directions: Vec<Direction>,
}

impl<H: MerkleHash> MerkleProof<H> {
    pub(crate) fn with_capacity(cap: usize) -> Self {
        Self {
            cohashes: Vec::with_capacity(cap),
            directions: Vec::with_capacity(cap),
        }
    }

    pub(crate) fn push(&mut self, sibling: H, direction: Direction) {
        self.cohashes.push(sibling);
        self.directions.push(direction);
    }

    /// Constructs a proof from its sibling digests and direction bits.
    pub fn from_parts(cohashes: Vec<H>, directions: Vec<Direction>) -> MerkleTreeResult<Self> {
        if cohashes.len() != directions.len() {
            return Err(MerkleTreeError::MalformedProof {
                cohashes: cohashes.len(),
                directions: directions.len(),
            });
        }
        Ok(Self {
            cohashes,
            directions,
        })
    }

    /// Returns the cohash path for this proof.
    pub fn cohashes(&self) -> &[H] {
        &self.cohashes
    }

    /// Returns the direction of the running digest at each step.
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Returns the directions as 0/1 bits.
    pub fn direction_bits(&self) -> Vec<u8> {
        self.directions.iter().map(|d| d.as_bit()).collect()
    }

    /// Number of steps in the proof.
    pub fn len(&self) -> usize {
        self.cohashes.len()
    }

    /// Returns if the proof has no steps, as for a single-leaf tree.
    pub fn is_empty(&self) -> bool {
        self.cohashes.is_empty()
    }

    /// Splits into sibling digests and directions.
    pub fn into_parts(self) -> (Vec<H>, Vec<Direction>) {
        (self.cohashes, self.directions)
    }

    /// Computes the root obtained by applying this proof to `leaf`.
    pub fn compute_root<S>(&self, strategy: &S, leaf: &H) -> Result<H, HashError>
    where
        S: HashStrategy<Hash = H>,
    {
        let mut cur = *leaf;
        for (co, dir) in self.cohashes.iter().zip(&self.directions) {
            cur = match dir {
                Direction::Left => hash_ordered(strategy, &cur, co)?,
                Direction::Right => hash_ordered(strategy, co, &cur)?,
            };
        }

        Ok(cur)
    }

    /// Verifies this proof for `leaf` against the expected `root`.
    ///
    /// A proof whose directions disagree with the digest ordering does not
    /// verify.
    pub fn verify_with_root<S>(&self, strategy: &S, root: &H, leaf: &H) -> Result<bool, HashError>
    where
        S: HashStrategy<Hash = H>,
    {
        let computed = self.compute_root(strategy, leaf)?;
        Ok(<H as MerkleHash>::eq_ct(&computed, root))
    }
}

/// Hashes `first || second` through the sorted-combine entry point, failing
/// closed if the operands are not actually in sorted order.
fn hash_ordered<S: HashStrategy>(
    strategy: &S,
    first: &S::Hash,
    second: &S::Hash,
) -> Result<S::Hash, HashError> {
    if first <= second {
        strategy.hash_sorted_pair(first, second)
    } else {
        // Mislabelled step: hash the operands as given so the root cannot match.
        let mut buf = Vec::with_capacity(2 * <S::Hash as MerkleHash>::HASH_LEN);
        buf.extend_from_slice(first.as_ref());
        buf.extend_from_slice(second.as_ref());
        strategy.hash(&buf)
    }
}
