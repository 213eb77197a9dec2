//! Hashing primitives: digest types and pluggable hash strategies.
use std::fmt;
use std::marker::PhantomData;

use digest::Digest;

use crate::error::HashError;

/// Fixed-length digest used for every node of a tree.
///
/// Ordering is the byte-wise lexicographic order of the digest, which is what
/// `Ord` gives us for byte arrays.
pub trait MerkleHash:
    Copy + Clone + Eq + Ord + AsRef<[u8]> + fmt::Debug + Send + Sync + 'static
{
    /// Length of the hash in bytes.
    const HASH_LEN: usize;

    /// Returns a zero hash.
    fn zero() -> Self;

    /// Checks if two hashes are equal, attempting to do it in constant time.
    fn eq_ct(a: &Self, b: &Self) -> bool;

    /// Returns if a hash is the zero hash.
    fn is_zero(h: &Self) -> bool {
        Self::eq_ct(h, &Self::zero())
    }
}

impl<const LEN: usize> MerkleHash for [u8; LEN] {
    const HASH_LEN: usize = LEN;

    fn zero() -> Self {
        [0; LEN]
    }

    fn eq_ct(a: &Self, b: &Self) -> bool {
        // Not a hard guarantee, LLVM is free to short-circuit this.  It's only
        // used when comparing a recomputed root against a trusted one.
        let mut acc: u8 = 0;
        for i in 0..LEN {
            acc |= a[i] ^ b[i];
        }

        acc == 0
    }
}

/// Orders two digests so the smaller one comes first.
#[inline]
pub fn sort_pair<'h, H: MerkleHash>(a: &'h H, b: &'h H) -> (&'h H, &'h H) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Deterministic byte digest function, fixed for the lifetime of a tree.
pub trait HashStrategy {
    /// Hash value.
    type Hash: MerkleHash;

    /// Hashes an arbitrary byte string.
    fn hash(&self, buf: &[u8]) -> Result<Self::Hash, HashError>;

    /// Sorted-combine: hashes `min(a, b) || max(a, b)`.
    ///
    /// The result does not depend on which operand is passed first.
    fn hash_sorted_pair(&self, a: &Self::Hash, b: &Self::Hash) -> Result<Self::Hash, HashError> {
        let (lo, hi) = sort_pair(a, b);
        let mut buf = Vec::with_capacity(2 * <Self::Hash as MerkleHash>::HASH_LEN);
        buf.extend_from_slice(lo.as_ref());
        buf.extend_from_slice(hi.as_ref());
        self.hash(&buf)
    }
}

/// Hash strategy for an arbitrary [`Digest`] impl producing `N` bytes.
pub struct DigestStrategy<D: Digest, const N: usize>(PhantomData<fn() -> D>);

impl<D: Digest, const N: usize> DigestStrategy<D, N> {
    /// Constructs the strategy.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<D: Digest, const N: usize> Default for DigestStrategy<D, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest, const N: usize> Clone for DigestStrategy<D, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: Digest, const N: usize> Copy for DigestStrategy<D, N> {}

impl<D: Digest, const N: usize> fmt::Debug for DigestStrategy<D, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigestStrategy<{}>", std::any::type_name::<D>())
    }
}

fn to_fixed<const N: usize>(out: &[u8]) -> Result<[u8; N], HashError> {
    out.try_into().map_err(|_| HashError::OutputLength {
        expected: N,
        actual: out.len(),
    })
}

impl<D: Digest, const N: usize> HashStrategy for DigestStrategy<D, N> {
    type Hash = [u8; N];

    fn hash(&self, buf: &[u8]) -> Result<Self::Hash, HashError> {
        to_fixed(&D::digest(buf))
    }

    fn hash_sorted_pair(&self, a: &Self::Hash, b: &Self::Hash) -> Result<Self::Hash, HashError> {
        let (lo, hi) = sort_pair(a, b);
        let mut context = D::new();
        context.update(lo);
        context.update(hi);
        to_fixed(&context.finalize())
    }
}
