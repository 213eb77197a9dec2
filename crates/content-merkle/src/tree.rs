//! Content-committing binary Merkle tree.
//!
//! Leaves are kept in ascending digest order, so the root commits to the set
//! of item digests independently of the order the items were supplied in.
use std::fmt;
use std::mem;

use tracing::{debug, trace};

use crate::builder::{build_tree, sort_items};
use crate::content::Content;
use crate::error::{MerkleTreeError, MerkleTreeResult};
use crate::hasher::{HashStrategy, MerkleHash};
use crate::node::{NodeArena, NodeId, NodeKind};
use crate::proof::{Direction, MerkleProof};
use crate::Keccak256Strategy;

/// Configures and builds a [`ContentMerkleTree`].
#[derive(Clone, Debug, Default)]
pub struct MerkleTreeBuilder<S = Keccak256Strategy> {
    strategy: S,
}

impl MerkleTreeBuilder<Keccak256Strategy> {
    /// Constructs a builder using Keccak-256.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: HashStrategy> MerkleTreeBuilder<S> {
    /// Sets the hash strategy the tree will use for its whole lifetime.
    pub fn with_strategy<S2: HashStrategy>(self, strategy: S2) -> MerkleTreeBuilder<S2> {
        MerkleTreeBuilder { strategy }
    }

    /// Builds a tree over `items`.
    pub fn build<C>(self, items: Vec<C>) -> MerkleTreeResult<ContentMerkleTree<C, S>>
    where
        C: Content<S::Hash>,
    {
        ContentMerkleTree::with_strategy(items, self.strategy)
    }
}

/// Binary Merkle tree over content items.
///
/// Rebuilding requires `&mut self`, so it can never interleave with readers.
pub struct ContentMerkleTree<C, S: HashStrategy = Keccak256Strategy> {
    strategy: S,

    /// Items in leaf order.
    contents: Vec<C>,

    arena: NodeArena<S::Hash>,

    /// Cached root digest.
    root: S::Hash,
}

impl<C, S> fmt::Debug for ContentMerkleTree<C, S>
where
    S: HashStrategy + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentMerkleTree")
            .field("strategy", &self.strategy)
            .field("root", &self.root)
            .field("num_leafs", &self.arena.num_leafs())
            .field("height", &self.arena.height())
            .finish()
    }
}

impl<C: Content<[u8; 32]>> ContentMerkleTree<C, Keccak256Strategy> {
    /// Builds a tree over `items` using Keccak-256.
    pub fn new(items: Vec<C>) -> MerkleTreeResult<Self> {
        Self::with_strategy(items, Keccak256Strategy::new())
    }
}

impl<C, S> ContentMerkleTree<C, S>
where
    S: HashStrategy,
    C: Content<S::Hash>,
{
    /// Builds a tree over `items` with a caller-chosen hash strategy.
    pub fn with_strategy(items: Vec<C>, strategy: S) -> MerkleTreeResult<Self> {
        let built = build_tree(&items, &strategy)?;
        let root = built.arena.root().digest;
        Ok(Self {
            strategy,
            contents: sort_items(items, built.hashes),
            arena: built.arena,
            root,
        })
    }

    /// Returns the root digest.
    pub fn root(&self) -> &S::Hash {
        &self.root
    }

    /// Returns the hash strategy this tree was built with.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Returns the number of leaves in the tree.
    pub fn num_leafs(&self) -> usize {
        self.arena.num_leafs()
    }

    /// Returns the leaf digests in ascending order.
    pub fn leafs(&self) -> impl ExactSizeIterator<Item = &S::Hash> + '_ {
        self.arena.leaf_digests()
    }

    /// Returns the items in leaf order.
    pub fn contents(&self) -> &[C] {
        &self.contents
    }

    /// Returns the number of levels, counting the leaves and the root.
    pub fn height(&self) -> usize {
        self.arena.height()
    }

    /// Finds the leaf index of the first item equal to `item`.
    ///
    /// If several items compare equal, only the earliest in leaf order is
    /// ever returned.
    pub fn find_leaf(&self, item: &C) -> MerkleTreeResult<Option<usize>> {
        for (index, current) in self.contents.iter().enumerate() {
            let found = current
                .content_eq(item)
                .map_err(MerkleTreeError::ContentComparison)?;
            if found {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// Derives the inclusion proof for `item`.
    ///
    /// Returns `None` if no leaf holds an equal item.  A found item in a
    /// single-leaf tree gets an empty proof.
    pub fn get_path(&self, item: &C) -> MerkleTreeResult<Option<MerkleProof<S::Hash>>> {
        match self.find_leaf(item)? {
            Some(index) => Ok(self.proof_for_index(index)),
            None => {
                trace!("content not present in tree");
                Ok(None)
            }
        }
    }

    /// Derives the inclusion proof for the leaf at `index` in sorted order.
    pub fn proof_for_index(&self, index: usize) -> Option<MerkleProof<S::Hash>> {
        if index >= self.arena.num_leafs() {
            return None;
        }

        let mut proof = MerkleProof::with_capacity(self.arena.height());
        let mut cur: NodeId = index;
        while let Some(parent) = self.arena.node(cur).parent {
            if let Some(sibling) = self.arena.sibling(cur) {
                let digest = &self.arena.node(cur).digest;
                let sibling_digest = self.arena.node(sibling).digest;
                proof.push(sibling_digest, Direction::of(digest, &sibling_digest));
            }
            cur = parent;
        }

        Some(proof)
    }

    /// Checks `item` against the root along its ancestor chain only.
    ///
    /// Every paired ancestor is recombined from its children, trusting one
    /// level below them.  Returns `false` if the item is not in the tree.
    pub fn verify_content(&self, item: &C) -> MerkleTreeResult<bool> {
        let Some(index) = self.find_leaf(item)? else {
            trace!("content not present in tree");
            return Ok(false);
        };

        let mut cur: NodeId = index;
        while let Some(parent) = self.arena.node(cur).parent {
            let parent_node = self.arena.node(parent);
            if let NodeKind::Paired { left, right } = parent_node.kind {
                let left_digest = self.calculate_digest(left)?;
                let right_digest = self.calculate_digest(right)?;
                let computed = self.strategy.hash_sorted_pair(&left_digest, &right_digest)?;
                if computed != parent_node.digest {
                    debug!(leaf = index, node = parent, "content chain digest mismatch");
                    return Ok(false);
                }
            }
            cur = parent;
        }

        Ok(true)
    }

    /// Recomputes the whole tree from its leaves and compares the result with
    /// the cached root.
    pub fn verify_tree(&self) -> MerkleTreeResult<bool> {
        let computed = self
            .arena
            .recompute_from_leaves(&self.contents, &self.strategy)?;
        let ok = <S::Hash as MerkleHash>::eq_ct(&computed, &self.root);
        if !ok {
            debug!("recomputed root does not match cached root");
        }
        Ok(ok)
    }

    /// Rebuilds the tree from the items it already holds.
    ///
    /// On failure the tree keeps its previous state.
    pub fn rebuild(&mut self) -> MerkleTreeResult<()> {
        let built = build_tree(&self.contents, &self.strategy)?;
        let contents = mem::take(&mut self.contents);
        self.install(sort_items(contents, built.hashes), built.arena);
        Ok(())
    }

    /// Replaces the item set and rebuilds.
    ///
    /// On failure the tree keeps its previous state and `items` is dropped.
    pub fn rebuild_with(&mut self, items: Vec<C>) -> MerkleTreeResult<()> {
        let built = build_tree(&items, &self.strategy)?;
        self.install(sort_items(items, built.hashes), built.arena);
        Ok(())
    }

    fn calculate_digest(&self, id: NodeId) -> MerkleTreeResult<S::Hash> {
        self.arena.calculate_digest(id, &self.contents, &self.strategy)
    }

    fn install(&mut self, contents: Vec<C>, arena: NodeArena<S::Hash>) {
        self.root = arena.root().digest;
        self.contents = contents;
        self.arena = arena;
        debug!(leafs = self.arena.num_leafs(), "installed rebuilt tree");
    }
}
