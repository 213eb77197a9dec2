//! Node arena backing a content tree.
//!
//! Nodes are addressed by index.  Leaves come first in sorted digest order,
//! then each upper level in order, finishing with the root at the last
//! position.  A child therefore always has a smaller index than its parent.
use tracing::trace;

use crate::content::Content;
use crate::error::{MerkleTreeError, MerkleTreeResult};
use crate::hasher::{HashStrategy, MerkleHash};

/// Index of a node in a [`NodeArena`].
pub(crate) type NodeId = usize;

/// Structural variant of a node.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum NodeKind {
    /// Holds the item at this position of the sorted content list.
    Leaf { item: usize },

    /// Internal node over two real children.
    Paired { left: NodeId, right: NodeId },

    /// Stands in for an unpaired child; carries its digest unchanged.
    Promoted { child: NodeId },
}

#[derive(Clone, Debug)]
pub(crate) struct Node<H> {
    pub(crate) kind: NodeKind,
    pub(crate) digest: H,
    pub(crate) parent: Option<NodeId>,
}

impl<H> Node<H> {
    pub(crate) fn new(kind: NodeKind, digest: H) -> Self {
        Self {
            kind,
            digest,
            parent: None,
        }
    }
}

/// All nodes of one built tree.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<H> {
    nodes: Vec<Node<H>>,

    /// Start index of each level, leaves first.
    level_starts: Vec<usize>,
}

impl<H: MerkleHash> NodeArena<H> {
    /// Assembles an arena from nodes laid out level by level.
    pub(crate) fn from_levels(nodes: Vec<Node<H>>, level_starts: Vec<usize>) -> Self {
        debug_assert!(!nodes.is_empty());
        debug_assert_eq!(level_starts.first(), Some(&0));
        Self {
            nodes,
            level_starts,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn num_leafs(&self) -> usize {
        self.level_starts.get(1).copied().unwrap_or(self.nodes.len())
    }

    /// Number of levels, counting the leaf level and the root level.
    pub(crate) fn height(&self) -> usize {
        self.level_starts.len()
    }

    pub(crate) fn root_id(&self) -> NodeId {
        self.nodes.len() - 1
    }

    pub(crate) fn root(&self) -> &Node<H> {
        &self.nodes[self.root_id()]
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<H> {
        &self.nodes[id]
    }

    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<H> {
        &mut self.nodes[id]
    }

    /// Returns the nodes of level `level`, where level 0 is the leaves.
    #[cfg(test)]
    pub(crate) fn level(&self, level: usize) -> &[Node<H>] {
        let start = self.level_starts[level];
        let end = self
            .level_starts
            .get(level + 1)
            .copied()
            .unwrap_or(self.nodes.len());
        &self.nodes[start..end]
    }

    pub(crate) fn leaf_digests(&self) -> impl ExactSizeIterator<Item = &H> + '_ {
        self.nodes[..self.num_leafs()].iter().map(|n| &n.digest)
    }

    /// Returns the sibling of `id` in its parent, or `None` if `id` is the
    /// root or the lone child of a promoted node.
    pub(crate) fn sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes[id].parent?;
        match self.nodes[parent].kind {
            NodeKind::Paired { left, right } => Some(if left == id { right } else { left }),
            NodeKind::Promoted { .. } => None,
            NodeKind::Leaf { .. } => unreachable!("leaf cannot be a parent"),
        }
    }

    /// Digest of a node trusting one level below it.
    ///
    /// Leaves rehash their content, promoted nodes return their stored
    /// digest, and paired nodes recombine their children's stored digests.
    pub(crate) fn calculate_digest<C, S>(
        &self,
        id: NodeId,
        items: &[C],
        strategy: &S,
    ) -> MerkleTreeResult<H>
    where
        C: Content<H>,
        S: HashStrategy<Hash = H>,
    {
        let node = &self.nodes[id];
        match node.kind {
            NodeKind::Leaf { item } => items[item]
                .content_hash()
                .map_err(|source| MerkleTreeError::ContentHash {
                    index: item,
                    source,
                }),
            NodeKind::Promoted { .. } => Ok(node.digest),
            NodeKind::Paired { left, right } => Ok(strategy
                .hash_sorted_pair(&self.nodes[left].digest, &self.nodes[right].digest)?),
        }
    }

    /// Recomputes the root digest from the leaf contents up, ignoring every
    /// stored internal digest.
    pub(crate) fn recompute_from_leaves<C, S>(
        &self,
        items: &[C],
        strategy: &S,
    ) -> MerkleTreeResult<H>
    where
        C: Content<H>,
        S: HashStrategy<Hash = H>,
    {
        let mut computed: Vec<H> = Vec::with_capacity(self.nodes.len());
        for (id, node) in self.nodes.iter().enumerate() {
            let digest = match node.kind {
                NodeKind::Leaf { item } => {
                    items[item]
                        .content_hash()
                        .map_err(|source| MerkleTreeError::ContentHash {
                            index: item,
                            source,
                        })?
                }
                NodeKind::Promoted { child } => {
                    debug_assert!(child < id);
                    computed[child]
                }
                NodeKind::Paired { left, right } => {
                    debug_assert!(left < id && right < id);
                    strategy.hash_sorted_pair(&computed[left], &computed[right])?
                }
            };
            computed.push(digest);
        }

        trace!(nodes = computed.len(), "recomputed tree from leaves");
        Ok(computed[self.root_id()])
    }
}
