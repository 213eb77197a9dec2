//! Tree construction: canonical leaf ordering and the bottom-up fold.
use tracing::{debug, trace};

use crate::content::Content;
use crate::error::{HashError, MerkleTreeError, MerkleTreeResult};
use crate::hasher::{HashStrategy, MerkleHash};
use crate::node::{Node, NodeArena, NodeKind};

/// Output of a successful build, before the items are moved into place.
#[derive(Debug)]
pub(crate) struct BuiltTree<H> {
    /// Item digests in input order.
    pub(crate) hashes: Vec<H>,
    pub(crate) arena: NodeArena<H>,
}

/// Hashes every item and builds the node arena over the sorted digests.
///
/// Works on borrowed items so a failure leaves the caller's state untouched.
pub(crate) fn build_tree<C, S>(items: &[C], strategy: &S) -> MerkleTreeResult<BuiltTree<S::Hash>>
where
    C: Content<S::Hash>,
    S: HashStrategy,
{
    if items.is_empty() {
        return Err(MerkleTreeError::EmptyInput);
    }

    let hashes = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.content_hash()
                .map_err(|source| MerkleTreeError::ContentHash { index, source })
        })
        .collect::<MerkleTreeResult<Vec<_>>>()?;

    let mut sorted = hashes.clone();
    sorted.sort();

    let arena = fold_levels(&sorted, strategy)?;
    debug!(
        leafs = arena.num_leafs(),
        nodes = arena.len(),
        height = arena.height(),
        "built content tree"
    );

    Ok(BuiltTree { hashes, arena })
}

/// Reorders `items` by ascending digest, matching the leaf order of a build
/// over the same `hashes`.
pub(crate) fn sort_items<C, H: MerkleHash>(items: Vec<C>, hashes: Vec<H>) -> Vec<C> {
    let mut keyed: Vec<(H, C)> = hashes.into_iter().zip(items).collect();
    // Stable, so equal digests keep their input order.
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Folds sorted leaf digests upward level by level until one node remains.
///
/// Pairs are combined with the sorted-combine rule.  An odd trailing node is
/// wrapped in a promoted node that keeps its digest.  A single leaf still gets
/// a promoted root above it.
pub(crate) fn fold_levels<S: HashStrategy>(
    sorted: &[S::Hash],
    strategy: &S,
) -> Result<NodeArena<S::Hash>, HashError> {
    let mut nodes: Vec<Node<S::Hash>> = Vec::with_capacity(2 * sorted.len());
    nodes.extend(
        sorted
            .iter()
            .enumerate()
            .map(|(item, digest)| Node::new(NodeKind::Leaf { item }, *digest)),
    );

    let mut level_starts = vec![0];
    let mut level_start = 0;
    let mut level_size = sorted.len();

    loop {
        let next_start = nodes.len();
        for i in (0..level_size).step_by(2) {
            let left = level_start + i;
            let parent = nodes.len();

            if i + 1 < level_size {
                let right = left + 1;
                let digest = strategy.hash_sorted_pair(&nodes[left].digest, &nodes[right].digest)?;
                nodes.push(Node::new(NodeKind::Paired { left, right }, digest));
                nodes[left].parent = Some(parent);
                nodes[right].parent = Some(parent);
            } else {
                let digest = nodes[left].digest;
                nodes.push(Node::new(NodeKind::Promoted { child: left }, digest));
                nodes[left].parent = Some(parent);
            }
        }

        level_starts.push(next_start);
        level_start = next_start;
        level_size = nodes.len() - next_start;
        trace!(level = level_starts.len() - 1, size = level_size, "folded level");

        if level_size == 1 {
            break;
        }
    }

    Ok(NodeArena::from_levels(nodes, level_starts))
}
