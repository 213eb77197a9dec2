//! Property tests for tree construction, proofs and verification.

#![expect(missing_docs, reason = "test crate")]
#![expect(unused_crate_dependencies, reason = "dev and optional deps")]

use proptest::prelude::*;
use strata_content_merkle::{
    ByteContent, Content, ContentMerkleTree, HashStrategy, Keccak256Strategy, MerkleTreeBuilder,
    Sha256Strategy,
};

/// Distinct non-empty lists of byte strings.
fn item_lists() -> impl Strategy<Value = Vec<ByteContent>> {
    prop::collection::btree_set(prop::collection::vec(any::<u8>(), 0..16), 1..48)
        .prop_map(|set| set.into_iter().map(ByteContent::new).collect())
}

proptest! {
    #[test]
    fn construct_yields_verified_tree(items in item_lists()) {
        let tree = ContentMerkleTree::new(items.clone()).unwrap();
        prop_assert_eq!(tree.root().len(), 32);
        prop_assert_eq!(tree.num_leafs(), items.len());
        prop_assert!(tree.verify_tree().unwrap());
    }

    #[test]
    fn leafs_are_sorted(items in item_lists()) {
        let tree = ContentMerkleTree::new(items).unwrap();
        let leafs: Vec<_> = tree.leafs().copied().collect();
        prop_assert!(leafs.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn members_verify_and_roundtrip(items in item_lists()) {
        let tree = ContentMerkleTree::new(items.clone()).unwrap();
        for item in &items {
            prop_assert!(tree.verify_content(item).unwrap());

            let proof = tree.get_path(item).unwrap().expect("member has a path");
            prop_assert_eq!(proof.cohashes().len(), proof.directions().len());
            let leaf = item.content_hash().unwrap();
            prop_assert_eq!(&proof.compute_root(tree.strategy(), &leaf).unwrap(), tree.root());
        }
    }

    #[test]
    fn non_members_are_rejected(items in item_lists(), extra in prop::collection::vec(any::<u8>(), 16..32)) {
        // Members are at most 15 bytes long, so `extra` is never one of them.
        let tree = ContentMerkleTree::new(items).unwrap();
        let outsider = ByteContent::new(extra);
        prop_assert!(!tree.verify_content(&outsider).unwrap());
        prop_assert!(tree.get_path(&outsider).unwrap().is_none());
    }

    #[test]
    fn root_is_permutation_invariant(
        (items, shuffled) in item_lists().prop_flat_map(|items| {
            let shuffled = Just(items.clone()).prop_shuffle();
            (Just(items), shuffled)
        })
    ) {
        let a = ContentMerkleTree::new(items).unwrap();
        let b = ContentMerkleTree::new(shuffled).unwrap();
        prop_assert_eq!(a.root(), b.root());
    }

    #[test]
    fn proof_fails_against_other_leaf(items in item_lists()) {
        prop_assume!(items.len() >= 2);
        let tree = ContentMerkleTree::new(items.clone()).unwrap();
        let proof = tree.get_path(&items[0]).unwrap().unwrap();
        let wrong = items[1].content_hash().unwrap();
        prop_assert!(!proof.verify_with_root(tree.strategy(), tree.root(), &wrong).unwrap());
    }

    #[test]
    fn rebuild_with_changes_root_iff_leafs_change(a in item_lists(), b in item_lists()) {
        let mut tree = ContentMerkleTree::new(a).unwrap();
        let old_leafs: Vec<_> = tree.leafs().copied().collect();
        let old_root = *tree.root();

        tree.rebuild_with(b).unwrap();
        let new_leafs: Vec<_> = tree.leafs().copied().collect();
        prop_assert!(tree.verify_tree().unwrap());
        prop_assert_eq!(old_leafs == new_leafs, old_root == *tree.root());
    }

    #[test]
    fn sha256_strategy_roundtrips(items in item_lists()) {
        let tree = MerkleTreeBuilder::new()
            .with_strategy(Sha256Strategy::new())
            .build(items.clone())
            .unwrap();
        for i in 0..tree.num_leafs() {
            let proof = tree.proof_for_index(i).unwrap();
            let leaf = *tree.leafs().nth(i).unwrap();
            prop_assert!(proof.verify_with_root(tree.strategy(), tree.root(), &leaf).unwrap());
        }
    }
}

#[test]
fn rebuild_is_idempotent() {
    let items: Vec<ByteContent> = (0u8..17).map(|i| ByteContent::new(vec![i; 3])).collect();
    let mut tree = ContentMerkleTree::new(items).unwrap();
    let root = *tree.root();
    tree.rebuild().unwrap();
    assert_eq!(*tree.root(), root);
    assert!(tree.verify_tree().unwrap());

    let s = Keccak256Strategy::new();
    let leafs: Vec<[u8; 32]> = tree.leafs().copied().collect();
    assert_eq!(
        *tree.root(),
        fold_reference(&s, leafs),
        "root must match a naive fold of the sorted leafs"
    );
}

/// Straightforward level fold used as an oracle.
fn fold_reference(s: &Keccak256Strategy, mut level: Vec<[u8; 32]>) -> [u8; 32] {
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| match pair {
                [a, b] => s.hash_sorted_pair(a, b).unwrap(),
                [a] => *a,
                _ => unreachable!(),
            })
            .collect();
    }
    level[0]
}
