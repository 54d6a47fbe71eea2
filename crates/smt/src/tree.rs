//! Reference sparse Merkle tree used by the tests.
//!
//! A path-compressed SMT: a leaf sits at the shallowest level where its key
//! prefix is unique, absent subtrees collapse to the zero hash. Tree
//! mutation produces the exact witness records the verifier and processor
//! consume, standing in for the external tree implementation that does this
//! in production.

use std::collections::HashMap;

use ark_bn254::Fr;
use ark_ff::Zero;

use crate::hasher::{HashChain, TreeHasher};
use crate::path::key_bits;
use crate::witness::{Mode, Operation, ProcessorWitness, VerifierWitness};

#[derive(Clone)]
enum Node {
    Leaf { key: Fr, value: Fr },
    Internal { left: Fr, right: Fr },
}

pub(crate) struct TestTree<H: TreeHasher> {
    chain: HashChain<H>,
    depth: usize,
    root: Fr,
    nodes: HashMap<Fr, Node>,
}

impl<H: TreeHasher> TestTree<H> {
    pub fn new(hasher: H, depth: usize) -> Self {
        Self {
            chain: HashChain::new(hasher),
            depth,
            root: Fr::zero(),
            nodes: HashMap::new(),
        }
    }

    pub fn root(&self) -> Fr {
        self.root
    }

    /// Insert a new key, returning the transition witness taken across the
    /// mutation. Panics if the key is already present.
    pub fn insert(&mut self, key: Fr, value: Fr) -> ProcessorWitness {
        let bits = key_bits(key, self.depth);
        let (siblings, blocker) = self.locate(&bits);
        let old_root = self.root;
        let (old_key, old_value, is_old0) = match blocker {
            None => (Fr::zero(), Fr::zero(), true),
            Some((k, v)) => {
                assert_ne!(k, key, "key already present");
                (k, v, false)
            }
        };
        self.root = self.graft(self.root, 0, &bits, key, value);
        ProcessorWitness {
            old_root,
            siblings: self.padded(siblings),
            old_key,
            old_value,
            is_old0,
            new_key: key,
            new_value: value,
            op: Operation::Insert,
        }
    }

    /// Replace the value of an existing key, returning the transition
    /// witness. Panics if the key is absent.
    pub fn update(&mut self, key: Fr, new_value: Fr) -> ProcessorWitness {
        let bits = key_bits(key, self.depth);
        let (siblings, blocker) = self.locate(&bits);
        let (held_key, old_value) = blocker.expect("key not present");
        assert_eq!(held_key, key, "key not present");
        let old_root = self.root;
        self.root = self.replace(self.root, 0, &bits, key, new_value);
        ProcessorWitness {
            old_root,
            siblings: self.padded(siblings),
            old_key: key,
            old_value,
            is_old0: false,
            new_key: key,
            new_value,
            op: Operation::Update,
        }
    }

    /// Membership witness for a present key.
    pub fn inclusion_witness(&self, key: Fr) -> VerifierWitness {
        let bits = key_bits(key, self.depth);
        let (siblings, blocker) = self.locate(&bits);
        let (held_key, value) = blocker.expect("key not present");
        assert_eq!(held_key, key, "key not present");
        VerifierWitness {
            root: self.root,
            siblings: self.padded(siblings),
            old_key: key,
            old_value: value,
            is_old0: false,
            key,
            value,
            mode: Mode::Inclusion,
        }
    }

    /// Non-membership witness for an absent key: the blocking neighbour
    /// leaf on its path, or the implicit empty leaf.
    pub fn exclusion_witness(&self, key: Fr) -> VerifierWitness {
        let bits = key_bits(key, self.depth);
        let (siblings, blocker) = self.locate(&bits);
        let (old_key, old_value, is_old0) = match blocker {
            None => (Fr::zero(), Fr::zero(), true),
            Some((k, v)) => {
                assert_ne!(k, key, "key is present");
                (k, v, false)
            }
        };
        VerifierWitness {
            root: self.root,
            siblings: self.padded(siblings),
            old_key,
            old_value,
            is_old0,
            key,
            value: Fr::zero(),
            mode: Mode::Exclusion,
        }
    }

    /// Walk the path of `bits`, collecting siblings root to leaf, until an
    /// empty slot or a leaf blocks the descent.
    fn locate(&self, bits: &[bool]) -> (Vec<Fr>, Option<(Fr, Fr)>) {
        let mut siblings = Vec::new();
        let mut cur = self.root;
        let mut level = 0;
        loop {
            if cur.is_zero() {
                return (siblings, None);
            }
            match self.nodes[&cur] {
                Node::Leaf { key, value } => return (siblings, Some((key, value))),
                Node::Internal { left, right } => {
                    assert!(level < self.depth, "path exhausts the tree depth");
                    if bits[level] {
                        siblings.push(left);
                        cur = right;
                    } else {
                        siblings.push(right);
                        cur = left;
                    }
                    level += 1;
                }
            }
        }
    }

    fn graft(&mut self, node: Fr, level: usize, bits: &[bool], key: Fr, value: Fr) -> Fr {
        if node.is_zero() {
            return self.put_leaf(key, value);
        }
        match self.nodes[&node].clone() {
            Node::Leaf {
                key: held_key,
                value: held_value,
            } => {
                let held_bits = key_bits(held_key, self.depth);
                self.split(level, bits, key, value, &held_bits, held_key, held_value)
            }
            Node::Internal { left, right } => {
                let (left, right) = if bits[level] {
                    let right = self.graft(right, level + 1, bits, key, value);
                    (left, right)
                } else {
                    let left = self.graft(left, level + 1, bits, key, value);
                    (left, right)
                };
                self.put_internal(left, right)
            }
        }
    }

    /// Push a displaced leaf and the new leaf down until their paths
    /// diverge, growing single-child nodes on the shared prefix.
    #[allow(clippy::too_many_arguments)]
    fn split(
        &mut self,
        level: usize,
        new_bits: &[bool],
        new_key: Fr,
        new_value: Fr,
        held_bits: &[bool],
        held_key: Fr,
        held_value: Fr,
    ) -> Fr {
        assert!(level < self.depth, "keys collide within the proof depth");
        if new_bits[level] == held_bits[level] {
            let child = self.split(
                level + 1,
                new_bits,
                new_key,
                new_value,
                held_bits,
                held_key,
                held_value,
            );
            let (left, right) = if new_bits[level] {
                (Fr::zero(), child)
            } else {
                (child, Fr::zero())
            };
            self.put_internal(left, right)
        } else {
            let new_leaf = self.put_leaf(new_key, new_value);
            let held_leaf = self.put_leaf(held_key, held_value);
            let (left, right) = if new_bits[level] {
                (held_leaf, new_leaf)
            } else {
                (new_leaf, held_leaf)
            };
            self.put_internal(left, right)
        }
    }

    fn replace(&mut self, node: Fr, level: usize, bits: &[bool], key: Fr, value: Fr) -> Fr {
        match self.nodes[&node].clone() {
            Node::Leaf { .. } => self.put_leaf(key, value),
            Node::Internal { left, right } => {
                let (left, right) = if bits[level] {
                    let right = self.replace(right, level + 1, bits, key, value);
                    (left, right)
                } else {
                    let left = self.replace(left, level + 1, bits, key, value);
                    (left, right)
                };
                self.put_internal(left, right)
            }
        }
    }

    fn put_leaf(&mut self, key: Fr, value: Fr) -> Fr {
        let hash = self.chain.leaf_hash(key, value);
        self.nodes.insert(hash, Node::Leaf { key, value });
        hash
    }

    fn put_internal(&mut self, left: Fr, right: Fr) -> Fr {
        let hash = self.chain.node_hash(left, right);
        self.nodes.insert(hash, Node::Internal { left, right });
        hash
    }

    fn padded(&self, mut siblings: Vec<Fr>) -> Vec<Fr> {
        siblings.resize(self.depth, Fr::zero());
        siblings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poseidon::PoseidonHasher;

    #[test]
    fn empty_tree_has_zero_root() {
        let tree = TestTree::new(PoseidonHasher::new(), 8);
        assert_eq!(tree.root(), Fr::zero());
    }

    #[test]
    fn insert_changes_root() {
        let mut tree = TestTree::new(PoseidonHasher::new(), 8);
        tree.insert(Fr::from(1u64), Fr::from(100u64));
        let r1 = tree.root();
        assert_ne!(r1, Fr::zero());
        tree.insert(Fr::from(42u64), Fr::from(50u64));
        assert_ne!(tree.root(), r1);
    }

    #[test]
    fn update_changes_root() {
        let mut tree = TestTree::new(PoseidonHasher::new(), 8);
        tree.insert(Fr::from(1u64), Fr::from(100u64));
        let r1 = tree.root();
        tree.update(Fr::from(1u64), Fr::from(150u64));
        assert_ne!(tree.root(), r1);
    }

    #[test]
    fn insert_order_does_not_matter() {
        let mut a = TestTree::new(PoseidonHasher::new(), 8);
        a.insert(Fr::from(1u64), Fr::from(100u64));
        a.insert(Fr::from(42u64), Fr::from(50u64));
        let mut b = TestTree::new(PoseidonHasher::new(), 8);
        b.insert(Fr::from(42u64), Fr::from(50u64));
        b.insert(Fr::from(1u64), Fr::from(100u64));
        assert_eq!(a.root(), b.root());
    }

    #[test]
    fn siblings_are_padded_to_depth() {
        let mut tree = TestTree::new(PoseidonHasher::new(), 16);
        let witness = tree.insert(Fr::from(5u64), Fr::from(10u64));
        assert_eq!(witness.siblings.len(), 16);
        assert!(witness.is_old0);
    }

    #[test]
    #[should_panic(expected = "key already present")]
    fn duplicate_insert_panics() {
        let mut tree = TestTree::new(PoseidonHasher::new(), 8);
        tree.insert(Fr::from(1u64), Fr::from(1u64));
        tree.insert(Fr::from(1u64), Fr::from(2u64));
    }
}
