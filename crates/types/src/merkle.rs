//! Binary Merkle root calculation over an ordered list of leaves.

use crate::{
    crypto::Hasher,
    Bytes32,
};

const LEAF_PREFIX: [u8; 1] = [0x00];
const NODE_PREFIX: [u8; 1] = [0x01];

/// The root of the tree without leaves.
pub fn empty_root() -> Bytes32 {
    Hasher::hash(b"")
}

fn leaf_sum(data: &[u8]) -> Bytes32 {
    Hasher::default().chain(LEAF_PREFIX).chain(data).finalize()
}

fn node_sum(left: &Bytes32, right: &Bytes32) -> Bytes32 {
    Hasher::default()
        .chain(NODE_PREFIX)
        .chain(left)
        .chain(right)
        .finalize()
}

#[derive(Debug, Clone)]
struct Node {
    height: u32,
    hash: Bytes32,
}

/// Computes the root without holding the whole tree in memory.
/// Only the peaks of the perfect subtrees are kept on the stack.
#[derive(Debug, Clone, Default)]
pub struct MerkleRootCalculator {
    stack: Vec<Node>,
}

impl MerkleRootCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, data: &[u8]) {
        let mut node = Node {
            height: 0,
            hash: leaf_sum(data),
        };
        while let Some(left) = self.stack.pop() {
            if left.height != node.height {
                self.stack.push(left);
                break
            }
            node = Node {
                height: node.height.saturating_add(1),
                hash: node_sum(&left.hash, &node.hash),
            };
        }
        self.stack.push(node);
    }

    pub fn root(mut self) -> Bytes32 {
        let Some(mut current) = self.stack.pop() else {
            return empty_root()
        };
        while let Some(left) = self.stack.pop() {
            current = Node {
                height: left.height.saturating_add(1),
                hash: node_sum(&left.hash, &current.hash),
            };
        }
        current.hash
    }

    pub fn root_from_iterator<I, B>(iter: I) -> Bytes32
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut calculator = Self::new();
        for leaf in iter {
            calculator.push(leaf.as_ref());
        }
        calculator.root()
    }
}

#[allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root__returns_empty_root_without_leaves() {
        assert_eq!(MerkleRootCalculator::new().root(), empty_root());
    }

    #[test]
    fn root__single_leaf_is_its_leaf_sum() {
        let mut calculator = MerkleRootCalculator::new();
        calculator.push(b"leaf");
        assert_eq!(calculator.root(), leaf_sum(b"leaf"));
    }

    #[test]
    fn root__three_leaves_join_peaks_right_to_left() {
        let leaves: [&[u8]; 3] = [b"a", b"b", b"c"];
        let expected = node_sum(
            &node_sum(&leaf_sum(b"a"), &leaf_sum(b"b")),
            &leaf_sum(b"c"),
        );
        assert_eq!(MerkleRootCalculator::root_from_iterator(leaves), expected);
    }

    #[test]
    fn root__depends_on_leaf_order() {
        let forward = MerkleRootCalculator::root_from_iterator([b"x", b"y"]);
        let backward = MerkleRootCalculator::root_from_iterator([b"y", b"x"]);
        assert_ne!(forward, backward);
    }
}
