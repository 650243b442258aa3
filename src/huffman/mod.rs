//! Huffman coding is a method of encoding where symbols are assigned a code,
//! and more commonly used symbols get shorter codes, and less commonly
//! used symbols get longer codes. Codes are prefix free, meaning no code
//! is the start of another code.
//!
//! This module builds the code tree from a [Histogram], derives the [CodeTable] from a tree and
//! converts trees from and to the post-order dump stored in a container.
pub mod code;
pub mod node;
pub mod priority_queue;
pub mod stack;

pub use code::{Code, CodeError, MAX_CODE_BITS};
pub use node::Node;
pub use priority_queue::{Prioritized, PriorityQueue, PriorityQueueError};
pub use stack::{Stack, StackError};

use crate::histogram::Histogram;
use crate::ALPHABET_SIZE;

/// Tree dump record tag for a leaf, followed by the leaf's symbol
pub const LEAF_TAG: u8 = b'L';
/// Tree dump record tag for an interior node
pub const INTERIOR_TAG: u8 = b'I';

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BuildTreeError {
    #[error(transparent)]
    PriorityQueueError(#[from] PriorityQueueError),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RebuildTreeError {
    #[error("Unknown tag 0x{tag:02X} at offset {offset} of the tree dump")]
    UnknownTag { tag: u8, offset: usize },
    #[error("Leaf tag at offset {offset} is missing its symbol byte")]
    MissingLeafSymbol { offset: usize },
    #[error("Interior tag at offset {offset} needs two nodes to join, but only {available} are available")]
    NotEnoughNodes { offset: usize, available: usize },
    #[error("Tree dump describes {roots} disconnected trees instead of one")]
    DisconnectedNodes { roots: usize },
    #[error(transparent)]
    StackError(#[from] StackError),
}

/// Build the huffman tree for the symbols counted in `histogram`.
///
/// Returns `None` if the histogram is empty. If only one distinct symbol was counted the tree is a single leaf.
pub fn build_tree(histogram: &Histogram) -> Result<Option<Box<Node>>, BuildTreeError> {
    let mut queue = PriorityQueue::with_capacity(ALPHABET_SIZE);
    for (symbol, frequency) in histogram.iter_nonzero() {
        queue.insert(Node::leaf(symbol, frequency))?;
    }

    // join the two rarest subtrees until a single root is left
    while queue.len() >= 2 {
        let left = queue.extract_min()?;
        let right = queue.extract_min()?;
        queue.insert(Node::join(left, right))?;
    }

    if queue.is_empty() {
        return Ok(None);
    }
    let root = queue.extract_min()?;
    tracing::debug!(
        leaves = root.leaf_count(),
        depth = root.depth(),
        "built huffman tree"
    );
    Ok(Some(root))
}

/// Maps every symbol to its code
#[derive(Clone)]
pub struct CodeTable {
    codes: [Option<Code>; ALPHABET_SIZE],
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeTable {
    pub fn new() -> Self {
        CodeTable {
            codes: [None; ALPHABET_SIZE],
        }
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes[usize::from(symbol)].as_ref()
    }

    pub fn set(&mut self, symbol: u8, code: Code) {
        self.codes[usize::from(symbol)] = Some(code);
    }

    /// Number of symbols that have a code
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|code| code.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        (0..=u8::MAX).filter_map(move |symbol| self.get(symbol).map(|code| (symbol, code)))
    }

    /// Total number of bits the codes need to encode the data counted in `histogram`
    pub fn encoded_bits(&self, histogram: &Histogram) -> u64 {
        self.iter()
            .map(|(symbol, code)| histogram.count(symbol) * code.len() as u64)
            .sum()
    }
}

impl core::fmt::Debug for CodeTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Walk the tree and record the path to every leaf.
///
/// A tree that consists of a single leaf gets the one bit code `0` for its symbol,
/// so every occurrence of the symbol still takes up one bit in the payload.
pub fn build_codes(root: Option<&Node>) -> Result<CodeTable, CodeError> {
    let mut table = CodeTable::new();
    let root = match root {
        Some(root) => root,
        None => return Ok(table),
    };

    let mut path = Code::new();
    if root.is_leaf() {
        path.push_bit(false)?;
        table.set(root.symbol, path);
        return Ok(table);
    }

    // (node, bit that led to the node, depth of the node)
    let mut pending: Vec<(&Node, Option<bool>, usize)> = vec![(root, None, 0)];
    while let Some((node, bit, depth)) = pending.pop() {
        if let Some(bit) = bit {
            // unwind the path back to this node's parent
            while path.len() >= depth {
                path.pop_bit()?;
            }
            path.push_bit(bit)?;
        }

        if node.is_leaf() {
            table.set(node.symbol, path);
        } else {
            if let Some(right) = node.right() {
                pending.push((right, Some(true), depth + 1));
            }
            if let Some(left) = node.left() {
                pending.push((left, Some(false), depth + 1));
            }
        }
    }

    Ok(table)
}

/// Size in bytes of the dump of a tree with `leaves` leaves
pub fn tree_dump_size(leaves: usize) -> usize {
    if leaves == 0 {
        0
    } else {
        3 * leaves - 1
    }
}

/// Dump the tree in post-order: children first, left before right.
///
/// Leaves are written as [LEAF_TAG] followed by the symbol, interior nodes as a lone [INTERIOR_TAG].
pub fn serialize_tree(root: Option<&Node>) -> Vec<u8> {
    let root = match root {
        Some(root) => root,
        None => return Vec::new(),
    };

    // the reverse of a (self, right, left) pre-order is the (left, right, self) post-order
    let mut pending = vec![root];
    let mut reversed = Vec::new();
    while let Some(node) = pending.pop() {
        reversed.push(node);
        pending.extend(node.left());
        pending.extend(node.right());
    }

    let mut dump = Vec::with_capacity(tree_dump_size(root.leaf_count()));
    for node in reversed.into_iter().rev() {
        if node.is_leaf() {
            dump.push(LEAF_TAG);
            dump.push(node.symbol);
        } else {
            dump.push(INTERIOR_TAG);
        }
    }
    dump
}

/// Reassemble a tree from a dump produced by [serialize_tree].
///
/// Frequencies are not part of the dump, every rebuilt leaf has a frequency of 1.
pub fn rebuild_tree(dump: &[u8]) -> Result<Option<Box<Node>>, RebuildTreeError> {
    use RebuildTreeError as err;

    if dump.is_empty() {
        return Ok(None);
    }

    // every record is at least one byte, so the stack never needs more slots than the dump has bytes
    let mut stack = Stack::with_capacity(dump.len());
    let mut offset = 0;
    while offset < dump.len() {
        match dump[offset] {
            LEAF_TAG => {
                let symbol = *dump
                    .get(offset + 1)
                    .ok_or(err::MissingLeafSymbol { offset })?;
                stack.push(Node::leaf(symbol, 1))?;
                offset += 2;
            }
            INTERIOR_TAG => {
                if stack.len() < 2 {
                    return Err(err::NotEnoughNodes {
                        offset,
                        available: stack.len(),
                    });
                }
                let right = stack.pop()?;
                let left = stack.pop()?;
                stack.push(Node::join(left, right))?;
                offset += 1;
            }
            tag => return Err(err::UnknownTag { tag, offset }),
        }
    }

    if stack.len() != 1 {
        return Err(err::DisconnectedNodes { roots: stack.len() });
    }
    Ok(Some(stack.pop()?))
}

/// Free the tree. Calling this on an already deleted tree does nothing.
pub fn delete_tree(root: &mut Option<Box<Node>>) {
    drop(root.take());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram_of(data: &[u8]) -> Histogram {
        Histogram::from_bytes(data)
    }

    #[test]
    fn empty_histogram_has_no_tree() {
        let tree = build_tree(&Histogram::new()).unwrap();
        assert!(tree.is_none());
        assert!(build_codes(None).unwrap().is_empty());
        assert!(serialize_tree(None).is_empty());
        assert!(rebuild_tree(&[]).unwrap().is_none());
    }

    #[test]
    fn two_symbols() {
        let histogram = histogram_of(b"AAAAAAAAB");
        let tree = build_tree(&histogram).unwrap().unwrap();
        assert!(!tree.is_leaf());
        assert_eq!(tree.frequency, 9);
        assert!(tree.left().unwrap().is_leaf());
        assert!(tree.right().unwrap().is_leaf());

        let table = build_codes(Some(&tree)).unwrap();
        assert_eq!(table.len(), 2);
        let a = table.get(b'A').unwrap();
        let b = table.get(b'B').unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_ne!(a.bit(0), b.bit(0));
        assert_eq!(table.encoded_bits(&histogram), 9);
    }

    #[test]
    fn single_symbol_gets_one_bit() {
        let tree = build_tree(&histogram_of(b"ZZZZ")).unwrap().unwrap();
        assert!(tree.is_leaf());
        assert_eq!(tree.symbol, b'Z');
        assert_eq!(tree.frequency, 4);

        let table = build_codes(Some(&tree)).unwrap();
        assert_eq!(table.len(), 1);
        let code = table.get(b'Z').unwrap();
        assert_eq!(code.len(), 1);
        assert!(!code.bit(0));

        assert_eq!(serialize_tree(Some(&tree)), vec![LEAF_TAG, b'Z']);
    }

    #[test]
    fn known_code_lengths() {
        // a: 45, b: 13, c: 12, d: 16, e: 9, f: 5 is the textbook example with lengths 1, 3, 3, 3, 4, 4
        let mut histogram = Histogram::new();
        for (symbol, count) in [(b'a', 45), (b'b', 13), (b'c', 12), (b'd', 16), (b'e', 9), (b'f', 5)].iter() {
            histogram.add(*symbol, *count).unwrap();
        }
        let tree = build_tree(&histogram).unwrap();
        let table = build_codes(tree.as_deref()).unwrap();
        let lengths: Vec<usize> = b"abcdef"
            .iter()
            .map(|symbol| table.get(*symbol).unwrap().len())
            .collect();
        assert_eq!(lengths, vec![1, 3, 3, 3, 4, 4]);
        assert_eq!(table.encoded_bits(&histogram), 224);
    }

    #[test]
    fn dump_layout_is_post_order() {
        // ((x, y), z): x and y are rarest and get joined first
        let mut histogram = Histogram::new();
        histogram.add(b'x', 1).unwrap();
        histogram.add(b'y', 1).unwrap();
        histogram.add(b'z', 5).unwrap();
        let tree = build_tree(&histogram).unwrap();
        let dump = serialize_tree(tree.as_deref());
        assert_eq!(
            dump,
            vec![LEAF_TAG, b'x', LEAF_TAG, b'y', INTERIOR_TAG, LEAF_TAG, b'z', INTERIOR_TAG]
        );
        assert_eq!(dump.len(), tree_dump_size(3));
    }

    #[test]
    fn dump_size_matches_leaf_count() {
        let mut histogram = Histogram::new();
        for symbol in 0..=u8::MAX {
            histogram.add(symbol, u64::from(symbol) + 1).unwrap();
        }
        let tree = build_tree(&histogram).unwrap();
        assert_eq!(serialize_tree(tree.as_deref()).len(), tree_dump_size(256));
        assert_eq!(tree_dump_size(256), 767);
    }

    #[test]
    fn rebuilt_tree_yields_same_codes() {
        let histogram = histogram_of(b"the quick brown fox jumps over the lazy dog");
        let tree = build_tree(&histogram).unwrap();
        let codes = build_codes(tree.as_deref()).unwrap();

        let rebuilt = rebuild_tree(&serialize_tree(tree.as_deref())).unwrap();
        let rebuilt_codes = build_codes(rebuilt.as_deref()).unwrap();

        assert_eq!(codes.len(), rebuilt_codes.len());
        for (symbol, code) in codes.iter() {
            assert_eq!(Some(code), rebuilt_codes.get(symbol), "symbol {}", symbol);
        }
    }

    #[test]
    fn rejects_malformed_dumps() {
        assert_eq!(
            rebuild_tree(&[LEAF_TAG, b'a', b'X']).unwrap_err(),
            RebuildTreeError::UnknownTag { tag: b'X', offset: 2 }
        );
        assert_eq!(
            rebuild_tree(&[LEAF_TAG, b'a', LEAF_TAG]).unwrap_err(),
            RebuildTreeError::MissingLeafSymbol { offset: 2 }
        );
        assert_eq!(
            rebuild_tree(&[LEAF_TAG, b'a', INTERIOR_TAG]).unwrap_err(),
            RebuildTreeError::NotEnoughNodes {
                offset: 2,
                available: 1
            }
        );
        assert_eq!(
            rebuild_tree(&[LEAF_TAG, b'a', LEAF_TAG, b'b']).unwrap_err(),
            RebuildTreeError::DisconnectedNodes { roots: 2 }
        );
    }

    #[test]
    fn leaf_tag_as_symbol() {
        // symbols that look like tags are only interpreted by position
        let dump = [LEAF_TAG, INTERIOR_TAG, LEAF_TAG, LEAF_TAG, INTERIOR_TAG];
        let tree = rebuild_tree(&dump).unwrap().unwrap();
        assert_eq!(tree.left().unwrap().symbol, INTERIOR_TAG);
        assert_eq!(tree.right().unwrap().symbol, LEAF_TAG);
        assert_eq!(serialize_tree(Some(&tree)), dump.to_vec());
    }

    #[test]
    fn delete_is_idempotent() {
        let mut tree = build_tree(&histogram_of(b"abc")).unwrap();
        assert!(tree.is_some());
        delete_tree(&mut tree);
        assert!(tree.is_none());
        delete_tree(&mut tree);
        assert!(tree.is_none());
    }

    #[test]
    fn skewed_tree_reaches_max_depth() {
        // fibonacci counts produce the deepest possible tree
        let mut histogram = Histogram::new();
        let (mut a, mut b) = (1u64, 1u64);
        for symbol in 0..40u8 {
            histogram.add(symbol, a).unwrap();
            let next = a + b;
            a = b;
            b = next;
        }
        let tree = build_tree(&histogram).unwrap();
        assert_eq!(tree.as_ref().unwrap().depth(), 39);
        let table = build_codes(tree.as_deref()).unwrap();
        let longest = table.iter().map(|(_, code)| code.len()).max().unwrap();
        assert_eq!(longest, 39);
    }
}
