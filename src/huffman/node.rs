/// Placeholder symbol carried by interior nodes.
pub const INTERIOR_SYMBOL: u8 = b'$';

/// A node of a huffman tree.
///
/// A node is a leaf if and only if it has no children. Interior nodes always have both children,
/// and their frequency is the sum of their children's frequencies.
#[derive(Debug, PartialEq, Eq)]
pub struct Node {
    pub symbol: u8,
    pub frequency: u64,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    pub fn leaf(symbol: u8, frequency: u64) -> Box<Node> {
        Box::new(Node {
            symbol,
            frequency,
            left: None,
            right: None,
        })
    }

    /// Create the parent of `left` and `right`
    pub fn join(left: Box<Node>, right: Box<Node>) -> Box<Node> {
        Box::new(Node {
            symbol: INTERIOR_SYMBOL,
            frequency: left.frequency.saturating_add(right.frequency),
            left: Some(left),
            right: Some(right),
        })
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }

    /// Follow one bit of a code: `false` descends left, `true` descends right
    pub fn child(&self, bit: bool) -> Option<&Node> {
        if bit {
            self.right()
        } else {
            self.left()
        }
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if node.is_leaf() {
                count += 1;
            }
            pending.extend(node.left());
            pending.extend(node.right());
        }
        count
    }

    /// Length of the longest root to leaf path
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut pending = vec![(self, 0)];
        while let Some((node, depth)) = pending.pop() {
            max_depth = max_depth.max(depth);
            if let Some(left) = node.left() {
                pending.push((left, depth + 1));
            }
            if let Some(right) = node.right() {
                pending.push((right, depth + 1));
            }
        }
        max_depth
    }
}

impl Drop for Node {
    // Tears the subtree down with an explicit stack. The default drop glue recurses once per level,
    // and a tree over skewed frequencies is up to 255 levels deep.
    fn drop(&mut self) {
        let mut pending: Vec<Box<Node>> = Vec::new();
        pending.extend(self.left.take());
        pending.extend(self.right.take());
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}
