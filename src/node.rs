//! The tree vertex.  A `Node<T>` exclusively owns its children, so
//! a tree can never share subtrees or contain cycles.

use crate::{graphviz::DotAttrs, node_id::NodeId};

/// A predicate deciding whether a node, and with it the rest of its
/// subtree, is left out of a walk.
pub type SkipNodeFn<T> = Box<dyn Fn(&Node<T>) -> bool + Send + Sync>;

#[macro_export]
/// Declaratively construct `Node<T>` trees.
/// `bintree!(v)` is a leaf, and `bintree!(v, left, right)` has
/// children given as either `_` (absent) or a parenthesised subtree:
///
/// ```
/// use bintree::bintree;
/// let root = bintree!(1, (2, (4), (5)), (3));
/// assert_eq!(root.size(), 5);
/// let lopsided = bintree!(10, _, (14, (13), _));
/// assert!(lopsided.is_degenerate());
/// ```
macro_rules! bintree {
    (@child _) => { None };
    (@child ($($subtree:tt)+)) => {
        Some(Box::new($crate::bintree!($($subtree)+)))
    };
    ($value:expr $(,)?) => { $crate::Node::new($value) };
    ($value:expr, $left:tt, $right:tt $(,)?) => {{
        let mut node = $crate::Node::new($value);
        node.left = $crate::bintree!(@child $left);
        node.right = $crate::bintree!(@child $right);
        node
    }};
}

pub use bintree;

#[derive(derive_more::Deref, derive_more::DerefMut)]
pub struct Node<T> {
    #[deref]
    #[deref_mut]
    pub value: T,
    pub left: Option<Box<Node<T>>>,
    pub right: Option<Box<Node<T>>>,
    id: NodeId,
    skip_fns: Vec<SkipNodeFn<T>>,
    attrs: DotAttrs,
}

impl<T> Node<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            left: None,
            right: None,
            id: NodeId::next(),
            skip_fns: vec![],
            attrs: DotAttrs::default(),
        }
    }

    #[inline(always)]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Make a fresh node holding `value` the left child of `self`,
    /// dropping any previous left subtree, and return it.
    pub fn insert_left(&mut self, value: T) -> &mut Node<T> {
        self.left.insert(Box::new(Node::new(value)))
    }

    /// Make a fresh node holding `value` the right child of `self`,
    /// dropping any previous right subtree, and return it.
    pub fn insert_right(&mut self, value: T) -> &mut Node<T> {
        self.right.insert(Box::new(Node::new(value)))
    }

    #[inline]
    pub fn left(&self) -> Option<&Node<T>> {
        self.left.as_deref()
    }

    #[inline]
    pub fn right(&self) -> Option<&Node<T>> {
        self.right.as_deref()
    }

    #[inline]
    pub fn count_children(&self) -> usize {
        usize::from(self.left.is_some()) + usize::from(self.right.is_some())
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Register a skip predicate.  Only the predicates of the node a walk
    /// is started from are consulted, in registration order, and the
    /// first one returning `true` prunes the candidate node.
    pub fn add_skip_node_fn(
        &mut self,
        skip_fn: impl Fn(&Node<T>) -> bool + Send + Sync + 'static,
    ) {
        self.skip_fns.push(Box::new(skip_fn));
    }

    #[inline]
    pub fn count_skip_node_fns(&self) -> usize {
        self.skip_fns.len()
    }

    pub(crate) fn should_skip(&self, candidate: &Node<T>) -> bool {
        let skip = self.skip_fns.iter().any(|skip_fn| skip_fn(candidate));
        if skip {
            tracing::trace!(root = %self.id, node = %candidate.id, "pruning node");
        }
        skip
    }

    /// Set a Dot attribute, replacing any previous value for `name`.
    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    #[inline]
    pub fn attributes(&self) -> &DotAttrs {
        &self.attrs
    }

    /// The attributes rendered as space separated `name=value` pairs.
    pub fn dot_attributes(&self) -> String {
        self.attrs.to_string()
    }
}

impl<T> From<T> for Node<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

// Dropping a `Box<Node<T>>` chain recursively would exhaust the native
// stack on deep trees, so detach the subtrees and release them one by one.
impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node<T>>> = Vec::new();
        stack.extend(self.left.take());
        stack.extend(self.right.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ds = f.debug_struct("Node");
        let ds = ds.field("id", &self.id);
        let ds = ds.field("value", &self.value);
        let ds = ds.field("left", &self.left);
        let ds = ds.field("right", &self.right);
        let ds = ds.field("skip_fns", &self.skip_fns.len());
        let ds = ds.field("attrs", &self.attrs);
        ds.finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_children() {
        let mut root = Node::new(1);
        assert!(root.is_leaf());
        let two = root.insert_left(2);
        two.insert_right(5);
        root.insert_right(3);
        assert!(!root.is_leaf());
        assert_eq!(root.count_children(), 2);
        assert_eq!(root.left().map(|n| n.value), Some(2));
        assert_eq!(root.right().map(|n| n.value), Some(3));
        assert_eq!(root.left().and_then(Node::right).map(|n| n.value), Some(5));
    }

    #[test]
    fn insert_replaces_previous_child() {
        let mut root = Node::new("root");
        root.insert_left("old").insert_left("grandchild");
        let old_id = root.left().map(Node::id);
        root.insert_left("new");
        let new = root.left().map(|n| (n.id(), n.value, n.is_leaf()));
        assert_eq!(new.map(|(_, v, leaf)| (v, leaf)), Some(("new", true)));
        assert_ne!(new.map(|(id, _, _)| id), old_id);
    }

    #[test]
    fn leaf_nodes() {
        let mut root = bintree!(1, (2), _);
        assert!(!root.is_leaf());
        assert!(root.left().is_some_and(Node::is_leaf));
        root.left = None;
        assert!(root.is_leaf());
    }

    #[test]
    fn derefs_to_value() {
        let mut node = Node::new(String::from("abc"));
        assert_eq!(node.len(), 3);
        node.push('d');
        assert_eq!(*node, "abcd");
    }

    #[test]
    fn macro_builds_expected_shape() {
        let root = bintree!(8, (3, (1), (6, (4), (7))), (10, _, (14, (13), _)));
        assert_eq!(root.value, 8);
        let ten = root.right().map(|n| (n.value, n.left().is_none()));
        assert_eq!(ten, Some((10, true)));
        let thirteen = root.right()
            .and_then(Node::right)
            .and_then(Node::left)
            .map(|n| n.value);
        assert_eq!(thirteen, Some(13));
    }

    #[test]
    fn attributes() {
        let mut root = Node::new(1);
        assert_eq!(root.dot_attributes(), "");
        root.add_attribute("color", "green");
        assert_eq!(root.dot_attributes(), "color=green");
        root.add_attribute("color", "red");
        root.add_attribute("shape", "box");
        assert_eq!(root.dot_attributes(), "color=red shape=box");
        assert_eq!(root.attributes().len(), 2);
    }

    #[test]
    fn skip_fns_are_registered_in_order() {
        let mut root = bintree!(1, (2), (3));
        root.add_skip_node_fn(|node| node.value == 2);
        root.add_skip_node_fn(|node| node.value == 3);
        assert_eq!(root.count_skip_node_fns(), 2);
        assert!(root.left().is_some_and(|n| root.should_skip(n)));
        assert!(root.right().is_some_and(|n| root.should_skip(n)));
        assert!(!root.should_skip(&root));
    }

    #[test]
    fn dropping_a_deep_tree_does_not_recurse() {
        let mut root = Node::new(0u32);
        let mut cursor = &mut root;
        for i in 1..200_000 {
            cursor = cursor.insert_left(i);
        }
        drop(root);
    }
}
