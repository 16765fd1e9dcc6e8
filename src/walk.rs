//! Iterative tree walks.  Every walk keeps its worklist in a [`Deque`]
//! instead of on the native call stack, so the depth of a tree is
//! bounded only by available heap memory.
//!
//! Before a node is visited or expanded, the skip predicates registered
//! on the node the walk was started from are applied to it.  A pruned
//! node is never expanded, so its whole subtree is left out.
//!
//! The walk function may abort a walk at any point by returning an
//! error, which is handed back to the caller unchanged.

use crate::{deque::Deque, node::Node};
use std::convert::Infallible;

impl<T> Node<T> {
    /// In-order walk: Left, Node, Right.
    pub fn walk_in_order<'a, E>(
        &'a self,
        mut walk_fn: impl FnMut(&'a Node<T>) -> Result<(), E>,
    ) -> Result<(), E> {
        let stack = Deque::new();
        let mut cursor: Option<&'a Node<T>> = Some(self);
        while cursor.is_some() || !stack.is_empty() {
            while let Some(node) = cursor {
                if self.should_skip(node) {
                    // Abandon this descent.  Nodes already on the stack
                    // are still visited.
                    cursor = None;
                    break;
                }
                stack.push_front(node);
                cursor = node.left();
            }
            if let Ok(node) = stack.pop_front() {
                visit(&mut walk_fn, node)?;
                cursor = node.right();
            }
        }
        Ok(())
    }

    /// Pre-order walk: Node, Left, Right.
    pub fn walk_pre_order<'a, E>(
        &'a self,
        mut walk_fn: impl FnMut(&'a Node<T>) -> Result<(), E>,
    ) -> Result<(), E> {
        let stack = Deque::new();
        stack.push_front(self);
        while let Ok(node) = stack.pop_front() {
            if self.should_skip(node) {
                continue;
            }
            visit(&mut walk_fn, node)?;
            // The left child is pushed last so that it is popped first.
            if let Some(right) = node.right() {
                stack.push_front(right);
            }
            if let Some(left) = node.left() {
                stack.push_front(left);
            }
        }
        Ok(())
    }

    /// Post-order walk: Left, Right, Node.
    pub fn walk_post_order<'a, E>(
        &'a self,
        mut walk_fn: impl FnMut(&'a Node<T>) -> Result<(), E>,
    ) -> Result<(), E> {
        let stack = Deque::new();
        let output = Deque::new();
        stack.push_front(self);
        // Node, Right, Left order, reversed by pushing onto `output`.
        while let Ok(node) = stack.pop_front() {
            if self.should_skip(node) {
                continue;
            }
            if let Some(left) = node.left() {
                stack.push_front(left);
            }
            if let Some(right) = node.right() {
                stack.push_front(right);
            }
            output.push_front(node);
        }
        while let Ok(node) = output.pop_front() {
            visit(&mut walk_fn, node)?;
        }
        Ok(())
    }

    /// Level-order (breadth-first) walk.
    pub fn walk_level_order<'a, E>(
        &'a self,
        mut walk_fn: impl FnMut(&'a Node<T>) -> Result<(), E>,
    ) -> Result<(), E> {
        let queue = Deque::new();
        queue.push_back(self);
        while let Ok(node) = queue.pop_front() {
            if self.should_skip(node) {
                continue;
            }
            visit(&mut walk_fn, node)?;
            if let Some(left) = node.left() {
                queue.push_back(left);
            }
            if let Some(right) = node.right() {
                queue.push_back(right);
            }
        }
        Ok(())
    }

    #[inline]
    pub fn in_order(&self) -> impl DoubleEndedIterator<Item = &Node<T>> + '_ {
        collect_walk(|walk_fn| self.walk_in_order(walk_fn))
    }

    #[inline]
    pub fn pre_order(&self) -> impl DoubleEndedIterator<Item = &Node<T>> + '_ {
        collect_walk(|walk_fn| self.walk_pre_order(walk_fn))
    }

    #[inline]
    pub fn post_order(&self) -> impl DoubleEndedIterator<Item = &Node<T>> + '_ {
        collect_walk(|walk_fn| self.walk_post_order(walk_fn))
    }

    #[inline]
    pub fn level_order(&self) -> impl DoubleEndedIterator<Item = &Node<T>> + '_ {
        collect_walk(|walk_fn| self.walk_level_order(walk_fn))
    }
}

#[inline(always)]
fn visit<'a, T, E>(
    walk_fn: &mut impl FnMut(&'a Node<T>) -> Result<(), E>,
    node: &'a Node<T>,
) -> Result<(), E> {
    let result = walk_fn(node);
    if result.is_err() {
        tracing::debug!(node = %node.id(), "walk aborted by walk function");
    }
    result
}

fn collect_walk<'a, T: 'a>(
    walk: impl FnOnce(&mut dyn FnMut(&'a Node<T>) -> Result<(), Infallible>) -> Result<(), Infallible>,
) -> std::vec::IntoIter<&'a Node<T>> {
    let mut output = Vec::new();
    let Ok(()) = walk(&mut |node| {
        output.push(node);
        Ok(())
    });
    output.into_iter()
}
