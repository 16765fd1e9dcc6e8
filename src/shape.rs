//! Size, height, shape classification and search.
//!
//! `size()` and `is_binary_search_tree()` are defined in terms of the
//! in-order walk and therefore honour the skip predicates of `self`.
//! Everything else here describes the whole structure below `self`.

use crate::{deque::Deque, node::Node};
use std::cmp::Ordering;
use std::convert::Infallible;

/// Raised inside an in-order walk to stop at the first ordering violation.
struct OutOfOrder;

impl<T> Node<T> {
    /// The number of nodes visited by an in-order walk from `self`.
    pub fn size(&self) -> usize {
        let mut size = 0;
        let Ok(()) = self.walk_in_order(|_| {
            size += 1;
            Ok::<(), Infallible>(())
        });
        size
    }

    /// The length of the longest path from `self` down to a leaf.
    /// A leaf has height 0.
    pub fn height(&self) -> usize {
        let stack = Deque::new();
        stack.push_front((self, 0usize));
        let mut max_height = 0;
        while let Ok((node, height)) = stack.pop_front() {
            max_height = max_height.max(height);
            if let Some(right) = node.right() {
                stack.push_front((right, height + 1));
            }
            if let Some(left) = node.left() {
                stack.push_front((left, height + 1));
            }
        }
        max_height
    }

    /// Return `true` if every node has either 0 or 2 children.
    pub fn is_full(&self) -> bool {
        let stack = Deque::new();
        stack.push_front(self);
        while let Ok(node) = stack.pop_front() {
            match (node.left(), node.right()) {
                (None, None) => continue,
                (Some(left), Some(right)) => {
                    stack.push_front(right);
                    stack.push_front(left);
                }
                _ => return false,
            }
        }
        true
    }

    /// Return `true` if every node has at most 1 child,
    /// i.e. the tree is shaped like a linked list.
    pub fn is_degenerate(&self) -> bool {
        let stack = Deque::new();
        stack.push_front(self);
        while let Ok(node) = stack.pop_front() {
            match (node.left(), node.right()) {
                (Some(_), Some(_)) => return false,
                (Some(child), None) | (None, Some(child)) => stack.push_front(child),
                (None, None) => {}
            }
        }
        true
    }

    /// Return `true` if, for every node, the heights of its left and
    /// right subtrees differ by no more than 1.
    pub fn is_balanced(&self) -> bool {
        // Reverse pre-order visits both subtrees of a node before the node
        // itself, with the left subtree finishing last.  Each finished
        // subtree leaves its height on `heights`, so the left height is on
        // top of the right one by the time their parent is reached.
        let mut heights: Vec<usize> = Vec::new();
        for node in self.structure_pre_order().into_iter().rev() {
            let left = node.left().and_then(|_| heights.pop()).map_or(0, |h| h + 1);
            let right = node.right().and_then(|_| heights.pop()).map_or(0, |h| h + 1);
            if left.abs_diff(right) > 1 {
                return false;
            }
            heights.push(left.max(right));
        }
        true
    }

    /// Return `true` if every level is completely filled, except possibly
    /// the last one, which is filled from the left without gaps.
    pub fn is_complete(&self) -> bool {
        let queue = Deque::new();
        queue.push_back(self);
        let mut seen_gap = false;
        while let Ok(node) = queue.pop_front() {
            for child in [node.left(), node.right()] {
                match child {
                    Some(_) if seen_gap => return false,
                    Some(child) => queue.push_back(child),
                    None => seen_gap = true,
                }
            }
        }
        true
    }

    /// Return `true` if every internal node has 2 children and all
    /// leaves are at the same depth.
    pub fn is_perfect(&self) -> bool {
        // A perfect tree of height `h` holds exactly `2^(h+1) - 1` nodes.
        let height = self.height();
        self.structure_pre_order().len()
            .checked_add(1)
            .is_some_and(|n| n.is_power_of_two() && n.trailing_zeros() as usize == height + 1)
    }

    /// Return `true` if the in-order walk from `self` yields values in
    /// strictly increasing order according to `cmp`.
    ///
    /// `cmp` must be a consistent total order.  This is not checked; an
    /// inconsistent `cmp` produces an arbitrary answer.
    pub fn is_binary_search_tree(&self, mut cmp: impl FnMut(&T, &T) -> Ordering) -> bool {
        let mut previous: Option<&T> = None;
        self.walk_in_order(|node| {
            if let Some(previous) = previous {
                if cmp(previous, &node.value) != Ordering::Less {
                    return Err(OutOfOrder);
                }
            }
            previous = Some(&node.value);
            Ok(())
        })
        .is_ok()
    }

    #[inline]
    pub fn is_bst(&self) -> bool
    where
        T: Ord,
    {
        self.is_binary_search_tree(T::cmp)
    }

    /// Return the first node in pre-order for which `predicate` holds.
    /// Skip predicates are not consulted.
    pub fn find_node(&self, mut predicate: impl FnMut(&Node<T>) -> bool) -> Option<&Node<T>> {
        let stack = Deque::new();
        stack.push_front(self);
        while let Ok(node) = stack.pop_front() {
            if predicate(node) {
                return Some(node);
            }
            if let Some(right) = node.right() {
                stack.push_front(right);
            }
            if let Some(left) = node.left() {
                stack.push_front(left);
            }
        }
        None
    }

    /// Like [`Node::find_node`], but hands out the match mutably.
    pub fn find_node_mut(
        &mut self,
        mut predicate: impl FnMut(&Node<T>) -> bool,
    ) -> Option<&mut Node<T>> {
        let stack = Deque::new();
        stack.push_front(self);
        while let Ok(node) = stack.pop_front() {
            if predicate(&*node) {
                return Some(node);
            }
            let (left, right) = (&mut node.left, &mut node.right);
            if let Some(right) = right.as_deref_mut() {
                stack.push_front(right);
            }
            if let Some(left) = left.as_deref_mut() {
                stack.push_front(left);
            }
        }
        None
    }

    /// Every node below and including `self` in pre-order,
    /// regardless of skip predicates.
    fn structure_pre_order(&self) -> Vec<&Node<T>> {
        let mut output = vec![];
        let stack = Deque::new();
        stack.push_front(self);
        while let Ok(node) = stack.pop_front() {
            output.push(node);
            if let Some(right) = node.right() {
                stack.push_front(right);
            }
            if let Some(left) = node.left() {
                stack.push_front(left);
            }
        }
        output
    }
}
