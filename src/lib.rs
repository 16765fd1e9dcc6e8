//! A generic binary tree whose traversals, shape predicates and search
//! all run on an explicit worklist rather than on the native call stack.
//!
//! ```
//! use bintree::bintree;
//!
//! let mut root = bintree!(1, (2, (4), (5)), (3));
//! let in_order: Vec<i32> = root.in_order().map(|node| node.value).collect();
//! assert_eq!(in_order, [4, 2, 5, 1, 3]);
//! assert!(root.is_complete() && !root.is_perfect());
//!
//! root.add_skip_node_fn(|node| node.value == 2);
//! assert_eq!(root.size(), 2);
//! ```
#![forbid(unsafe_code)]

pub mod deque;
pub mod error;
pub mod graphviz;
pub mod node;
pub mod node_id;
mod shape;
mod walk;

#[rustfmt::skip]
pub use crate::{
    deque::Deque,
    error::{Error, Result},
    graphviz::{DotAttrs, DotGraph},
    node::{Node, SkipNodeFn},
    node_id::NodeId,
};
