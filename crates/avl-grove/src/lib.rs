//! Arena-backed AVL tree set.
//!
//! A self-balancing binary search tree over unique, totally-ordered
//! values. Instead of heap pointers, every link is an `Option<u32>`
//! index into a [`Vec`]-backed arena: child links stay logically owning
//! while each node's parent back-link is a plain index, so the cyclic
//! parent/child reference graph never needs cycle-aware reclamation.
//!
//! Every mutation funnels through the same pipeline: locate the edit
//! site, perform the structural edit, recompute cached heights up to the
//! root, then rebalance the root path. Reads (membership, min/max,
//! in-order iteration) never rebalance.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`types`] | [`Node`] / [`ValueNode`] link traits |
//! | [`util`] | in-order walkers and lookup over any [`Node`] |
//! | [`avl`] | the AVL node, balancing engine, and [`AvlSet`] container |
//!
//! ```
//! use avl_grove::AvlSet;
//!
//! let mut set: AvlSet<i32> = [50, 40, 60, 30, 70].into_iter().collect();
//! set.insert(45);
//! assert!(set.remove(&30));
//! assert_eq!(set.min(), Some(&40));
//! assert_eq!(set.in_order_values(), vec![40, 45, 50, 60, 70]);
//! ```

pub mod avl;
pub mod types;
pub mod util;

pub use avl::{AvlNode, AvlNodeLike, AvlSet, InvariantError, ABSENT_HEIGHT};
pub use types::{Node, ValueNode};
pub use util::{find, first, last, next, size};
