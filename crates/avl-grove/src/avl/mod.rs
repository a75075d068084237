//! Arena-backed AVL tree: node type, balancing engine, set container.

pub mod set;
pub mod types;
pub mod util;

pub use set::AvlSet;
pub use types::{AvlNode, AvlNodeLike, ABSENT_HEIGHT};
pub use util::{
    assert_tree, insert_left, insert_right, locate, print, rebalance, remove, rotate_left,
    rotate_right, update_height, InvariantError,
};
