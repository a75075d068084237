use std::fmt;

use crate::util::{find, first, last, next, size};

use super::types::{AvlNode, ABSENT_HEIGHT};
use super::util::{
    assert_tree, insert_left, insert_right, locate, print, remove, InvariantError,
};

fn default_comparator<V: Ord>(a: &V, b: &V) -> i32 {
    if a == b {
        0
    } else if a < b {
        -1
    } else {
        1
    }
}

/// AVL tree set of unique values backed by a dense arena.
///
/// Values are kept in a self-balancing binary search tree: for every
/// node the heights of its subtrees differ by at most one, so every
/// operation is O(log n). Duplicates are silently ignored on insertion.
///
/// Removal compacts the arena, so node indices handed out by
/// [`first`](AvlSet::first) / [`next`](AvlSet::next) are only valid
/// until the next mutation.
pub struct AvlSet<V, C = fn(&V, &V) -> i32>
where
    C: Fn(&V, &V) -> i32,
{
    pub root: Option<u32>,
    comparator: C,
    arena: Vec<AvlNode<V>>,
}

impl<V> AvlSet<V, fn(&V, &V) -> i32>
where
    V: Ord,
{
    pub fn new() -> Self {
        Self::with_comparator(default_comparator::<V>)
    }
}

impl<V> Default for AvlSet<V, fn(&V, &V) -> i32>
where
    V: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, C> AvlSet<V, C>
where
    C: Fn(&V, &V) -> i32,
{
    /// A set ordered by `comparator`, a strict total order returning
    /// negative / zero / positive for less / equal / greater.
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            root: None,
            comparator,
            arena: Vec::new(),
        }
    }

    #[inline]
    fn compare(&self, a: &V, b: &V) -> i32 {
        (self.comparator)(a, b)
    }

    /// Inserts `value`, silently ignoring it when already present.
    pub fn insert(&mut self, value: V) {
        let Some(root) = self.root else {
            self.arena.push(AvlNode::new(value));
            self.root = Some((self.arena.len() - 1) as u32);
            return;
        };

        let spot = locate(&self.arena, root, &value, &self.comparator);
        let cmp = self.compare(&value, &self.arena[spot as usize].v);
        if cmp == 0 {
            return;
        }

        let n = self.arena.len() as u32;
        self.arena.push(AvlNode::new(value));
        let new_root = if cmp < 0 {
            insert_left(&mut self.arena, root, n, spot)
        } else {
            insert_right(&mut self.arena, root, n, spot)
        };
        self.root = Some(new_root);
    }

    /// Removes `value`. Returns whether a matching node was found and
    /// removed.
    pub fn remove(&mut self, value: &V) -> bool {
        let Some(root) = self.root else {
            return false;
        };

        let n = locate(&self.arena, root, value, &self.comparator);
        if self.compare(value, &self.arena[n as usize].v) != 0 {
            return false;
        }

        self.root = remove(&mut self.arena, root, n);
        self.release(n);
        true
    }

    /// Frees slot `n` by swap-removing it and rewiring the links of the
    /// node that moved into its place, keeping the arena dense.
    fn release(&mut self, n: u32) {
        let moved = (self.arena.len() - 1) as u32;
        self.arena.swap_remove(n as usize);
        if n == moved {
            return;
        }
        if let Some(p) = self.arena[n as usize].p {
            if self.arena[p as usize].l == Some(moved) {
                self.arena[p as usize].l = Some(n);
            } else {
                self.arena[p as usize].r = Some(n);
            }
        }
        if let Some(l) = self.arena[n as usize].l {
            self.arena[l as usize].p = Some(n);
        }
        if let Some(r) = self.arena[n as usize].r {
            self.arena[r as usize].p = Some(n);
        }
        if self.root == Some(moved) {
            self.root = Some(n);
        }
    }

    pub fn contains(&self, value: &V) -> bool {
        find(&self.arena, self.root, value, &self.comparator).is_some()
    }

    /// Smallest value under the set's order, `None` when empty.
    pub fn min(&self) -> Option<&V> {
        first(&self.arena, self.root).map(|i| &self.arena[i as usize].v)
    }

    /// Largest value under the set's order, `None` when empty.
    pub fn max(&self) -> Option<&V> {
        last(&self.arena, self.root).map(|i| &self.arena[i as usize].v)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree, [`ABSENT_HEIGHT`] when empty.
    pub fn height(&self) -> i32 {
        match self.root {
            Some(root) => self.arena[root as usize].height,
            None => ABSENT_HEIGHT,
        }
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// One-shot ascending in-order iterator over the stored values.
    pub fn iter(&self) -> impl Iterator<Item = &V> + '_ {
        let mut curr = first(&self.arena, self.root);
        std::iter::from_fn(move || {
            let i = curr?;
            curr = next(&self.arena, i);
            Some(&self.arena[i as usize].v)
        })
    }

    /// The stored values in ascending order.
    pub fn in_order_values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Index of the node holding the smallest value.
    pub fn first(&self) -> Option<u32> {
        first(&self.arena, self.root)
    }

    /// Index of the in-order successor of the node at `curr`.
    pub fn next(&self, curr: u32) -> Option<u32> {
        next(&self.arena, curr)
    }

    /// Value stored at arena index `idx`.
    pub fn value(&self, idx: u32) -> &V {
        &self.arena[idx as usize].v
    }

    /// Verifies every tree invariant plus arena occupancy.
    pub fn assert_valid(&self) -> Result<(), InvariantError> {
        assert_tree(&self.arena, self.root, &self.comparator)?;
        let reachable = size(&self.arena, self.root);
        if reachable != self.arena.len() {
            return Err(InvariantError::OrphanSlots {
                arena: self.arena.len(),
                reachable,
            });
        }
        Ok(())
    }
}

impl<V, C> fmt::Debug for AvlSet<V, C>
where
    V: fmt::Debug,
    C: Fn(&V, &V) -> i32,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AvlSet {}", print(&self.arena, self.root, ""))
    }
}

impl<V> FromIterator<V> for AvlSet<V, fn(&V, &V) -> i32>
where
    V: Ord,
{
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<V, C> Extend<V> for AvlSet<V, C>
where
    C: Fn(&V, &V) -> i32,
{
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}
