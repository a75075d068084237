//! The balancing engine: locate, height maintenance, rotations, the
//! rebalance walk, insertion attachment and deletion splicing, plus the
//! invariant checker and a debug printer.
//!
//! All functions operate on `(arena, index)` pairs. Every mutating entry
//! point returns the root of the resulting tree, since rotations can move
//! it. Upward walks are loops over parent links rather than recursion.

use std::fmt::Debug;

use thiserror::Error;

use crate::util::{first, next};

use super::types::{AvlNodeLike, ABSENT_HEIGHT};

#[inline]
fn set_p<V, N>(arena: &mut [N], i: u32, v: Option<u32>)
where
    N: AvlNodeLike<V>,
{
    arena[i as usize].set_p(v);
}

#[inline]
fn set_l<V, N>(arena: &mut [N], i: u32, v: Option<u32>)
where
    N: AvlNodeLike<V>,
{
    arena[i as usize].set_l(v);
}

#[inline]
fn set_r<V, N>(arena: &mut [N], i: u32, v: Option<u32>)
where
    N: AvlNodeLike<V>,
{
    arena[i as usize].set_r(v);
}

#[inline]
fn height_of<V, N>(arena: &[N], i: Option<u32>) -> i32
where
    N: AvlNodeLike<V>,
{
    match i {
        Some(i) => arena[i as usize].height(),
        None => ABSENT_HEIGHT,
    }
}

/// Equality-aware descent from `root`.
///
/// Returns the node holding `value` when one exists, otherwise the
/// deepest node on the search path, which is the attachment point for an
/// insertion of `value`. Callers distinguish the two outcomes by
/// comparing the returned node's value against `value`.
pub fn locate<V, N, C>(arena: &[N], root: u32, value: &V, comparator: &C) -> u32
where
    N: AvlNodeLike<V>,
    C: Fn(&V, &V) -> i32,
{
    let mut curr = root;
    loop {
        let cmp = comparator(value, arena[curr as usize].value());
        if cmp == 0 {
            return curr;
        }
        let child = if cmp < 0 {
            arena[curr as usize].l()
        } else {
            arena[curr as usize].r()
        };
        match child {
            Some(c) => curr = c,
            None => return curr,
        }
    }
}

/// Recomputes the cached height of `node` from its children, then walks
/// parent links to the root recomputing every ancestor.
///
/// The walk runs to the root even when a recomputed height is unchanged,
/// so the function is idempotent and safe to call redundantly.
pub fn update_height<V, N>(arena: &mut [N], node: u32)
where
    N: AvlNodeLike<V>,
{
    let mut curr = Some(node);
    while let Some(i) = curr {
        let l = arena[i as usize].l();
        let r = arena[i as usize].r();
        let h = 1 + height_of(arena, l).max(height_of(arena, r));
        arena[i as usize].set_height(h);
        curr = arena[i as usize].p();
    }
}

/// Left rotation around `pivot`.
///
/// The right child takes the pivot's position under the pivot's former
/// parent, the pivot becomes its left child, and the child's former left
/// subtree is reattached as the pivot's right subtree. Heights are
/// recomputed from the demoted pivot upward. Returns the promoted child;
/// when it ends up parentless the caller must make it the tree root.
pub fn rotate_left<V, N>(arena: &mut [N], pivot: u32) -> u32
where
    N: AvlNodeLike<V>,
{
    let r = arena[pivot as usize]
        .r()
        .expect("rotate_left needs a right child");
    let rl = arena[r as usize].l();
    let p = arena[pivot as usize].p();

    set_r(arena, pivot, rl);
    if let Some(rl) = rl {
        set_p(arena, rl, Some(pivot));
    }
    set_l(arena, r, Some(pivot));
    set_p(arena, pivot, Some(r));
    set_p(arena, r, p);
    if let Some(p) = p {
        if arena[p as usize].l() == Some(pivot) {
            set_l(arena, p, Some(r));
        } else {
            set_r(arena, p, Some(r));
        }
    }

    update_height(arena, pivot);
    r
}

/// Right rotation around `pivot`, the mirror of [`rotate_left`].
pub fn rotate_right<V, N>(arena: &mut [N], pivot: u32) -> u32
where
    N: AvlNodeLike<V>,
{
    let l = arena[pivot as usize]
        .l()
        .expect("rotate_right needs a left child");
    let lr = arena[l as usize].r();
    let p = arena[pivot as usize].p();

    set_l(arena, pivot, lr);
    if let Some(lr) = lr {
        set_p(arena, lr, Some(pivot));
    }
    set_r(arena, l, Some(pivot));
    set_p(arena, pivot, Some(l));
    set_p(arena, l, p);
    if let Some(p) = p {
        if arena[p as usize].l() == Some(pivot) {
            set_l(arena, p, Some(l));
        } else {
            set_r(arena, p, Some(l));
        }
    }

    update_height(arena, pivot);
    l
}

/// Walks from `node` to the root restoring the balance invariant after a
/// single structural edit.
///
/// At each step the balance factor is `height(right) - height(left)`
/// with absent subtrees counting as −1. A factor of +2 is fixed with a
/// single left rotation, or a right-then-left double rotation when the
/// inner grandchild is strictly taller than the outer one; −2 is the
/// exact mirror. At most one rotation (single or double) fires per
/// ancestor level, and the walk must continue upward because a rotation
/// changes the subtree height seen by the next ancestor. Returns the
/// root of the rebalanced tree.
pub fn rebalance<V, N>(arena: &mut [N], mut root: u32, node: u32) -> u32
where
    N: AvlNodeLike<V>,
{
    let mut curr = Some(node);
    while let Some(i) = curr {
        let l = arena[i as usize].l();
        let r = arena[i as usize].r();
        let bf = height_of(arena, r) - height_of(arena, l);

        let top = if bf == 2 {
            let r = r.expect("right-heavy node has a right child");
            if height_of(arena, arena[r as usize].l()) > height_of(arena, arena[r as usize].r()) {
                rotate_right(arena, r);
                rotate_left(arena, i)
            } else {
                rotate_left(arena, i)
            }
        } else if bf == -2 {
            let l = l.expect("left-heavy node has a left child");
            if height_of(arena, arena[l as usize].r()) > height_of(arena, arena[l as usize].l()) {
                rotate_left(arena, l);
                rotate_right(arena, i)
            } else {
                rotate_right(arena, i)
            }
        } else {
            i
        };

        if arena[top as usize].p().is_none() {
            root = top;
        }
        curr = arena[top as usize].p();
    }
    root
}

/// Attaches `n` as the left child of `p`, then restores heights and
/// balance starting at the new leaf. Returns the new tree root.
pub fn insert_left<V, N>(arena: &mut [N], root: u32, n: u32, p: u32) -> u32
where
    N: AvlNodeLike<V>,
{
    set_l(arena, p, Some(n));
    set_p(arena, n, Some(p));
    update_height(arena, n);
    rebalance(arena, root, n)
}

/// Attaches `n` as the right child of `p`, then restores heights and
/// balance starting at the new leaf. Returns the new tree root.
pub fn insert_right<V, N>(arena: &mut [N], root: u32, n: u32, p: u32) -> u32
where
    N: AvlNodeLike<V>,
{
    set_r(arena, p, Some(n));
    set_p(arena, n, Some(p));
    update_height(arena, n);
    rebalance(arena, root, n)
}

/// Splices node `n` out of the tree rooted at `root` and restores the
/// AVL invariant. Returns the new root, `None` when the tree becomes
/// empty. `n`'s own links are cleared.
///
/// A node with two children is replaced by its in-order successor, the
/// leftmost node of its right subtree. Height update and rebalance start
/// at the point of structural disturbance: the successor's original
/// parent when the successor had to be detached from deeper in the right
/// subtree, the successor itself when it was the removed node's direct
/// right child, and the removed node's former parent in the leaf and
/// one-child cases.
pub fn remove<V, N>(arena: &mut [N], root: u32, n: u32) -> Option<u32>
where
    N: AvlNodeLike<V>,
{
    let p = arena[n as usize].p();
    let l = arena[n as usize].l();
    let r = arena[n as usize].r();
    set_p(arena, n, None);
    set_l(arena, n, None);
    set_r(arena, n, None);

    match (l, r) {
        (None, None) => {
            let Some(p) = p else {
                return None;
            };
            if arena[p as usize].l() == Some(n) {
                set_l(arena, p, None);
            } else {
                set_r(arena, p, None);
            }
            update_height(arena, p);
            Some(rebalance(arena, root, p))
        }
        (Some(l), Some(r)) => {
            let mut succ = r;
            while let Some(sl) = arena[succ as usize].l() {
                succ = sl;
            }

            let start = if succ == r {
                // The successor absorbs the left subtree and keeps its
                // own right subtree.
                set_l(arena, succ, Some(l));
                set_p(arena, l, Some(succ));
                succ
            } else {
                // Detach the successor, promoting its right child into
                // its place, then hand it both subtrees of `n`.
                let sp = arena[succ as usize]
                    .p()
                    .expect("detached successor has a parent");
                let sr = arena[succ as usize].r();
                set_l(arena, sp, sr);
                if let Some(sr) = sr {
                    set_p(arena, sr, Some(sp));
                }
                set_l(arena, succ, Some(l));
                set_p(arena, l, Some(succ));
                set_r(arena, succ, Some(r));
                set_p(arena, r, Some(succ));
                sp
            };

            set_p(arena, succ, p);
            if let Some(p) = p {
                if arena[p as usize].l() == Some(n) {
                    set_l(arena, p, Some(succ));
                } else {
                    set_r(arena, p, Some(succ));
                }
            }

            update_height(arena, start);
            let base = if p.is_some() { root } else { succ };
            Some(rebalance(arena, base, start))
        }
        _ => {
            let c = l.or(r).expect("one child present");
            set_p(arena, c, p);
            let Some(p) = p else {
                return Some(c);
            };
            if arena[p as usize].l() == Some(n) {
                set_l(arena, p, Some(c));
            } else {
                set_r(arena, p, Some(c));
            }
            update_height(arena, p);
            Some(rebalance(arena, root, p))
        }
    }
}

/// Violation found by [`assert_tree`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantError {
    #[error("root has a parent link")]
    RootHasParent,
    #[error("child of node {0} does not point back to it")]
    BrokenParentLink(u32),
    #[error("stale height at node {node}: cached {cached}, computed {computed}")]
    StaleHeight { node: u32, cached: i32, computed: i32 },
    #[error("balance violated at node {node}: left height {left}, right height {right}")]
    Unbalanced { node: u32, left: i32, right: i32 },
    #[error("in-order values are not strictly ascending")]
    OrderViolated,
    #[error("arena holds {arena} nodes but {reachable} are reachable from the root")]
    OrphanSlots { arena: usize, reachable: usize },
}

fn check_node<V, N>(arena: &[N], node: u32) -> Result<i32, InvariantError>
where
    N: AvlNodeLike<V>,
{
    let l = arena[node as usize].l();
    let r = arena[node as usize].r();

    if let Some(l) = l {
        if arena[l as usize].p() != Some(node) {
            return Err(InvariantError::BrokenParentLink(node));
        }
    }
    if let Some(r) = r {
        if arena[r as usize].p() != Some(node) {
            return Err(InvariantError::BrokenParentLink(node));
        }
    }

    let lh = match l {
        Some(l) => check_node(arena, l)?,
        None => ABSENT_HEIGHT,
    };
    let rh = match r {
        Some(r) => check_node(arena, r)?,
        None => ABSENT_HEIGHT,
    };

    let computed = 1 + lh.max(rh);
    let cached = arena[node as usize].height();
    if cached != computed {
        return Err(InvariantError::StaleHeight {
            node,
            cached,
            computed,
        });
    }
    if (lh - rh).abs() > 1 {
        return Err(InvariantError::Unbalanced {
            node,
            left: lh,
            right: rh,
        });
    }

    Ok(computed)
}

/// Verifies the full tree invariant set: a parentless root, parent/child
/// link agreement, height cache correctness, the AVL balance bound, and
/// strictly ascending in-order values.
pub fn assert_tree<V, N, C>(
    arena: &[N],
    root: Option<u32>,
    comparator: &C,
) -> Result<(), InvariantError>
where
    N: AvlNodeLike<V>,
    C: Fn(&V, &V) -> i32,
{
    let Some(root) = root else {
        return Ok(());
    };

    if arena[root as usize].p().is_some() {
        return Err(InvariantError::RootHasParent);
    }

    check_node(arena, root)?;

    let mut curr = first(arena, Some(root));
    let mut prev: Option<u32> = None;
    while let Some(i) = curr {
        if let Some(prev) = prev {
            if comparator(arena[prev as usize].value(), arena[i as usize].value()) >= 0 {
                return Err(InvariantError::OrderViolated);
            }
        }
        prev = Some(i);
        curr = next(arena, i);
    }

    Ok(())
}

/// Debug printer, one node per line with children indented below.
pub fn print<V, N>(arena: &[N], node: Option<u32>, tab: &str) -> String
where
    V: Debug,
    N: AvlNodeLike<V>,
{
    match node {
        None => "∅".to_string(),
        Some(i) => {
            let n = &arena[i as usize];
            let left = print::<V, N>(arena, n.l(), &format!("{tab}  "));
            let right = print::<V, N>(arena, n.r(), &format!("{tab}  "));
            format!(
                "Node[{i}] [h={}] {{ {:?} }}\n{tab}L={left}\n{tab}R={right}",
                n.height(),
                n.value()
            )
        }
    }
}
