//! Node trait definitions.
//!
//! Every tree "pointer" is an `Option<u32>` index into a [`Vec`]-backed
//! arena. All tree-manipulation functions take the arena as a slice and
//! work with indices, so child links stay logically owning while the
//! parent back-link is a plain non-owning index and the parent/child
//! reference cycle never turns into an ownership cycle.

/// Structural links (`p`, `l`, `r`).
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Single-value node interface used by set-like structures.
pub trait ValueNode<V>: Node {
    fn value(&self) -> &V;
}
