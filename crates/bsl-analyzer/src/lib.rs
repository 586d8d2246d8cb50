//! AST traversal and the core diagnostic plugins.
//!
//! [`Visitor`] walks a parsed module depth-first, left-to-right, dispatching
//! enter/leave events to every registered [`Plugin`]. Plugins see the
//! ambient traversal state (ancestor stack, per-kind counters) through
//! [`VisitContext`] and accumulate their findings internally; a [`Check`]
//! closes into a list of [`bsl_report::Issue`] records when traversal ends.

mod visitor;

pub mod plugins;

pub use visitor::{Check, Plugin, VisitContext, Visitor};
