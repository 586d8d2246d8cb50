//! Abstract syntax tree definitions for BSL modules.
//!
//! The AST is a closed tagged union: [`Decl`], [`Expr`], [`Stmt`] and
//! [`PrepExpr`] enumerate every node kind, each carrying a [`Place`] span.
//! Nodes are built during parsing and immutable afterwards.
//!
//! Identifier references do not point into the tree. Every name resolves to
//! an [`Item`] in the module's [`Symbols`] arena, addressed by [`ItemId`];
//! the arena entry links the identifier to its declaration, or to `None` for
//! a forward reference or an undeclared global. The one permitted mutation is
//! patching a forward-referenced method's `Item` when its declaration is
//! finally parsed.

pub use bsl_position::{Comment, Place};

mod ast;
mod symbols;

pub use ast::*;
pub use symbols::{Item, ItemDecl, ItemId, Scope, Symbols};
