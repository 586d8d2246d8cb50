//! The core diagnostic plugins.
//!
//! Every plugin accumulates [`bsl_report::Issue`] records during traversal
//! and drains them through [`Check::close`](crate::Check::close). All issues
//! are code smells with informational severity and a two-minute remediation
//! effort.

use std::sync::Arc;

use crate::Check;

mod closing_comments;
mod commented_out_code;
mod concatenation;
mod duplicate_conditions;
mod empty_except;
mod structure_constructor;
mod unused_variables;

pub use closing_comments::ClosingComments;
pub use commented_out_code::CommentedOutCode;
pub use concatenation::Concatenation;
pub use duplicate_conditions::DuplicateConditions;
pub use empty_except::EmptyExcept;
pub use structure_constructor::StructureConstructor;
pub use unused_variables::UnusedVariables;

/// The full plugin set in registration order. Issue lists are merged in
/// this order, which makes the final report deterministic.
pub fn default_checks(path: &str, src: &Arc<str>, strict_params: bool) -> Vec<Box<dyn Check>> {
    vec![
        Box::new(ClosingComments::new(path)),
        Box::new(CommentedOutCode::new(path)),
        Box::new(UnusedVariables::new(path, strict_params)),
        Box::new(EmptyExcept::new(path)),
        Box::new(Concatenation::new(path)),
        Box::new(StructureConstructor::new(path)),
        Box::new(DuplicateConditions::new(path, Arc::clone(src))),
    ]
}
