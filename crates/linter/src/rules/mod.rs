//! Lint rule implementations
//!
//! Each rule lives in its own file and implements [`crate::DocumentLintRule`].

pub mod selection_set_depth;

pub use selection_set_depth::SelectionSetDepthRuleImpl;
