pub mod common;
pub mod depth;
pub mod lint;
