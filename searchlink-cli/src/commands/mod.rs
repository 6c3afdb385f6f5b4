//! CLI command implementations.

pub mod publish;
pub mod search;
