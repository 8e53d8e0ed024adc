//! CLI command implementations

pub(crate) mod clear;
pub(crate) mod common;
pub(crate) mod load;
pub(crate) mod plan;
