//! Cross-module scenario tests

pub(crate) mod fixtures;
