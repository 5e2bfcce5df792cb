//! Shared helpers.

pub mod fs;
