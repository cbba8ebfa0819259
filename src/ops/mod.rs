//! High-level operations.
//!
//! This module contains the implementation of the `vkdgen` command.

pub mod generate;

pub use generate::{generate, GenerateOptions};
