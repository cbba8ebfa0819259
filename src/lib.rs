//! vkdgen - D language bindings from the Vulkan XML registry
//!
//! This crate loads `vk.xml`, walks the selected core versions and
//! extensions, and writes a D package with type declarations, function
//! pointer declarations and a two-tier function loader.

pub mod core;
pub mod generator;
pub mod ops;
pub mod registry;
pub mod util;

/// Test utilities for vkdgen unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a recording generator and a fixture registry.
#[cfg(test)]
pub mod test_support;

pub use generator::{DGenerator, GenerationReport, GeneratorOptions};
pub use registry::{OutputGenerator, Registry, TraversalOptions};
