//! Core data structures for vkdgen.
//!
//! This module contains the types shared between the registry and the
//! generator:
//! - Registry entries (types, enums, commands) in resolved form
//! - Blocks (core versions and extensions)
//! - Extension filtering

pub mod entry;
pub mod filter;

pub use entry::{
    Aggregate, Block, BlockKind, Category, Command, EnumConstant, EnumGroup, EnumValue, Entry,
    FuncPointer, GroupKind, Member,
};
pub use filter::ExtensionFilter;
