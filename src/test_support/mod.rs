//! Test utilities for vkdgen unit tests.
//!
//! Provides a generator that records traversal callbacks instead of writing
//! D code, and fixtures for registries and common entries.
//!
//! # Example
//!
//! ```rust,ignore
//! use vkdgen::test_support::{fixture_registry, RecordingGenerator};
//!
//! #[test]
//! fn test_example() {
//!     let registry = fixture_registry();
//!     let mut recorder = RecordingGenerator::default();
//!     traverse(&registry, &TraversalOptions::default(), &mut recorder).unwrap();
//!     assert_eq!(recorder.events.first().map(String::as_str), Some("begin_file"));
//! }
//! ```

pub mod fixtures;

use anyhow::{bail, Result};

use crate::core::{Block, Entry};
use crate::registry::OutputGenerator;

pub use fixtures::*;

/// Generator recording every callback it receives.
#[derive(Debug, Default)]
pub struct RecordingGenerator {
    /// Callback names in call order
    pub events: Vec<String>,

    /// Opened blocks
    pub blocks: Vec<Block>,

    /// Entries with the name of the block that produced them
    pub entries: Vec<(String, Entry)>,

    open: Option<String>,
}

impl RecordingGenerator {
    /// Names of the entries produced by one block.
    pub fn entries_of(&self, block: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(b, _)| b == block)
            .map(|(_, e)| e.name())
            .collect()
    }
}

impl OutputGenerator for RecordingGenerator {
    fn begin_file(&mut self) -> Result<()> {
        self.events.push("begin_file".to_string());
        Ok(())
    }

    fn begin_block(&mut self, block: &Block) -> Result<()> {
        if let Some(ref open) = self.open {
            bail!("block `{}` opened while `{}` is open", block.name, open);
        }
        self.events.push(format!("begin_block {}", block.name));
        self.blocks.push(block.clone());
        self.open = Some(block.name.clone());
        Ok(())
    }

    fn gen_entry(&mut self, entry: Entry) -> Result<()> {
        let Some(ref open) = self.open else {
            bail!("entry `{}` outside of a block", entry.name());
        };
        self.entries.push((open.clone(), entry));
        Ok(())
    }

    fn end_block(&mut self) -> Result<()> {
        match self.open.take() {
            Some(name) => {
                self.events.push(format!("end_block {}", name));
                Ok(())
            }
            None => bail!("end_block without an open block"),
        }
    }

    fn end_file(&mut self) -> Result<()> {
        self.events.push("end_file".to_string());
        Ok(())
    }
}
