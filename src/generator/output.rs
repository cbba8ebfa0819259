//! Output sinks and the generation report.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::errors::GenerateError;
use crate::core::BlockKind;

/// The three generated D modules.
#[derive(Debug)]
pub struct Outputs<W> {
    /// `package.d`
    pub package: W,

    /// `types.d`
    pub types: W,

    /// `functions.d`
    pub functions: W,
}

impl Outputs<BufWriter<File>> {
    /// Create `package.d`, `types.d` and `functions.d` in `dir`.
    pub fn create(dir: &Path) -> Result<Self, GenerateError> {
        let open = |name: &str| -> Result<BufWriter<File>, GenerateError> {
            Ok(BufWriter::new(File::create(dir.join(name))?))
        };
        Ok(Outputs {
            package: open("package.d")?,
            types: open("types.d")?,
            functions: open("functions.d")?,
        })
    }
}

impl<W: Write> Outputs<W> {
    /// Flush all writers.
    pub fn flush(&mut self) -> Result<(), GenerateError> {
        self.package.flush()?;
        self.types.flush()?;
        self.functions.flush()?;
        Ok(())
    }
}

/// Summary of one generated block.
#[derive(Debug, Clone, Serialize)]
pub struct BlockReport {
    pub name: String,
    pub kind: BlockKind,
    pub emitted: bool,
    pub commands: usize,
}

/// Machine-readable summary of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub package: String,
    pub blocks: Vec<BlockReport>,
    pub instance_level: Vec<String>,
    pub device_level: Vec<String>,
}

impl GenerationReport {
    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
