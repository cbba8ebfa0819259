//! D binding generator.
//!
//! [`DGenerator`] receives resolved registry entries block by block,
//! formats each one into its declaration section and writes the sections
//! when the block closes. Commands are classified as they arrive and their
//! load statements accumulate in the [`loader::LoaderAssembler`], which is
//! rendered after the last block.

pub mod commands;
pub mod enums;
pub mod errors;
pub mod loader;
pub mod naming;
pub mod output;
pub mod platform;
pub mod sections;
pub mod structs;
pub mod templates;
pub mod translate;

use std::collections::BTreeSet;
use std::io::Write;

use anyhow::Result;

use crate::core::{Block, Entry, ExtensionFilter};
use crate::registry::OutputGenerator;
use crate::util::config::{DEFAULT_NAME_PREFIX, DEFAULT_PACKAGE_PREFIX};
use commands::{CommandClassifier, Level};
pub use errors::GenerateError;
use loader::LoaderAssembler;
pub use output::{BlockReport, GenerationReport, Outputs};
use platform::Guard;
use sections::{Section, SectionBuckets};
use structs::{StructEmitter, StructureTypes};

/// Name of the enumeration listing structure types.
const STRUCTURE_TYPE_GROUP: &str = "VkStructureType";

/// Options of the D generator.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Module path of the generated package, e.g. `dvulkan`
    pub package_prefix: String,

    /// Prefix of generated loader identifiers, e.g. `DVulkan`
    pub name_prefix: String,

    /// Extensions whose enumerants are written into groups
    pub extensions: ExtensionFilter,

    /// Fail when a derived structure type is not registered
    pub strict_struct_types: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            package_prefix: DEFAULT_PACKAGE_PREFIX.to_string(),
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            extensions: ExtensionFilter::all(),
            strict_struct_types: false,
        }
    }
}

/// State of the block being generated.
struct OpenBlock {
    block: Block,
    guard: Option<Guard>,
    sections: SectionBuckets,
    opaque: BTreeSet<String>,
    commands: Vec<(String, Level)>,
}

/// Generator writing D bindings to three outputs.
pub struct DGenerator<W: Write> {
    options: GeneratorOptions,
    outputs: Outputs<W>,
    current: Option<OpenBlock>,
    classifier: CommandClassifier,
    loader: LoaderAssembler,
    structure_types: StructureTypes,
    defined: BTreeSet<String>,
    report: GenerationReport,
}

impl<W: Write> DGenerator<W> {
    /// Create a generator writing to `outputs`.
    pub fn new(options: GeneratorOptions, outputs: Outputs<W>) -> Self {
        let report = GenerationReport {
            package: options.package_prefix.clone(),
            ..Default::default()
        };
        DGenerator {
            options,
            outputs,
            current: None,
            classifier: CommandClassifier::default(),
            loader: LoaderAssembler::default(),
            structure_types: StructureTypes::default(),
            defined: BTreeSet::new(),
            report,
        }
    }

    /// Summary of the blocks generated so far.
    pub fn report(&self) -> &GenerationReport {
        &self.report
    }

    /// Command classification of the run.
    pub fn classifier(&self) -> &CommandClassifier {
        &self.classifier
    }

    fn open_block(&mut self, operation: &'static str) -> Result<&mut OpenBlock, GenerateError> {
        self.current.as_mut().ok_or(GenerateError::BlockState {
            operation,
            state: "outside of a block",
        })
    }

    fn route(&mut self, entry: Entry) -> Result<(), GenerateError> {
        let options = &self.options;
        let structure_types = &mut self.structure_types;
        let classifier = &mut self.classifier;
        let defined = &mut self.defined;
        let open = self.current.as_mut().ok_or(GenerateError::BlockState {
            operation: "gen_entry",
            state: "outside of a block",
        })?;

        tracing::debug!("{} {} -> {}", open.block.name, entry.category().as_str(), entry.name());

        match entry {
            Entry::Handle { name, define } => {
                open.sections
                    .push(Section::Handle, format!("mixin({}!q{{{}}});", define, name));
            }
            Entry::Basetype { name, underlying } => {
                let text = match underlying {
                    Some(ty) => format!("alias {} = {};", name, translate::convert_const(&ty)),
                    None => format!("struct {};", name),
                };
                open.sections.push(Section::Basetype, text);
            }
            Entry::Bitmask { name, underlying } => {
                open.sections
                    .push(Section::Bitmask, format!("alias {} = {};", name, underlying));
            }
            Entry::FuncPointer(funcpointer) => {
                let text = commands::emit_funcpointer(&funcpointer, &mut open.opaque)?;
                open.sections.push(Section::FuncPointer, text);
            }
            Entry::Struct(aggregate) => {
                let text = StructEmitter {
                    opaque: &mut open.opaque,
                    structure_types: &*structure_types,
                    strict: options.strict_struct_types,
                }
                .emit("struct", &aggregate)?;
                defined.insert(aggregate.name);
                open.sections.push(Section::Struct, text);
            }
            Entry::Union(aggregate) => {
                let text = StructEmitter {
                    opaque: &mut open.opaque,
                    structure_types: &*structure_types,
                    strict: options.strict_struct_types,
                }
                .emit("union", &aggregate)?;
                defined.insert(aggregate.name);
                open.sections.push(Section::Struct, text);
            }
            Entry::EnumValue(constant) => {
                open.sections.push(Section::Enum, enums::emit_constant(&constant));
            }
            Entry::EnumGroup(group) => {
                let declaration = enums::emit_group(&group, &options.extensions, &options.name_prefix);
                if group.name == STRUCTURE_TYPE_GROUP {
                    for member in declaration.members {
                        structure_types.register(member);
                    }
                }
                open.sections
                    .push(Section::for_group(group.kind), declaration.text);
            }
            Entry::Command(command) => {
                let text = commands::emit_command(&command, &mut open.opaque)?;
                let level = classifier.classify(&command);
                open.sections.push(Section::Command, text);
                open.commands.push((command.name, level));
            }
            Entry::Alias {
                name,
                target,
                category,
            } => {
                open.sections.push(
                    Section::for_category(category),
                    format!("alias {} = {};", name, target),
                );
            }
        }
        Ok(())
    }

    fn write_types(&mut self, open: &OpenBlock) -> Result<(), GenerateError> {
        // Structs with a body in this run need no forward declaration.
        let forward: Vec<&String> = open
            .opaque
            .iter()
            .filter(|name| !self.defined.contains(*name))
            .collect();

        let mut body = String::new();
        for section in Section::TYPES {
            if section == Section::Struct && !forward.is_empty() {
                for name in &forward {
                    body.push_str(&format!("struct {};\n", name));
                }
                body.push('\n');
            }
            for text in open.sections.get(section) {
                body.push_str(text);
                body.push('\n');
            }
        }

        let out = &mut self.outputs.types;
        writeln!(out, "\n// {}", open.block.name)?;
        match open.guard {
            Some(ref guard) => {
                writeln!(out, "{}", guard.open())?;
                if let Some(import) = guard.import {
                    writeln!(out, "\tpublic import {};\n", import)?;
                }
                write!(out, "{}", platform::indent(&body))?;
                writeln!(out, "}}")?;
            }
            None => write!(out, "{}", body)?,
        }
        Ok(())
    }

    fn write_functions(&mut self, open: &OpenBlock) -> Result<(), GenerateError> {
        let lines: Vec<&String> = [Section::CommandPointer, Section::Command]
            .iter()
            .flat_map(|section| open.sections.get(*section))
            .collect();
        if lines.is_empty() {
            return Ok(());
        }

        let out = &mut self.outputs.functions;
        writeln!(out, "\n\t// {}", open.block.name)?;
        let indent = match open.guard {
            Some(ref guard) => {
                writeln!(out, "\t{}", guard.open())?;
                "\t"
            }
            None => "",
        };
        for line in lines {
            writeln!(out, "{}{}", indent, line)?;
        }
        if open.guard.is_some() {
            writeln!(out, "\t}}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl DGenerator<Vec<u8>> {
    /// Generator writing into memory buffers.
    pub(crate) fn in_memory(options: GeneratorOptions) -> Self {
        DGenerator::new(
            options,
            Outputs {
                package: Vec::new(),
                types: Vec::new(),
                functions: Vec::new(),
            },
        )
    }

    pub(crate) fn types(&self) -> String {
        String::from_utf8_lossy(&self.outputs.types).into_owned()
    }

    pub(crate) fn functions(&self) -> String {
        String::from_utf8_lossy(&self.outputs.functions).into_owned()
    }
}

impl<W: Write> OutputGenerator for DGenerator<W> {
    fn begin_file(&mut self) -> Result<()> {
        let package = &self.options.package_prefix;
        write!(self.outputs.package, "{}", templates::package_module(package))?;
        write!(self.outputs.types, "{}", templates::types_header(package))?;
        write!(self.outputs.functions, "{}", templates::functions_header(package))?;
        Ok(())
    }

    fn begin_block(&mut self, block: &Block) -> Result<()> {
        if let Some(ref open) = self.current {
            return Err(GenerateError::BlockState {
                operation: "begin_block",
                state: if open.block.name == block.name {
                    "twice for the same block"
                } else {
                    "while another block is open"
                },
            }
            .into());
        }

        self.current = Some(OpenBlock {
            guard: platform::guard_for(block),
            block: block.clone(),
            sections: SectionBuckets::default(),
            opaque: BTreeSet::new(),
            commands: Vec::new(),
        });
        Ok(())
    }

    fn gen_entry(&mut self, entry: Entry) -> Result<()> {
        if !self.open_block("gen_entry")?.block.emit {
            return Ok(());
        }
        self.route(entry)?;
        Ok(())
    }

    fn end_block(&mut self) -> Result<()> {
        let open = self.current.take().ok_or(GenerateError::BlockState {
            operation: "end_block",
            state: "outside of a block",
        })?;

        if open.block.emit {
            tracing::info!("Generated {}", open.block.name);
            self.write_types(&open)?;
            self.write_functions(&open)?;
            self.loader
                .add_block(&open.block.name, open.guard.as_ref(), &open.commands);
        } else {
            tracing::debug!("Skipped output of {}", open.block.name);
        }

        self.report.blocks.push(BlockReport {
            name: open.block.name,
            kind: open.block.kind,
            emitted: open.block.emit,
            commands: open.commands.len(),
        });
        Ok(())
    }

    fn end_file(&mut self) -> Result<()> {
        if self.current.is_some() {
            return Err(GenerateError::BlockState {
                operation: "end_file",
                state: "while a block is open",
            }
            .into());
        }

        write!(
            self.outputs.functions,
            "{}",
            self.loader.finish(&self.options.name_prefix)
        )?;
        self.outputs.flush()?;

        self.report.instance_level = self.classifier.instance_level().iter().cloned().collect();
        self.report.device_level = self.classifier.device_level().iter().cloned().collect();
        Ok(())
    }
}
