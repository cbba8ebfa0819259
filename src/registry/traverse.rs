//! Registry traversal.
//!
//! Walks enabled features, then enabled extensions, and hands every required
//! entry to an [`OutputGenerator`] exactly once, in the first block that
//! requires it. Dependencies of a type (its `requires` type, bit values,
//! alias target and member types) are handed over before the type itself.

use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;

use super::depends;
use super::errors::RegistryError;
use super::parse;
use super::xml::Element;
use super::Registry;
use crate::core::filter::anchored;
use crate::core::{Block, Category, EnumConstant, Entry, ExtensionFilter};

/// Receiver of traversal callbacks.
///
/// Callbacks arrive strictly in order: `begin_file`, then for every block
/// `begin_block`, any number of `gen_entry`, `end_block`, and finally
/// `end_file`.
pub trait OutputGenerator {
    /// Called once before the first block.
    fn begin_file(&mut self) -> Result<()>;

    /// Called when a feature or extension is opened.
    fn begin_block(&mut self, block: &Block) -> Result<()>;

    /// Called for every entry of the open block.
    fn gen_entry(&mut self, entry: Entry) -> Result<()>;

    /// Called when the open block is closed.
    fn end_block(&mut self) -> Result<()>;

    /// Called once after the last block.
    fn end_file(&mut self) -> Result<()>;
}

/// Selection of versions and extensions to traverse.
#[derive(Debug, Clone)]
pub struct TraversalOptions {
    /// Versions to traverse
    pub versions: Regex,

    /// Versions whose declarations are written
    pub emit_versions: Regex,

    /// Extensions to traverse
    pub extensions: ExtensionFilter,
}

impl TraversalOptions {
    /// Build options from user patterns.
    pub fn new(versions: &str, emit_versions: &str, extensions: ExtensionFilter) -> Result<Self, RegistryError> {
        let compile = |what, pattern: &str| {
            anchored(pattern).map_err(|source| RegistryError::InvalidPattern { what, source })
        };
        Ok(TraversalOptions {
            versions: compile("versions", versions)?,
            emit_versions: compile("emit_versions", emit_versions)?,
            extensions,
        })
    }
}

impl Default for TraversalOptions {
    fn default() -> Self {
        TraversalOptions {
            versions: Regex::new(".*").expect("static pattern"),
            emit_versions: Regex::new(".*").expect("static pattern"),
            extensions: ExtensionFilter::all(),
        }
    }
}

/// Entries required by one block, grouped by category.
#[derive(Default)]
struct Requirements<'a> {
    types: Vec<&'a str>,
    enums: Vec<&'a Element>,
    commands: Vec<&'a str>,
}

struct Walker<'r, G> {
    registry: &'r Registry,
    generator: &'r mut G,
    enabled: HashSet<String>,
    declared_types: HashSet<String>,
    declared_enums: HashSet<String>,
    declared_commands: HashSet<String>,
}

/// Walk the registry and drive `generator`.
pub fn traverse<G: OutputGenerator>(
    registry: &Registry,
    options: &TraversalOptions,
    generator: &mut G,
) -> Result<()> {
    let features: Vec<(&Element, Block)> = registry
        .features()
        .iter()
        .filter_map(|feature| {
            let name = feature.attr("name")?;
            options.versions.is_match(name).then(|| {
                let emit = options.emit_versions.is_match(name);
                (feature, Block::feature(name).with_emit(emit))
            })
        })
        .collect();

    let extensions: Vec<(&Element, Block)> = registry
        .extensions()
        .iter()
        .filter_map(|ext| {
            let name = ext.attr("name")?;
            options.extensions.accepts(name).then(|| {
                let platform = ext.attr("platform");
                let protect = platform
                    .and_then(|p| registry.platform_protect(p))
                    .map(str::to_string);
                let block = Block::extension(name, platform.map(str::to_string)).with_protect(protect);
                (ext, block)
            })
        })
        .collect();

    let enabled = features
        .iter()
        .chain(extensions.iter())
        .map(|(_, block)| block.name.clone())
        .collect();

    let mut walker = Walker {
        registry,
        generator,
        enabled,
        declared_types: HashSet::new(),
        declared_enums: HashSet::new(),
        declared_commands: HashSet::new(),
    };

    tracing::info!(
        "Generating {} versions and {} extensions",
        features.len(),
        extensions.len()
    );

    walker.generator.begin_file()?;
    for (element, block) in features.iter().chain(extensions.iter()) {
        walker
            .walk_block(element, block)
            .with_context(|| format!("failed to generate `{}`", block.name))?;
    }
    walker.generator.end_file()
}

impl<G: OutputGenerator> Walker<'_, G> {
    fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }

    fn require_applies(&self, require: &Element) -> bool {
        if !parse::api_matches(require, self.registry.api()) {
            return false;
        }
        if let Some(feature) = require.attr("feature") {
            if !self.is_enabled(feature) {
                return false;
            }
        }
        if let Some(extension) = require.attr("extension") {
            if !self.is_enabled(extension) {
                return false;
            }
        }
        match require.attr("depends") {
            Some(expr) => depends::evaluate(expr, &|name| self.is_enabled(name)),
            None => true,
        }
    }

    fn requirements<'e>(&self, element: &'e Element) -> Requirements<'e> {
        let mut reqs = Requirements::default();
        for require in element.find_all("require") {
            if !self.require_applies(require) {
                continue;
            }
            for item in require.elements() {
                if !parse::api_matches(item, self.registry.api()) {
                    continue;
                }
                match (item.name.as_str(), item.attr("name")) {
                    ("type", Some(name)) => reqs.types.push(name),
                    ("enum", Some(_)) => reqs.enums.push(item),
                    ("command", Some(name)) => reqs.commands.push(name),
                    _ => {}
                }
            }
        }
        reqs
    }

    fn walk_block(&mut self, element: &Element, block: &Block) -> Result<()> {
        tracing::debug!("Opening {}", block.name);
        self.generator.begin_block(block)?;

        let reqs = self.requirements(element);
        let extnumber = element.attr("number").and_then(parse::parse_int);

        for name in reqs.types {
            self.gen_type(name)?;
        }
        for item in reqs.enums {
            self.gen_constant(item, extnumber)?;
        }
        for name in reqs.commands {
            self.gen_command(name)?;
        }

        self.generator.end_block()
    }

    fn gen_type(&mut self, name: &str) -> Result<()> {
        if !self.declared_types.insert(name.to_string()) {
            return Ok(());
        }
        let registry = self.registry;
        let Some(element) = registry.type_element(name) else {
            tracing::debug!("No definition for type `{}`", name);
            return Ok(());
        };

        if let Some(requires) = element.attr("requires") {
            if requires.ends_with(".h") || requires == "vk_platform" {
                return Ok(());
            }
            self.gen_type(requires)?;
        }
        if let Some(bitvalues) = element.attr("bitvalues") {
            self.gen_type(bitvalues)?;
        }

        let category = element.attr("category").unwrap_or_default();

        if let Some(target) = element.attr("alias") {
            self.gen_type(target)?;
            let Some(category) = type_category(category) else {
                return Ok(());
            };
            return self.generator.gen_entry(Entry::Alias {
                name: name.to_string(),
                target: target.to_string(),
                category,
            });
        }

        for dependency in parse::referenced_types(element) {
            self.gen_type(&dependency)?;
        }

        let api = registry.api();
        let entry = match category {
            "handle" => Entry::Handle {
                name: name.to_string(),
                define: element
                    .find_text("type")
                    .unwrap_or_else(|| "VK_DEFINE_HANDLE".to_string()),
            },
            "basetype" => Entry::Basetype {
                name: name.to_string(),
                underlying: element
                    .find_text("type")
                    .map(|t| format!("{}{}", t.trim(), element.tail_of("type").trim())),
            },
            "bitmask" => Entry::Bitmask {
                name: name.to_string(),
                underlying: element
                    .find_text("type")
                    .map(|t| t.trim().to_string())
                    .unwrap_or_else(|| "VkFlags".to_string()),
            },
            "funcpointer" => Entry::FuncPointer(parse::parse_funcpointer(element, name, api)?),
            "struct" => Entry::Struct(parse::parse_aggregate(element, name, api)),
            "union" => Entry::Union(parse::parse_aggregate(element, name, api)),
            "enum" => match registry.group(name) {
                Some(group) => Entry::EnumGroup(group.clone()),
                None => {
                    tracing::debug!("Enum type `{}` has no values", name);
                    return Ok(());
                }
            },
            _ => return Ok(()),
        };

        self.generator.gen_entry(entry)
    }

    fn gen_constant(&mut self, element: &Element, extnumber: Option<i64>) -> Result<()> {
        if element.attr("extends").is_some() {
            return Ok(());
        }
        let Some(name) = element.attr("name") else {
            return Ok(());
        };
        if !self.declared_enums.insert(name.to_string()) {
            return Ok(());
        }

        let has_value = ["value", "bitpos", "offset", "alias"]
            .iter()
            .any(|attr| element.attr(attr).is_some());
        let value = if has_value {
            parse::resolve_enum(element, extnumber)?.0
        } else {
            match self.registry.constant(name) {
                Some(value) => value.to_string(),
                None => {
                    tracing::debug!("No value for constant `{}`", name);
                    return Ok(());
                }
            }
        };

        let value = match self.registry.group_of(&value) {
            Some(group) => format!("{}.{}", group, value),
            None => value,
        };

        self.generator.gen_entry(Entry::EnumValue(EnumConstant {
            name: name.to_string(),
            value,
        }))
    }

    fn gen_command(&mut self, name: &str) -> Result<()> {
        if !self.declared_commands.insert(name.to_string()) {
            return Ok(());
        }
        let registry = self.registry;
        let Some(element) = registry.command_element(name)? else {
            tracing::debug!("No definition for command `{}`", name);
            return Ok(());
        };

        for dependency in parse::referenced_types(element) {
            self.gen_type(&dependency)?;
        }

        let command = parse::parse_command(element, name, registry.api())?;
        self.generator.gen_entry(Entry::Command(command))
    }
}

/// Map a registry `category` attribute to an entry category.
fn type_category(category: &str) -> Option<Category> {
    match category {
        "handle" => Some(Category::Handle),
        "basetype" => Some(Category::Basetype),
        "bitmask" => Some(Category::Bitmask),
        "funcpointer" => Some(Category::FuncPointer),
        "struct" => Some(Category::Struct),
        "union" => Some(Category::Union),
        "enum" => Some(Category::EnumGroup),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture_registry, RecordingGenerator};

    fn record(options: &TraversalOptions) -> RecordingGenerator {
        let registry = fixture_registry();
        let mut recorder = RecordingGenerator::default();
        traverse(&registry, options, &mut recorder).unwrap();
        recorder
    }

    #[test]
    fn test_block_order() {
        let recorder = record(&TraversalOptions::default());
        let names: Vec<_> = recorder.blocks.iter().map(|b| b.name.as_str()).collect();

        assert_eq!(
            names,
            [
                "VK_VERSION_1_0",
                "VK_VERSION_1_1",
                "VK_KHR_surface",
                "VK_KHR_xlib_surface",
                "VK_KHR_win32_surface",
                "VK_KHR_get_physical_device_properties2",
            ]
        );
        assert_eq!(recorder.events.first().map(String::as_str), Some("begin_file"));
        assert_eq!(recorder.events.last().map(String::as_str), Some("end_file"));
    }

    #[test]
    fn test_entries_visited_once() {
        let recorder = record(&TraversalOptions::default());
        let mut seen = HashSet::new();
        for (_, entry) in &recorder.entries {
            assert!(seen.insert(entry.name().to_string()), "duplicate {}", entry.name());
        }
    }

    #[test]
    fn test_dependencies_precede_dependents() {
        let recorder = record(&TraversalOptions::default());
        let position = |name: &str| {
            recorder
                .entries
                .iter()
                .position(|(_, e)| e.name() == name)
                .unwrap_or_else(|| panic!("{} not visited", name))
        };

        assert!(position("VkQueueFlagBits") < position("VkQueueFlags"));
        assert!(position("VkApplicationInfo") < position("VkInstanceCreateInfo"));
        assert!(position("VkStructureType") < position("VkApplicationInfo"));
        assert!(position("PFN_vkAllocationFunction") < position("VkAllocationCallbacks"));
    }

    #[test]
    fn test_entries_land_in_first_requiring_block() {
        let recorder = record(&TraversalOptions::default());
        let xlib = recorder.entries_of("VK_KHR_xlib_surface");

        assert!(xlib.contains(&"VkXlibSurfaceCreateInfoKHR"));
        assert!(xlib.contains(&"vkCreateXlibSurfaceKHR"));
        // Declared by VK_KHR_surface, which comes first.
        assert!(!xlib.contains(&"VkSurfaceKHR"));
        assert!(recorder.entries_of("VK_KHR_surface").contains(&"VkSurfaceKHR"));
    }

    #[test]
    fn test_command_alias_keeps_alias_name() {
        let recorder = record(&TraversalOptions::default());
        let (block, entry) = recorder
            .entries
            .iter()
            .find(|(_, e)| e.name() == "vkGetPhysicalDeviceProperties2KHR")
            .unwrap();

        assert_eq!(block, "VK_KHR_get_physical_device_properties2");
        let Entry::Command(command) = entry else {
            panic!("expected a command");
        };
        assert_eq!(command.params[0].ty, "VkPhysicalDevice");
    }

    #[test]
    fn test_constants_resolved() {
        let recorder = record(&TraversalOptions::default());
        let constant = |name: &str| {
            recorder.entries.iter().find_map(|(_, e)| match e {
                Entry::EnumValue(c) if c.name == name => Some(c.value.clone()),
                _ => None,
            })
        };

        assert_eq!(constant("VK_UUID_SIZE").as_deref(), Some("16"));
        assert_eq!(
            constant("VK_KHR_SURFACE_EXTENSION_NAME").as_deref(),
            Some("\"VK_KHR_surface\"")
        );
        assert_eq!(
            constant("VK_COLORSPACE_SRGB_NONLINEAR_KHR").as_deref(),
            Some("VkColorSpaceKHR.VK_COLOR_SPACE_SRGB_NONLINEAR_KHR")
        );
    }

    #[test]
    fn test_gated_require_skipped_when_dependency_disabled() {
        let options = TraversalOptions::new(
            "VK_VERSION_1_0",
            ".*",
            ExtensionFilter::new("VK_KHR_surface|VK_KHR_get_physical_device_properties2", None).unwrap(),
        )
        .unwrap();
        let recorder = record(&options);

        assert!(recorder.blocks.iter().all(|b| b.name != "VK_VERSION_1_1"));
        // Only required together with VK_VERSION_1_1.
        assert!(recorder
            .entries
            .iter()
            .all(|(_, e)| e.name() != "VkPhysicalDeviceIDProperties"));
        assert!(recorder
            .entries
            .iter()
            .any(|(_, e)| e.name() == "vkGetPhysicalDeviceProperties2KHR"));
    }

    #[test]
    fn test_emit_versions_sets_flag() {
        let options =
            TraversalOptions::new(".*", "VK_VERSION_1_0", ExtensionFilter::all()).unwrap();
        let recorder = record(&options);
        let v11 = recorder
            .blocks
            .iter()
            .find(|b| b.name == "VK_VERSION_1_1")
            .unwrap();
        assert!(!v11.emit);
    }

    #[test]
    fn test_platform_recorded_on_block() {
        let recorder = record(&TraversalOptions::default());
        let xlib = recorder
            .blocks
            .iter()
            .find(|b| b.name == "VK_KHR_xlib_surface")
            .unwrap();
        assert_eq!(xlib.platform.as_deref(), Some("xlib"));
        assert_eq!(xlib.protect.as_deref(), Some("VK_USE_PLATFORM_XLIB_KHR"));
    }
}
