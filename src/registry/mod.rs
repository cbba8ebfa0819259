//! The Vulkan XML registry.
//!
//! Loads `vk.xml` into lookup tables, resolves enumerant values (including
//! values that extensions add to existing groups) and walks features and
//! extensions in registry order, handing resolved entries to an
//! [`OutputGenerator`].

pub mod depends;
pub mod errors;
pub mod parse;
pub mod traverse;
pub mod xml;

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::core::{EnumGroup, EnumValue, GroupKind};

pub use errors::RegistryError;
pub use traverse::{traverse, OutputGenerator, TraversalOptions};
use xml::Element;

/// Locations probed when the registry path is a directory.
const REGISTRY_CANDIDATES: &[&str] = &["vk.xml", "xml/vk.xml", "registry/vk.xml", "src/spec/vk.xml"];

/// Find `vk.xml` given a file path or a Vulkan-Docs / Vulkan-Headers checkout.
pub fn locate(path: &Path) -> Result<PathBuf, RegistryError> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    if path.is_dir() {
        for candidate in REGISTRY_CANDIDATES {
            let full = path.join(candidate);
            if full.is_file() {
                tracing::debug!("Found registry at {}", full.display());
                return Ok(full);
            }
        }
    }

    Err(RegistryError::NotFound {
        path: path.to_path_buf(),
    })
}

/// Loaded registry contents, filtered to one API.
#[derive(Debug, Default)]
pub struct Registry {
    /// Selected API name (`vulkan`)
    api: String,

    /// Type definitions by name
    types: HashMap<String, Element>,

    /// Enumerant groups with extension additions applied
    groups: HashMap<String, EnumGroup>,

    /// Group owning each enumerant
    group_of: HashMap<String, String>,

    /// `API Constants` values
    constants: HashMap<String, String>,

    /// Command definitions by name
    commands: HashMap<String, Element>,

    /// Command aliases (alias -> target)
    command_aliases: HashMap<String, String>,

    /// Platform name -> protecting macro
    platforms: HashMap<String, String>,

    /// Core versions in document order
    features: Vec<Element>,

    /// Supported extensions in document order
    extensions: Vec<Element>,
}

impl Registry {
    /// Load a registry file.
    pub fn load(path: &Path, api: &str) -> Result<Self, RegistryError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file), api)
    }

    /// Load a registry from any reader.
    pub fn from_reader<R: Read>(reader: R, api: &str) -> Result<Self, RegistryError> {
        let root = xml::parse_document(reader)?;
        Self::from_element(&root, api)
    }

    /// Build the registry from a parsed `<registry>` element.
    pub fn from_element(root: &Element, api: &str) -> Result<Self, RegistryError> {
        let mut registry = Registry {
            api: api.to_string(),
            ..Default::default()
        };

        for child in root.elements() {
            match child.name.as_str() {
                "platforms" => registry.load_platforms(child),
                "types" => registry.load_types(child),
                "enums" => registry.load_enums(child)?,
                "commands" => registry.load_commands(child)?,
                "feature" => {
                    if parse::api_matches(child, api) {
                        registry.load_additions(child, None)?;
                        registry.features.push(child.clone());
                    }
                }
                "extensions" => {
                    for ext in child.find_all("extension") {
                        if registry.is_supported(ext) {
                            let number = ext.attr("number").and_then(parse::parse_int);
                            registry.load_additions(ext, number)?;
                            registry.extensions.push(ext.clone());
                        }
                    }
                }
                _ => {}
            }
        }

        for group in registry.groups.values() {
            for value in &group.values {
                registry
                    .group_of
                    .insert(value.name.clone(), group.name.clone());
            }
        }

        tracing::debug!(
            "Loaded registry: {} types, {} groups, {} commands, {} features, {} extensions",
            registry.types.len(),
            registry.groups.len(),
            registry.commands.len(),
            registry.features.len(),
            registry.extensions.len()
        );

        Ok(registry)
    }

    fn is_supported(&self, ext: &Element) -> bool {
        ext.attr("supported")
            .map_or(false, |s| s.split(',').any(|a| a.trim() == self.api))
    }

    fn load_platforms(&mut self, platforms: &Element) {
        for platform in platforms.find_all("platform") {
            if let (Some(name), Some(protect)) = (platform.attr("name"), platform.attr("protect")) {
                self.platforms.insert(name.to_string(), protect.to_string());
            }
        }
    }

    fn load_types(&mut self, types: &Element) {
        for ty in types.find_all("type") {
            if !parse::api_matches(ty, &self.api) {
                continue;
            }
            let name = match ty.attr("name") {
                Some(name) => name.to_string(),
                None => match ty.find_text("name") {
                    Some(name) => name.trim().to_string(),
                    None => continue,
                },
            };
            self.types.entry(name).or_insert_with(|| ty.clone());
        }
    }

    fn load_enums(&mut self, enums: &Element) -> Result<(), RegistryError> {
        let name = enums.attr("name").unwrap_or_default();
        let kind = match enums.attr("type") {
            Some("enum") => GroupKind::Enum,
            Some("bitmask") => GroupKind::Bitmask,
            _ => {
                for constant in enums.find_all("enum") {
                    if !parse::api_matches(constant, &self.api) {
                        continue;
                    }
                    if let Some(const_name) = constant.attr("name") {
                        let (value, _) = parse::resolve_enum(constant, None)?;
                        self.constants.insert(const_name.to_string(), value);
                    }
                }
                return Ok(());
            }
        };

        let mut group = EnumGroup::new(name, kind);
        if let Some(width) = enums.attr("bitwidth").and_then(parse::parse_int) {
            group.bitwidth = width as u32;
        }

        for value in enums.find_all("enum") {
            if !parse::api_matches(value, &self.api) {
                continue;
            }
            let Some(value_name) = value.attr("name") else {
                continue;
            };
            let (text, numeric) = parse::resolve_enum(value, None)?;
            group.values.push(EnumValue::new(value_name, text, numeric));
        }

        self.groups.insert(name.to_string(), group);
        Ok(())
    }

    fn load_commands(&mut self, commands: &Element) -> Result<(), RegistryError> {
        for command in commands.find_all("command") {
            if !parse::api_matches(command, &self.api) {
                continue;
            }
            if let Some(target) = command.attr("alias") {
                let name = command.attr("name").ok_or(RegistryError::MissingAttribute {
                    element: "command",
                    attribute: "name",
                })?;
                self.command_aliases
                    .insert(name.to_string(), target.to_string());
                continue;
            }

            let name = command
                .find("proto")
                .and_then(|proto| proto.find_text("name"))
                .ok_or(RegistryError::MissingAttribute {
                    element: "command",
                    attribute: "proto",
                })?;
            self.commands
                .entry(name.trim().to_string())
                .or_insert_with(|| command.clone());
        }
        Ok(())
    }

    /// Apply `<enum extends="...">` additions of a feature or extension.
    fn load_additions(&mut self, block: &Element, number: Option<i64>) -> Result<(), RegistryError> {
        let extension = match block.name.as_str() {
            "extension" => block.attr("name").map(str::to_string),
            _ => None,
        };

        for require in block.find_all("require") {
            if !parse::api_matches(require, &self.api) {
                continue;
            }
            for value in require.find_all("enum") {
                let (Some(group_name), Some(name)) = (value.attr("extends"), value.attr("name")) else {
                    continue;
                };
                if !parse::api_matches(value, &self.api) {
                    continue;
                }
                let (text, numeric) = parse::resolve_enum(value, number)?;
                let Some(group) = self.groups.get_mut(group_name) else {
                    tracing::debug!("`{}` extends unknown group `{}`", name, group_name);
                    continue;
                };
                if group.values.iter().any(|v| v.name == name) {
                    continue;
                }
                group
                    .values
                    .push(EnumValue::new(name, text, numeric).extended_by(extension.clone()));
            }
        }
        Ok(())
    }

    /// Selected API name.
    pub fn api(&self) -> &str {
        &self.api
    }

    /// Look up a type definition.
    pub fn type_element(&self, name: &str) -> Option<&Element> {
        self.types.get(name)
    }

    /// Look up an enumerant group.
    pub fn group(&self, name: &str) -> Option<&EnumGroup> {
        self.groups.get(name)
    }

    /// Name of the group an enumerant belongs to.
    pub fn group_of(&self, enumerant: &str) -> Option<&str> {
        self.group_of.get(enumerant).map(String::as_str)
    }

    /// Look up an `API Constants` value.
    pub fn constant(&self, name: &str) -> Option<&str> {
        self.constants.get(name).map(String::as_str)
    }

    /// Resolve a command, following aliases. Returns the defining element.
    pub fn command_element(&self, name: &str) -> Result<Option<&Element>, RegistryError> {
        if let Some(element) = self.commands.get(name) {
            return Ok(Some(element));
        }
        match self.command_aliases.get(name) {
            Some(target) => self
                .command_element(target)?
                .map(Some)
                .ok_or_else(|| RegistryError::UnknownCommand {
                    alias: name.to_string(),
                    target: target.clone(),
                }),
            None => Ok(None),
        }
    }

    /// Macro protecting a platform, e.g. `VK_USE_PLATFORM_WIN32_KHR`.
    pub fn platform_protect(&self, platform: &str) -> Option<&str> {
        self.platforms.get(platform).map(String::as_str)
    }

    /// Core versions in document order.
    pub fn features(&self) -> &[Element] {
        &self.features
    }

    /// Supported extensions in document order.
    pub fn extensions(&self) -> &[Element] {
        &self.extensions
    }
}
