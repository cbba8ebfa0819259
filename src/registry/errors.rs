//! Registry loading errors.

use std::path::PathBuf;

use thiserror::Error;

/// Error while locating, parsing or walking the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("could not find vk.xml at `{}`\n\
             help: pass the path to vk.xml or to a Vulkan-Docs checkout", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read registry: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed registry XML: {0}")]
    Xml(#[from] xml::reader::Error),

    #[error("registry document has no root element")]
    MissingRoot,

    #[error("`<{element}>` is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("command `{alias}` aliases unknown command `{target}`")]
    UnknownCommand { alias: String, target: String },

    #[error("cannot parse declaration of type `{name}`")]
    MalformedType { name: String },

    #[error("invalid value `{value}` for enumerant `{name}`")]
    InvalidEnumValue { name: String, value: String },

    #[error("invalid {what} pattern: {source}")]
    InvalidPattern {
        what: &'static str,
        #[source]
        source: regex::Error,
    },
}
