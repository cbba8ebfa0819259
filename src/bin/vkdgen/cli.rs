//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use vkdgen::util::config::{Config, OutputConfig, RegistryConfig};

/// Generate D bindings and a function loader from the Vulkan XML registry
#[derive(Parser)]
#[command(name = "vkdgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to vk.xml, or to a Vulkan-Docs / Vulkan-Headers checkout
    #[arg(env = "VKDGEN_REGISTRY")]
    pub registry: PathBuf,

    /// Directory receiving package.d, types.d and functions.d
    pub outdir: PathBuf,

    /// D package name [default: dvulkan]
    #[arg(long, alias = "packagePrefix", value_name = "NAME")]
    pub package_prefix: Option<String>,

    /// Prefix of generated loader identifiers [default: DVulkan]
    #[arg(long, alias = "namePrefix", value_name = "NAME")]
    pub name_prefix: Option<String>,

    /// Versions to generate (regex)
    #[arg(long, value_name = "PATTERN")]
    pub versions: Option<String>,

    /// Extensions to generate (regex)
    #[arg(long, value_name = "PATTERN")]
    pub extensions: Option<String>,

    /// Extensions to leave out (regex)
    #[arg(long, value_name = "PATTERN")]
    pub remove_extensions: Option<String>,

    /// Fail when a struct's structure type is not declared by the registry
    #[arg(long)]
    pub strict_struct_types: bool,

    /// Configuration file [default: ./vkdgen.toml when present]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write a JSON summary of the run
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Settings given on the command line, to be merged over the config file.
    pub fn overrides(&self) -> Config {
        Config {
            output: OutputConfig {
                package_prefix: self.package_prefix.clone(),
                name_prefix: self.name_prefix.clone(),
                strict_struct_types: self.strict_struct_types,
            },
            registry: RegistryConfig {
                versions: self.versions.clone(),
                add_extensions: self.extensions.clone(),
                remove_extensions: self.remove_extensions.clone(),
                ..Default::default()
            },
        }
    }
}
