//! Implementation of `vkdgen`: registry in, D package out.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::ExtensionFilter;
use crate::generator::{DGenerator, GenerationReport, GeneratorOptions, Outputs};
use crate::registry::{self, Registry, TraversalOptions};
use crate::util::{fs, Config};

/// Options for a generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Path to `vk.xml` or a directory containing it
    pub registry: PathBuf,

    /// Directory receiving `package.d`, `types.d` and `functions.d`
    pub output_dir: PathBuf,

    /// Merged file and command-line settings
    pub config: Config,

    /// Where to write the JSON report, if requested
    pub report: Option<PathBuf>,
}

/// Generate the D package described by `opts`.
///
/// The registry is located and parsed before any output file is created, so
/// a missing or malformed registry leaves the output directory untouched.
pub fn generate(opts: &GenerateOptions) -> Result<GenerationReport> {
    let config = &opts.config;

    let path = registry::locate(&opts.registry)?;
    tracing::info!("Loading registry {}", path.display());
    let registry = Registry::load(&path, config.api())
        .with_context(|| format!("failed to load registry: {}", path.display()))?;

    let extensions = ExtensionFilter::new(config.add_extensions(), config.remove_extensions())
        .context("invalid extension pattern")?;
    let traversal = TraversalOptions::new(config.versions(), config.emit_versions(), extensions.clone())?;

    let generator_options = GeneratorOptions {
        package_prefix: config.package_prefix().to_string(),
        name_prefix: config.name_prefix().to_string(),
        extensions,
        strict_struct_types: config.output.strict_struct_types,
    };

    fs::ensure_dir(&opts.output_dir)?;
    let outputs = Outputs::create(&opts.output_dir).with_context(|| {
        format!("failed to create output files in {}", opts.output_dir.display())
    })?;

    let mut generator = DGenerator::new(generator_options, outputs);
    registry::traverse(&registry, &traversal, &mut generator)?;
    let report = generator.report().clone();

    tracing::info!(
        "Wrote {} package to {} ({} instance-level, {} device-level commands)",
        report.package,
        opts.output_dir.display(),
        report.instance_level.len(),
        report.device_level.len()
    );

    if let Some(ref path) = opts.report {
        let json = report.to_json().context("failed to serialize report")?;
        fs::write_string(path, &json)?;
        tracing::info!("Wrote report to {}", path.display());
    }

    Ok(report)
}
