//! vkdgen CLI - D bindings for Vulkan from vk.xml

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;
use vkdgen::ops::{generate, GenerateOptions};
use vkdgen::util::config::load_config;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("vkdgen=debug")
    } else {
        EnvFilter::new("vkdgen=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let mut config = load_config(cli.config.as_deref(), &cwd)?;
    config.merge(cli.overrides());

    let opts = GenerateOptions {
        registry: cli.registry,
        output_dir: cli.outdir,
        config,
        report: cli.report,
    };
    generate(&opts)?;

    Ok(())
}
