// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! CLI entry point: writes the Direct3D 9 retracer source to stdout.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use retrace_gen::{driver, GeneratorConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a C++ Direct3D 9 retracer")]
struct Args {
    /// API description (JSON). Defaults to the embedded Direct3D 9 description.
    #[arg(long)]
    spec: Option<PathBuf>,
    /// Generator settings (JSON).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the generated source here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Log more (repeatable). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // stdout carries the generated source; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let api = driver::load_api(args.spec.as_deref()).with_context(|| match &args.spec {
        Some(path) => format!("failed to load API description {}", path.display()),
        None => "failed to load embedded Direct3D 9 description".to_owned(),
    })?;

    let config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    let code = driver::generate(&api, &config);

    match &args.output {
        Some(path) => std::fs::write(path, &code)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(code.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
