//! mesh-post: Command-line interface for mesh outline extraction and normal repair.
//!
//! Reads OBJ files, runs one of the mesh-post pipelines over every part, and
//! writes the result back as OBJ. Suitable for scripting and asset pipelines.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=mesh_post=info` - Basic operation logging
//! - `RUST_LOG=mesh_post=debug` - Detailed progress logging
//! - `RUST_LOG=mesh_post::timing=info` - Performance timing
//! - `RUST_LOG=mesh_post::quality=warn` - Geometry issues only
//!
//! # Example
//!
//! ```bash
//! # Extract outlines with auto thickness
//! mesh-post outline model.obj -o outline.obj --auto-thickness
//!
//! # Rebuild normals with a tighter smoothing angle and debug logging
//! RUST_LOG=mesh_post=debug mesh-post smooth model.obj -o smooth.obj --angle 20
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use mesh_post::PipelineConfig;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod io;
mod output;

use commands::{info, outline, smooth};

/// mesh-post - Outline extraction and normal repair for triangle meshes.
#[derive(Parser)]
#[command(name = "mesh-post")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Pipeline configuration file (TOML); command-line options override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh statistics and topology information
    Info {
        /// Input OBJ file
        input: PathBuf,
    },

    /// Extract feature-edge outlines as a ribbon mesh
    Outline {
        /// Input OBJ file
        input: PathBuf,

        /// Output OBJ file
        #[arg(short, long)]
        output: PathBuf,

        /// Dihedral angle threshold in degrees
        #[arg(long)]
        angle: Option<f64>,

        /// Line half-width in mesh units
        #[arg(long, conflicts_with = "auto_thickness")]
        thickness: Option<f64>,

        /// Derive line width from the model size
        #[arg(long)]
        auto_thickness: bool,
    },

    /// Rebuild smooth normals and tangents
    Smooth {
        /// Input OBJ file
        input: PathBuf,

        /// Output OBJ file
        #[arg(short, long)]
        output: PathBuf,

        /// Smoothing angle in degrees
        #[arg(long)]
        angle: Option<f64>,

        /// Position tolerance for treating corners as the same point
        #[arg(long)]
        tolerance: Option<f64>,
    },
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG wins over -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "mesh_post=info",
            2 => "mesh_post=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

/// Load the pipeline configuration named by `--config`, or the defaults.
fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    match &cli.config {
        Some(path) => PipelineConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => Ok(PipelineConfig::default()),
    }
}

fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let result = load_config(&cli).and_then(|config| match &cli.command {
        Commands::Info { input } => info::run(input, &config.outline, &cli),
        Commands::Outline {
            input,
            output,
            angle,
            thickness,
            auto_thickness,
        } => outline::run(
            input,
            output,
            config.outline,
            outline::Overrides {
                angle: *angle,
                thickness: *thickness,
                auto_thickness: *auto_thickness,
            },
            &cli,
        ),
        Commands::Smooth {
            input,
            output,
            angle,
            tolerance,
        } => smooth::run(input, output, config.smoothing, *angle, *tolerance, &cli),
    });

    if let Err(e) = &result {
        if !cli.quiet {
            if let Some(mesh_err) = e.downcast_ref::<mesh_post::MeshError>() {
                eprintln!("{}: {}", "Error".red().bold(), mesh_err);
                eprintln!("  {}: {}", "Code".cyan(), mesh_err.code());
                eprintln!(
                    "  {}: {}",
                    "Suggestion".green(),
                    mesh_err.recovery_suggestion()
                );
                if let Some(location) = mesh_err.location() {
                    eprintln!("  {}: {}", "Location".yellow(), location);
                }
            } else {
                eprintln!("{}: {}", "Error".red().bold(), e);
                for cause in e.chain().skip(1) {
                    eprintln!("  {}: {}", "Caused by".yellow(), cause);
                }
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
