//! maskmesh - binary segmentation mask to surface mesh (OBJ).
//!
//! Subcommands:
//! - `init-config`: write a default `config.json` template
//! - `run`: execute the meshing pipeline on a NIfTI mask

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mask_pipeline::{load_config, run, MeshConfig, PipelineStage, Progress};

#[derive(Parser, Debug)]
#[command(name = "maskmesh")]
#[command(about = "Binary segmentation mask (NIfTI) -> surface mesh (OBJ)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default config.json template
    InitConfig {
        /// Output path for the template
        #[arg(long)]
        out: PathBuf,
    },

    /// Run the meshing pipeline
    Run {
        /// Path to the binary NIfTI mask (.nii / .nii.gz)
        #[arg(long)]
        input: PathBuf,

        /// Path to the config JSON file
        #[arg(long)]
        config: PathBuf,
    },
}

/// Prints `[i/5] description` lines to stderr as stages begin.
struct StderrProgress;

impl Progress for StderrProgress {
    fn on_stage(&mut self, stage: PipelineStage) {
        eprintln!(
            "[{}/{}] {}",
            stage.position(),
            PipelineStage::COUNT,
            stage.label()
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Commands::InitConfig { out } => init_config(&out),
        Commands::Run { input, config } => run_pipeline(&input, &config),
    }
}

fn init_config(out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    let json = MeshConfig::template()
        .to_json_pretty()
        .context("rendering default config")?;
    let mut file = std::fs::File::create(out)
        .with_context(|| format!("creating {}", out.display()))?;
    writeln!(file, "{json}")?;

    println!("Wrote default config to: {}", out.display());
    Ok(())
}

fn run_pipeline(input: &Path, config_path: &Path) -> Result<()> {
    let config = load_config(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;

    let summary = run(input, &config, &mut StderrProgress)
        .with_context(|| format!("meshing {}", input.display()))?;

    for path in &summary.written {
        println!("Saved: {}", path.display());
    }
    println!("{summary}");
    Ok(())
}
