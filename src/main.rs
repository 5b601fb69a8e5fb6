mod config;
mod encode;
mod error;
mod export;
mod field;
mod grid;
mod invariants;
mod pipeline;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use config::WaveVariant;
use pipeline::{RunOptions, run};

/// Synthesize the wavy depth/height and normal map textures
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory the textures are written to (must exist)
    #[arg(long, default_value = "assets/textures")]
    output_dir: PathBuf,

    /// Texture pair to generate; repeat for several (default: all)
    #[arg(long, value_enum)]
    variant: Vec<WaveVariant>,

    /// Also write a GLB mesh of each surface next to the textures
    #[arg(long)]
    preview: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let variants = if args.variant.is_empty() {
        vec![WaveVariant::Depth, WaveVariant::Height]
    } else {
        args.variant
    };
    let options = RunOptions {
        preview: args.preview,
    };

    for variant in variants {
        let config = variant.config();
        let report = run(&config, &args.output_dir, &options)
            .with_context(|| format!("failed to generate '{}'", config.name))?;
        info!(
            "'{}' done: {} files written, height in [{:.4}, {:.4}], grad norm in [{:.4}, {:.4}], max |n|^2 - 1 = {:e}",
            report.name,
            report.written.len(),
            report.height_min,
            report.height_max,
            report.gradient.min_norm,
            report.gradient.max_norm,
            report.max_unit_deviation
        );
    }

    Ok(())
}
