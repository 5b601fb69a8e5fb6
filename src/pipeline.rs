use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::WaveConfig;
use crate::encode::encode_surface;
use crate::error::Result;
use crate::export::{export_preview_glb, save_texture};
use crate::field::evaluate_gradient;
use crate::grid::sample_grid;
use crate::invariants::{GradientStats, check_surface, gradient_stats};

/// Options that do not affect the textures themselves
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Also write `<name>_preview.glb` next to the textures
    pub preview: bool,
}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub name: &'static str,
    pub written: Vec<PathBuf>,
    pub gradient: GradientStats,
    pub height_min: f64,
    pub height_max: f64,
    pub max_unit_deviation: f64,
}

/// Synthesize and write one texture pair
///
/// Grid → fields → invariant checks → color encoding → PNG files. Every
/// check for the pair passes before the first file is written, so a
/// failing configuration leaves no partial output behind.
pub fn run(config: &WaveConfig, output_dir: &Path, options: &RunOptions) -> Result<RunReport> {
    info!(
        "Synthesizing '{}' at {}x{}",
        config.name, config.resolution, config.resolution
    );
    config.validate()?;

    let grid = sample_grid(config.resolution);
    let gradient = evaluate_gradient(&grid, config)?;

    // Reported before any check can stop the run
    let stats = gradient_stats(&gradient.gx, &gradient.gy);
    info!("grad_norm_min {}", stats.min_norm);
    info!("grad_norm_max {}", stats.max_norm);

    let fields = gradient.with_normal()?;
    let report = check_surface(&fields, config.height_amplitude)?;
    debug!(
        "height range [{}, {}], max unit-length deviation {:e}",
        report.height_min, report.height_max, report.max_unit_deviation
    );

    let (height_colors, normal_colors) = encode_surface(&fields, config.color_convention)?;
    debug!("height colors span {:?}", height_colors.range());
    debug!("normal colors span {:?}", normal_colors.range());

    let written = vec![
        save_texture(output_dir, config.height_file, &height_colors)?,
        save_texture(output_dir, config.normal_file, &normal_colors)?,
    ];

    if options.preview {
        let preview_path = output_dir.join(format!("{}_preview.glb", config.name));
        export_preview_glb(&fields, 4, 1.0, 1.0, &preview_path)?;
    }

    Ok(RunReport {
        name: config.name,
        written,
        gradient: report.gradient,
        height_min: report.height_min,
        height_max: report.height_max,
        max_unit_deviation: report.max_unit_deviation,
    })
}
