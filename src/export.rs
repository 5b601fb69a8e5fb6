use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use log::info;
use mesh_tools::GltfBuilder;
use mesh_tools::Triangle;

use crate::encode::ColorBuffer;
use crate::error::{Result, TextureError};
use crate::field::SurfaceFields;

/// Writes a color buffer as an 8-bit RGB PNG
///
/// The output directory must already exist; it is never created here.
///
/// # Arguments
/// * `dir` - Destination directory
/// * `file_name` - File name inside `dir`
/// * `buffer` - Colors in [0, 1]
///
/// # Returns
/// * `Result<PathBuf>` - Path of the written file
pub fn save_texture(dir: &Path, file_name: &str, buffer: &ColorBuffer) -> Result<PathBuf> {
    let path = dir.join(file_name);
    info!("saving \"{}\"", path.display());

    let pixels = buffer.to_rgb8();
    let bytes: Vec<u8> = bytemuck::cast_slice(&pixels).to_vec();
    let image = RgbImage::from_raw(buffer.width() as u32, buffer.height() as u32, bytes)
        .ok_or(TextureError::ShapeMismatch {
            field: "color buffer",
            expected: (buffer.height(), buffer.width()),
            found: (pixels.len(), 1),
        })?;

    image
        .save_with_format(&path, ImageFormat::Png)
        .map_err(|source| TextureError::Image {
            path: path.clone(),
            source,
        })?;

    Ok(path)
}

/// Exports the height field as a 3D mesh in GLB format for previewing
///
/// Vertex normals come straight from the analytic (gx, gy, gz) field, so
/// the mesh shows the same shading the normal map encodes.
///
/// # Arguments
/// * `fields` - Checked surface fields
/// * `stride` - Take every `stride`-th sample along each axis
/// * `scale_xy` - Size of the (u, v) square in mesh units
/// * `scale_z` - Height multiplier
/// * `output_path` - Path where the GLB file will be saved
pub fn export_preview_glb(
    fields: &SurfaceFields,
    stride: usize,
    scale_xy: f32,
    scale_z: f32,
    output_path: &Path,
) -> Result<()> {
    let mut builder = GltfBuilder::new();

    let resolution = fields.resolution();
    let stride = stride.max(1);
    let samples: Vec<usize> = (0..resolution)
        .step_by(stride)
        .chain(std::iter::once(resolution - 1))
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    let side = samples.len();
    if side < 2 {
        return Err(TextureError::Preview(format!(
            "resolution {} is too small for a mesh",
            resolution
        )));
    }

    let mut positions = Vec::with_capacity(side * side);
    let mut normals = Vec::with_capacity(side * side);
    let mut texcoords = Vec::with_capacity(side * side);
    let mut indices = Vec::with_capacity((side - 1) * (side - 1) * 2);

    let last = (resolution - 1) as f32;
    for &y in &samples {
        for &x in &samples {
            let h = fields.height.get(x, y).unwrap_or(0.0) as f32 * scale_z;
            let normal = fields.normal_at(x, y).unwrap_or(glam::DVec3::Z);

            let u = x as f32 / last;
            let v = y as f32 / last;

            // Y-up mesh: (u, v) spans the XZ plane, height goes up
            positions.push(mesh_tools::compat::point3::new(
                (u - 0.5) * scale_xy,
                h,
                (v - 0.5) * scale_xy,
            ));
            normals.push(mesh_tools::compat::vector3::new(
                -normal.x as f32,
                normal.z as f32,
                -normal.y as f32,
            ));
            texcoords.push(mesh_tools::compat::vector2::new(u, v));
        }
    }

    for row in 0..(side - 1) {
        for col in 0..(side - 1) {
            let top_left = (row * side + col) as u32;
            let top_right = (row * side + col + 1) as u32;
            let bottom_left = ((row + 1) * side + col) as u32;
            let bottom_right = ((row + 1) * side + col + 1) as u32;

            indices.push(Triangle::new(top_left, bottom_left, top_right));
            indices.push(Triangle::new(top_right, bottom_left, bottom_right));
        }
    }

    let mesh_index = builder.create_simple_mesh(
        Some("WaveSurface".to_string()),
        &positions,
        &indices,
        Some(normals),
        Some(texcoords),
        None,
    );

    let node = builder.add_node(Some("Wave".to_string()), Some(mesh_index), None, None, None);
    builder.add_scene(Some("Preview".to_string()), Some(vec![node]));

    let path = output_path
        .to_str()
        .ok_or_else(|| TextureError::Preview(format!("non UTF-8 path {:?}", output_path)))?;
    builder
        .export_glb(path)
        .map_err(|e| TextureError::Preview(e.to_string()))?;

    info!("wrote preview mesh \"{}\"", output_path.display());
    Ok(())
}
