//! PNG export for elevation and biome maps.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageEncoder, RgbImage};
use thiserror::Error;

use crate::world::WorldMap;

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("cannot export an empty map")]
    EmptyMap,
}

/// Exports the elevation field as a 16-bit grayscale PNG.
pub fn export_elevation_png(map: &WorldMap, path: &Path) -> Result<(), ExportError> {
    let size = map.size();
    if size == 0 {
        return Err(ExportError::EmptyMap);
    }

    // 16-bit PNG samples are big-endian on the wire.
    let mut bytes = Vec::with_capacity(size * size * 2);
    for cell in map.cells() {
        let value = (cell.elevation.clamp(0.0, 1.0) * 65535.0) as u16;
        bytes.extend_from_slice(&value.to_be_bytes());
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, CompressionType::Default, FilterType::Adaptive);
    encoder.write_image(
        &bytes,
        size as u32,
        size as u32,
        image::ExtendedColorType::L16,
    )?;
    Ok(())
}

/// Exports biome assignments as an RGB PNG using each biome's preview color.
/// Unassigned cells render black.
pub fn export_biome_png(map: &WorldMap, path: &Path) -> Result<(), ExportError> {
    let size = map.size();
    if size == 0 {
        return Err(ExportError::EmptyMap);
    }

    let mut img = RgbImage::new(size as u32, size as u32);
    for y in 0..size {
        for x in 0..size {
            let rgb = map
                .cell(x, y)
                .biome
                .map(|b| b.preview_rgb())
                .unwrap_or([0, 0, 0]);
            img.put_pixel(x as u32, y as u32, image::Rgb(rgb));
        }
    }

    img.save(path)?;
    Ok(())
}
