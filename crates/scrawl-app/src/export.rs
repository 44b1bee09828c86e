//! PNG export of the surface pixels.

use scrawl_render::Surface;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Surface has no pixels to export")]
    EmptySurface,
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Encode straight-alpha RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba_data)?;
    }
    Ok(png_data)
}

/// Encode the surface at physical resolution.
pub fn surface_png(surface: &Surface) -> Result<Vec<u8>, ExportError> {
    let rgba = surface.to_rgba8().ok_or(ExportError::EmptySurface)?;
    let (width, height) = surface.physical_size();
    encode_png(&rgba, width, height)
}

pub fn export_png(surface: &Surface, path: &Path) -> Result<(), ExportError> {
    let png_data = surface_png(surface)?;
    std::fs::write(path, &png_data).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("Exported {} bytes to {}", png_data.len(), path.display());
    Ok(())
}
