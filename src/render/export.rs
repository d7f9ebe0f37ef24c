use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context as _;

use crate::{
    assets::decode::{demultiply_rgba8_in_place, premultiply_rgba8_in_place},
    foundation::color::Rgba8,
    foundation::error::{EditorError, EditorResult},
    render::backend::{FrameRGBA, RasterRenderer},
    scene::graph::Scene,
};

/// Still-image export formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Png,
    /// Lossy; transparency is flattened onto the canvas background.
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Suggested download name.
    pub fn default_file_name(self) -> String {
        format!("helloWorld.{}", self.extension())
    }

    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for ExportFormat {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            other => Err(EditorError::validation(format!(
                "unknown export format \"{other}\" (expected png or jpeg)"
            ))),
        }
    }
}

/// Flatten `scene` and encode it. Loads the system font database on every call; reuse a
/// [`RasterRenderer`] when exporting repeatedly.
#[tracing::instrument(skip(scene), fields(objects = scene.len()))]
pub fn export_image(scene: &Scene, format: ExportFormat) -> EditorResult<Vec<u8>> {
    RasterRenderer::default().export(scene, format)
}

pub(crate) fn encode_frame(
    frame: FrameRGBA,
    scene: &Scene,
    format: ExportFormat,
) -> EditorResult<Vec<u8>> {
    let FrameRGBA {
        width,
        height,
        mut data,
        premultiplied,
    } = frame;
    let mut buf = Vec::new();
    match format {
        ExportFormat::Png => {
            if premultiplied {
                demultiply_rgba8_in_place(&mut data);
            }
            let img = image::RgbaImage::from_raw(width, height, data)
                .ok_or_else(|| anyhow::anyhow!("invalid rgba buffer size"))?;
            image::DynamicImage::ImageRgba8(img)
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .context("encode png")?;
        }
        ExportFormat::Jpeg => {
            let bg = Rgba8::parse(&scene.canvas().background)?;
            if !premultiplied {
                premultiply_rgba8_in_place(&mut data);
            }
            let rgb = flatten_premul_onto(&data, bg);
            let img = image::RgbImage::from_raw(width, height, rgb)
                .ok_or_else(|| anyhow::anyhow!("invalid rgb buffer size"))?;
            image::DynamicImage::ImageRgb8(img)
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
                .context("encode jpeg")?;
        }
    }
    tracing::debug!(format = format.extension(), bytes = buf.len(), "frame encoded");
    Ok(buf)
}

/// Composite premultiplied RGBA over the opaque version of `bg`, dropping alpha.
fn flatten_premul_onto(rgba: &[u8], bg: Rgba8) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let inv = 255 - u16::from(px[3]);
        for (c, b) in px[..3].iter().zip([bg.r, bg.g, bg.b]) {
            let v = u16::from(*c) + (u16::from(b) * inv + 127) / 255;
            out.push(v.min(255) as u8);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/export.rs"]
mod tests;
