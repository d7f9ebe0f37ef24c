use std::sync::Arc;

use crate::{
    assets::fonts::{SystemFontLoader, build_fontdb},
    foundation::error::EditorResult,
    render::export::{ExportFormat, encode_frame},
    render::raster::rasterize_scene,
    scene::graph::Scene,
};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Redraw primitive driven by [`crate::Editor::tick`].
///
/// Hosts with their own compositor implement this; [`RasterRenderer`] is the built-in CPU path.
pub trait RenderEngine {
    /// Redraw every object of `scene`, back to front.
    fn render_all(&mut self, scene: &Scene) -> EditorResult<()>;
}

/// CPU renderer that keeps the most recent frame.
#[derive(Clone, Debug)]
pub struct RasterRenderer {
    fontdb: Arc<usvg::fontdb::Database>,
    last: Option<FrameRGBA>,
    frames: u64,
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self::new(build_fontdb(&[]))
    }
}

impl RasterRenderer {
    pub fn new(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self {
            fontdb,
            last: None,
            frames: 0,
        }
    }

    /// Share the font database of `loader`, so families it reports as loaded also render.
    pub fn with_fonts(loader: &SystemFontLoader) -> Self {
        Self::new(loader.database())
    }

    /// Most recently rendered frame.
    pub fn last_frame(&self) -> Option<&FrameRGBA> {
        self.last.as_ref()
    }

    /// Number of completed `render_all` calls.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Rasterize `scene` without touching the stored frame.
    pub fn rasterize(&self, scene: &Scene) -> EditorResult<FrameRGBA> {
        rasterize_scene(scene, &self.fontdb)
    }

    /// Rasterize and encode `scene` as a still image.
    pub fn export(&self, scene: &Scene, format: ExportFormat) -> EditorResult<Vec<u8>> {
        let frame = self.rasterize(scene)?;
        encode_frame(frame, scene, format)
    }
}

impl RenderEngine for RasterRenderer {
    fn render_all(&mut self, scene: &Scene) -> EditorResult<()> {
        let frame = self.rasterize(scene)?;
        self.last = Some(frame);
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
