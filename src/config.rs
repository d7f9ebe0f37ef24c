use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{
    foundation::core::{Point, Vec2},
    foundation::error::{EditorError, EditorResult},
    scene::graph::CanvasSettings,
    scene::object::DEFAULT_FONT_FAMILY,
};

/// Geometry and content of a freshly added text box.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextBoxDefaults {
    /// Initial text.
    pub text: String,
    /// Left edge in canvas pixels.
    pub left: f64,
    /// Top edge in canvas pixels.
    pub top: f64,
    /// Wrapping width in canvas pixels.
    pub width: f64,
    /// Font size in pixels.
    pub font_size: f64,
}

impl Default for TextBoxDefaults {
    fn default() -> Self {
        Self {
            text: "Text".to_string(),
            left: 50.0,
            top: 50.0,
            width: 150.0,
            font_size: 20.0,
        }
    }
}

/// Editor-wide settings.
///
/// Every field has a default, so a config file only needs the keys it overrides:
///
/// ```json
/// { "canvas": { "width": 800, "height": 600 }, "paste_offset": { "x": 20, "y": 20 } }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Canvas used for new scenes.
    pub canvas: CanvasSettings,
    /// Defaults for [`crate::Editor::add_text`].
    pub text_box: TextBoxDefaults,
    /// Shift applied by every paste, relative to the previous paste.
    pub paste_offset: Vec2,
    /// Where imported images are placed (top-left corner).
    pub image_position: Point,
    /// Where imported videos are centred.
    pub video_anchor: Point,
    /// Font families offered to the user.
    pub fonts: Vec<String>,
    /// Families that are always available and never need loading.
    pub builtin_fonts: Vec<String>,
    /// Storage slot used by dump/restore.
    pub snapshot_slot: String,
    /// Bring an object to the front whenever it gets selected.
    pub raise_on_select: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSettings::default(),
            text_box: TextBoxDefaults::default(),
            paste_offset: Vec2::new(10.0, 10.0),
            image_position: Point::ORIGIN,
            video_anchor: Point::new(200.0, 300.0),
            fonts: [
                DEFAULT_FONT_FAMILY,
                "Noto Sans JP",
                "Shippori Antique B1",
                "Mochiy Pop One",
                "Zen Antique",
                "Zen Old Mincho",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            builtin_fonts: vec![DEFAULT_FONT_FAMILY.to_string()],
            snapshot_slot: "temp".to_string(),
            raise_on_select: false,
        }
    }
}

impl EditorConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> EditorResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| EditorError::validation(format!("parse editor config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> EditorResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            EditorError::validation(format!("open editor config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Whether `family` can be applied without loading.
    pub fn is_builtin_font(&self, family: &str) -> bool {
        self.builtin_fonts.iter().any(|f| f == family)
    }

    pub fn validate(&self) -> EditorResult<()> {
        self.canvas.validate()?;

        let tb = &self.text_box;
        if !tb.left.is_finite() || !tb.top.is_finite() {
            return Err(EditorError::validation("text_box position must be finite"));
        }
        if !tb.width.is_finite() || tb.width <= 0.0 {
            return Err(EditorError::validation(
                "text_box width must be finite and > 0",
            ));
        }
        if !tb.font_size.is_finite() || tb.font_size <= 0.0 {
            return Err(EditorError::validation(
                "text_box font_size must be finite and > 0",
            ));
        }
        for (name, p) in [
            ("paste_offset", self.paste_offset.to_point()),
            ("image_position", self.image_position),
            ("video_anchor", self.video_anchor),
        ] {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(EditorError::validation(format!("{name} must be finite")));
            }
        }
        if self.builtin_fonts.iter().any(|f| f.trim().is_empty())
            || self.fonts.iter().any(|f| f.trim().is_empty())
        {
            return Err(EditorError::validation("font family names must be non-empty"));
        }
        if self.snapshot_slot.trim().is_empty() {
            return Err(EditorError::validation("snapshot_slot must be non-empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
