use std::sync::Arc;

use crate::{
    foundation::color::Rgba8,
    foundation::core::{Origin, Transform},
    foundation::error::{EditorError, EditorResult},
    persist::data_url,
    scene::text,
};

/// Font family every text box starts with.
pub const DEFAULT_FONT_FAMILY: &str = "Times New Roman";
/// Fill every text box starts with.
pub const DEFAULT_FILL: &str = "rgb(0,0,0)";

/// Kind of a placed object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Raster image.
    Image,
    /// Video surface.
    Video,
    /// Styled text box.
    Text,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Text => "text",
        })
    }
}

/// Encoded media bytes plus their MIME type.
///
/// The bytes are immutable and shared between clones; serialized as a base64 data URL.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub mime: String,
    pub data: Arc<[u8]>,
}

impl MediaSource {
    pub fn new(mime: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            mime: mime.into(),
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn to_data_url(&self) -> String {
        data_url::encode(&self.mime, &self.data)
    }

    pub fn from_data_url(url: &str) -> EditorResult<Self> {
        let (mime, bytes) = data_url::decode(url)?;
        Ok(Self::new(mime, bytes))
    }
}

impl std::fmt::Debug for MediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaSource")
            .field("mime", &self.mime)
            .field("len", &self.data.len())
            .finish()
    }
}

impl serde::Serialize for MediaSource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_data_url())
    }
}

impl<'de> serde::Deserialize<'de> for MediaSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let url = String::deserialize(deserializer)?;
        Self::from_data_url(&url).map_err(serde::de::Error::custom)
    }
}

/// Image payload.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageContent {
    pub src: MediaSource,
    pub natural_width: u32,
    pub natural_height: u32,
}

/// Video payload. Playback state is carried so restored scenes resume the same way.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VideoContent {
    pub src: MediaSource,
    pub natural_width: u32,
    pub natural_height: u32,
    #[serde(default)]
    pub playing: bool,
    #[serde(default = "yes")]
    pub muted: bool,
    #[serde(default = "yes")]
    pub looping: bool,
    /// Decoded first frame, used when the scene is flattened to a still image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<MediaSource>,
}

fn yes() -> bool {
    true
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    pub fn from_bold(bold: bool) -> Self {
        if bold { Self::Bold } else { Self::Normal }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
        }
    }
}

/// Text payload.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextContent {
    pub text: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_fill")]
    pub fill: String,
    #[serde(default)]
    pub font_weight: FontWeight,
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_size() -> f64 {
    40.0
}

fn default_fill() -> String {
    DEFAULT_FILL.to_string()
}

/// Kind-specific payload of a [`SceneObject`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Image(ImageContent),
    Video(VideoContent),
    Text(TextContent),
}

/// A placed item: image, video surface or text box.
///
/// Objects carry no identity of their own; the owning [`crate::Scene`] hands out an
/// [`crate::ObjectId`] on insertion. Cloning yields an independent value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneObject {
    pub transform: Transform,
    /// Whether pointer interaction may select this object.
    #[serde(default = "yes")]
    pub selectable: bool,
    /// Whether pointer events target this object.
    #[serde(default = "yes")]
    pub evented: bool,
    #[serde(flatten)]
    pub content: Content,
}

impl SceneObject {
    pub fn image(src: MediaSource, natural_width: u32, natural_height: u32) -> Self {
        Self {
            transform: Transform {
                width: f64::from(natural_width),
                height: f64::from(natural_height),
                ..Transform::default()
            },
            selectable: true,
            evented: true,
            content: Content::Image(ImageContent {
                src,
                natural_width,
                natural_height,
            }),
        }
    }

    /// A playing, muted, looping video centred on its position.
    pub fn video(src: MediaSource, natural_width: u32, natural_height: u32) -> Self {
        Self {
            transform: Transform {
                origin: Origin::Center,
                width: f64::from(natural_width),
                height: f64::from(natural_height),
                ..Transform::default()
            },
            selectable: true,
            evented: true,
            content: Content::Video(VideoContent {
                src,
                natural_width,
                natural_height,
                playing: true,
                muted: true,
                looping: true,
                poster: None,
            }),
        }
    }

    pub fn text(text: impl Into<String>, width: f64, font_size: f64) -> Self {
        let mut obj = Self {
            transform: Transform {
                width,
                ..Transform::default()
            },
            selectable: true,
            evented: true,
            content: Content::Text(TextContent {
                text: text.into(),
                font_family: default_font_family(),
                font_size,
                fill: default_fill(),
                font_weight: FontWeight::Normal,
            }),
        };
        obj.refresh_text_height();
        obj
    }

    pub fn with_position(mut self, left: f64, top: f64) -> Self {
        self.transform.left = left;
        self.transform.top = top;
        self
    }

    pub fn kind(&self) -> ObjectKind {
        match self.content {
            Content::Image(_) => ObjectKind::Image,
            Content::Video(_) => ObjectKind::Video,
            Content::Text(_) => ObjectKind::Text,
        }
    }

    pub fn as_text(&self) -> Option<&TextContent> {
        match &self.content {
            Content::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextContent> {
        match &mut self.content {
            Content::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_playing_video(&self) -> bool {
        matches!(&self.content, Content::Video(v) if v.playing)
    }

    /// Text boxes grow vertically with their wrapped content.
    pub(crate) fn refresh_text_height(&mut self) {
        if let Content::Text(t) = &self.content {
            self.transform.height =
                text::text_block_height(&t.text, self.transform.width, t.font_size);
        }
    }

    /// Check record invariants (finite geometry, valid colors, non-empty media).
    pub fn validate(&self) -> EditorResult<()> {
        self.transform.validate()?;
        match &self.content {
            Content::Image(img) => {
                if img.src.is_empty() {
                    return Err(EditorError::validation("image source must be non-empty"));
                }
            }
            Content::Video(v) => {
                if v.src.is_empty() {
                    return Err(EditorError::validation("video source must be non-empty"));
                }
            }
            Content::Text(t) => {
                if !t.font_size.is_finite() || t.font_size <= 0.0 {
                    return Err(EditorError::validation(
                        "text font_size must be finite and > 0",
                    ));
                }
                if t.font_family.trim().is_empty() {
                    return Err(EditorError::validation("text font_family must be non-empty"));
                }
                Rgba8::parse(&t.fill)?;
            }
        }
        Ok(())
    }
}

/// A partial attribute update applied by [`crate::Scene::apply_to_active`].
///
/// Unset fields are left alone. Text-only fields are ignored on image and video objects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeDelta {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    pub angle: Option<f64>,
    pub selectable: Option<bool>,
    pub evented: Option<bool>,
    pub text: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub fill: Option<String>,
    pub font_weight: Option<FontWeight>,
}

impl AttributeDelta {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reject values that would break object invariants, before anything is mutated.
    pub fn validate(&self) -> EditorResult<()> {
        for (name, v) in [
            ("left", self.left),
            ("top", self.top),
            ("angle", self.angle),
        ] {
            if let Some(v) = v
                && !v.is_finite()
            {
                return Err(EditorError::validation(format!("{name} must be finite")));
            }
        }
        for (name, v) in [
            ("width", self.width),
            ("scale_x", self.scale_x),
            ("scale_y", self.scale_y),
            ("font_size", self.font_size),
        ] {
            if let Some(v) = v
                && (!v.is_finite() || v <= 0.0)
            {
                return Err(EditorError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if let Some(family) = &self.font_family
            && family.trim().is_empty()
        {
            return Err(EditorError::validation("font family must be non-empty"));
        }
        if let Some(fill) = &self.fill {
            Rgba8::parse(fill)?;
        }
        Ok(())
    }

    pub(crate) fn apply(&self, obj: &mut SceneObject) {
        let t = &mut obj.transform;
        if let Some(v) = self.left {
            t.left = v;
        }
        if let Some(v) = self.top {
            t.top = v;
        }
        if let Some(v) = self.width {
            t.width = v;
        }
        if let Some(v) = self.scale_x {
            t.scale_x = v;
        }
        if let Some(v) = self.scale_y {
            t.scale_y = v;
        }
        if let Some(v) = self.angle {
            t.angle = v;
        }
        if let Some(v) = self.selectable {
            obj.selectable = v;
        }
        if let Some(v) = self.evented {
            obj.evented = v;
        }

        if let Some(text) = obj.as_text_mut() {
            if let Some(v) = &self.text {
                text.text = v.clone();
            }
            if let Some(v) = &self.font_family {
                text.font_family = v.clone();
            }
            if let Some(v) = self.font_size {
                text.font_size = v;
            }
            if let Some(v) = &self.fill {
                text.fill = v.clone();
            }
            if let Some(v) = self.font_weight {
                text.font_weight = v;
            }
        }
        obj.refresh_text_height();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/object.rs"]
mod tests;
