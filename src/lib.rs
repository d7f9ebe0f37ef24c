//! Montage is the editing engine of a visual composition editor.
//!
//! It owns a mutable scene of placed images, video surfaces and text boxes, with selection,
//! stacking order, a cascading clipboard and JSON snapshots. The public API is session-oriented:
//!
//! - Create an [`Editor`] from an [`EditorConfig`]
//! - Import media through a [`MediaBackend`] and style text through a [`FontLoader`]
//! - Persist with [`Editor::dump_to`] / [`Editor::restore_from`] against a [`SnapshotStore`]
//! - Redraw with [`Editor::tick`] through a [`RenderEngine`], or export a still image
#![forbid(unsafe_code)]

mod assets;
mod config;
mod editor;
mod foundation;
mod persist;
mod render;
mod scene;

pub use crate::foundation::color::Rgba8;
pub use crate::foundation::core::{Affine, Origin, Point, Rect, Transform, Vec2};
pub use crate::foundation::error::{EditorError, EditorResult};

pub use crate::assets::decode::{
    CpuMediaBackend, ImageInfo, MediaBackend, VideoInfo, decode_image_info,
};
pub use crate::assets::fonts::{FontLoader, SystemFontLoader};
pub use crate::assets::media::{MediaBlob, MediaKind};
pub use crate::config::{EditorConfig, TextBoxDefaults};
pub use crate::editor::clipboard::{Clipboard, Held};
pub use crate::editor::import::TextBoxOptions;
pub use crate::editor::session::Editor;
pub use crate::editor::style::{FontChange, FontGenerations, PendingFontChange};
pub use crate::persist::snapshot::{SNAPSHOT_VERSION, Snapshot, dump, restore};
pub use crate::persist::store::{DirStore, MemoryStore, SnapshotStore};
pub use crate::render::backend::{FrameRGBA, RasterRenderer, RenderEngine};
pub use crate::render::export::{ExportFormat, export_image};
pub use crate::render::svg::scene_to_svg;
pub use crate::scene::graph::{CanvasSettings, ObjectId, Scene, Selection};
pub use crate::scene::object::{
    AttributeDelta, Content, DEFAULT_FILL, DEFAULT_FONT_FAMILY, FontWeight, ImageContent,
    MediaSource, ObjectKind, SceneObject, TextContent, VideoContent,
};
pub use crate::scene::text::{LINE_HEIGHT, wrap_lines};
