use crate::{
    assets::decode::MediaBackend,
    assets::media::{MediaBlob, MediaKind},
    config::{EditorConfig, TextBoxDefaults},
    foundation::core::Point,
    foundation::error::{EditorError, EditorResult},
    scene::graph::{ObjectId, Scene},
    scene::object::{Content, MediaSource, SceneObject},
};

/// Per-call overrides for a new text box. Unset fields fall back to [`TextBoxDefaults`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextBoxOptions {
    pub text: Option<String>,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub font_size: Option<f64>,
}

/// Decode an image and add it with its natural size, top-left corner at `at`.
///
/// Nothing is inserted until decoding has completed; a decode failure leaves `scene` unchanged.
pub async fn import_image<B: MediaBackend + ?Sized>(
    scene: &mut Scene,
    backend: &B,
    bytes: Vec<u8>,
    at: Point,
) -> EditorResult<ObjectId> {
    let info = backend.decode_image(&bytes).await?;
    if info.width == 0 || info.height == 0 {
        return Err(EditorError::decode("image has zero size"));
    }
    let src = MediaSource::new(info.mime, bytes);
    let obj = SceneObject::image(src, info.width, info.height).with_position(at.x, at.y);
    Ok(scene.add(obj))
}

/// Probe a video and add a playing, muted, looping surface centred on `anchor`.
pub async fn import_video<B: MediaBackend + ?Sized>(
    scene: &mut Scene,
    backend: &B,
    bytes: Vec<u8>,
    mime: &str,
    anchor: Point,
) -> EditorResult<ObjectId> {
    let info = backend.probe_video(&bytes).await?;
    if info.width == 0 || info.height == 0 {
        return Err(EditorError::decode("video has zero size"));
    }
    let mut obj = SceneObject::video(MediaSource::new(mime, bytes), info.width, info.height)
        .with_position(anchor.x, anchor.y);
    if let Content::Video(v) = &mut obj.content {
        v.poster = info.poster;
    }
    Ok(scene.add(obj))
}

/// Route `blob` to the video path when its MIME type starts with `video/`, otherwise to the
/// image path.
#[tracing::instrument(skip(scene, backend, blob, config), fields(mime = %blob.mime, bytes = blob.bytes.len()))]
pub async fn import_media<B: MediaBackend + ?Sized>(
    scene: &mut Scene,
    backend: &B,
    blob: MediaBlob,
    config: &EditorConfig,
) -> EditorResult<ObjectId> {
    let kind = blob.kind();
    let res = match kind {
        MediaKind::Video => {
            import_video(scene, backend, blob.bytes, &blob.mime, config.video_anchor).await
        }
        MediaKind::Image => import_image(scene, backend, blob.bytes, config.image_position).await,
    };
    match &res {
        Ok(id) => tracing::debug!(%id, ?kind, "media imported"),
        Err(e) => tracing::warn!(error = %e, ?kind, "media import failed"),
    }
    res
}

/// Add a text box. Never fails: overrides that are not finite (or not positive, for sizes) are
/// replaced by the defaults.
pub fn add_text_box(
    scene: &mut Scene,
    defaults: &TextBoxDefaults,
    opts: TextBoxOptions,
) -> ObjectId {
    let finite = |v: &f64| v.is_finite();
    let positive = |v: &f64| v.is_finite() && *v > 0.0;
    let obj = SceneObject::text(
        opts.text.unwrap_or_else(|| defaults.text.clone()),
        opts.width.filter(positive).unwrap_or(defaults.width),
        opts.font_size.filter(positive).unwrap_or(defaults.font_size),
    )
    .with_position(
        opts.left.filter(finite).unwrap_or(defaults.left),
        opts.top.filter(finite).unwrap_or(defaults.top),
    );
    scene.add(obj)
}

#[cfg(test)]
#[path = "../../tests/unit/editor/import.rs"]
mod tests;
