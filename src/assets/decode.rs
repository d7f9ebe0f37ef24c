use anyhow::Context;
use futures::FutureExt as _;
use futures::future::LocalBoxFuture;

use crate::{
    assets::media,
    foundation::error::{EditorError, EditorResult},
    scene::object::MediaSource,
};

/// Result of decoding an image payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// MIME type sniffed from the payload.
    pub mime: String,
}

/// Result of probing a video payload.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// First frame, encoded as PNG, when the backend can extract it.
    pub poster: Option<MediaSource>,
}

/// Decoded raster in premultiplied RGBA8, ready for compositing.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major, tightly packed.
    pub rgba8_premul: Vec<u8>,
}

/// Media decoding collaborator.
///
/// Both operations are suspension points: callers await them and nothing is inserted into a
/// scene until they complete.
pub trait MediaBackend {
    /// Decode an image payload far enough to know its size and format.
    fn decode_image<'a>(&'a self, bytes: &'a [u8]) -> LocalBoxFuture<'a, EditorResult<ImageInfo>>;

    /// Wait for video metadata (dimensions) to become available.
    fn probe_video<'a>(&'a self, bytes: &'a [u8]) -> LocalBoxFuture<'a, EditorResult<VideoInfo>>;
}

/// Built-in backend: `image` for stills, `ffprobe`/`ffmpeg` for video with the `media-ffmpeg`
/// feature.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuMediaBackend;

impl MediaBackend for CpuMediaBackend {
    fn decode_image<'a>(&'a self, bytes: &'a [u8]) -> LocalBoxFuture<'a, EditorResult<ImageInfo>> {
        futures::future::ready(decode_image_info(bytes)).boxed_local()
    }

    fn probe_video<'a>(&'a self, bytes: &'a [u8]) -> LocalBoxFuture<'a, EditorResult<VideoInfo>> {
        futures::future::ready(media::probe_video_bytes(bytes)).boxed_local()
    }
}

/// Sniff and fully decode `bytes`, returning size and MIME type.
pub fn decode_image_info(bytes: &[u8]) -> EditorResult<ImageInfo> {
    let format = image::guess_format(bytes)
        .map_err(|e| EditorError::decode(format!("unrecognized image format: {e}")))?;
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| EditorError::decode(format!("decode image: {e}")))?;
    Ok(ImageInfo {
        width: img.width(),
        height: img.height(),
        mime: format.to_mime_type().to_string(),
    })
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> EditorResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul,
    })
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Undo premultiplication so pixels can be handed to straight-alpha encoders.
pub(crate) fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
