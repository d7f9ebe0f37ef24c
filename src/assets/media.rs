use std::path::Path;

use crate::{
    assets::decode::VideoInfo,
    foundation::error::{EditorError, EditorResult},
};

/// Which import path a payload takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// `Video` iff the declared MIME type starts with `video/`. Everything else, including empty
    /// or unknown types, is treated as an image.
    pub fn classify(mime: &str) -> Self {
        if mime.starts_with("video/") {
            Self::Video
        } else {
            Self::Image
        }
    }
}

/// A raw media payload plus its declared MIME type, as delivered by a file picker or drop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaBlob {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl MediaBlob {
    pub fn new(mime: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::classify(&self.mime)
    }

    /// Read a file, declaring a MIME type from its extension (empty when unknown).
    pub fn from_path(path: &Path) -> EditorResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            EditorError::not_found(format!("read media '{}': {e}", path.display()))
        })?;
        let mime = path
            .extension()
            .and_then(|s| s.to_str())
            .map(mime_from_extension)
            .unwrap_or_default();
        Ok(Self::new(mime, bytes))
    }
}

fn mime_from_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        _ => "",
    }
}

#[cfg(feature = "media-ffmpeg")]
pub fn probe_video_bytes(bytes: &[u8]) -> EditorResult<VideoInfo> {
    use crate::scene::object::MediaSource;

    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
    }

    // Containers like MP4 keep their index at the end, so probe a seekable file, not a pipe.
    let tmp = std::env::temp_dir().join(format!(
        "montage_probe_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default()
    ));
    std::fs::write(&tmp, bytes)
        .map_err(|e| EditorError::decode(format!("stage video for probing: {e}")))?;
    let result = (|| -> EditorResult<VideoInfo> {
        let out = std::process::Command::new("ffprobe")
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(&tmp)
            .output()
            .map_err(|e| EditorError::decode(format!("failed to run ffprobe: {e}")))?;
        if !out.status.success() {
            return Err(EditorError::decode(format!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
            .map_err(|e| EditorError::decode(format!("ffprobe json parse failed: {e}")))?;
        let video_stream = parsed
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| EditorError::decode("no video stream found"))?;
        let width = video_stream
            .width
            .filter(|&w| w > 0)
            .ok_or_else(|| EditorError::decode("missing video width from ffprobe"))?;
        let height = video_stream
            .height
            .filter(|&h| h > 0)
            .ok_or_else(|| EditorError::decode("missing video height from ffprobe"))?;

        let poster = extract_poster_png(&tmp)
            .inspect_err(|e| tracing::warn!(error = %e, "poster frame extraction failed"))
            .ok()
            .map(|png| MediaSource::new("image/png", png));

        Ok(VideoInfo {
            width,
            height,
            poster,
        })
    })();
    let _ = std::fs::remove_file(&tmp);
    result
}

#[cfg(feature = "media-ffmpeg")]
fn extract_poster_png(path: &Path) -> EditorResult<Vec<u8>> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args(["-frames:v", "1", "-f", "image2pipe", "-vcodec", "png", "pipe:1"])
        .output()
        .map_err(|e| EditorError::decode(format!("failed to run ffmpeg: {e}")))?;
    if !out.status.success() || out.stdout.is_empty() {
        return Err(EditorError::decode(format!(
            "ffmpeg poster extraction failed: {}",
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(out.stdout)
}

#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_video_bytes(_bytes: &[u8]) -> EditorResult<VideoInfo> {
    Err(EditorError::decode(
        "video import requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
