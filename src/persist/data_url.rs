use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::foundation::error::{EditorError, EditorResult};

/// Encode `data` as `data:<mime>;base64,<payload>`.
pub fn encode(mime: &str, data: &[u8]) -> String {
    let preamble_len = "data:;base64,".len() + mime.len();
    let mut out = String::with_capacity(preamble_len + data.len().div_ceil(3) * 4);
    out.push_str("data:");
    out.push_str(mime);
    out.push_str(";base64,");
    STANDARD.encode_string(data, &mut out);
    out
}

/// Decode a base64 data URL into `(mime, bytes)`.
pub fn decode(url: &str) -> EditorResult<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| EditorError::malformed("media source must be a data: URL"))?;
    // MIME parameters may contain commas; base64 never does.
    let (header, payload) = rest
        .rsplit_once(',')
        .ok_or_else(|| EditorError::malformed("data URL is missing ','"))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| EditorError::malformed("data URL must be base64-encoded"))?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| EditorError::malformed(format!("data URL payload: {e}")))?;
    Ok((mime.to_string(), bytes))
}

#[cfg(test)]
#[path = "../../tests/unit/persist/data_url.rs"]
mod tests;
