//! Text-box line breaking shared by the object model (box height) and the renderer.
//!
//! Glyph metrics are not available without a shaped font, so wrapping uses a fixed average
//! advance per character. Explicit newlines always break.

/// Line height as a multiple of font size.
pub const LINE_HEIGHT: f64 = 1.16;

const AVG_ADVANCE_EM: f64 = 0.55;

/// Break `text` into lines no wider than `width` (estimated). Words longer than the box stay on
/// their own line.
pub fn wrap_lines(text: &str, width: f64, font_size: f64) -> Vec<String> {
    let advance = (font_size * AVG_ADVANCE_EM).max(f64::EPSILON);
    let max_chars = if width > 0.0 {
        ((width / advance).floor() as usize).max(1)
    } else {
        usize::MAX
    };

    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_chars = 0usize;
        for word in paragraph.split(' ') {
            let word_chars = word.chars().count();
            if line_chars == 0 {
                line.push_str(word);
                line_chars = word_chars;
                continue;
            }
            if line_chars + 1 + word_chars > max_chars {
                out.push(std::mem::take(&mut line));
                line.push_str(word);
                line_chars = word_chars;
            } else {
                line.push(' ');
                line.push_str(word);
                line_chars += 1 + word_chars;
            }
        }
        out.push(line);
    }
    out
}

pub fn text_block_height(text: &str, width: f64, font_size: f64) -> f64 {
    let lines = wrap_lines(text, width, font_size).len().max(1);
    (lines as f64) * font_size * LINE_HEIGHT
}

#[cfg(test)]
#[path = "../../tests/unit/scene/text.rs"]
mod tests;
