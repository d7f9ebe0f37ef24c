//! Scene flattening to SVG.
//!
//! Every object becomes a `<g>` carrying its transform as a `matrix(..)`, with content drawn in
//! the object's local box coordinates.

use std::fmt::Write as _;

use crate::{
    foundation::color::Rgba8,
    foundation::core::Affine,
    foundation::error::EditorResult,
    scene::graph::Scene,
    scene::object::{Content, MediaSource, SceneObject, TextContent},
    scene::text::{LINE_HEIGHT, wrap_lines},
};

/// Baseline of the first line, as a multiple of font size.
const FIRST_BASELINE_EM: f64 = 0.9;

/// Fill used for video surfaces without a decoded poster frame.
pub(crate) const VIDEO_PLACEHOLDER: Rgba8 = Rgba8::opaque(128, 128, 128);

/// Flatten `scene` into a standalone SVG document, back to front.
pub fn scene_to_svg(scene: &Scene) -> EditorResult<String> {
    let canvas = scene.canvas();
    let bg = Rgba8::parse(&canvas.background)?;

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = canvas.width,
        h = canvas.height,
    );
    let _ = write!(
        out,
        r#"<rect width="{}" height="{}"{}/>"#,
        canvas.width,
        canvas.height,
        fill_attrs(bg)
    );
    for (_, obj) in scene.objects() {
        write_object(&mut out, obj)?;
    }
    out.push_str("</svg>");
    Ok(out)
}

fn write_object(out: &mut String, obj: &SceneObject) -> EditorResult<()> {
    let _ = write!(out, r#"<g transform="{}">"#, svg_matrix(obj.transform.to_affine()));
    let (w, h) = (obj.transform.width, obj.transform.height);
    match &obj.content {
        Content::Image(img) => write_image(out, &img.src, w, h),
        Content::Video(v) => match &v.poster {
            Some(poster) => write_image(out, poster, w, h),
            None => {
                let _ = write!(
                    out,
                    r#"<rect width="{w}" height="{h}"{}/>"#,
                    fill_attrs(VIDEO_PLACEHOLDER)
                );
            }
        },
        Content::Text(t) => out.push_str(&text_element(t, w)?),
    }
    out.push_str("</g>");
    Ok(())
}

fn write_image(out: &mut String, src: &MediaSource, w: f64, h: f64) {
    let _ = write!(
        out,
        r#"<image width="{w}" height="{h}" preserveAspectRatio="none" xlink:href="{}"/>"#,
        src.to_data_url()
    );
}

/// `<text>` element for a text box, one `<tspan>` per wrapped line, in local box coordinates.
pub(crate) fn text_element(text: &TextContent, width: f64) -> EditorResult<String> {
    let fill = Rgba8::parse(&text.fill)?;
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<text font-family="{}" font-size="{}" font-weight="{}"{} xml:space="preserve">"#,
        escape_xml(&text.font_family),
        text.font_size,
        text.font_weight.as_css(),
        fill_attrs(fill)
    );
    for (i, line) in wrap_lines(&text.text, width, text.font_size)
        .iter()
        .enumerate()
    {
        let y = text.font_size * (FIRST_BASELINE_EM + LINE_HEIGHT * i as f64);
        let _ = write!(out, r#"<tspan x="0" y="{y}">{}</tspan>"#, escape_xml(line));
    }
    out.push_str("</text>");
    Ok(out)
}

fn fill_attrs(c: Rgba8) -> String {
    if c.a == 255 {
        format!(r#" fill="{}""#, c.to_hex())
    } else {
        format!(r#" fill="{}" fill-opacity="{}""#, c.to_hex(), c.opacity())
    }
}

fn svg_matrix(affine: Affine) -> String {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    format!("matrix({a} {b} {c} {d} {e} {f})")
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
