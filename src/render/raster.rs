use std::sync::Arc;

use resvg::tiny_skia;

use crate::{
    assets::decode::decode_image,
    assets::fonts::make_font_resolver,
    foundation::color::Rgba8,
    foundation::core::Affine,
    foundation::error::{EditorError, EditorResult},
    render::backend::FrameRGBA,
    render::svg::{VIDEO_PLACEHOLDER, text_element},
    scene::graph::Scene,
    scene::object::{Content, MediaSource, SceneObject, TextContent},
};

/// Composite `scene` onto a canvas-sized pixmap filled with the background color.
///
/// Objects whose media cannot be decoded are skipped with a warning so one broken source does not
/// blank the whole frame.
pub(crate) fn rasterize_scene(
    scene: &Scene,
    fontdb: &Arc<usvg::fontdb::Database>,
) -> EditorResult<FrameRGBA> {
    let canvas = scene.canvas();
    let mut pixmap = tiny_skia::Pixmap::new(canvas.width, canvas.height).ok_or_else(|| {
        EditorError::validation(format!(
            "cannot allocate {}x{} canvas",
            canvas.width, canvas.height
        ))
    })?;

    let bg = Rgba8::parse(&canvas.background)?;
    pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));

    let opts = usvg::Options {
        fontdb: Arc::clone(fontdb),
        font_resolver: make_font_resolver(),
        ..Default::default()
    };

    for (id, obj) in scene.objects() {
        let res = draw_object(&mut pixmap, obj, &opts);
        if let Err(e) = res {
            tracing::warn!(%id, kind = %obj.kind(), error = %e, "object skipped while rasterizing");
        }
    }

    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data: pixmap.take(),
        premultiplied: true,
    })
}

fn draw_object(
    pixmap: &mut tiny_skia::Pixmap,
    obj: &SceneObject,
    opts: &usvg::Options<'_>,
) -> EditorResult<()> {
    let t = &obj.transform;
    let xform = obj.transform.to_affine();
    match &obj.content {
        Content::Image(img) => draw_media(pixmap, &img.src, t.width, t.height, xform),
        Content::Video(v) => match &v.poster {
            Some(poster) => draw_media(pixmap, poster, t.width, t.height, xform),
            None => {
                let Some(rect) =
                    tiny_skia::Rect::from_xywh(0.0, 0.0, t.width as f32, t.height as f32)
                else {
                    return Ok(());
                };
                let mut paint = tiny_skia::Paint::default();
                let c = VIDEO_PLACEHOLDER;
                paint.set_color_rgba8(c.r, c.g, c.b, c.a);
                pixmap.fill_rect(rect, &paint, to_skia(xform), None);
                Ok(())
            }
        },
        Content::Text(text) => draw_text(pixmap, text, t.width, t.height, xform, opts),
    }
}

fn draw_media(
    pixmap: &mut tiny_skia::Pixmap,
    src: &MediaSource,
    box_w: f64,
    box_h: f64,
    xform: Affine,
) -> EditorResult<()> {
    let prepared = decode_image(&src.data)?;
    let size = tiny_skia::IntSize::from_wh(prepared.width, prepared.height)
        .ok_or_else(|| EditorError::decode("image has zero size"))?;
    let image = tiny_skia::Pixmap::from_vec(prepared.rgba8_premul, size)
        .ok_or_else(|| EditorError::decode("image buffer does not match its size"))?;

    // Stretch the decoded raster over the object's box.
    let fit = Affine::scale_non_uniform(
        box_w / f64::from(prepared.width),
        box_h / f64::from(prepared.height),
    );
    let paint = tiny_skia::PixmapPaint {
        quality: tiny_skia::FilterQuality::Bilinear,
        ..Default::default()
    };
    pixmap.draw_pixmap(0, 0, image.as_ref(), &paint, to_skia(xform * fit), None);
    Ok(())
}

fn draw_text(
    pixmap: &mut tiny_skia::Pixmap,
    text: &TextContent,
    box_w: f64,
    box_h: f64,
    xform: Affine,
    opts: &usvg::Options<'_>,
) -> EditorResult<()> {
    if text.text.trim().is_empty() {
        return Ok(());
    }
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}">{body}</svg>"#,
        w = box_w.max(1.0),
        h = box_h.max(1.0),
        body = text_element(text, box_w)?,
    );
    let tree = usvg::Tree::from_str(&svg, opts).map_err(|e| {
        EditorError::Other(anyhow::anyhow!(
            "parse text svg for font '{}': {e}",
            text.font_family
        ))
    })?;
    resvg::render(&tree, to_skia(xform), &mut pixmap.as_mut());
    Ok(())
}

fn to_skia(affine: Affine) -> tiny_skia::Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    tiny_skia::Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
