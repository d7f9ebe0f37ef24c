use crate::foundation::error::{EditorError, EditorResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Which point of an object's box `left`/`top` refer to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// `left`/`top` is the top-left corner of the box.
    #[default]
    Corner,
    /// `left`/`top` is the centre of the box.
    Center,
}

/// Placement of an object on the canvas.
///
/// `width`/`height` are the unscaled box size; the box is scaled, then rotated by `angle`
/// degrees around the origin point, then moved so the origin lands on (`left`, `top`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    pub left: f64,
    pub top: f64,
    #[serde(default)]
    pub origin: Origin,
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default = "one")]
    pub scale_x: f64,
    #[serde(default = "one")]
    pub scale_y: f64,
    #[serde(default)]
    pub angle: f64, // degrees, clockwise
}

fn one() -> f64 {
    1.0
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            origin: Origin::Corner,
            width: 0.0,
            height: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
        }
    }
}

impl Transform {
    pub fn at(left: f64, top: f64) -> Self {
        Self {
            left,
            top,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.left += delta.x;
        self.top += delta.y;
    }

    pub fn scaled_size(&self) -> Vec2 {
        Vec2::new(self.width * self.scale_x, self.height * self.scale_y)
    }

    /// Map local box coordinates (`0..width`, `0..height`) to canvas coordinates.
    pub fn to_affine(&self) -> Affine {
        let t_position = Affine::translate(Vec2::new(self.left, self.top));
        let t_rotate = Affine::rotate(self.angle.to_radians());
        let t_scale = Affine::scale_non_uniform(self.scale_x, self.scale_y);
        let t_origin = match self.origin {
            Origin::Corner => Affine::IDENTITY,
            Origin::Center => Affine::translate(Vec2::new(-self.width / 2.0, -self.height / 2.0)),
        };

        // T(position) * R(angle) * S(scale) * T(-origin)
        t_position * t_rotate * t_scale * t_origin
    }

    /// Axis-aligned bounding box on the canvas.
    pub fn bounds(&self) -> Rect {
        self.to_affine()
            .transform_rect_bbox(Rect::new(0.0, 0.0, self.width, self.height))
    }

    pub fn validate(&self) -> EditorResult<()> {
        for (name, v) in [
            ("left", self.left),
            ("top", self.top),
            ("width", self.width),
            ("height", self.height),
            ("scale_x", self.scale_x),
            ("scale_y", self.scale_y),
            ("angle", self.angle),
        ] {
            if !v.is_finite() {
                return Err(EditorError::validation(format!(
                    "transform {name} must be finite"
                )));
            }
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(EditorError::validation(
                "transform width/height must be >= 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
