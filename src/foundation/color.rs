use crate::foundation::error::{EditorError, EditorResult};

/// Straight-alpha RGBA8 color parsed from a CSS-style string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r,g,b)`, `rgba(r,g,b,a)` or a basic color name.
    pub fn parse(s: &str) -> EditorResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EditorError::validation("color must be non-empty"));
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = s.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
        {
            let args = args
                .strip_suffix(')')
                .ok_or_else(|| EditorError::validation(format!("unterminated color \"{s}\"")))?;
            return parse_rgb_args(args);
        }
        named(&lower).ok_or_else(|| EditorError::validation(format!("unknown color \"{s}\"")))
    }

    /// `#rrggbb` without alpha.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn opacity(self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

fn parse_hex(hex: &str) -> EditorResult<Rgba8> {
    fn hex_byte(pair: &str) -> EditorResult<u8> {
        if !pair.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(EditorError::validation(format!("invalid hex byte \"{pair}\"")));
        }
        u8::from_str_radix(pair, 16)
            .map_err(|_| EditorError::validation(format!("invalid hex byte \"{pair}\"")))
    }

    if !hex.is_ascii() {
        return Err(EditorError::validation("hex color must be ASCII"));
    }

    match hex.len() {
        3 => {
            let mut c = [0u8; 3];
            for (i, ch) in hex.chars().enumerate() {
                let v = hex_byte(&ch.to_string())?;
                c[i] = v * 17;
            }
            Ok(Rgba8::opaque(c[0], c[1], c[2]))
        }
        6 => Ok(Rgba8::opaque(
            hex_byte(&hex[0..2])?,
            hex_byte(&hex[2..4])?,
            hex_byte(&hex[4..6])?,
        )),
        8 => Ok(Rgba8 {
            r: hex_byte(&hex[0..2])?,
            g: hex_byte(&hex[2..4])?,
            b: hex_byte(&hex[4..6])?,
            a: hex_byte(&hex[6..8])?,
        }),
        _ => Err(EditorError::validation(
            "hex color must be #RGB, #RRGGBB or #RRGGBBAA",
        )),
    }
}

fn parse_rgb_args(args: &str) -> EditorResult<Rgba8> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(EditorError::validation(
            "rgb()/rgba() color needs 3 or 4 components",
        ));
    }

    let mut c = [0u8; 3];
    for (slot, part) in c.iter_mut().zip(&parts[..3]) {
        let v: f64 = part
            .parse()
            .map_err(|_| EditorError::validation(format!("invalid color channel \"{part}\"")))?;
        if !(0.0..=255.0).contains(&v) {
            return Err(EditorError::validation(format!(
                "color channel {v} out of range 0..=255"
            )));
        }
        *slot = v.round() as u8;
    }

    let a = match parts.get(3) {
        Some(part) => {
            let v: f64 = part
                .parse()
                .map_err(|_| EditorError::validation(format!("invalid alpha \"{part}\"")))?;
            if !(0.0..=1.0).contains(&v) {
                return Err(EditorError::validation(format!(
                    "alpha {v} out of range 0..=1"
                )));
            }
            (v * 255.0).round() as u8
        }
        None => 255,
    };

    Ok(Rgba8 {
        r: c[0],
        g: c[1],
        b: c[2],
        a,
    })
}

fn named(name: &str) -> Option<Rgba8> {
    Some(match name {
        "black" => Rgba8::BLACK,
        "white" => Rgba8::WHITE,
        "red" => Rgba8::opaque(255, 0, 0),
        "green" => Rgba8::opaque(0, 128, 0),
        "blue" => Rgba8::opaque(0, 0, 255),
        "yellow" => Rgba8::opaque(255, 255, 0),
        "gray" | "grey" => Rgba8::opaque(128, 128, 128),
        "transparent" => Rgba8 {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        },
        _ => return None,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
