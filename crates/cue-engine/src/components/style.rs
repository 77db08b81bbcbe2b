use serde::{Deserialize, Serialize};

/// RGBA color (components 0.0 - 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Create a color from RGBA components (0.0 - 1.0).
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from hue (degrees), saturation, lightness and alpha.
    /// Saturation, lightness and alpha are fractions in 0.0 - 1.0.
    pub fn from_hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        Self::new(r + m, g + m, b + m, alpha.clamp(0.0, 1.0))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0.6, 0.6, 0.8)
    }
}

/// How a body or constraint should be drawn by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    /// Hidden items are skipped when building the render buffer.
    pub visible: bool,
    /// Fill for bodies, stroke for constraints.
    pub color: Color,
}

impl RenderStyle {
    pub const fn visible(color: Color) -> Self {
        Self { visible: true, color }
    }

    pub const fn hidden() -> Self {
        Self {
            visible: false,
            color: Color::WHITE,
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::visible(Color::default())
    }
}
