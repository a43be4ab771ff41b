use rand::Rng;
use serde::{Deserialize, Serialize};

/// Linear RGBA display color, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    /// A bright, fully opaque color. Components stay above 0.2 so skeletons
    /// remain visible against a dark viewport.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Color::rgba(
            rng.gen_range(0.2..=1.0),
            rng.gen_range(0.2..=1.0),
            rng.gen_range(0.2..=1.0),
            1.0,
        )
    }

    /// A random color not equal to any of `taken`.
    pub fn random_distinct<R: Rng>(rng: &mut R, taken: &[Color]) -> Self {
        loop {
            let color = Color::random(rng);
            if color != Color::WHITE && !taken.contains(&color) {
                return color;
            }
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}
