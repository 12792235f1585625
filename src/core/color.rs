// RGB colour shared by the scene, instruments and GPU batches

/// An opaque 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const LIGHT_GRAY: Color = Color::rgb(192, 192, 192);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const PINK: Color = Color::rgb(255, 175, 175);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uniform grey
    pub const fn gray(level: u8) -> Self {
        Self::rgb(level, level, level)
    }

    /// Multiply every channel by `factor`, saturating at 0 and 255
    pub fn scaled(self, factor: f32) -> Self {
        let channel = |c: u8| (c as f32 * factor).clamp(0.0, 255.0) as u8;
        Self::rgb(channel(self.r), channel(self.g), channel(self.b))
    }

    /// Blend towards `other`; `t = 0` keeps self, `t = 1` gives other
    pub fn lerp_to(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f32 + t * (b as f32 - a as f32)) as u8;
        Self::rgb(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    /// Linear-space RGBA for an sRGB render target
    pub fn to_linear_rgba(self) -> [f32; 4] {
        fn linear(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [linear(self.r), linear(self.g), linear(self.b), 1.0]
    }

    /// Linear-space clear colour for wgpu
    pub fn to_wgpu(self) -> wgpu::Color {
        let [r, g, b, a] = self.to_linear_rgba();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
