/// Fixed color schemes for backgrounds and materials
use std::str::FromStr;

/// An RGB color with float channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    /// Clamp and quantize to 8-bit channels.
    pub fn to_u8(&self) -> [u8; 3] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }

    /// Channel-wise scale.
    pub fn scaled(&self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }

    /// Channel-wise sum. Values above 1 are clamped on quantization.
    pub fn plus(&self, other: &Self) -> Self {
        Self::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

/// The three palettes an output can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    /// Steel-blue background, light surfaces.
    #[default]
    Default,
    /// Black background, light surfaces.
    Bw,
    /// White background, dark surfaces.
    Wb,
}

impl ColorScheme {
    pub fn background(&self) -> Rgb {
        match self {
            ColorScheme::Default => Rgb::new(0.1, 0.2, 0.31),
            ColorScheme::Bw => Rgb::BLACK,
            ColorScheme::Wb => Rgb::WHITE,
        }
    }

    pub fn surface_ambient(&self) -> Rgb {
        Rgb::new(0.6, 0.6, 0.6)
    }

    /// Diffuse surface color. `Wb` darkens solid surfaces so they stand
    /// out on the white background; fiber tubes keep the light diffuse.
    pub fn surface_diffuse(&self, fiber: bool) -> Rgb {
        match self {
            ColorScheme::Wb if !fiber => Rgb::new(0.1, 0.1, 0.1),
            _ => Rgb::new(0.9, 0.9, 0.9),
        }
    }

    /// Bounding-box outlines draw white in every scheme.
    pub fn outline(&self) -> Rgb {
        Rgb::WHITE
    }
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(ColorScheme::Default),
            "bw" => Ok(ColorScheme::Bw),
            "wb" => Ok(ColorScheme::Wb),
            other => Err(format!(
                "unknown color scheme `{other}` (expected default, bw or wb)"
            )),
        }
    }
}
