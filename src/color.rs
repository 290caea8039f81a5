use crate::geometry::FloatType;

/// Linear, unbounded RGB color. Displayable range is 0-255 per channel.
pub type Color = rgb::RGB<FloatType>;

/// Per-channel weights (material coefficients, accumulated attenuation).
pub type Coefficients = rgb::RGB<FloatType>;

pub trait ColorExt: Sized {
    fn black() -> Self;

    /// All channels set to `value`.
    fn uniform(value: FloatType) -> Self;

    /// Componentwise product.
    fn attenuate(&self, k: &Coefficients) -> Self;

    fn scaled(&self, factor: FloatType) -> Self;

    fn reduced(&self, factor: FloatType) -> Self {
        self.scaled(1.0 / factor)
    }

    /// True if every channel is below `threshold`.
    fn lower_than(&self, threshold: FloatType) -> bool;

    /// Clamping conversion to an 8 bit image pixel.
    fn to_rgb8(&self) -> image::Rgb<u8>;
}

impl ColorExt for Color {
    fn black() -> Self {
        Color::uniform(0.0)
    }

    fn uniform(value: FloatType) -> Self {
        Color::new(value, value, value)
    }

    fn attenuate(&self, k: &Coefficients) -> Self {
        Color::new(self.r * k.r, self.g * k.g, self.b * k.b)
    }

    fn scaled(&self, factor: FloatType) -> Self {
        Color::new(self.r * factor, self.g * factor, self.b * factor)
    }

    fn lower_than(&self, threshold: FloatType) -> bool {
        self.r < threshold && self.g < threshold && self.b < threshold
    }

    fn to_rgb8(&self) -> image::Rgb<u8> {
        image::Rgb([
            self.r.round().clamp(0.0, 255.0) as u8,
            self.g.round().clamp(0.0, 255.0) as u8,
            self.b.round().clamp(0.0, 255.0) as u8,
        ])
    }
}
