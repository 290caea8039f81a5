use std::num::NonZeroU16;

use bon::Builder;

use crate::color::{Coefficients, ColorExt as _};

/// Phong surface parameters.
/// Coefficients are per channel, in 0-1.
#[derive(Builder, Copy, Clone, Debug, PartialEq)]
pub struct Material {
    /// Diffuse
    #[builder(default = Coefficients::black())]
    pub kd: Coefficients,

    /// Specular
    #[builder(default = Coefficients::black())]
    pub ks: Coefficients,

    /// Transparency
    #[builder(default = Coefficients::black())]
    pub kt: Coefficients,

    /// Reflectivity
    #[builder(default = Coefficients::black())]
    pub kr: Coefficients,

    /// Phong exponent of the specular term
    #[builder(default = NonZeroU16::MIN)]
    pub shininess: NonZeroU16,
}

impl Default for Material {
    fn default() -> Self {
        Material::builder().build()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;

    #[test]
    fn default_is_opaque_matte() {
        let m = Material::default();
        assert!(m.kt == Coefficients::black());
        assert!(m.kr == Coefficients::black());
        assert!(m.shininess.get() == 1);
    }

    #[test]
    fn builder_keeps_unset_defaults() {
        let m = Material::builder()
            .kd(Coefficients::uniform(0.5))
            .shininess(NonZeroU16::new(100).unwrap())
            .build();
        assert!(m.kd == Coefficients::uniform(0.5));
        assert!(m.ks == Coefficients::black());
        assert!(m.shininess.get() == 100);
    }
}
