mod point;

pub use point::{PointLight, SpotLight};

use crate::{
    color::{Coefficients, Color, ColorExt as _},
    geometry::{ConstructionError, Direction, FloatType, WorldPoint, WorldVector, normalize},
};

/// Constant, position independent light.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AmbientLight {
    intensity: Color,
}

impl AmbientLight {
    pub const NONE: AmbientLight = AmbientLight {
        intensity: Color {
            r: 0.0,
            g: 0.0,
            b: 0.0,
        },
    };

    pub fn new(color: Color, ka: Coefficients) -> AmbientLight {
        AmbientLight {
            intensity: color.attenuate(&ka),
        }
    }

    pub fn intensity(&self) -> Color {
        self.intensity
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        AmbientLight::NONE
    }
}

/// Infinitely distant light shining in a fixed direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    intensity: Color,
    direction: Direction,
}

impl DirectionalLight {
    pub fn new(intensity: Color, direction: WorldVector) -> Result<Self, ConstructionError> {
        Ok(DirectionalLight {
            intensity,
            direction: normalize(direction)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LightSource {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

impl LightSource {
    /// Light arriving at the point, before any shadowing.
    pub fn intensity_at(&self, point: &WorldPoint) -> Color {
        match self {
            LightSource::Directional(l) => l.intensity,
            LightSource::Point(l) => l.intensity_at(point),
            LightSource::Spot(l) => l.intensity_at(point),
        }
    }

    /// Unit vector from the light towards the point.
    /// None if the point coincides with a positional light.
    pub fn direction_from(&self, point: &WorldPoint) -> Option<Direction> {
        match self {
            LightSource::Directional(l) => Some(l.direction),
            LightSource::Point(l) => l.direction_from(point),
            LightSource::Spot(l) => l.direction_from(point),
        }
    }

    /// How far the light is from the point, used to cap shadow rays.
    pub fn distance_to(&self, point: &WorldPoint) -> FloatType {
        match self {
            LightSource::Directional(_) => FloatType::INFINITY,
            LightSource::Point(l) => l.distance_to(point),
            LightSource::Spot(l) => l.distance_to(point),
        }
    }
}

impl From<DirectionalLight> for LightSource {
    fn from(value: DirectionalLight) -> Self {
        LightSource::Directional(value)
    }
}

impl From<PointLight> for LightSource {
    fn from(value: PointLight) -> Self {
        LightSource::Point(value)
    }
}

impl From<SpotLight> for LightSource {
    fn from(value: SpotLight) -> Self {
        LightSource::Spot(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;

    #[test]
    fn ambient_is_precomputed() {
        let ambient = AmbientLight::new(Color::new(200.0, 100.0, 50.0), Coefficients::uniform(0.5));
        assert!(ambient.intensity() == Color::new(100.0, 50.0, 25.0));
        assert!(AmbientLight::NONE.intensity() == Color::black());
    }

    #[test]
    fn directional_is_uniform_and_infinitely_far() {
        let light: LightSource =
            DirectionalLight::new(Color::uniform(80.0), WorldVector::new(0.0, 0.0, -2.0))
                .unwrap()
                .into();
        let far = WorldPoint::new(1e6, -1e6, 3.0);

        assert!(light.intensity_at(&WorldPoint::origin()) == Color::uniform(80.0));
        assert!(light.intensity_at(&far) == Color::uniform(80.0));
        assert!(light.direction_from(&far).unwrap().into_inner() == -WorldVector::z());
        assert!(light.distance_to(&far) == FloatType::INFINITY);
    }

    #[test]
    fn directional_needs_direction() {
        assert!(DirectionalLight::new(Color::black(), WorldVector::zeros()).is_err());
    }
}
