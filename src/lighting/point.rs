use bon::{Builder, bon};
use nalgebra::Unit;

use crate::{
    color::{Color, ColorExt as _},
    geometry::{ConstructionError, Direction, EPSILON, FloatType, WorldPoint, WorldVector, normalize},
};

/// Omnidirectional light with distance attenuation `1 / (kc + kl * d + kq * d^2)`.
#[derive(Builder, Copy, Clone, Debug, PartialEq)]
pub struct PointLight {
    intensity: Color,
    position: WorldPoint,

    #[builder(default = 1.0)]
    kc: FloatType,
    #[builder(default = 0.0)]
    kl: FloatType,
    #[builder(default = 0.0)]
    kq: FloatType,
}

impl PointLight {
    pub fn position(&self) -> WorldPoint {
        self.position
    }

    pub fn intensity_at(&self, point: &WorldPoint) -> Color {
        let d = self.distance_to(point);
        self.intensity.reduced(self.kc + self.kl * d + self.kq * d * d)
    }

    pub fn direction_from(&self, point: &WorldPoint) -> Option<Direction> {
        Unit::try_new(point - self.position, EPSILON)
    }

    pub fn distance_to(&self, point: &WorldPoint) -> FloatType {
        nalgebra::distance(&self.position, point)
    }
}

/// Point light emitting only into the half space in front of it, strongest along `direction`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpotLight {
    light: PointLight,
    direction: Direction,
    narrow_beam: FloatType,
}

#[bon]
impl SpotLight {
    /// `narrow_beam` is the exponent applied to the beam factor, larger values give a tighter beam.
    #[builder]
    pub fn new(
        intensity: Color,
        position: WorldPoint,
        direction: WorldVector,
        #[builder(default = 1.0)] kc: FloatType,
        #[builder(default = 0.0)] kl: FloatType,
        #[builder(default = 0.0)] kq: FloatType,
        #[builder(default = 1.0)] narrow_beam: FloatType,
    ) -> Result<Self, ConstructionError> {
        Ok(SpotLight {
            light: PointLight {
                intensity,
                position,
                kc,
                kl,
                kq,
            },
            direction: normalize(direction)?,
            narrow_beam,
        })
    }
}

impl SpotLight {
    pub fn intensity_at(&self, point: &WorldPoint) -> Color {
        let Some(l) = self.direction_from(point) else {
            return Color::black();
        };
        let projection = self.direction.dot(&l);
        if projection <= 0.0 {
            return Color::black();
        }
        self.light
            .intensity_at(point)
            .scaled(projection.powf(self.narrow_beam))
    }

    pub fn direction_from(&self, point: &WorldPoint) -> Option<Direction> {
        self.light.direction_from(point)
    }

    pub fn distance_to(&self, point: &WorldPoint) -> FloatType {
        self.light.distance_to(point)
    }
}
