mod geometries;
pub mod presets;

use bon::Builder;

pub use geometries::{GeoPoint, Geometries, Geometry, GeometryIdx};

use crate::{
    color::{Color, ColorExt as _},
    lighting::{AmbientLight, LightSource},
};

/// Everything the ray tracer needs to know about the world.
/// Read only while rendering.
#[derive(Builder, Clone, Debug)]
pub struct Scene {
    #[builder(into, default = String::from("scene"))]
    pub name: String,

    #[builder(default = Color::black())]
    pub background: Color,

    #[builder(default)]
    pub ambient_light: AmbientLight,

    #[builder(default)]
    pub geometries: Geometries,

    #[builder(default)]
    pub lights: Vec<LightSource>,
}

impl Scene {
    pub fn add_light(&mut self, light: impl Into<LightSource>) -> &mut Self {
        self.lights.push(light.into());
        self
    }
}
