use bon::Builder;

use crate::{
    color::{Coefficients, Color, ColorExt as _},
    geometry::{Direction, FloatType, Ray, WorldVector, align_zero},
    lighting::LightSource,
    material::Material,
    scene::{GeoPoint, Scene},
};

/// Limits of the recursion into reflected and refracted rays.
#[derive(Builder, Copy, Clone, Debug, PartialEq)]
pub struct TracerSettings {
    /// Number of surfaces a single camera ray can visit, including the first one.
    #[builder(default = 10)]
    pub max_level: u32,

    /// Paths whose accumulated attenuation drops below this in every channel are cut off.
    #[builder(default = 0.001)]
    pub min_k: FloatType,
}

impl Default for TracerSettings {
    fn default() -> Self {
        TracerSettings::builder().build()
    }
}

/// Whitted style recursive ray tracer with Phong shading.
#[derive(Copy, Clone, Debug)]
pub struct RayTracer<'a> {
    scene: &'a Scene,
    settings: TracerSettings,
}

impl<'a> RayTracer<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self::with_settings(scene, TracerSettings::default())
    }

    pub fn with_settings(scene: &'a Scene, settings: TracerSettings) -> Self {
        RayTracer { scene, settings }
    }

    /// Color seen along the ray, unclamped.
    pub fn trace_ray(&self, ray: &Ray) -> Color {
        match self.scene.geometries.find_closest_intersection(ray) {
            Some(hit) => {
                self.calc_color(&hit, ray, self.settings.max_level, &Coefficients::uniform(1.0))
                    + self.scene.ambient_light.intensity()
            }
            None => self.scene.background,
        }
    }

    fn calc_color(&self, hit: &GeoPoint, ray: &Ray, level: u32, k: &Coefficients) -> Color {
        if level <= 1 || k.lower_than(self.settings.min_k) {
            return Color::black();
        }
        self.calc_local_effects(hit, ray, k) + self.calc_global_effects(hit, ray, level, k)
    }

    fn calc_local_effects(&self, hit: &GeoPoint, ray: &Ray, k: &Coefficients) -> Color {
        let geometry = self.scene.geometries.get(hit.geometry);
        let n = geometry.shape.normal_at(&hit.point);
        let v = ray.direction;
        let nv = align_zero(n.dot(&v));
        if nv == 0.0 {
            return Color::black();
        }

        let material = &geometry.material;
        let mut color = geometry.emission;
        for light in &self.scene.lights {
            let Some(l) = light.direction_from(&hit.point) else {
                continue;
            };
            let ln = align_zero(l.dot(&n));
            // Light and viewer must be on the same side of the surface
            if ln * nv <= 0.0 {
                continue;
            }

            let ktr = self.transparency(hit, light, &l, &n);
            if ktr.attenuate(k).lower_than(self.settings.min_k) {
                continue;
            }

            let intensity = light.intensity_at(&hit.point).attenuate(&ktr);
            color = color
                + diffuse(material, ln, &intensity)
                + specular(material, &l, &n, &v, ln, &intensity);
        }
        color
    }

    /// Product of transparencies of everything between the point and the light.
    fn transparency(&self, hit: &GeoPoint, light: &LightSource, l: &Direction, n: &Direction) -> Coefficients {
        let shadow_ray = Ray::offset_from_surface(hit.point, -*l, n);
        let occluders = self
            .scene
            .geometries
            .find_intersections(&shadow_ray, light.distance_to(&hit.point));

        let mut ktr = Coefficients::uniform(1.0);
        for occluder in occluders {
            ktr = ktr.attenuate(&self.scene.geometries.get(occluder.geometry).material.kt);
            if ktr.lower_than(self.settings.min_k) {
                return Coefficients::black();
            }
        }
        ktr
    }

    fn calc_global_effects(&self, hit: &GeoPoint, ray: &Ray, level: u32, k: &Coefficients) -> Color {
        let geometry = self.scene.geometries.get(hit.geometry);
        let material = &geometry.material;
        let n = geometry.shape.normal_at(&hit.point);

        let refracted = Ray::offset_from_surface(hit.point, ray.direction, &n);
        let reflected_direction = Direction::new_normalize(
            ray.direction.as_ref() - n.as_ref() * (2.0 * ray.direction.dot(&n)),
        );
        let reflected = Ray::offset_from_surface(hit.point, reflected_direction, &n);

        self.calc_global_effect(&refracted, &material.kt, level, k)
            + self.calc_global_effect(&reflected, &material.kr, level, k)
    }

    fn calc_global_effect(&self, ray: &Ray, kx: &Coefficients, level: u32, k: &Coefficients) -> Color {
        let kkx = k.attenuate(kx);
        if kkx.lower_than(self.settings.min_k) {
            return Color::black();
        }
        let color = match self.scene.geometries.find_closest_intersection(ray) {
            Some(hit) => self.calc_color(&hit, ray, level - 1, &kkx),
            None => self.scene.background,
        };
        color.attenuate(kx)
    }
}

/// `kd * |l.n| * I`
fn diffuse(material: &Material, ln: FloatType, intensity: &Color) -> Color {
    intensity.attenuate(&material.kd).scaled(ln.abs())
}

/// `ks * max(0, -v.r)^shininess * I` with `r` the light direction mirrored around the normal.
fn specular(
    material: &Material,
    l: &Direction,
    n: &Direction,
    v: &Direction,
    ln: FloatType,
    intensity: &Color,
) -> Color {
    let r: WorldVector = l.as_ref() - n.as_ref() * (2.0 * ln);
    let vr = align_zero(v.dot(&r.normalize()));
    if vr >= 0.0 {
        return Color::black();
    }
    intensity
        .attenuate(&material.ks)
        .scaled((-vr).powi(i32::from(material.shininess.get())))
}
