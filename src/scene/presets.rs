//! Ready made demo scenes.

use std::num::NonZeroU16;

use crate::{
    camera::Camera,
    color::{Coefficients, Color, ColorExt as _},
    geometry::{ConstructionError, ScreenSize, WorldPoint, WorldVector},
    lighting::{AmbientLight, SpotLight},
    material::Material,
    scene::{Geometry, Scene},
    shape::{Sphere, Triangle},
};

const SHININESS: NonZeroU16 = NonZeroU16::new(20).unwrap();

/// Glass sphere with an opaque core, standing on two mirrors.
pub fn mirrored_spheres() -> Result<Scene, ConstructionError> {
    let mut scene = Scene::builder()
        .name("mirrored spheres")
        .ambient_light(AmbientLight::new(
            Color::uniform(255.0),
            Coefficients::uniform(0.1),
        ))
        .build();

    let center = WorldPoint::new(-950.0, -900.0, -1000.0);
    let shell = Geometry::builder()
        .shape(Sphere::new(center, 400.0)?)
        .emission(Color::new(0.0, 50.0, 100.0))
        .material(
            Material::builder()
                .kd(Coefficients::uniform(0.25))
                .ks(Coefficients::uniform(0.25))
                .shininess(SHININESS)
                .kt(Coefficients::new(0.5, 0.0, 0.0))
                .build(),
        )
        .build();
    let core = Geometry::builder()
        .shape(Sphere::new(center, 200.0)?)
        .emission(Color::new(100.0, 50.0, 20.0))
        .material(
            Material::builder()
                .kd(Coefficients::uniform(0.25))
                .ks(Coefficients::uniform(0.25))
                .shininess(SHININESS)
                .build(),
        )
        .build();
    scene.geometries.add_group([shell, core]);

    let a = WorldPoint::new(1500.0, -1500.0, -1500.0);
    let b = WorldPoint::new(-1500.0, 1500.0, -1500.0);
    scene.geometries.add(
        Geometry::builder()
            .shape(Triangle::new(a, b, WorldPoint::new(670.0, 670.0, 3000.0))?)
            .emission(Color::uniform(20.0))
            .material(Material::builder().kr(Coefficients::uniform(1.0)).build())
            .build(),
    );
    scene.geometries.add(
        Geometry::builder()
            .shape(Triangle::new(a, b, WorldPoint::new(-1500.0, -1500.0, -2000.0))?)
            .emission(Color::uniform(20.0))
            .material(
                Material::builder()
                    .kr(Coefficients::new(0.5, 0.0, 0.4))
                    .build(),
            )
            .build(),
    );
    scene.geometries.build_hierarchy();

    scene.add_light(
        SpotLight::builder()
            .intensity(Color::new(1020.0, 400.0, 400.0))
            .position(WorldPoint::new(-750.0, -750.0, -150.0))
            .direction(WorldVector::new(-1.0, -1.0, -4.0))
            .kl(0.00001)
            .kq(0.000005)
            .build()?,
    );

    Ok(scene)
}

/// Camera framing `mirrored_spheres`.
pub fn mirrored_spheres_camera(resolution: ScreenSize) -> Result<Camera, ConstructionError> {
    Camera::builder()
        .location(WorldPoint::new(0.0, 0.0, 10000.0))
        .forward(WorldVector::new(0.0, 0.0, -1.0))
        .up(WorldVector::new(0.0, 1.0, 0.0))
        .resolution(resolution)
        .view_plane_width(2500.0)
        .view_plane_height(2500.0 * resolution.y as f64 / resolution.x.max(1) as f64)
        .view_plane_distance(10000.0)
        .build()
}
