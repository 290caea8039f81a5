use image::RgbImage;

use crate::{
    camera::Camera,
    color::ColorExt as _,
    geometry::ScreenBlock,
    renderer::{RayTracer, RenderSettings},
    scene::Scene,
    screen_block::ScreenBlockExt as _,
};

/// Renders a single tile into `buffer`, with the tile's top left corner at buffer position (0, 0).
pub fn render_tile(
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    tile: &ScreenBlock,
    buffer: &mut RgbImage,
) {
    let tracer = RayTracer::with_settings(scene, settings.tracer);
    for point in tile.internal_points() {
        let color = tracer.trace_ray(&camera.construct_ray(&point));
        let buffer_position = point - tile.min;
        buffer.put_pixel(buffer_position.x, buffer_position.y, color.to_rgb8());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        color::Color,
        geometry::{ScreenPoint, ScreenSize, WorldPoint, WorldVector},
        scene::Geometry,
        shape::Sphere,
    };
    use assert2::assert;

    #[test]
    fn tile_is_written_at_buffer_origin() {
        let mut scene = Scene::builder().background(Color::new(0.0, 0.0, 300.0)).build();
        scene.geometries.add(
            Geometry::builder()
                .shape(Sphere::new(WorldPoint::new(0.0, 0.0, -10.0), 1.0).unwrap())
                .emission(Color::new(128.0, 0.0, 0.0))
                .build(),
        );
        let camera = Camera::builder()
            .location(WorldPoint::origin())
            .forward(WorldVector::new(0.0, 0.0, -1.0))
            .up(WorldVector::y())
            .resolution(ScreenSize::new(9, 9))
            .view_plane_width(9.0)
            .view_plane_height(9.0)
            .view_plane_distance(1.0)
            .build()
            .unwrap();

        let tile = ScreenBlock::new(ScreenPoint::new(3, 3), ScreenPoint::new(6, 6));
        let mut buffer = RgbImage::new(4, 4);
        render_tile(&scene, &camera, &RenderSettings::default(), &tile, &mut buffer);

        // Center pixel of the screen sees the sphere, the tile corner sees the background
        assert!(*buffer.get_pixel(1, 1) == image::Rgb([128, 0, 0]));
        assert!(*buffer.get_pixel(0, 0) == image::Rgb([0, 0, 255]));
        // Outside of the tile stays untouched
        assert!(*buffer.get_pixel(3, 3) == image::Rgb([0, 0, 0]));
    }
}
