use bon::bon;
use nalgebra::Unit;

use crate::geometry::{
    ConstructionError, Direction, EPSILON, FloatType, Ray, ScreenPoint, ScreenSize, WorldPoint,
    WorldVector, align_zero, normalize,
};

/// Pinhole camera looking through a rectangular view plane.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    location: WorldPoint,

    resolution: ScreenSize,

    forward: Direction,
    up: Direction,
    right: Direction,

    view_plane_width: FloatType,
    view_plane_height: FloatType,
    view_plane_distance: FloatType,
}

#[bon]
impl Camera {
    /// `up` only needs to be linearly independent of `forward`, it gets orthogonalized.
    #[builder]
    pub fn new(
        location: WorldPoint,
        forward: WorldVector,
        up: WorldVector,
        resolution: ScreenSize,
        view_plane_width: FloatType,
        view_plane_height: FloatType,
        view_plane_distance: FloatType,
    ) -> Result<Self, ConstructionError> {
        let forward = normalize(forward)?;
        let up = normalize(up)?;
        let right = Unit::try_new(forward.cross(&up), EPSILON).ok_or(
            ConstructionError::InvalidCamera("`up` and `forward` must be linearly independent"),
        )?;
        let up = Unit::new_normalize(right.cross(&forward));

        if resolution.x == 0 || resolution.y == 0 {
            return Err(ConstructionError::InvalidCamera("resolution must be non-zero"));
        }
        if align_zero(view_plane_width) <= 0.0 || align_zero(view_plane_height) <= 0.0 {
            return Err(ConstructionError::InvalidCamera("view plane size must be positive"));
        }
        if align_zero(view_plane_distance) <= 0.0 {
            return Err(ConstructionError::InvalidCamera("view plane distance must be positive"));
        }

        Ok(Camera {
            location,
            resolution,
            forward,
            up,
            right,
            view_plane_width,
            view_plane_height,
            view_plane_distance,
        })
    }
}

impl Camera {
    pub fn get_resolution(&self) -> ScreenSize {
        self.resolution
    }

    /// Ray from the camera location through the center of the given pixel.
    /// Pixel rows go from the top of the view plane down.
    pub fn construct_ray(&self, point: &ScreenPoint) -> Ray {
        let view_plane_center = self.location + self.forward.as_ref() * self.view_plane_distance;

        let pixel_width = self.view_plane_width / self.resolution.x as FloatType;
        let pixel_height = self.view_plane_height / self.resolution.y as FloatType;

        let x = (point.x as FloatType - (self.resolution.x - 1) as FloatType / 2.0) * pixel_width;
        let y = -(point.y as FloatType - (self.resolution.y - 1) as FloatType / 2.0) * pixel_height;

        let pixel_center = view_plane_center + self.right.as_ref() * x + self.up.as_ref() * y;

        Ray::from_unit(
            self.location,
            Unit::new_normalize(pixel_center - self.location),
        )
    }
}
