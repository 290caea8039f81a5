mod aabb;
mod ray_box_intersection;

use nalgebra::{Point2, Point3, Unit, Vector2, Vector3};
use thiserror::Error;

pub use aabb::AABB;
pub use ray_box_intersection::RayIntersectionExt;

pub type FloatType = f64;

/// Values closer to zero than this are treated as zero.
pub const EPSILON: FloatType = 1e-10;

/// How far the origin of secondary rays is pushed away from the surface they start on.
pub const RAY_OFFSET: FloatType = 0.1;

pub type ScreenPoint = Point2<u32>;
pub type ScreenSize = Vector2<u32>;
pub type ScreenBlock = AABB<ScreenPoint>;

pub type WorldPoint = Point3<FloatType>;
pub type WorldVector = Vector3<FloatType>;
pub type WorldBox = AABB<WorldPoint>;

/// Non-zero, normalized world vector.
pub type Direction = Unit<WorldVector>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConstructionError {
    #[error("Vector must be non-zero")]
    ZeroVector,

    #[error("Radius must be positive, got {0}")]
    NonPositiveRadius(FloatType),

    #[error("Height must be positive, got {0}")]
    NonPositiveHeight(FloatType),

    #[error("Points defining a plane must not be collinear")]
    CollinearPoints,

    #[error("Polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("Polygon vertices must lie in a single plane")]
    NonCoplanarVertices,

    #[error("Polygon must be convex")]
    NonConvexPolygon,

    #[error("Invalid camera: {0}")]
    InvalidCamera(&'static str),
}

pub fn is_zero(value: FloatType) -> bool {
    value.abs() < EPSILON
}

/// Snaps values that are numerically zero to exact zero.
pub fn align_zero(value: FloatType) -> FloatType {
    if is_zero(value) { 0.0 } else { value }
}

/// Normalizes a vector, fails for zero vectors.
pub fn normalize(vector: WorldVector) -> Result<Direction, ConstructionError> {
    Unit::try_new(vector, EPSILON).ok_or(ConstructionError::ZeroVector)
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Normalized direction of the ray
    pub direction: Direction,

    /// Componentwise inverse of the ray direction
    /// Zeros in direction get turned into positive infinity regardless of the sign of the zero
    pub inv_direction: WorldVector,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Result<Ray, ConstructionError> {
        Ok(Ray::from_unit(origin, normalize(direction)?))
    }

    pub fn from_unit(origin: WorldPoint, direction: Direction) -> Ray {
        let inv_direction = direction.map(|x| if x == 0.0 { FloatType::INFINITY } else { 1.0 / x });

        Ray {
            origin,
            direction,
            inv_direction,
        }
    }

    /// Creates a ray starting at a surface point, with the origin moved by `RAY_OFFSET` along
    /// the surface normal to the side the ray is heading to.
    /// Rays tangent to the surface start exactly at the surface point.
    pub fn offset_from_surface(point: WorldPoint, direction: Direction, normal: &Direction) -> Ray {
        let alignment = align_zero(normal.dot(&direction));
        let origin = if alignment == 0.0 {
            point
        } else {
            point + normal.as_ref() * RAY_OFFSET.copysign(alignment)
        };
        Ray::from_unit(origin, direction)
    }

    pub fn point_at(&self, distance: FloatType) -> WorldPoint {
        self.origin + self.direction.as_ref() * distance
    }

    /// Returns the item whose point is closest to the ray origin.
    /// Ties go to the item encountered first.
    pub fn closest<T>(
        &self,
        items: impl IntoIterator<Item = T>,
        point: impl Fn(&T) -> WorldPoint,
    ) -> Option<T> {
        items
            .into_iter()
            .map(|item| ((point(&item) - self.origin).norm_squared(), item))
            .fold(None, |best: Option<(FloatType, T)>, (distance, item)| match best {
                Some((best_distance, _)) if best_distance <= distance => best,
                _ => Some((distance, item)),
            })
            .map(|(_, item)| item)
    }
}
