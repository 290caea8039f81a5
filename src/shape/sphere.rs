use nalgebra::Unit;

use crate::geometry::{
    ConstructionError, Direction, FloatType, Ray, WorldBox, WorldPoint, WorldVector, align_zero,
    is_zero,
};

use super::{Hits, valid_hits};

#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    center: WorldPoint,
    radius: FloatType,
}

impl Sphere {
    pub fn new(center: WorldPoint, radius: FloatType) -> Result<Sphere, ConstructionError> {
        if !(radius > 0.0) {
            return Err(ConstructionError::NonPositiveRadius(radius));
        }
        Ok(Sphere { center, radius })
    }

    pub fn center(&self) -> WorldPoint {
        self.center
    }

    pub fn radius(&self) -> FloatType {
        self.radius
    }

    pub fn normal_at(&self, point: &WorldPoint) -> Direction {
        Unit::new_normalize(point - self.center)
    }

    pub fn intersect(&self, ray: &Ray, max_distance: FloatType) -> Hits {
        let to_center = self.center - ray.origin;
        if is_zero(to_center.norm()) {
            return valid_hits([self.radius], max_distance);
        }

        // Distance along the ray to the point closest to the center
        let tm = ray.direction.dot(&to_center);
        let distance_squared = to_center.norm_squared() - tm * tm;

        // Tangent rays and rays passing outside give nothing
        let th_squared = align_zero(self.radius * self.radius - distance_squared);
        if th_squared <= 0.0 {
            return Hits::new();
        }
        let th = th_squared.sqrt();

        valid_hits([tm - th, tm + th], max_distance)
    }

    pub fn bounding_box(&self) -> WorldBox {
        let r_vec = WorldVector::repeat(self.radius);
        WorldBox {
            min: self.center - r_vec,
            max: self.center + r_vec,
        }
    }
}
