use crate::geometry::{
    ConstructionError, Direction, FloatType, Ray, WorldPoint, WorldVector, align_zero, is_zero,
    normalize,
};

use super::{Hits, valid_hits};

#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    point: WorldPoint,
    normal: Direction,
}

impl Plane {
    pub fn new(point: WorldPoint, normal: WorldVector) -> Result<Plane, ConstructionError> {
        Ok(Plane {
            point,
            normal: normalize(normal)?,
        })
    }

    /// Plane through three points, the first one is kept as the reference point.
    /// Normal follows the right hand rule for `(p1 - p2) x (p1 - p3)`.
    pub fn from_points(
        p1: WorldPoint,
        p2: WorldPoint,
        p3: WorldPoint,
    ) -> Result<Plane, ConstructionError> {
        let normal = normalize((p1 - p2).cross(&(p1 - p3)))
            .map_err(|_| ConstructionError::CollinearPoints)?;
        Ok(Plane { point: p1, normal })
    }

    pub fn point(&self) -> WorldPoint {
        self.point
    }

    pub fn normal(&self) -> Direction {
        self.normal
    }

    pub fn intersect(&self, ray: &Ray, max_distance: FloatType) -> Hits {
        let nv = self.normal.dot(&ray.direction);
        // Parallel, including rays lying in the plane
        if is_zero(nv) {
            return Hits::new();
        }
        if ray.origin == self.point {
            return Hits::new();
        }

        let t = align_zero(self.normal.dot(&(self.point - ray.origin)) / nv);
        valid_hits([t], max_distance)
    }
}
