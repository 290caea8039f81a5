use nalgebra::Unit;

use crate::geometry::{
    ConstructionError, Direction, FloatType, Ray, WorldBox, WorldPoint, WorldVector, align_zero,
    is_zero,
};

use super::{Hits, valid_hits};

/// Infinite circular tube around an axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Tube {
    axis: Ray,
    radius: FloatType,
}

impl Tube {
    pub fn new(axis: Ray, radius: FloatType) -> Result<Tube, ConstructionError> {
        if !(radius > 0.0) {
            return Err(ConstructionError::NonPositiveRadius(radius));
        }
        Ok(Tube { axis, radius })
    }

    pub fn axis(&self) -> &Ray {
        &self.axis
    }

    pub fn radius(&self) -> FloatType {
        self.radius
    }

    /// Position of the point projected onto the axis, as a distance from the axis origin.
    fn axis_parameter(&self, point: &WorldPoint) -> FloatType {
        self.axis.direction.dot(&(point - self.axis.origin))
    }

    pub fn normal_at(&self, point: &WorldPoint) -> Direction {
        let t = self.axis_parameter(point);
        let projection = if is_zero(t) {
            self.axis.origin
        } else {
            self.axis.point_at(t)
        };
        Unit::new_normalize(point - projection)
    }

    /// Both roots of the lateral surface equation, ascending.
    /// None for rays parallel to the axis and for rays that miss or touch the tube.
    fn lateral_roots(&self, ray: &Ray) -> Option<[FloatType; 2]> {
        let axis = self.axis.direction.as_ref();

        // Project the ray direction and the offset from the axis origin onto the plane
        // perpendicular to the axis
        let d_perp = ray.direction.as_ref() - axis * ray.direction.dot(axis);
        let offset = ray.origin - self.axis.origin;
        let offset_perp = offset - axis * offset.dot(axis);

        let a = d_perp.norm_squared();
        if is_zero(a) {
            return None;
        }
        let b = 2.0 * offset_perp.dot(&d_perp);
        let c = offset_perp.norm_squared() - self.radius * self.radius;

        let discriminant = align_zero(b * b - 4.0 * a * c);
        if discriminant <= 0.0 {
            return None;
        }
        let sqrt_disc = discriminant.sqrt();
        Some([(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)])
    }

    pub fn intersect(&self, ray: &Ray, max_distance: FloatType) -> Hits {
        match self.lateral_roots(ray) {
            Some(roots) => valid_hits(roots, max_distance),
            None => Hits::new(),
        }
    }
}

/// Tube capped by two flat disks, at the axis origin and `height` along the axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Cylinder {
    tube: Tube,
    height: FloatType,
}

impl Cylinder {
    pub fn new(axis: Ray, radius: FloatType, height: FloatType) -> Result<Cylinder, ConstructionError> {
        if !(height > 0.0) {
            return Err(ConstructionError::NonPositiveHeight(height));
        }
        Ok(Cylinder {
            tube: Tube::new(axis, radius)?,
            height,
        })
    }

    pub fn tube(&self) -> &Tube {
        &self.tube
    }

    pub fn height(&self) -> FloatType {
        self.height
    }

    /// Axis direction on both bases, radial direction on the side.
    pub fn normal_at(&self, point: &WorldPoint) -> Direction {
        let axis = &self.tube.axis;
        if *point == axis.origin {
            return axis.direction;
        }
        let t = align_zero(self.tube.axis_parameter(point));
        if t == 0.0 || is_zero(self.height - t) {
            return axis.direction;
        }
        Unit::new_normalize(point - axis.point_at(t))
    }

    pub fn intersect(&self, ray: &Ray, max_distance: FloatType) -> Hits {
        let axis = &self.tube.axis;

        let lateral = self.tube.lateral_roots(ray).into_iter().flatten().filter(|t| {
            let s = self.tube.axis_parameter(&ray.point_at(*t));
            align_zero(s) > 0.0 && align_zero(s - self.height) < 0.0
        });

        let caps = [axis.origin, axis.point_at(self.height)]
            .into_iter()
            .filter_map(|center| self.cap_hit(ray, &center));

        valid_hits(lateral.chain(caps), max_distance)
    }

    /// Intersection with the base disk centered at `center`, the rim included.
    fn cap_hit(&self, ray: &Ray, center: &WorldPoint) -> Option<FloatType> {
        let axis = &self.tube.axis.direction;
        let denominator = axis.dot(&ray.direction);
        if is_zero(denominator) {
            return None;
        }
        let t = axis.dot(&(center - ray.origin)) / denominator;
        let from_center = ray.point_at(t) - center;
        let radius = self.tube.radius;
        (align_zero(from_center.norm_squared() - radius * radius) <= 0.0).then_some(t)
    }

    pub fn bounding_box(&self) -> WorldBox {
        let axis = &self.tube.axis;
        let top = axis.point_at(self.height);
        // Extent of a disk perpendicular to the axis, per world axis
        let extent: WorldVector = axis
            .direction
            .map(|a| self.tube.radius * (1.0 - a * a).max(0.0).sqrt());
        WorldBox {
            min: axis.origin.inf(&top) - extent,
            max: axis.origin.sup(&top) + extent,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;
    use test_case::test_case;

    fn x_tube() -> Tube {
        Tube::new(Ray::new(WorldPoint::origin(), WorldVector::x()).unwrap(), 1.0).unwrap()
    }

    fn z_cylinder() -> Cylinder {
        Cylinder::new(Ray::new(WorldPoint::origin(), WorldVector::z()).unwrap(), 2.0, 5.0).unwrap()
    }

    #[test_case(WorldPoint::new(1.0, 1.0, 1.0) ; "general_point")]
    #[test_case(WorldPoint::new(0.0, 1.0, 0.0) ; "orthogonal_to_axis_origin")]
    fn tube_normal_is_perpendicular_to_axis(point: WorldPoint) {
        let n = x_tube().normal_at(&point);
        assert!(n.dot(&WorldVector::x()).abs() < 1e-12);
        assert!((n.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn tube_crossing_ray() {
        let ray = Ray::new(WorldPoint::new(3.0, -10.0, 0.0), WorldVector::y()).unwrap();
        let hits = x_tube().intersect(&ray, FloatType::INFINITY);
        assert!(hits.len() == 2);
        assert!((hits[0] - 9.0).abs() < 1e-9);
        assert!((hits[1] - 11.0).abs() < 1e-9);
    }

    #[test_case([0.0, 0.5, 0.0], [1.0, 0.0, 0.0] ; "parallel_to_axis")]
    #[test_case([0.0, 1.0, -5.0], [0.0, 0.0, 1.0] ; "tangent")]
    #[test_case([0.0, 3.0, -5.0], [0.0, 0.0, 1.0] ; "passing_by")]
    #[test_case([0.0, 0.0, 2.0], [0.0, 0.0, 1.0] ; "pointing_away")]
    fn tube_misses(origin: [FloatType; 3], direction: [FloatType; 3]) {
        let ray = Ray::new(origin.into(), direction.into()).unwrap();
        assert!(x_tube().intersect(&ray, FloatType::INFINITY).is_empty());
    }

    #[test]
    fn cylinder_normals_on_bases_follow_axis() {
        let c = z_cylinder();
        for point in [
            WorldPoint::new(0.0, 0.0, 5.0),
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(1.0, 1.0, 5.0),
            WorldPoint::new(1.0, -1.0, 0.0),
        ] {
            assert!(c.normal_at(&point).into_inner() == WorldVector::z());
        }
    }

    #[test]
    fn cylinder_lateral_normal() {
        let n = z_cylinder().normal_at(&WorldPoint::new(0.0, 2.0, 3.0));
        assert!((n.into_inner() - WorldVector::y()).norm() < 1e-12);
    }

    #[test]
    fn cylinder_side_hit_is_clipped_by_height() {
        let c = z_cylinder();
        let inside = Ray::new(WorldPoint::new(-10.0, 0.0, 2.0), WorldVector::x()).unwrap();
        assert!(c.intersect(&inside, FloatType::INFINITY).as_slice() == [8.0, 12.0]);

        let above = Ray::new(WorldPoint::new(-10.0, 0.0, 6.0), WorldVector::x()).unwrap();
        assert!(c.intersect(&above, FloatType::INFINITY).is_empty());
    }

    #[test]
    fn cylinder_along_axis_hits_both_caps() {
        let ray = Ray::new(WorldPoint::new(1.0, 0.0, -3.0), WorldVector::z()).unwrap();
        let hits = z_cylinder().intersect(&ray, FloatType::INFINITY);
        assert!(hits.as_slice() == [3.0, 8.0]);
    }

    #[test]
    fn cylinder_cap_and_side() {
        // Enters through the top cap, leaves through the side
        let ray = Ray::new(WorldPoint::new(0.0, 0.0, 7.0), WorldVector::new(1.0, 0.0, -2.0)).unwrap();
        let hits = z_cylinder().intersect(&ray, FloatType::INFINITY);
        assert!(hits.len() == 2);
        assert!((ray.point_at(hits[0]) - WorldPoint::new(1.0, 0.0, 5.0)).norm() < 1e-9);
        assert!((ray.point_at(hits[1]) - WorldPoint::new(2.0, 0.0, 3.0)).norm() < 1e-9);
    }

    #[test]
    fn cylinder_rim_is_hit_once() {
        let ray = Ray::new(WorldPoint::new(0.0, 0.0, 7.0), WorldVector::new(1.0, 0.0, -1.0)).unwrap();
        let hits = z_cylinder().intersect(&ray, FloatType::INFINITY);
        assert!(hits.len() == 1);
        assert!((ray.point_at(hits[0]) - WorldPoint::new(2.0, 0.0, 5.0)).norm() < 1e-9);
    }

    #[test]
    fn bad_dimensions() {
        let axis = Ray::new(WorldPoint::origin(), WorldVector::z()).unwrap();
        assert!(Cylinder::new(axis, 1.0, 0.0) == Err(ConstructionError::NonPositiveHeight(0.0)));
        assert!(Cylinder::new(axis, -1.0, 1.0) == Err(ConstructionError::NonPositiveRadius(-1.0)));
    }

    #[test]
    fn axis_aligned_cylinder_box() {
        let c = z_cylinder();
        let b = c.bounding_box();
        assert!(b.min == WorldPoint::new(-2.0, -2.0, 0.0));
        assert!(b.max == WorldPoint::new(2.0, 2.0, 5.0));
    }
}
