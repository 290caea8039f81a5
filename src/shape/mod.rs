//! Primitive surfaces and their closed form ray intersections.

mod plane;
mod polygon;
mod sphere;
mod tube;

use arrayvec::ArrayVec;

pub use plane::Plane;
pub use polygon::{Polygon, Triangle};
pub use sphere::Sphere;
pub use tube::{Cylinder, Tube};

use crate::geometry::{Direction, FloatType, Ray, WorldBox, WorldPoint, align_zero};

/// Distances along a ray at which a shape was hit, ascending.
pub type Hits = ArrayVec<FloatType, 4>;

/// Hit distance must be strictly in front of the ray origin and strictly closer than `max_distance`.
fn is_valid_hit(t: FloatType, max_distance: FloatType) -> bool {
    align_zero(t) > 0.0 && align_zero(t - max_distance) < 0.0
}

/// Keeps only valid distances, sorted.
fn valid_hits(candidates: impl IntoIterator<Item = FloatType>, max_distance: FloatType) -> Hits {
    let mut hits: Hits = candidates
        .into_iter()
        .filter(|t| is_valid_hit(*t, max_distance))
        .collect();
    hits.sort_unstable_by(FloatType::total_cmp);
    hits
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
    Polygon(Polygon),
    Tube(Tube),
    Cylinder(Cylinder),
}

impl Shape {
    /// Outward unit normal at a point on the surface.
    pub fn normal_at(&self, point: &WorldPoint) -> Direction {
        match self {
            Shape::Sphere(s) => s.normal_at(point),
            Shape::Plane(p) => p.normal(),
            Shape::Triangle(t) => t.normal(),
            Shape::Polygon(p) => p.normal(),
            Shape::Tube(t) => t.normal_at(point),
            Shape::Cylinder(c) => c.normal_at(point),
        }
    }

    /// Distances of all hits in the open interval (0, max_distance).
    pub fn intersect(&self, ray: &Ray, max_distance: FloatType) -> Hits {
        match self {
            Shape::Sphere(s) => s.intersect(ray, max_distance),
            Shape::Plane(p) => p.intersect(ray, max_distance),
            Shape::Triangle(t) => t.intersect(ray, max_distance),
            Shape::Polygon(p) => p.intersect(ray, max_distance),
            Shape::Tube(t) => t.intersect(ray, max_distance),
            Shape::Cylinder(c) => c.intersect(ray, max_distance),
        }
    }

    /// Box enclosing the whole shape, None for unbounded shapes.
    pub fn bounding_box(&self) -> Option<WorldBox> {
        match self {
            Shape::Sphere(s) => Some(s.bounding_box()),
            Shape::Plane(_) | Shape::Tube(_) => None,
            Shape::Triangle(t) => Some(t.bounding_box()),
            Shape::Polygon(p) => Some(p.bounding_box()),
            Shape::Cylinder(c) => Some(c.bounding_box()),
        }
    }
}

macro_rules! shape_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Shape {
                fn from(value: $variant) -> Self {
                    Shape::$variant(value)
                }
            }
        )*
    };
}

shape_from!(Sphere, Plane, Triangle, Polygon, Tube, Cylinder);

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{RayIntersectionExt as _, WorldVector, test::*};
    use assert2::assert;
    use proptest::prelude::*;
    use test_strategy::proptest;

    fn bounded_shapes() -> Vec<Shape> {
        vec![
            Sphere::new(WorldPoint::new(1.0, -2.0, 3.0), 2.5).unwrap().into(),
            Triangle::new(
                WorldPoint::new(0.0, 0.0, 1.0),
                WorldPoint::new(1.0, 0.0, 0.0),
                WorldPoint::new(0.0, 1.0, 0.0),
            )
            .unwrap()
            .into(),
            Cylinder::new(
                Ray::new(WorldPoint::new(0.5, 0.0, -1.0), WorldVector::new(1.0, 1.0, 2.0)).unwrap(),
                1.5,
                3.0,
            )
            .unwrap()
            .into(),
        ]
    }

    #[test]
    fn valid_hits_filters_and_sorts() {
        let hits = valid_hits([5.0, -1.0, 1e-12, 2.0, 10.0], 10.0);
        assert!(hits.as_slice() == [2.0, 5.0]);
    }

    #[test]
    fn unbounded_shapes_have_no_box() {
        let plane = Shape::from(Plane::new(WorldPoint::origin(), WorldVector::z()).unwrap());
        assert!(plane.bounding_box().is_none());
    }

    /// The box test must never reject a ray that really hits the shape.
    #[proptest]
    fn bounding_box_is_conservative(origin: WorldPointWrapper, direction: DirectionWrapper) {
        let ray = Ray::from_unit(*origin * 1e-2, *direction);
        for shape in bounded_shapes() {
            let hits = shape.intersect(&ray, FloatType::INFINITY);
            if let Some(&t) = hits.first() {
                let b = shape.bounding_box().unwrap();
                prop_assert!(b.padded(1e-6).may_intersect(&ray, FloatType::INFINITY));
                prop_assert!(b.padded(1e-6).contains(&ray.point_at(t)));
            }
        }
    }

    /// Normals are unit length everywhere the shape gets hit.
    #[proptest]
    fn normal_is_unit_at_hits(origin: WorldPointWrapper, direction: DirectionWrapper) {
        let ray = Ray::from_unit(*origin * 1e-2, *direction);
        for shape in bounded_shapes() {
            for t in shape.intersect(&ray, FloatType::INFINITY) {
                let normal = shape.normal_at(&ray.point_at(t));
                prop_assert!((normal.norm() - 1.0).abs() < 1e-9);
            }
        }
    }
}
