use itertools::Itertools as _;
use nalgebra::Unit;

use crate::geometry::{
    ConstructionError, Direction, EPSILON, FloatType, Ray, WorldBox, WorldPoint, is_zero,
};

use super::{Hits, Plane};

/// Convex planar polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<WorldPoint>,
    plane: Plane,
}

impl Polygon {
    /// Vertices must be ordered along the edge path, coplanar and form a convex polygon.
    pub fn new(vertices: Vec<WorldPoint>) -> Result<Polygon, ConstructionError> {
        if vertices.len() < 3 {
            return Err(ConstructionError::TooFewVertices(vertices.len()));
        }

        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        let normal = plane.normal();

        if vertices[3..]
            .iter()
            .any(|v| !is_zero(normal.dot(&(v - vertices[0]))))
        {
            return Err(ConstructionError::NonCoplanarVertices);
        }

        // Every turn between consecutive edges must go the same way around the normal
        let turns = vertices
            .iter()
            .circular_tuple_windows()
            .map(|(a, b, c)| normal.dot(&(b - a).cross(&(c - b))))
            .collect::<Vec<_>>();
        let all_positive = turns.iter().all(|t| !is_zero(*t) && *t > 0.0);
        let all_negative = turns.iter().all(|t| !is_zero(*t) && *t < 0.0);
        if !all_positive && !all_negative {
            return Err(ConstructionError::NonConvexPolygon);
        }

        // Star shaped paths turn consistently too, but cross their own edges.
        // Every vertex must stay on the inner side of every edge line.
        let orientation = if all_positive { 1.0 } else { -1.0 };
        let self_intersecting = vertices.iter().circular_tuple_windows().any(|(a, b)| {
            vertices.iter().any(|v| {
                let side = orientation * normal.dot(&(b - a).cross(&(v - a)));
                side < 0.0 && !is_zero(side)
            })
        });
        if self_intersecting {
            return Err(ConstructionError::NonConvexPolygon);
        }

        Ok(Polygon { vertices, plane })
    }

    pub fn vertices(&self) -> &[WorldPoint] {
        &self.vertices
    }

    pub fn normal(&self) -> Direction {
        self.plane.normal()
    }

    pub fn intersect(&self, ray: &Ray, max_distance: FloatType) -> Hits {
        let hits = self.plane.intersect(ray, max_distance);
        if hits.is_empty() || self.contains_ray_direction(ray) {
            hits
        } else {
            Hits::new()
        }
    }

    /// Edge-normal test: the ray passes inside iff its direction lies on the same side of every
    /// plane spanned by the ray origin and a polygon edge.
    /// Rays grazing an edge or a vertex are outside.
    fn contains_ray_direction(&self, ray: &Ray) -> bool {
        let mut sign = 0.0;
        for (a, b) in self.vertices.iter().circular_tuple_windows() {
            let Some(edge_normal) = Unit::try_new((a - ray.origin).cross(&(b - ray.origin)), EPSILON)
            else {
                return false;
            };
            let alignment = ray.direction.dot(&edge_normal);
            if is_zero(alignment) {
                return false;
            }
            if sign == 0.0 {
                sign = alignment.signum();
            } else if alignment.signum() != sign {
                return false;
            }
        }
        true
    }

    pub fn bounding_box(&self) -> WorldBox {
        WorldBox::from_points(&self.vertices)
            .unwrap_or_else(|| unreachable!("A polygon has at least three vertices"))
    }
}

/// Three vertex polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle(Polygon);

impl Triangle {
    pub fn new(a: WorldPoint, b: WorldPoint, c: WorldPoint) -> Result<Triangle, ConstructionError> {
        Ok(Triangle(Polygon::new(vec![a, b, c])?))
    }

    pub fn vertices(&self) -> &[WorldPoint] {
        self.0.vertices()
    }

    pub fn normal(&self) -> Direction {
        self.0.normal()
    }

    pub fn intersect(&self, ray: &Ray, max_distance: FloatType) -> Hits {
        self.0.intersect(ray, max_distance)
    }

    pub fn bounding_box(&self) -> WorldBox {
        self.0.bounding_box()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::WorldVector;
    use assert2::assert;
    use test_case::test_case;

    fn triangle() -> Triangle {
        Triangle::new(
            WorldPoint::new(0.0, 0.0, 1.0),
            WorldPoint::new(0.0, 1.0, 0.0),
            WorldPoint::new(1.0, 0.0, 0.0),
        )
        .unwrap()
    }

    fn hits(direction: [FloatType; 3]) -> Vec<WorldPoint> {
        let ray = Ray::new(WorldPoint::new(0.5, 0.5, 1.0), direction.into()).unwrap();
        triangle()
            .intersect(&ray, FloatType::INFINITY)
            .iter()
            .map(|t| ray.point_at(*t))
            .collect()
    }

    #[test]
    fn normal_is_orthogonal_to_edges() {
        let t = triangle();
        let n = t.normal();
        assert!((n.norm() - 1.0).abs() < 1e-9);
        for (a, b) in t.vertices().iter().circular_tuple_windows() {
            assert!(n.dot(&(b - a)).abs() < 1e-9);
        }
    }

    #[test]
    fn ray_through_inside() {
        let points = hits([-0.5, -1.0, -1.0]);
        assert!(points.len() == 1);
        assert!((points[0] - WorldPoint::new(0.3, 0.1, 0.6)).norm() < 1e-9);
    }

    #[test_case([-2.0, -0.5, -1.0] ; "outside_against_edge")]
    #[test_case([1.0, -0.5, -1.0] ; "outside_against_vertex")]
    #[test_case([-0.5, -0.1, -0.4] ; "on_edge")]
    #[test_case([-0.5, 0.5, -1.0] ; "on_vertex")]
    #[test_case([-0.5, -1.0, 0.5] ; "on_edge_continuation")]
    fn misses(direction: [FloatType; 3]) {
        assert!(hits(direction).is_empty());
    }

    #[test]
    fn too_few_vertices() {
        let result = Polygon::new(vec![WorldPoint::origin(), WorldPoint::new(1.0, 0.0, 0.0)]);
        assert!(result == Err(ConstructionError::TooFewVertices(2)));
    }

    #[test]
    fn non_coplanar() {
        let result = Polygon::new(vec![
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(1.0, 0.0, 0.0),
            WorldPoint::new(1.0, 1.0, 0.0),
            WorldPoint::new(0.0, 1.0, 0.5),
        ]);
        assert!(result == Err(ConstructionError::NonCoplanarVertices));
    }

    #[test]
    fn non_convex() {
        let result = Polygon::new(vec![
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(2.0, 0.0, 0.0),
            WorldPoint::new(1.0, 0.5, 0.0),
            WorldPoint::new(2.0, 2.0, 0.0),
            WorldPoint::new(0.0, 2.0, 0.0),
        ]);
        assert!(result == Err(ConstructionError::NonConvexPolygon));
    }

    #[test]
    fn pentagram_is_rejected() {
        // Unit circle vertices visited in the order 0, 2, 4, 1, 3
        let vertices = [0, 2, 4, 1, 3]
            .into_iter()
            .map(|i| {
                let angle = FloatType::from(i) * std::f64::consts::TAU / 5.0;
                WorldPoint::new(angle.cos(), angle.sin(), 0.0)
            })
            .collect();
        assert!(Polygon::new(vertices) == Err(ConstructionError::NonConvexPolygon));
    }

    #[test]
    fn regular_pentagon_is_accepted() {
        let vertices: Vec<_> = (0..5)
            .map(|i| {
                let angle = FloatType::from(i) * std::f64::consts::TAU / 5.0;
                WorldPoint::new(angle.cos(), angle.sin(), 0.0)
            })
            .collect();
        let pentagon = Polygon::new(vertices).unwrap();
        // Close to a vertex, outside the inner pentagon of the star with the same vertices
        let ray = Ray::new(WorldPoint::new(0.8, 0.0, 1.0), -WorldVector::z()).unwrap();
        assert!(pentagon.intersect(&ray, FloatType::INFINITY).len() == 1);
    }

    #[test]
    fn quad_hit_and_miss() {
        let quad = Polygon::new(vec![
            WorldPoint::new(0.0, 0.0, 1.0),
            WorldPoint::new(1.0, 0.0, 0.0),
            WorldPoint::new(0.0, 1.0, 0.0),
            WorldPoint::new(-1.0, 1.0, 1.0),
        ])
        .unwrap();
        let origin = WorldPoint::new(0.0, 0.0, 5.0);

        let inside = Ray::new(origin, WorldPoint::new(-0.2, 0.5, 0.7) - origin).unwrap();
        let hits = quad.intersect(&inside, FloatType::INFINITY);
        assert!(hits.len() == 1);
        assert!((inside.point_at(hits[0]) - WorldPoint::new(-0.2, 0.5, 0.7)).norm() < 1e-9);

        let outside = Ray::new(origin, WorldPoint::new(2.0, 2.0, -3.0) - origin).unwrap();
        assert!(quad.intersect(&outside, FloatType::INFINITY).is_empty());
    }

    #[test]
    fn degenerate_triangle() {
        let result = Triangle::new(
            WorldPoint::origin(),
            WorldPoint::new(1.0, 1.0, 1.0),
            WorldPoint::new(2.0, 2.0, 2.0),
        );
        assert!(result == Err(ConstructionError::CollinearPoints));
    }

    #[test]
    fn bounding_box_of_vertices() {
        let b = triangle().bounding_box();
        assert!(b.min == WorldPoint::origin());
        assert!(b.max == WorldPoint::new(1.0, 1.0, 1.0));
    }
}
