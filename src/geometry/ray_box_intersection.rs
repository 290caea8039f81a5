use crate::geometry::{FloatType, Ray, WorldBox};

pub trait RayIntersectionExt {
    /// Calculate first and last ray intersection with the box
    fn intersect(&self, ray: &Ray) -> (FloatType, FloatType);

    /// Conservative test whether the ray may hit anything inside the box
    /// closer than `max_distance`.
    fn may_intersect(&self, ray: &Ray, max_distance: FloatType) -> bool;
}

impl RayIntersectionExt for WorldBox {
    /// Calculates ray intersection with the box using the slab test.
    /// Returns minimum and maximum distance along the ray, ray intersects if min <= max.
    fn intersect(&self, ray: &Ray) -> (FloatType, FloatType) {
        // Componentwise distances along the ray to the box's min and max corners
        // The multiplication is NAN if the ray is starting inside the slab bounding plane
        // and is parallel to it. In this case we blend to +-infinity, so that the range becomes infinite
        let to_box_min = (self.min - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::NEG_INFINITY } else { x });
        let to_box_max = (self.max - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::INFINITY } else { x });

        // Correctly ordered (min_t <= max_t)
        let componentwise_min_t = to_box_min.zip_map(&to_box_max, FloatType::min);
        let componentwise_max_t = to_box_min.zip_map(&to_box_max, FloatType::max);

        let min_t = componentwise_min_t
            .x
            .max(componentwise_min_t.y.max(componentwise_min_t.z));
        let max_t = componentwise_max_t
            .x
            .min(componentwise_max_t.y.min(componentwise_max_t.z));

        (min_t, max_t)
    }

    fn may_intersect(&self, ray: &Ray, max_distance: FloatType) -> bool {
        let (t1, t2) = self.intersect(ray);
        t1.max(0.0) <= t2.min(max_distance)
    }
}
