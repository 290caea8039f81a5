use bon::Builder;
use index_vec::IndexVec;
use log::debug;
use ordered_float::OrderedFloat;

use crate::{
    color::{Color, ColorExt as _},
    geometry::{FloatType, Ray, RayIntersectionExt as _, WorldBox, WorldPoint},
    material::Material,
    shape::Shape,
};

/// Bounding boxes are grown by this much to absorb rounding at the surface.
const BOX_PADDING: FloatType = 1e-6;

/// Groups with at most this many geometries are not split further.
const LEAF_MAX_GEOMETRIES: usize = 4;

index_vec::define_index_type! {
    /// Identifies a geometry within its `Geometries` table.
    pub struct GeometryIdx = u32;
}

/// Shape together with its surface properties.
#[derive(Builder, Clone, Debug, PartialEq)]
pub struct Geometry {
    #[builder(into)]
    pub shape: Shape,

    #[builder(default)]
    pub material: Material,

    /// Light emitted by the surface itself.
    #[builder(default = Color::black())]
    pub emission: Color,
}

/// Intersection point together with the geometry that produced it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoPoint {
    pub geometry: GeometryIdx,
    pub point: WorldPoint,
}

#[derive(Clone, Debug)]
enum Member {
    Geometry(GeometryIdx),
    Group(Group),
}

/// Node of the geometry tree, optionally guarded by a box around all its members.
/// Missing box means the members are always tested.
#[derive(Clone, Debug, Default)]
struct Group {
    members: Vec<Member>,
    bounding_box: Option<WorldBox>,
}

/// Composite of all geometries in a scene.
///
/// Geometries live in a flat table indexed by `GeometryIdx`, intersection queries walk a tree of
/// groups over that table. Boxes are only used after `build_bounding_boxes` or `build_hierarchy`
/// was called, adding more geometries discards the root box again.
#[derive(Clone, Debug, Default)]
pub struct Geometries {
    geometries: IndexVec<GeometryIdx, Geometry>,
    boxes: IndexVec<GeometryIdx, Option<WorldBox>>,
    root: Group,
}

impl Geometries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, geometry: Geometry) -> GeometryIdx {
        let idx = self.push(geometry);
        self.root.members.push(Member::Geometry(idx));
        self.root.bounding_box = None;
        idx
    }

    /// Adds the geometries as a single sub-aggregate of the root.
    pub fn add_group(&mut self, geometries: impl IntoIterator<Item = Geometry>) -> Vec<GeometryIdx> {
        let indices: Vec<_> = geometries.into_iter().map(|g| self.push(g)).collect();
        self.root.members.push(Member::Group(Group {
            members: indices.iter().copied().map(Member::Geometry).collect(),
            bounding_box: None,
        }));
        self.root.bounding_box = None;
        indices
    }

    fn push(&mut self, geometry: Geometry) -> GeometryIdx {
        self.boxes.push(None);
        self.geometries.push(geometry)
    }

    pub fn get(&self, idx: GeometryIdx) -> &Geometry {
        &self.geometries[idx]
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GeometryIdx, &Geometry)> {
        self.geometries.iter_enumerated()
    }

    /// All hits closer than `max_distance`, grouped by geometry in tree order.
    pub fn find_intersections(&self, ray: &Ray, max_distance: FloatType) -> Vec<GeoPoint> {
        let mut hits = Vec::new();
        self.intersect_group(&self.root, ray, max_distance, &mut hits);
        hits
    }

    /// Hit closest to the ray origin, first found wins on ties.
    pub fn find_closest_intersection(&self, ray: &Ray) -> Option<GeoPoint> {
        ray.closest(self.find_intersections(ray, FloatType::INFINITY), |hit| hit.point)
    }

    fn intersect_group(
        &self,
        group: &Group,
        ray: &Ray,
        max_distance: FloatType,
        hits: &mut Vec<GeoPoint>,
    ) {
        if let Some(b) = &group.bounding_box {
            if !b.may_intersect(ray, max_distance) {
                return;
            }
        }

        for member in &group.members {
            match member {
                Member::Geometry(idx) => self.intersect_geometry(*idx, ray, max_distance, hits),
                Member::Group(g) => self.intersect_group(g, ray, max_distance, hits),
            }
        }
    }

    fn intersect_geometry(
        &self,
        idx: GeometryIdx,
        ray: &Ray,
        max_distance: FloatType,
        hits: &mut Vec<GeoPoint>,
    ) {
        if let Some(b) = &self.boxes[idx] {
            if !b.may_intersect(ray, max_distance) {
                return;
            }
        }

        hits.extend(
            self.geometries[idx]
                .shape
                .intersect(ray, max_distance)
                .into_iter()
                .map(|t| GeoPoint {
                    geometry: idx,
                    point: ray.point_at(t),
                }),
        );
    }

    /// Computes boxes of all geometries and groups.
    /// Groups containing an unbounded geometry stay without a box.
    pub fn build_bounding_boxes(&mut self) {
        self.boxes = self
            .geometries
            .iter()
            .map(|g| g.shape.bounding_box().map(|b| b.padded(BOX_PADDING)))
            .collect();

        let mut root = std::mem::take(&mut self.root);
        self.update_group_box(&mut root);
        self.root = root;

        debug!(
            "Built bounding boxes for {} geometries, {} unbounded, root box: {:?}",
            self.len(),
            self.boxes.iter().filter(|b| b.is_none()).count(),
            self.root.bounding_box
        );
    }

    fn update_group_box(&self, group: &mut Group) -> Option<WorldBox> {
        let mut union: Option<WorldBox> = None;
        let mut bounded = true;
        for member in &mut group.members {
            let member_box = match member {
                Member::Geometry(idx) => self.boxes[*idx].clone(),
                Member::Group(g) => self.update_group_box(g),
            };
            match member_box {
                Some(b) => union = Some(union.map_or(b.clone(), |u| u.union(&b))),
                None => bounded = false,
            }
        }
        group.bounding_box = if bounded { union } else { None };
        group.bounding_box.clone()
    }

    /// Reorganizes the bounded geometries directly in the root into a tree of nested groups,
    /// splitting at the median along the longest axis of their centers, then builds all boxes.
    /// Unbounded geometries and previously added groups stay directly in the root.
    pub fn build_hierarchy(&mut self) {
        let mut bounded = Vec::new();
        let mut kept = Vec::new();
        for member in std::mem::take(&mut self.root.members) {
            match member {
                Member::Geometry(idx) => match self.geometries[idx].shape.bounding_box() {
                    Some(b) => bounded.push((idx, b.center())),
                    None => kept.push(Member::Geometry(idx)),
                },
                group => kept.push(group),
            }
        }

        debug!(
            "Building hierarchy over {} bounded geometries, {} members stay in the root",
            bounded.len(),
            kept.len()
        );

        if !bounded.is_empty() {
            kept.push(split_recursive(bounded));
        }
        self.root.members = kept;
        self.build_bounding_boxes();
    }
}

fn split_recursive(mut items: Vec<(GeometryIdx, WorldPoint)>) -> Member {
    if items.len() <= LEAF_MAX_GEOMETRIES {
        return Member::Group(Group {
            members: items.into_iter().map(|(idx, _)| Member::Geometry(idx)).collect(),
            bounding_box: None,
        });
    }

    let centers: Vec<_> = items.iter().map(|(_, center)| *center).collect();
    let axis = WorldBox::from_points(&centers)
        .map(|b| b.longest_axis())
        .unwrap_or_default();
    items.sort_by_key(|(_, center)| OrderedFloat(center[axis]));

    let upper = items.split_off(items.len() / 2);
    Member::Group(Group {
        members: vec![split_recursive(items), split_recursive(upper)],
        bounding_box: None,
    })
}
