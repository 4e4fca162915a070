use crate::{core::geo::LatLng, spatial::placement::circles_overlap};

#[cfg(feature = "rtree")]
use crate::core::constants::EARTH_RADIUS_METERS;
#[cfg(feature = "rtree")]
use rstar::{RTree, RTreeObject, AABB};

/// Storage for the circles already placed during a pass.
///
/// Implementations must agree exactly with [`LinearIndex`]: an index may
/// skip circles that cannot possibly overlap, but every answer is decided by
/// the same haversine comparison.
pub trait OverlapIndex {
    /// Records a placed circle
    fn insert(&mut self, position: LatLng, radius_m: f64);

    /// Whether a candidate circle would overlap anything recorded so far
    fn overlaps(&self, candidate: &LatLng, radius_m: f64, min_clearance_m: f64) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every recorded circle
    fn clear(&mut self);
}

/// Plain vector scan, O(n) per query
#[derive(Debug, Clone, Default)]
pub struct LinearIndex {
    circles: Vec<(LatLng, f64)>,
}

impl LinearIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverlapIndex for LinearIndex {
    fn insert(&mut self, position: LatLng, radius_m: f64) {
        self.circles.push((position, radius_m));
    }

    fn overlaps(&self, candidate: &LatLng, radius_m: f64, min_clearance_m: f64) -> bool {
        self.circles.iter().any(|(position, placed_radius)| {
            circles_overlap(candidate, radius_m, position, *placed_radius, min_clearance_m)
        })
    }

    fn len(&self) -> usize {
        self.circles.len()
    }

    fn clear(&mut self) {
        self.circles.clear();
    }
}

// --- rstar integration -------------------------------------------------------------------------

/// A placed circle center, stored as `[lng, lat]` in degrees
#[cfg(feature = "rtree")]
#[derive(Debug, Clone)]
struct IndexedCircle {
    point: [f64; 2],
    position: LatLng,
    radius_m: f64,
}

#[cfg(feature = "rtree")]
impl RTreeObject for IndexedCircle {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

/// R-tree broad phase for large marker sets.
///
/// Queries look up centers inside a lat/lng box that is guaranteed to hold
/// every circle within reach, then confirm each hit with the exact test.
/// Boxes that would wrap a pole or the antimeridian fall back to a full scan.
#[cfg(feature = "rtree")]
pub struct RTreeIndex {
    rtree: RTree<IndexedCircle>,
    max_radius_m: f64,
}

#[cfg(feature = "rtree")]
impl RTreeIndex {
    pub fn new() -> Self {
        Self {
            rtree: RTree::new(),
            max_radius_m: 0.0,
        }
    }

    /// Degree-space box around `center` containing every point closer than
    /// `reach_m`, or `None` when no such box exists without wrapping.
    fn query_envelope(center: &LatLng, reach_m: f64) -> Option<AABB<[f64; 2]>> {
        const PADDING: f64 = 1.0 + 1e-6;
        use std::f64::consts::FRAC_PI_2;

        let angular = reach_m / EARTH_RADIUS_METERS * PADDING;
        let lat_rad = center.lat.to_radians();
        let max_abs_lat = lat_rad.abs() + angular;
        if angular >= FRAC_PI_2 || max_abs_lat >= FRAC_PI_2 {
            return None;
        }

        // hav(d) >= cos(lat1) * cos(lat2) * hav(d_lng), with cos(lat2) >= cos(max_abs_lat)
        let bound = (angular / 2.0).sin().powi(2) / (lat_rad.cos() * max_abs_lat.cos());
        if bound >= 1.0 {
            return None;
        }

        let d_lat = angular.to_degrees();
        let d_lng = (2.0 * bound.sqrt().asin() * PADDING).to_degrees();
        let (min_lng, max_lng) = (center.lng - d_lng, center.lng + d_lng);
        if min_lng < -180.0 || max_lng > 180.0 {
            return None;
        }

        Some(AABB::from_corners(
            [min_lng, center.lat - d_lat],
            [max_lng, center.lat + d_lat],
        ))
    }
}

#[cfg(feature = "rtree")]
impl Default for RTreeIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "rtree")]
impl OverlapIndex for RTreeIndex {
    fn insert(&mut self, position: LatLng, radius_m: f64) {
        self.max_radius_m = self.max_radius_m.max(radius_m);
        self.rtree.insert(IndexedCircle {
            point: [position.lng, position.lat],
            position,
            radius_m,
        });
    }

    fn overlaps(&self, candidate: &LatLng, radius_m: f64, min_clearance_m: f64) -> bool {
        if self.rtree.size() == 0 {
            return false;
        }

        let hit = |item: &IndexedCircle| {
            circles_overlap(
                candidate,
                radius_m,
                &item.position,
                item.radius_m,
                min_clearance_m,
            )
        };

        let reach = radius_m + self.max_radius_m + min_clearance_m;
        match Self::query_envelope(candidate, reach) {
            Some(envelope) => self
                .rtree
                .locate_in_envelope_intersecting(&envelope)
                .any(hit),
            None => self.rtree.iter().any(hit),
        }
    }

    fn len(&self) -> usize {
        self.rtree.size()
    }

    fn clear(&mut self) {
        self.rtree = RTree::new();
        self.max_radius_m = 0.0;
    }
}
