use crate::{
    core::{
        config::PlacementConfig,
        geo::{haversine_distance, LatLng},
    },
    spatial::index::{LinearIndex, OverlapIndex},
    MapError, Result,
};
use serde::{Deserialize, Serialize};

/// A marker that wants a fixed-radius circle drawn around it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPoint {
    /// Caller's identifier, carried through to the placement result
    pub id: String,
    /// True geographic position of the marker
    pub position: LatLng,
    /// Circle radius in meters
    pub radius_m: f64,
}

impl MarkerPoint {
    pub fn new(id: impl Into<String>, position: LatLng, radius_m: f64) -> Self {
        Self {
            id: id.into(),
            position,
            radius_m,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.position.validate().map_err(|_| {
            MapError::InvalidCoordinates(format!(
                "marker '{}' at ({}, {})",
                self.id, self.position.lat, self.position.lng
            ))
        })?;
        if !self.radius_m.is_finite() || self.radius_m < 0.0 {
            return Err(MapError::InvalidRadius(format!(
                "marker '{}' has radius {}",
                self.id, self.radius_m
            )));
        }
        Ok(())
    }
}

/// How a circle ended up where it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementOutcome {
    /// Drawn at the marker's true position
    Unmoved,
    /// Moved onto ring `ring` (1-based) at candidate `angle_index` (0 = north)
    Displaced { ring: u32, angle_index: u32 },
    /// Every ring candidate overlapped; drawn at the true position anyway
    Fallback,
}

/// Where a marker's circle is rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedCircle {
    pub id: String,
    pub base: LatLng,
    pub position: LatLng,
    pub radius_m: f64,
    pub outcome: PlacementOutcome,
}

impl PlacedCircle {
    pub fn is_degraded(&self) -> bool {
        self.outcome == PlacementOutcome::Fallback
    }

    pub fn is_displaced(&self) -> bool {
        matches!(self.outcome, PlacementOutcome::Displaced { .. })
    }

    /// How far the circle was pushed away from its marker, in meters
    pub fn displacement_m(&self) -> f64 {
        haversine_distance(&self.base, &self.position)
    }
}

/// Two circles overlap when their centers are closer than the sum of the
/// radii plus the clearance. Exactly touching the threshold is not an overlap.
pub(crate) fn circles_overlap(
    a: &LatLng,
    a_radius_m: f64,
    b: &LatLng,
    b_radius_m: f64,
    min_clearance_m: f64,
) -> bool {
    haversine_distance(a, b) < a_radius_m + b_radius_m + min_clearance_m
}

/// Returns whether a candidate circle overlaps any already placed circle
pub fn overlaps(
    candidate: &LatLng,
    radius_m: f64,
    placed: &[PlacedCircle],
    min_clearance_m: f64,
) -> bool {
    placed.iter().any(|circle| {
        circles_overlap(
            candidate,
            radius_m,
            &circle.position,
            circle.radius_m,
            min_clearance_m,
        )
    })
}

/// Ring search shared by the slice and index based entry points.
///
/// Tries the base position, then rings 1..=max_rings, each ring's candidates
/// in angular order starting due north. The first free spot wins. Candidates
/// that cannot be expressed as a valid coordinate are skipped.
fn search_position<F>(
    base: &LatLng,
    radius_m: f64,
    config: &PlacementConfig,
    is_blocked: F,
) -> (LatLng, PlacementOutcome)
where
    F: Fn(&LatLng) -> bool,
{
    if !is_blocked(base) {
        return (*base, PlacementOutcome::Unmoved);
    }

    let angle_step = config.angle_step();
    for ring in 1..=config.max_rings {
        let distance = config.ring_distance(radius_m, ring);
        for angle_index in 0..config.ring_angles {
            let candidate = base.offset_meters(angle_step * angle_index as f64, distance);
            if candidate.is_valid() && !is_blocked(&candidate) {
                return (candidate, PlacementOutcome::Displaced { ring, angle_index });
            }
        }
    }

    (*base, PlacementOutcome::Fallback)
}

/// Finds a position for a circle that clears every placed circle.
///
/// Never fails: when the search is exhausted the base position comes back
/// with [`PlacementOutcome::Fallback`].
pub fn find_non_overlapping_position(
    base: &LatLng,
    radius_m: f64,
    placed: &[PlacedCircle],
    config: &PlacementConfig,
) -> (LatLng, PlacementOutcome) {
    search_position(base, radius_m, config, |candidate| {
        overlaps(candidate, radius_m, placed, config.min_clearance_m)
    })
}

/// Places every marker's circle in input order, returning one
/// [`PlacedCircle`] per marker in the same order.
///
/// All inputs are validated before any placement happens.
pub fn place_circles(
    markers: &[MarkerPoint],
    config: &PlacementConfig,
) -> Result<Vec<PlacedCircle>> {
    CirclePlacer::new(config.clone())?.place_all(markers)
}

/// Reusable placement engine over a chosen [`OverlapIndex`].
pub struct CirclePlacer<I: OverlapIndex = LinearIndex> {
    config: PlacementConfig,
    index: I,
}

impl CirclePlacer<LinearIndex> {
    pub fn new(config: PlacementConfig) -> Result<Self> {
        Self::with_index(config, LinearIndex::new())
    }
}

impl<I: OverlapIndex> CirclePlacer<I> {
    pub fn with_index(config: PlacementConfig, index: I) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, index })
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Runs a full placement pass. Each call starts from an empty index.
    pub fn place_all(&mut self, markers: &[MarkerPoint]) -> Result<Vec<PlacedCircle>> {
        for marker in markers {
            marker.validate()?;
        }

        self.index.clear();
        let mut placed = Vec::with_capacity(markers.len());
        let mut displaced = 0usize;
        let mut degraded = 0usize;

        for marker in markers {
            let circle = self.place_one(marker);
            match circle.outcome {
                PlacementOutcome::Unmoved => {}
                PlacementOutcome::Displaced { ring, angle_index } => {
                    displaced += 1;
                    log::debug!(
                        "Displaced circle '{}' to ring {} angle {} ({:.1} m)",
                        circle.id,
                        ring,
                        angle_index,
                        circle.displacement_m()
                    );
                }
                PlacementOutcome::Fallback => {
                    degraded += 1;
                    log::warn!(
                        "No free spot for circle '{}' within {} rings, keeping base position",
                        circle.id,
                        self.config.max_rings
                    );
                }
            }
            self.index.insert(circle.position, circle.radius_m);
            placed.push(circle);
        }

        log::info!(
            "Placed {} circles ({} displaced, {} overlapping)",
            placed.len(),
            displaced,
            degraded
        );

        Ok(placed)
    }

    fn place_one(&self, marker: &MarkerPoint) -> PlacedCircle {
        let radius_m = marker.radius_m;
        let clearance = self.config.min_clearance_m;
        let (position, outcome) = search_position(&marker.position, radius_m, &self.config, |c| {
            self.index.overlaps(c, radius_m, clearance)
        });

        PlacedCircle {
            id: marker.id.clone(),
            base: marker.position,
            position,
            radius_m,
            outcome,
        }
    }
}
