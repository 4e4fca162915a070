//! Prelude module for common landiq types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use landiq::prelude::*;`

pub use crate::core::{
    config::{PlacementConfig, PlacementProfile},
    constants::{DEFAULT_CENTER, DEFAULT_DISPLAY_RADIUS_M},
    geo::{haversine_distance, LatLng, LatLngBounds},
};

pub use crate::data::property::{PermitType, Property, RiskLevel};

pub use crate::layers::{
    marker::{MarkerLayer, PlacementPass},
    overlay::{OverlayManager, OverlayRenderer},
    style::{CircleStyle, MarkerStyle, OverlayStyle},
};

pub use crate::spatial::{
    index::{LinearIndex, OverlapIndex},
    placement::{
        find_non_overlapping_position, overlaps, place_circles, CirclePlacer, MarkerPoint,
        PlacedCircle, PlacementOutcome,
    },
};

#[cfg(feature = "rtree")]
pub use crate::spatial::index::RTreeIndex;

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
