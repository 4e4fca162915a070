//! # LandIQ
//!
//! Placement engine for the property map's risk-circle overlays.
//!
//! Every saved property is drawn as a marker with a fixed-radius circle around
//! it. Markers that sit close together would produce a pile of overlapping
//! circles, so each rendering pass nudges later circles outward along
//! concentric rings until they clear everything placed before them.

pub mod core;
pub mod data;
pub mod layers;
pub mod prelude;
pub mod spatial;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{PlacementConfig, PlacementProfile},
    geo::{haversine_distance, LatLng, LatLngBounds},
};

pub use crate::data::property::{PermitType, Property, RiskLevel};

pub use crate::layers::{
    marker::{MarkerLayer, PlacementPass},
    overlay::{OverlayManager, OverlayRenderer},
    style::MarkerStyle,
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

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    #[error("Invalid placement config: {0}")]
    InvalidConfig(String),

    #[error("Unknown placement profile: {0}")]
    UnknownProfile(String),
}

/// Error type alias for convenience
pub type Error = MapError;
