pub mod index;
pub mod placement;

// Re-export main types
pub use index::{LinearIndex, OverlapIndex};
pub use placement::{
    find_non_overlapping_position, overlaps, place_circles, CirclePlacer, MarkerPoint,
    PlacedCircle, PlacementOutcome,
};

#[cfg(feature = "rtree")]
pub use index::RTreeIndex;
