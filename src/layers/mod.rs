pub mod marker;
pub mod overlay;
pub mod style;

pub use marker::{MarkerLayer, PlacementPass};
pub use overlay::{OverlayManager, OverlayRenderer};
pub use style::{CircleStyle, MarkerStyle, OverlayStyle};
