pub mod config;
pub mod constants;
pub mod geo;

pub use config::{PlacementConfig, PlacementProfile};
pub use geo::{haversine_distance, LatLng, LatLngBounds};
