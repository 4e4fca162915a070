//! Engine-wide defaults for the marker map and the circle placement pass.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// Mean Earth radius used by the haversine distance, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Minimum gap between the edges of two placed circles, in meters.
pub const DEFAULT_MIN_CLEARANCE_M: f64 = 50.0;

/// Candidate positions sampled on each ring (45° apart).
pub const DEFAULT_RING_ANGLES: u32 = 8;

/// Rings tried before giving up and keeping the base position.
pub const DEFAULT_MAX_RINGS: u32 = 3;

/// Ring distance as a multiple of the circle radius, per ring index.
pub const DEFAULT_RING_SPACING: f64 = 2.2;

/// Risk-circle radius drawn around each property marker, in meters.
pub const DEFAULT_DISPLAY_RADIUS_M: f64 = 150.0;

/// Map center used when nothing has been searched yet (San Francisco).
pub const DEFAULT_CENTER: (f64, f64) = (37.7749, -122.4194);
