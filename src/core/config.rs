//! Configuration for the circle placement pass
//!
//! Tunables are grouped in [`PlacementConfig`]. Most callers pick one of the
//! [`PlacementProfile`] presets and only drop down to a custom config when a
//! map needs different spacing.

use crate::{
    core::constants::{
        DEFAULT_MAX_RINGS, DEFAULT_MIN_CLEARANCE_M, DEFAULT_RING_ANGLES, DEFAULT_RING_SPACING,
    },
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, str::FromStr};

#[derive(Debug, Clone, PartialEq)]
pub enum PlacementProfile {
    Balanced,
    Dense,
    Sparse,
    Custom(PlacementConfig),
}

impl PlacementProfile {
    pub fn resolve(&self) -> PlacementConfig {
        match self {
            Self::Balanced => PlacementConfig {
                min_clearance_m: DEFAULT_MIN_CLEARANCE_M,
                ring_angles: DEFAULT_RING_ANGLES,
                max_rings: DEFAULT_MAX_RINGS,
                ring_spacing: DEFAULT_RING_SPACING,
            },
            // Crowded downtown views: tighter gaps, more candidates per ring
            Self::Dense => PlacementConfig {
                min_clearance_m: 25.0,
                ring_angles: 16,
                max_rings: 5,
                ring_spacing: 2.1,
            },
            Self::Sparse => PlacementConfig {
                min_clearance_m: 100.0,
                ring_angles: 8,
                max_rings: 2,
                ring_spacing: 2.5,
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for PlacementProfile {
    fn default() -> Self {
        Self::Balanced
    }
}

impl FromStr for PlacementProfile {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balanced" | "default" => Ok(Self::Balanced),
            "dense" => Ok(Self::Dense),
            "sparse" => Ok(Self::Sparse),
            other => Err(MapError::UnknownProfile(other.to_string())),
        }
    }
}

/// Tunables for the non-overlapping placement search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Required gap between two circle edges, in meters
    pub min_clearance_m: f64,
    /// Equally spaced candidates per ring, starting due north
    pub ring_angles: u32,
    /// Rings tried before falling back to the base position
    pub max_rings: u32,
    /// Ring distance multiplier: ring `r` sits at `radius * ring_spacing * r`
    pub ring_spacing: f64,
}

impl PlacementConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.min_clearance_m.is_finite() || self.min_clearance_m < 0.0 {
            return Err(MapError::InvalidConfig(format!(
                "min_clearance_m must be a non-negative number, got {}",
                self.min_clearance_m
            )));
        }
        if self.ring_angles == 0 {
            return Err(MapError::InvalidConfig(
                "ring_angles must be at least 1".to_string(),
            ));
        }
        if !self.ring_spacing.is_finite() || self.ring_spacing <= 0.0 {
            return Err(MapError::InvalidConfig(format!(
                "ring_spacing must be positive, got {}",
                self.ring_spacing
            )));
        }
        Ok(())
    }

    /// Parses and validates a JSON config. Missing fields take the defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Angle step between neighbouring ring candidates, in radians
    pub fn angle_step(&self) -> f64 {
        std::f64::consts::TAU / self.ring_angles as f64
    }

    /// Distance of ring `ring` (1-based) from the base position
    pub fn ring_distance(&self, radius_m: f64, ring: u32) -> f64 {
        radius_m * self.ring_spacing * ring as f64
    }

    /// Upper bound on candidates tested for a single marker
    pub fn max_candidates(&self) -> usize {
        1 + (self.ring_angles as usize) * (self.max_rings as usize)
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        PlacementProfile::default().resolve()
    }
}
