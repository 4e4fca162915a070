use crate::data::property::{PermitType, Property, RiskLevel};
use serde::{Deserialize, Serialize};

/// Marker icon style: color by permit type, opacity by risk level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub fill_color: String,
    pub fill_opacity: f32,
    pub stroke_color: String,
    pub stroke_weight: f32,
    pub scale: f32,
}

impl MarkerStyle {
    pub fn for_property(permit_type: PermitType, risk_level: RiskLevel) -> Self {
        let fill_color = match permit_type {
            PermitType::Residential => "#7c3aed",
            PermitType::Commercial => "#3b82f6",
        };
        let fill_opacity = match risk_level {
            RiskLevel::Low => 0.7,
            RiskLevel::Medium => 0.85,
            RiskLevel::High => 1.0,
        };

        Self {
            fill_color: fill_color.to_string(),
            fill_opacity,
            ..Default::default()
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            fill_color: "#7c3aed".to_string(),
            fill_opacity: 1.0,
            stroke_color: "#ffffff".to_string(),
            stroke_weight: 2.0,
            scale: 10.0,
        }
    }
}

/// Style of the risk circle drawn around a marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleStyle {
    pub fill_color: String,
    pub fill_opacity: f32,
    pub stroke_color: String,
    pub stroke_opacity: f32,
    pub stroke_weight: f32,
}

impl CircleStyle {
    pub fn for_risk(risk_level: RiskLevel) -> Self {
        let color = match risk_level {
            RiskLevel::Low => "#16a34a",
            RiskLevel::Medium => "#d97706",
            RiskLevel::High => "#dc2626",
        };

        Self {
            fill_color: color.to_string(),
            stroke_color: color.to_string(),
            ..Default::default()
        }
    }
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self {
            fill_color: "#6b7280".to_string(),
            fill_opacity: 0.2,
            stroke_color: "#6b7280".to_string(),
            stroke_opacity: 0.8,
            stroke_weight: 1.0,
        }
    }
}

/// Everything a renderer needs to draw one property
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub marker: MarkerStyle,
    pub circle: CircleStyle,
}

impl From<&Property> for OverlayStyle {
    fn from(property: &Property) -> Self {
        Self {
            marker: MarkerStyle::for_property(property.permit_type, property.risk_level),
            circle: CircleStyle::for_risk(property.risk_level),
        }
    }
}
