//! Saved property records and their conversion into placement markers

use crate::{core::geo::LatLng, spatial::placement::MarkerPoint, MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermitType {
    Residential,
    Commercial,
}

impl std::fmt::Display for PermitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermitType::Residential => write!(f, "residential"),
            PermitType::Commercial => write!(f, "commercial"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// A property saved from a search, as stored in the properties collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(default)]
    pub id: String,
    pub address: String,
    /// Predicted permit processing time
    pub estimated_days: u32,
    pub permit_type: PermitType,
    /// Prediction confidence, 0-100
    pub confidence: u8,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub search_date: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl Property {
    /// Marker position, if the record has been geocoded
    pub fn position(&self) -> Option<LatLng> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            _ => None,
        }
    }

    /// Builds the placement input for this property's risk circle.
    ///
    /// Records without coordinates cannot be placed and are rejected.
    pub fn to_marker(&self, radius_m: f64) -> Result<MarkerPoint> {
        let position = self.position().ok_or_else(|| {
            MapError::InvalidCoordinates(format!(
                "property '{}' ({}) has no coordinates",
                self.id, self.address
            ))
        })?;
        let marker = MarkerPoint::new(self.id.clone(), position, radius_m);
        marker.validate()?;
        Ok(marker)
    }

    /// Parses a JSON array of property records
    pub fn list_from_json_str(json: &str) -> Result<Vec<Property>> {
        let mut properties: Vec<Property> = serde_json::from_str(json)?;
        assign_missing_ids(&mut properties);
        Ok(properties)
    }

    pub fn list_from_file(path: impl AsRef<Path>) -> Result<Vec<Property>> {
        let json = std::fs::read_to_string(path)?;
        Self::list_from_json_str(&json)
    }
}

/// Records exported without a document id get a positional one so overlay
/// handles stay addressable.
fn assign_missing_ids(properties: &mut [Property]) {
    for (i, property) in properties.iter_mut().enumerate() {
        if property.id.is_empty() {
            property.id = format!("property-{}", i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "id": "abc123",
            "address": "123 Main Street, San Francisco, CA 94105",
            "estimatedDays": 30,
            "permitType": "residential",
            "confidence": 92,
            "riskLevel": "low",
            "searchDate": "2024-05-10",
            "lat": 37.7749,
            "lng": -122.4194
        },
        {
            "address": "789 Mission Street, San Francisco, CA 94107",
            "estimatedDays": 60,
            "permitType": "commercial",
            "confidence": 78,
            "riskLevel": "medium"
        }
    ]"#;

    #[test]
    fn test_parse_property_list() {
        let properties = Property::list_from_json_str(SAMPLE).unwrap();
        assert_eq!(properties.len(), 2);

        let first = &properties[0];
        assert_eq!(first.id, "abc123");
        assert_eq!(first.permit_type, PermitType::Residential);
        assert_eq!(first.risk_level, RiskLevel::Low);
        assert_eq!(first.search_date.as_deref(), Some("2024-05-10"));
        assert_eq!(first.position(), Some(LatLng::new(37.7749, -122.4194)));

        let second = &properties[1];
        assert_eq!(second.id, "property-1");
        assert_eq!(second.permit_type, PermitType::Commercial);
        assert!(second.position().is_none());
    }

    #[test]
    fn test_to_marker() {
        let properties = Property::list_from_json_str(SAMPLE).unwrap();

        let marker = properties[0].to_marker(150.0).unwrap();
        assert_eq!(marker.id, "abc123");
        assert_eq!(marker.radius_m, 150.0);

        assert!(matches!(
            properties[1].to_marker(150.0),
            Err(MapError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            properties[0].to_marker(-1.0),
            Err(MapError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(PermitType::Commercial.to_string(), "commercial");
        assert_eq!(RiskLevel::High.to_string(), "high");
    }

    #[test]
    fn test_unknown_permit_type_rejected() {
        let json = r#"[{ "address": "x", "estimatedDays": 1, "permitType": "industrial",
                         "confidence": 50, "riskLevel": "low" }]"#;
        assert!(matches!(
            Property::list_from_json_str(json),
            Err(MapError::Serialization(_))
        ));
    }
}
