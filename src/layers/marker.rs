use crate::{
    core::{
        config::PlacementConfig,
        constants::DEFAULT_DISPLAY_RADIUS_M,
        geo::{LatLng, LatLngBounds},
    },
    data::property::{PermitType, Property},
    layers::style::OverlayStyle,
    spatial::{
        index::{LinearIndex, OverlapIndex},
        placement::{CirclePlacer, PlacedCircle},
    },
    MapError, Result,
};

/// Output of one [`MarkerLayer::recompute`] call.
///
/// `circles` and `styles` are index-aligned and follow the layer's property
/// order. Passes are never merged; a newer generation replaces an older one
/// wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementPass {
    pub generation: u64,
    pub circles: Vec<PlacedCircle>,
    pub styles: Vec<OverlayStyle>,
}

impl PlacementPass {
    pub fn iter(&self) -> impl Iterator<Item = (&PlacedCircle, &OverlayStyle)> {
        self.circles.iter().zip(self.styles.iter())
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PlacedCircle> {
        self.circles.iter().find(|c| c.id == id)
    }

    /// Bounds covering every rendered circle center, for fitting the view
    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(self.circles.iter().map(|c| &c.position))
    }

    pub fn degraded_count(&self) -> usize {
        self.circles.iter().filter(|c| c.is_degraded()).count()
    }
}

/// Saved properties shown as markers with risk circles.
///
/// Any change to the property list, permit filter, display radius or config
/// marks the layer dirty; [`recompute`](Self::recompute) then reruns placement from scratch.
pub struct MarkerLayer<I: OverlapIndex = LinearIndex> {
    properties: Vec<Property>,
    /// Only properties with this permit type are placed; `None` shows all
    permit_filter: Option<PermitType>,
    display_radius_m: f64,
    placer: CirclePlacer<I>,
    generation: u64,
    dirty: bool,
}

impl MarkerLayer<LinearIndex> {
    pub fn new(config: PlacementConfig) -> Result<Self> {
        Self::with_index(config, LinearIndex::new())
    }
}

impl<I: OverlapIndex> MarkerLayer<I> {
    pub fn with_index(config: PlacementConfig, index: I) -> Result<Self> {
        Ok(Self {
            properties: Vec::new(),
            permit_filter: None,
            display_radius_m: DEFAULT_DISPLAY_RADIUS_M,
            placer: CirclePlacer::with_index(config, index)?,
            generation: 0,
            dirty: true,
        })
    }

    pub fn with_display_radius(mut self, radius_m: f64) -> Result<Self> {
        self.set_display_radius(radius_m)?;
        Ok(self)
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn permit_filter(&self) -> Option<PermitType> {
        self.permit_filter
    }

    pub fn display_radius(&self) -> f64 {
        self.display_radius_m
    }

    pub fn config(&self) -> &PlacementConfig {
        self.placer.config()
    }

    /// Generation of the most recent pass, 0 before the first one
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn needs_recompute(&self) -> bool {
        self.dirty
    }

    /// Replaces the whole property list
    pub fn set_properties(&mut self, properties: Vec<Property>) {
        self.properties = properties;
        self.dirty = true;
    }

    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
        self.dirty = true;
    }

    pub fn remove_property(&mut self, id: &str) -> Option<Property> {
        let pos = self.properties.iter().position(|p| p.id == id)?;
        self.dirty = true;
        Some(self.properties.remove(pos))
    }

    /// Restricts the map to one permit type, or shows everything with `None`
    pub fn set_permit_filter(&mut self, filter: Option<PermitType>) {
        if filter != self.permit_filter {
            self.permit_filter = filter;
            self.dirty = true;
        }
    }

    pub fn set_display_radius(&mut self, radius_m: f64) -> Result<()> {
        if !radius_m.is_finite() || radius_m < 0.0 {
            return Err(MapError::InvalidRadius(format!(
                "display radius {}",
                radius_m
            )));
        }
        if radius_m != self.display_radius_m {
            self.display_radius_m = radius_m;
            self.dirty = true;
        }
        Ok(())
    }

    pub fn set_config(&mut self, config: PlacementConfig) -> Result<()>
    where
        I: Default,
    {
        self.placer = CirclePlacer::with_index(config, I::default())?;
        self.dirty = true;
        Ok(())
    }

    /// Runs a fresh placement pass over every geocoded property that passes
    /// the permit filter.
    ///
    /// Properties without coordinates are left off the map. Coordinates out
    /// of range fail the whole pass.
    pub fn recompute(&mut self) -> Result<PlacementPass> {
        let mut markers = Vec::with_capacity(self.properties.len());
        let mut styles = Vec::with_capacity(self.properties.len());

        let shown = self
            .properties
            .iter()
            .filter(|p| self.permit_filter.map_or(true, |permit| p.permit_type == permit));

        for property in shown {
            if property.position().is_none() {
                log::warn!(
                    "Skipping property '{}' ({}): no coordinates",
                    property.id,
                    property.address
                );
                continue;
            }
            markers.push(property.to_marker(self.display_radius_m)?);
            styles.push(OverlayStyle::from(property));
        }

        let circles = self.placer.place_all(&markers)?;
        self.generation += 1;
        self.dirty = false;

        log::debug!(
            "Placement pass {} produced {} circles",
            self.generation,
            circles.len()
        );

        Ok(PlacementPass {
            generation: self.generation,
            circles,
            styles,
        })
    }

    /// Marker position of a property, ignoring any circle displacement
    pub fn marker_position(&self, id: &str) -> Option<LatLng> {
        self.properties
            .iter()
            .find(|p| p.id == id)
            .and_then(Property::position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::property::{PermitType, RiskLevel},
        spatial::placement::PlacementOutcome,
    };

    fn property(id: &str, lat: Option<f64>, lng: Option<f64>) -> Property {
        permit_property(id, PermitType::Residential, lat, lng)
    }

    fn permit_property(
        id: &str,
        permit_type: PermitType,
        lat: Option<f64>,
        lng: Option<f64>,
    ) -> Property {
        Property {
            id: id.to_string(),
            address: format!("{} Main Street", id),
            estimated_days: 45,
            permit_type,
            confidence: 85,
            risk_level: RiskLevel::Low,
            search_date: None,
            lat,
            lng,
        }
    }

    #[test]
    fn test_recompute_tracks_generation() {
        let mut layer = MarkerLayer::new(PlacementConfig::default()).unwrap();
        assert!(layer.needs_recompute());
        assert_eq!(layer.generation(), 0);

        layer.add_property(property("a", Some(37.7749), Some(-122.4194)));
        layer.add_property(property("b", Some(37.7749), Some(-122.4194)));

        let pass = layer.recompute().unwrap();
        assert_eq!(pass.generation, 1);
        assert_eq!(pass.len(), 2);
        assert_eq!(pass.styles.len(), 2);
        assert!(!layer.needs_recompute());
        assert_eq!(pass.circles[0].outcome, PlacementOutcome::Unmoved);
        assert!(pass.circles[1].is_displaced());

        layer.set_display_radius(150.0).unwrap();
        assert!(!layer.needs_recompute());

        layer.set_display_radius(80.0).unwrap();
        assert!(layer.needs_recompute());
        let pass = layer.recompute().unwrap();
        assert_eq!(pass.generation, 2);
        assert!(pass.circles.iter().all(|c| c.radius_m == 80.0));
    }

    #[test]
    fn test_properties_without_coordinates_are_skipped() {
        let mut layer = MarkerLayer::new(PlacementConfig::default()).unwrap();
        layer.set_properties(vec![
            property("a", Some(37.7749), Some(-122.4194)),
            property("pending", None, None),
            property("c", Some(37.80), Some(-122.40)),
        ]);

        let pass = layer.recompute().unwrap();
        assert_eq!(pass.len(), 2);
        assert!(pass.get("pending").is_none());
        assert!(pass.get("c").is_some());
        assert_eq!(layer.marker_position("c"), Some(LatLng::new(37.80, -122.40)));
    }

    #[test]
    fn test_out_of_range_property_fails_pass() {
        let mut layer = MarkerLayer::new(PlacementConfig::default()).unwrap();
        layer.add_property(property("bad", Some(137.0), Some(-122.4194)));

        assert!(matches!(
            layer.recompute(),
            Err(MapError::InvalidCoordinates(_))
        ));
        assert_eq!(layer.generation(), 0);
        assert!(layer.needs_recompute());
    }

    #[test]
    fn test_remove_property_and_bounds() {
        let mut layer = MarkerLayer::new(PlacementConfig::default()).unwrap();
        layer.set_properties(vec![
            property("a", Some(37.70), Some(-122.50)),
            property("b", Some(37.80), Some(-122.40)),
        ]);
        layer.recompute().unwrap();

        assert!(layer.remove_property("a").is_some());
        assert!(layer.remove_property("a").is_none());
        assert!(layer.needs_recompute());

        let pass = layer.recompute().unwrap();
        let bounds = pass.bounds().unwrap();
        assert_eq!(bounds.center(), LatLng::new(37.80, -122.40));
    }

    #[test]
    fn test_invalid_display_radius() {
        let layer = MarkerLayer::new(PlacementConfig::default()).unwrap();
        assert!(matches!(
            layer.with_display_radius(f64::NAN),
            Err(MapError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_set_config_marks_dirty() {
        let mut layer = MarkerLayer::new(PlacementConfig::default()).unwrap();
        layer.recompute().unwrap();

        let config = PlacementConfig {
            max_rings: 5,
            ..Default::default()
        };
        layer.set_config(config.clone()).unwrap();
        assert!(layer.needs_recompute());
        assert_eq!(layer.config(), &config);
    }

    #[test]
    fn test_permit_filter_changes_placement() {
        let mut layer = MarkerLayer::new(PlacementConfig::default()).unwrap();
        let (lat, lng) = (Some(37.7749), Some(-122.4194));
        layer.set_properties(vec![
            permit_property("home", PermitType::Residential, lat, lng),
            permit_property("shop", PermitType::Commercial, lat, lng),
            permit_property("flat", PermitType::Residential, lat, lng),
        ]);

        let all = layer.recompute().unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.get("shop").unwrap().is_displaced());
        assert_eq!(
            all.get("flat").unwrap().outcome,
            PlacementOutcome::Displaced {
                ring: 2,
                angle_index: 1
            }
        );

        layer.set_permit_filter(Some(PermitType::Commercial));
        assert!(layer.needs_recompute());
        let commercial = layer.recompute().unwrap();
        assert_eq!(commercial.generation, all.generation + 1);
        assert_eq!(commercial.len(), 1);
        assert_eq!(
            commercial.get("shop").unwrap().outcome,
            PlacementOutcome::Unmoved
        );

        layer.set_permit_filter(Some(PermitType::Residential));
        let residential = layer.recompute().unwrap();
        assert_eq!(residential.generation, commercial.generation + 1);
        assert!(residential.get("shop").is_none());
        assert_eq!(
            residential.get("flat").unwrap().outcome,
            PlacementOutcome::Displaced {
                ring: 2,
                angle_index: 0
            }
        );

        layer.set_permit_filter(Some(PermitType::Residential));
        assert!(!layer.needs_recompute());

        layer.set_permit_filter(None);
        assert_eq!(layer.recompute().unwrap().len(), 3);
        assert_eq!(layer.permit_filter(), None);
    }
}
