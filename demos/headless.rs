use landiq::prelude::*;

/// Example of running a placement pass without any map widget
fn main() -> landiq::Result<()> {
    println!("🗺️ LandIQ Headless Placement Example");
    println!("=====================================");

    let (lat, lng) = DEFAULT_CENTER;
    let center = LatLng::try_new(lat, lng)?;

    // A few saved searches clustered around the default center
    let offsets = [
        (0.0, 0.0, PermitType::Residential, RiskLevel::Low),
        (0.00005, -0.00005, PermitType::Residential, RiskLevel::Medium),
        (0.0, 0.0001, PermitType::Commercial, RiskLevel::High),
        (0.004, 0.003, PermitType::Commercial, RiskLevel::Low),
    ];

    let properties: Vec<Property> = offsets
        .iter()
        .enumerate()
        .map(|(i, (d_lat, d_lng, permit_type, risk_level))| Property {
            id: format!("demo-{}", i + 1),
            address: format!("{} Market Street, San Francisco, CA", 100 + i * 50),
            estimated_days: 45,
            permit_type: *permit_type,
            confidence: 85,
            risk_level: *risk_level,
            search_date: None,
            lat: Some(center.lat + d_lat),
            lng: Some(center.lng + d_lng),
        })
        .collect();

    let mut layer = MarkerLayer::new(PlacementProfile::Balanced.resolve())?;
    layer.set_properties(properties);
    println!("✅ Loaded {} properties", layer.properties().len());

    let pass = layer.recompute()?;
    println!("\n📍 Placement pass {}:", pass.generation);
    for (circle, style) in pass.iter() {
        let outcome = match circle.outcome {
            PlacementOutcome::Unmoved => "unmoved".to_string(),
            PlacementOutcome::Displaced { ring, angle_index } => {
                format!("ring {} / angle {}", ring, angle_index)
            }
            PlacementOutcome::Fallback => "overlapping (no free spot)".to_string(),
        };
        println!(
            "   {} - ({:.6}, {:.6}) moved {:.1} m [{}] fill {}",
            circle.id,
            circle.position.lat,
            circle.position.lng,
            circle.displacement_m(),
            outcome,
            style.circle.fill_color
        );
    }

    // Shrinking the circles triggers a fresh pass
    println!("\n🔍 Shrinking circles to 40 m:");
    layer.set_display_radius(40.0)?;
    let pass = layer.recompute()?;
    let moved = pass.circles.iter().filter(|c| c.is_displaced()).count();
    println!("   Pass {}: {} of {} circles displaced", pass.generation, moved, pass.len());

    if let Some(bounds) = pass.bounds() {
        let c = bounds.center();
        println!("\n📊 Fit view around ({:.6}, {:.6})", c.lat, c.lng);
    }

    println!("\n✅ Headless example completed successfully!");
    Ok(())
}
