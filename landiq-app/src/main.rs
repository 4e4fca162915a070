use anyhow::{Context, Result};
use clap::Parser;
use landiq::{
    core::constants::DEFAULT_DISPLAY_RADIUS_M,
    layers::{marker::PlacementPass, style::OverlayStyle},
    spatial::placement::PlacedCircle,
    MarkerLayer, PlacementConfig, PlacementProfile, Property,
};
use serde::Serialize;
use std::{
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

#[derive(Parser, Debug)]
#[command(
    name = "landiq-app",
    version,
    about = "Place non-overlapping risk circles for saved LandIQ properties"
)]
struct Args {
    /// Properties JSON array, or '-' for stdin
    #[arg(short = 'i', long = "input", default_value = "-")]
    input: PathBuf,

    /// Output file for the placements. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Placement config JSON file; overrides --profile
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Preset: balanced, dense or sparse
    #[arg(short = 'p', long = "profile", default_value = "balanced")]
    profile: String,

    /// Risk-circle radius in meters
    #[arg(short = 'r', long = "radius", default_value_t = DEFAULT_DISPLAY_RADIUS_M)]
    radius: f64,

    /// Use the R-tree overlap index instead of a linear scan
    #[arg(long = "rtree")]
    rtree: bool,
}

/// One rendered property in the JSON output
#[derive(Serialize)]
struct PlacementRecord<'a> {
    #[serde(flatten)]
    circle: &'a PlacedCircle,
    displacement_m: f64,
    style: &'a OverlayStyle,
}

#[derive(Serialize)]
struct PlacementReport<'a> {
    generation: u64,
    config: &'a PlacementConfig,
    degraded: usize,
    placements: Vec<PlacementRecord<'a>>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let properties = read_properties(&args.input)?;
    log::info!(
        "Loaded {} properties from {}",
        properties.len(),
        args.input.display()
    );

    let pass = run_pass(&args, config.clone(), properties)?;
    let report = PlacementReport {
        generation: pass.generation,
        config: &config,
        degraded: pass.degraded_count(),
        placements: pass
            .iter()
            .map(|(circle, style)| PlacementRecord {
                circle,
                displacement_m: circle.displacement_m(),
                style,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing placements to {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<PlacementConfig> {
    if let Some(path) = &args.config {
        return PlacementConfig::from_file(path)
            .with_context(|| format!("loading placement config {}", path.display()));
    }
    let profile: PlacementProfile = args.profile.parse()?;
    Ok(profile.resolve())
}

fn read_properties(input: &Path) -> Result<Vec<Property>> {
    if input == Path::new("-") {
        let mut json = String::new();
        io::stdin()
            .read_to_string(&mut json)
            .context("reading properties from stdin")?;
        return Ok(Property::list_from_json_str(&json)?);
    }
    Property::list_from_file(input)
        .with_context(|| format!("reading properties from {}", input.display()))
}

fn run_pass(
    args: &Args,
    config: PlacementConfig,
    properties: Vec<Property>,
) -> Result<PlacementPass> {
    if args.rtree {
        let mut layer = MarkerLayer::with_index(config, landiq::RTreeIndex::new())?
            .with_display_radius(args.radius)?;
        layer.set_properties(properties);
        Ok(layer.recompute()?)
    } else {
        let mut layer = MarkerLayer::new(config)?.with_display_radius(args.radius)?;
        layer.set_properties(properties);
        Ok(layer.recompute()?)
    }
}
