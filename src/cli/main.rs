//! Command-line front end: build one boundary and print it as GeoJSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mapbound::config::Config;
use mapbound::{build_boundary, BoundaryOptions, GeoPoint, NominatimGeocoder, Query};

#[derive(Parser, Debug)]
#[command(name = "mapbound")]
#[command(about = "Build a circular or square map boundary around a location")]
struct Args {
    /// Address or OSM id to geocode
    #[arg(required_unless_present = "lon", conflicts_with_all = ["lon", "lat"])]
    query: Option<String>,

    /// Longitude of the centre point
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Latitude of the centre point
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Circle radius or square half-width, in metres
    #[arg(short, long)]
    radius: f64,

    /// Build a circle instead of a square
    #[arg(short, long)]
    circular: bool,

    /// Square rotation in degrees, counter-clockwise
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    rotation: f64,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn to_query(&self) -> Result<Query> {
        match (&self.query, self.lon, self.lat) {
            (_, Some(lon), Some(lat)) => Ok(Query::Coordinates(GeoPoint::new(lon, lat))),
            (Some(text), _, _) => Ok(Query::parse(text)?),
            _ => anyhow::bail!("Either a query or --lon/--lat is required"),
        }
    }

    fn options(&self) -> BoundaryOptions {
        BoundaryOptions {
            radius: self.radius,
            is_circular: self.circular,
            rotation_degrees: self.rotation,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    let query = args.to_query()?;
    let geocoder =
        NominatimGeocoder::new(&config.geocoder).context("Failed to create geocoder")?;

    let boundary = build_boundary(&geocoder, &query, &args.options()).await?;
    info!(
        "Built {} boundary with {} vertices",
        if args.circular { "circular" } else { "square" },
        boundary.polygon().exterior().0.len()
    );

    println!("{}", serde_json::to_string_pretty(&boundary.to_geojson())?);

    Ok(())
}
