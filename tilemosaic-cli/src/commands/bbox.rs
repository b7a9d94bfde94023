//! Bbox command - print the tile grid covering a set of points.
//!
//! Pure arithmetic: nothing is fetched or written.

use tilemosaic::bbox::{BoundingBox, BoundingBoxCalculator};
use tilemosaic::pad::PadPlan;
use tilemosaic::render::RoutePoint;

use super::common::{resolve_mosaic, resolve_zoom_range};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the bbox command.
pub struct BboxArgs {
    pub points: Vec<RoutePoint>,
    /// Fixed zoom; when absent the highest fitting zoom is selected.
    pub zoom: Option<u8>,
    pub min_zoom: Option<u8>,
    pub max_zoom: Option<u8>,
    pub target_size: Option<u32>,
}

/// Run the bbox command.
pub fn run(runner: &CliRunner, args: BboxArgs) -> Result<(), CliError> {
    runner.log_startup("bbox");
    let config = runner.config();
    let mosaic = resolve_mosaic(config, args.target_size, None);
    mosaic.validate()?;

    let calculator =
        BoundingBoxCalculator::new(mosaic.tile_size(), mosaic.trim_margin(), runner.logger());
    let coordinates: Vec<(f64, f64)> = args.points.iter().map(|p| (p.lat, p.lon)).collect();

    let bbox = match args.zoom {
        Some(zoom) => calculator.compute_for_points(&coordinates, zoom)?,
        None => {
            let (min_zoom, max_zoom) = resolve_zoom_range(config, args.min_zoom, args.max_zoom);
            let (_, bbox) = calculator.select_zoom(
                &coordinates,
                min_zoom,
                max_zoom,
                mosaic.target_size() as usize,
            )?;
            bbox
        }
    };

    print_grid("Grid", &bbox);
    println!();

    match PadPlan::classify(&bbox, mosaic.target_size()) {
        Ok(plan) if plan.strategy().is_terminal() => {
            println!("Padding: {} (nothing to do)", plan.strategy());
        }
        Ok(plan) => {
            let (west, east, north, south) = plan.halves();
            println!("Padding: {}", plan.strategy());
            println!(
                "  Half tiles: west {}, east {}, north {}, south {}",
                west, east, north, south
            );
            println!();
            print_grid("Next grid", &plan.successor(&bbox)?);
        }
        Err(e) => println!("Padding: not possible ({})", e),
    }

    Ok(())
}

fn print_grid(title: &str, bbox: &BoundingBox) {
    let edges = bbox.edges();
    println!("{}", title);
    println!("  Zoom:    {}", bbox.zoom());
    println!("  Size:    {} x {} tiles", bbox.width(), bbox.height());
    println!("  Columns: {:?}", bbox.columns());
    println!("  Rows:    {:?}", bbox.rows());
    println!("  North:   {:.6}", edges.north);
    println!("  South:   {:.6}", edges.south);
    println!("  West:    {:.6}", edges.west);
    println!("  East:    {:.6}", edges.east);
}
