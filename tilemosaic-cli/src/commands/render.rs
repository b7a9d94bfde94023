//! Render command - assemble, pad and annotate mosaics for a set of points.

use std::path::PathBuf;
use std::time::Instant;

use tilemosaic::render::{RenderRequest, RoutePoint};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::common::{resolve_mosaic, resolve_zoom_range};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the render command.
pub struct RenderArgs {
    pub name: String,
    pub points: Vec<RoutePoint>,
    pub output: Option<PathBuf>,
    pub levels: Option<u32>,
    pub format: Option<String>,
    pub min_zoom: Option<u8>,
    pub max_zoom: Option<u8>,
    pub target_size: Option<u32>,
    pub parallel: Option<usize>,
    pub resize: Option<(u32, u32)>,
    pub no_route: bool,
}

/// Run the render command.
pub fn run(runner: &CliRunner, args: RenderArgs) -> Result<(), CliError> {
    runner.log_startup("render");
    let config = runner.config();
    let renderer = runner.renderer(resolve_mosaic(config, args.target_size, args.parallel))?;

    let mut points = args.points;
    if !runner.has_font() && points.iter().any(|p| p.label.is_some()) {
        warn!("No font configured; route labels are not drawn");
        println!("No [output] font configured, labels will be skipped.");
        for point in &mut points {
            point.label = None;
        }
    }

    let (min_zoom, max_zoom) = resolve_zoom_range(config, args.min_zoom, args.max_zoom);
    let mut request = RenderRequest::from_config(args.name, points, config)
        .with_zoom_range(min_zoom, max_zoom)
        .with_route(!args.no_route);
    if let Some(output) = args.output {
        request.output_dir = output;
    }
    if let Some(levels) = args.levels {
        request = request.with_refinement_levels(levels);
    }
    if let Some(format) = args.format {
        request = request.with_format(format);
    }
    if let Some((width, height)) = args.resize {
        request = request.with_resize(width, height);
    }

    println!(
        "Rendering '{}' ({} points, {} refinement level(s))...",
        request.name,
        request.points.len(),
        request.refinement_levels
    );
    let start = Instant::now();

    let result = renderer.render(&request, &CancellationToken::new())?;

    println!("Rendered in {:.2}s", start.elapsed().as_secs_f64());
    println!();
    for level in &result.levels {
        println!("Level {} (zoom {}): {}", level.level, level.zoom, level.path.display());
        if let Some(strategy) = level.strategy {
            println!("  Padding: {}", strategy);
        }
        println!(
            "  Edges:   N {:.6}  S {:.6}  W {:.6}  E {:.6}",
            level.edges.north, level.edges.south, level.edges.west, level.edges.east
        );
    }

    Ok(())
}
