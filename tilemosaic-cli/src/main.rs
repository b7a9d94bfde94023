//! TileMosaic CLI - Command-line interface
//!
//! This binary provides a command-line interface to the TileMosaic library.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tilemosaic::render::RoutePoint;

use commands::bbox::BboxArgs;
use commands::common::{parse_point, parse_size};
use commands::render::RenderArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "tilemosaic")]
#[command(version = tilemosaic::VERSION)]
#[command(about = "Build square, annotated map mosaics from slippy-map tiles", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.tilemosaic/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the tile grid covering a set of points
    Bbox {
        /// Point as LAT,LON (repeat for more points)
        #[arg(long = "point", required = true, value_parser = parse_point)]
        points: Vec<RoutePoint>,

        /// Zoom level (default: highest zoom that fits the target size)
        #[arg(long)]
        zoom: Option<u8>,

        /// Lowest zoom considered when selecting a zoom
        #[arg(long)]
        min_zoom: Option<u8>,

        /// Highest zoom considered when selecting a zoom
        #[arg(long)]
        max_zoom: Option<u8>,

        /// Side of the square mosaic, in tiles
        #[arg(long)]
        target_size: Option<u32>,
    },

    /// Render mosaics for a set of points
    Render {
        /// Name used for the output files (<name>_<level>.<format>)
        #[arg(long)]
        name: String,

        /// Point as LAT,LON[,LABEL] (repeat for more points, in route order)
        #[arg(long = "point", required = true, value_parser = parse_point)]
        points: Vec<RoutePoint>,

        /// Output folder (default: image_folder from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Refinement levels after the base mosaic
        #[arg(long)]
        levels: Option<u32>,

        /// Image format of the final files (png, jpg, bmp, tiff, webp)
        #[arg(long)]
        format: Option<String>,

        /// Lowest zoom considered when selecting a zoom
        #[arg(long)]
        min_zoom: Option<u8>,

        /// Highest zoom considered when selecting a zoom
        #[arg(long)]
        max_zoom: Option<u8>,

        /// Side of the square mosaic, in tiles
        #[arg(long)]
        target_size: Option<u32>,

        /// Number of tiles fetched at once
        #[arg(long)]
        parallel: Option<usize>,

        /// Resample every level to WIDTHxHEIGHT pixels
        #[arg(long, value_parser = parse_size)]
        resize: Option<(u32, u32)>,

        /// Do not draw the route
        #[arg(long)]
        no_route: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => commands::init::run(config_path, force),
        Commands::Bbox {
            points,
            zoom,
            min_zoom,
            max_zoom,
            target_size,
        } => {
            let runner = CliRunner::new(config_path)?;
            commands::bbox::run(
                &runner,
                BboxArgs {
                    points,
                    zoom,
                    min_zoom,
                    max_zoom,
                    target_size,
                },
            )
        }
        Commands::Render {
            name,
            points,
            output,
            levels,
            format,
            min_zoom,
            max_zoom,
            target_size,
            parallel,
            resize,
            no_route,
        } => {
            let runner = CliRunner::new(config_path)?;
            commands::render::run(
                &runner,
                RenderArgs {
                    name,
                    points,
                    output,
                    levels,
                    format,
                    min_zoom,
                    max_zoom,
                    target_size,
                    parallel,
                    resize,
                    no_route,
                },
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_arguments() {
        let cli = Cli::try_parse_from([
            "tilemosaic",
            "render",
            "--name",
            "circuit",
            "--point",
            "51.4775,-0.4614,EGLL",
            "--point",
            "51.1537,-0.1821",
            "--resize",
            "800x800",
            "--config",
            "/tmp/tilemosaic.ini",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/tilemosaic.ini")));
        match cli.command {
            Commands::Render {
                name,
                points,
                resize,
                no_route,
                ..
            } => {
                assert_eq!(name, "circuit");
                assert_eq!(points.len(), 2);
                assert_eq!(points[0].label.as_deref(), Some("EGLL"));
                assert_eq!(resize, Some((800, 800)));
                assert!(!no_route);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_points_are_required() {
        assert!(Cli::try_parse_from(["tilemosaic", "bbox"]).is_err());
        assert!(Cli::try_parse_from(["tilemosaic", "bbox", "--point", "abc,0"]).is_err());
    }
}
