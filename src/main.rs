//! Worldforge CLI - deterministic procedural world generator.
//!
//! Generates a full world grid (tectonics, erosion, climate, hydrology,
//! biomes, ore detail) from a single seed and reports a summary, an embark
//! site, and optional PNG previews.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use worldforge::export::{export_biome_png, export_elevation_png};
use worldforge::{WorldGenParams, WorldGenerator, WorldMap};

/// Deterministic procedural world generator.
#[derive(Parser)]
#[command(name = "worldforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new world.
    Generate {
        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Square map dimension in cells.
        #[arg(short, long, default_value = "257")]
        map_size: usize,

        /// Number of tectonic plates.
        #[arg(short, long, default_value = "12")]
        plates: usize,

        /// Hydraulic erosion droplet budget.
        #[arg(short, long, default_value = "500000")]
        droplets: usize,

        /// Embark window side length.
        #[arg(short, long, default_value = "50")]
        embark_size: usize,

        /// Output directory for exported maps.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Export a 16-bit elevation PNG.
        #[arg(long)]
        elevation_map: bool,

        /// Export an RGB biome PNG.
        #[arg(long)]
        biome_map: bool,

        /// Suppress per-stage progress output.
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            seed,
            map_size,
            plates,
            droplets,
            embark_size,
            output,
            elevation_map,
            biome_map,
            quiet,
        } => {
            let seed = seed.unwrap_or_else(|| {
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0)
            });
            let params = WorldGenParams {
                seed,
                map_size,
                plate_count: plates,
                erosion_droplets: droplets,
                embark_size,
            };

            println!("Generating world (seed {seed}, {map_size}x{map_size}, {plates} plates)...");
            let started = Instant::now();

            let generator = WorldGenerator::new(params);
            let map = match generator.generate_with_progress(|stage| {
                if !quiet {
                    println!("  {stage}");
                }
            }) {
                Ok(map) => map,
                Err(e) => {
                    eprintln!("generation failed: {e}");
                    return ExitCode::FAILURE;
                }
            };

            println!("Done in {:.2}s", started.elapsed().as_secs_f32());
            print_summary(&map);

            let region = generator.find_embark_site(&map);
            let (x0, y0, x1, y1) = region.bounds();
            println!(
                "Embark site: center ({}, {}), window [{}..{}) x [{}..{})",
                region.center_x, region.center_y, x0, x1, y0, y1
            );

            if elevation_map || biome_map {
                if let Err(e) = std::fs::create_dir_all(&output) {
                    eprintln!("cannot create output directory: {e}");
                    return ExitCode::FAILURE;
                }
            }
            if elevation_map {
                let path = output.join(format!("world_{seed}_elevation.png"));
                match export_elevation_png(&map, &path) {
                    Ok(()) => println!("Wrote {}", path.display()),
                    Err(e) => {
                        eprintln!("elevation export failed: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            }
            if biome_map {
                let path = output.join(format!("world_{seed}_biomes.png"));
                match export_biome_png(&map, &path) {
                    Ok(()) => println!("Wrote {}", path.display()),
                    Err(e) => {
                        eprintln!("biome export failed: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            }

            ExitCode::SUCCESS
        }
    }
}

fn print_summary(map: &WorldMap) {
    let (min, max) = map.elevation_range();
    println!(
        "  elevation range {:.3}..{:.3}, land {:.1}%",
        min,
        max,
        map.land_fraction(0.30) * 100.0
    );
    println!(
        "  {} plates, {} river cells",
        map.plates.len(),
        map.river_cell_count()
    );

    let histogram = map.biome_histogram();
    let total = map.cells().len().max(1) as f32;
    print!("  biomes:");
    for (biome, count) in histogram.iter().take(6) {
        print!(" {:?} {:.1}%", biome, *count as f32 / total * 100.0);
    }
    println!();
}
