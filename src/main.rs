//! mc-slime-scan: streaming slime chunk finder.
//!
//! Scans a square of chunks around a center point, classifies each chunk
//! with the vanilla slime chunk algorithm, and streams matches to a text
//! file without ever holding the result set in memory. A second subcommand
//! post-processes a saved scan to find the best farming window.

mod analyze;
mod chunk;
mod rng;
mod scan;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use crate::chunk::ChunkPos;
use crate::scan::{LogProgress, ScanRegion};

#[derive(Parser)]
#[command(name = "mc-slime-scan", about = "Streaming slime chunk finder and area analyzer")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a square region around a center chunk and save matches to a file
    Scan {
        /// World seed
        #[arg(long, env = "SEED", default_value = "0", allow_hyphen_values = true)]
        seed: i64,

        /// Center chunk X coordinate
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        center_x: i32,

        /// Center chunk Z coordinate
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        center_z: i32,

        /// Scan radius in chunks; the region is (2*radius+1)^2 chunks
        #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..))]
        radius: i32,

        /// Output file
        #[arg(short, long, default_value = "slime_chunks.txt")]
        output: PathBuf,
    },

    /// Find the window with the most (or fewest) slime chunks in a saved scan
    Analyze {
        /// Scan output file to analyze
        #[arg(short, long, default_value = "slime_chunks.txt")]
        input: PathBuf,

        /// Window width in chunks
        #[arg(long, default_value = "17", value_parser = clap::value_parser!(u32).range(1..))]
        width: u32,

        /// Window height in chunks
        #[arg(long, default_value = "17", value_parser = clap::value_parser!(u32).range(1..))]
        height: u32,

        /// Maximize or minimize slime chunks inside the window
        #[arg(long, value_enum, default_value_t = analyze::Mode::Max)]
        mode: analyze::Mode,

        /// Only consider windows whose corner coordinates divide by this
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        align: u32,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Scan {
            seed,
            center_x,
            center_z,
            radius,
            output,
        } => {
            let region = ScanRegion::new(ChunkPos::new(center_x, center_z), radius);
            log::info!(
                "Scanning {} chunks around ({},{}) with seed {}",
                region.chunk_count(),
                center_x,
                center_z,
                seed
            );

            let file = File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            let mut sink = BufWriter::new(file);
            let total = scan::scan(seed, region, &mut sink, &mut LogProgress)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            println!(
                "Found {} slime chunks, results saved to {}",
                total,
                output.display()
            );
        }

        Command::Analyze {
            input,
            width,
            height,
            mode,
            align,
        } => {
            let file = File::open(&input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let chunks = analyze::parse_matches(BufReader::new(file))?;
            if chunks.is_empty() {
                bail!("No slime chunks listed in {}", input.display());
            }
            log::info!("Loaded {} slime chunks from {}", chunks.len(), input.display());

            let Some(best) = analyze::best_window(&chunks, width, height, mode, align) else {
                bail!("Scanned area is smaller than the requested window (or no corner satisfies --align)");
            };

            println!(
                "Best {}x{} window corner: chunk ({},{}) with {} slime chunks",
                width, height, best.corner.x, best.corner.z, best.count
            );
            for chunk in &best.chunks {
                let (bx1, bz1, bx2, bz2) = chunk.block_bounds();
                println!(
                    "Chunk ({},{}) - Blocks ({},{}) to ({},{})",
                    chunk.x, chunk.z, bx1, bz1, bx2, bz2
                );
            }
        }
    }

    Ok(())
}
