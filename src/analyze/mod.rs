//! Post-scan area analysis.
//!
//! Reads a saved scan back and searches for the fixed-size window holding
//! the most (or fewest) slime chunks. A 2D prefix-sum matrix over the
//! bounding box makes each candidate window an O(1) query.

use std::io::BufRead;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::chunk::ChunkPos;

/// Whether to maximize or minimize slime chunks inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Max,
    Min,
}

/// Parse the `Chunk (x,z)` coordinates out of a scan output file.
///
/// Header, separator, and summary lines contribute nothing; only match
/// lines carry coordinates.
pub fn parse_matches<R: BufRead>(reader: R) -> Result<Vec<ChunkPos>> {
    let mut chunks = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read scan file")?;
        if let Some(pos) = parse_match_line(&line) {
            chunks.push(pos);
        }
    }
    Ok(chunks)
}

/// Extract `(x, z)` from a line of the form `Chunk (x,z) - ...`.
fn parse_match_line(line: &str) -> Option<ChunkPos> {
    let rest = line.strip_prefix("Chunk (")?;
    let (coords, _) = rest.split_once(')')?;
    let (x, z) = coords.split_once(',')?;
    Some(ChunkPos::new(x.parse().ok()?, z.parse().ok()?))
}

/// Dense 0/1 occupancy grid with 2D prefix sums over the bounding box of a
/// chunk set.
struct PrefixGrid {
    min_x: i32,
    min_z: i32,
    width: usize,
    height: usize,
    // (width+1) x (height+1), row-major in x. prefix[(ix+1)*(height+1)+(iz+1)]
    // counts the chunks in [min_x..=min_x+ix] x [min_z..=min_z+iz].
    prefix: Vec<u32>,
}

impl PrefixGrid {
    fn new(chunks: &[ChunkPos]) -> Option<Self> {
        let min_x = chunks.iter().map(|c| c.x).min()?;
        let max_x = chunks.iter().map(|c| c.x).max()?;
        let min_z = chunks.iter().map(|c| c.z).min()?;
        let max_z = chunks.iter().map(|c| c.z).max()?;
        let width = (max_x - min_x + 1) as usize;
        let height = (max_z - min_z + 1) as usize;

        let mut occupied = vec![0u32; width * height];
        for chunk in chunks {
            let ix = (chunk.x - min_x) as usize;
            let iz = (chunk.z - min_z) as usize;
            occupied[ix * height + iz] = 1;
        }

        let stride = height + 1;
        let mut prefix = vec![0u32; (width + 1) * stride];
        for ix in 0..width {
            for iz in 0..height {
                prefix[(ix + 1) * stride + (iz + 1)] = occupied[ix * height + iz]
                    + prefix[ix * stride + (iz + 1)]
                    + prefix[(ix + 1) * stride + iz]
                    - prefix[ix * stride + iz];
            }
        }

        Some(Self {
            min_x,
            min_z,
            width,
            height,
            prefix,
        })
    }

    /// Slime chunks in the `w` x `h` window whose lowest corner is `(x0, z0)`.
    /// The window must lie within the bounding box.
    fn count_in(&self, x0: i32, z0: i32, w: usize, h: usize) -> u32 {
        let ix0 = (x0 - self.min_x) as usize;
        let iz0 = (z0 - self.min_z) as usize;
        let (ix1, iz1) = (ix0 + w, iz0 + h);
        let stride = self.height + 1;
        self.prefix[ix1 * stride + iz1] + self.prefix[ix0 * stride + iz0]
            - self.prefix[ix0 * stride + iz1]
            - self.prefix[ix1 * stride + iz0]
    }
}

/// The winning window of a [`best_window`] search.
#[derive(Debug)]
pub struct BestWindow {
    /// Lowest-coordinate corner of the window, in chunks.
    pub corner: ChunkPos,
    /// Slime chunks inside the window.
    pub count: u32,
    /// The matches inside the window, sorted by coordinates.
    pub chunks: Vec<ChunkPos>,
}

/// Find the `width` x `height` chunk window with the extremal slime chunk
/// count over the bounding box of `chunks`.
///
/// Only windows whose corner coordinates are both divisible by `align` are
/// considered. Ties are broken by Euclidean distance of the corner to the
/// origin. Returns `None` when the bounding box is smaller than the window
/// or no corner satisfies the alignment.
pub fn best_window(
    chunks: &[ChunkPos],
    width: u32,
    height: u32,
    mode: Mode,
    align: u32,
) -> Option<BestWindow> {
    let grid = PrefixGrid::new(chunks)?;
    let (w, h) = (width as usize, height as usize);
    if grid.width < w || grid.height < h {
        return None;
    }

    let align = align as i32;
    let mut best_count: Option<u32> = None;
    let mut candidates: Vec<ChunkPos> = Vec::new();
    for x0 in grid.min_x..=grid.min_x + (grid.width - w) as i32 {
        for z0 in grid.min_z..=grid.min_z + (grid.height - h) as i32 {
            if x0.rem_euclid(align) != 0 || z0.rem_euclid(align) != 0 {
                continue;
            }
            let count = grid.count_in(x0, z0, w, h);
            match best_count {
                Some(best) if count == best => candidates.push(ChunkPos::new(x0, z0)),
                Some(best) if improves(mode, count, best) => {
                    best_count = Some(count);
                    candidates.clear();
                    candidates.push(ChunkPos::new(x0, z0));
                }
                Some(_) => {}
                None => {
                    best_count = Some(count);
                    candidates.push(ChunkPos::new(x0, z0));
                }
            }
        }
    }

    let count = best_count?;
    let corner = candidates.into_iter().min_by_key(|c| origin_dist_sq(c))?;
    let mut inside: Vec<ChunkPos> = chunks
        .iter()
        .copied()
        .filter(|c| {
            c.x >= corner.x
                && c.x < corner.x + width as i32
                && c.z >= corner.z
                && c.z < corner.z + height as i32
        })
        .collect();
    inside.sort_by_key(|c| (c.x, c.z));
    inside.dedup();

    Some(BestWindow {
        corner,
        count,
        chunks: inside,
    })
}

fn improves(mode: Mode, candidate: u32, current: u32) -> bool {
    match mode {
        Mode::Max => candidate > current,
        Mode::Min => candidate < current,
    }
}

#[inline]
fn origin_dist_sq(pos: &ChunkPos) -> i64 {
    let (x, z) = (pos.x as i64, pos.z as i64);
    x * x + z * z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_match_line() {
        assert_eq!(
            parse_match_line("Chunk (-2,1) - Blocks (-32,16) to (-17,31)"),
            Some(ChunkPos::new(-2, 1))
        );
        assert_eq!(
            parse_match_line("Slime Chunks found around chunk (0,0) with radius 2"),
            None
        );
        assert_eq!(
            parse_match_line("Format: Chunk (x,z) - Block coordinates (x1,z1) to (x2,z2)"),
            None
        );
        assert_eq!(parse_match_line("====================================="), None);
        assert_eq!(parse_match_line("Total slime chunks found: 3"), None);
    }

    #[test]
    fn test_parse_matches_skips_header_and_footer() {
        let text = "Slime Chunks found around chunk (0,0) with radius 2\n\
                    Format: Chunk (x,z) - Block coordinates (x1,z1) to (x2,z2)\n\
                    =====================================\n\
                    Chunk (-2,1) - Blocks (-32,16) to (-17,31)\n\
                    Chunk (0,-2) - Blocks (0,-32) to (15,-17)\n\
                    =====================================\n\
                    Total slime chunks found: 2\n";
        let chunks = parse_matches(text.as_bytes()).unwrap();
        assert_eq!(chunks, vec![ChunkPos::new(-2, 1), ChunkPos::new(0, -2)]);
    }

    #[test]
    fn test_prefix_grid_counts_match_brute_force() {
        let chunks = [
            ChunkPos::new(0, 0),
            ChunkPos::new(1, 0),
            ChunkPos::new(0, 1),
            ChunkPos::new(3, 2),
            ChunkPos::new(-1, -2),
        ];
        let grid = PrefixGrid::new(&chunks).unwrap();
        for x0 in -1..=2 {
            for z0 in -2..=1 {
                let expected = chunks
                    .iter()
                    .filter(|c| c.x >= x0 && c.x < x0 + 2 && c.z >= z0 && c.z < z0 + 2)
                    .count() as u32;
                assert_eq!(grid.count_in(x0, z0, 2, 2), expected, "window ({x0},{z0})");
            }
        }
    }

    #[test]
    fn test_best_window_max() {
        let chunks = [
            ChunkPos::new(0, 0),
            ChunkPos::new(1, 0),
            ChunkPos::new(0, 1),
            ChunkPos::new(5, 5),
        ];
        let best = best_window(&chunks, 2, 2, Mode::Max, 1).unwrap();
        assert_eq!(best.corner, ChunkPos::new(0, 0));
        assert_eq!(best.count, 3);
        assert_eq!(
            best.chunks,
            vec![ChunkPos::new(0, 0), ChunkPos::new(0, 1), ChunkPos::new(1, 0)]
        );
    }

    #[test]
    fn test_best_window_min_prefers_corner_nearest_origin() {
        let chunks = [ChunkPos::new(0, 0), ChunkPos::new(1, 0)];
        let best = best_window(&chunks, 1, 1, Mode::Min, 1).unwrap();
        assert_eq!(best.count, 1);
        assert_eq!(best.corner, ChunkPos::new(0, 0));
    }

    #[test]
    fn test_best_window_alignment() {
        let chunks = [ChunkPos::new(0, 0), ChunkPos::new(2, 2)];
        let best = best_window(&chunks, 2, 2, Mode::Max, 2).unwrap();
        // (0,0) is the only aligned corner that fits the 3x3 bounding box.
        assert_eq!(best.corner, ChunkPos::new(0, 0));
        assert_eq!(best.count, 1);
        assert_eq!(best.chunks, vec![ChunkPos::new(0, 0)]);
    }

    #[test]
    fn test_best_window_too_small_or_unaligned() {
        let chunks = [ChunkPos::new(1, 1)];
        assert!(best_window(&chunks, 2, 2, Mode::Max, 1).is_none());
        assert!(best_window(&chunks, 1, 1, Mode::Max, 2).is_none());
        assert!(best_window(&[], 1, 1, Mode::Max, 1).is_none());
    }
}
