//! Row-band tiling and the per-frame fan-out over those bands.

use std::ops::Range;

use rayon::prelude::*;

use crate::{algebra::Vec3, error::RenderError, pixel::Bgra};

/// Half-open row range `[from, to)` rendered by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderTile {
    pub from: u32,
    pub to: u32,
}

impl RenderTile {
    pub fn rows(&self) -> Range<u32> {
        self.from..self.to
    }

    pub fn len(&self) -> u32 {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.to <= self.from
    }
}

/// Bands of `rows_per_tile` rows; the last band takes whatever is left.
pub fn partition_rows(height: u32, rows_per_tile: u32) -> Vec<RenderTile> {
    let step = rows_per_tile.max(1);
    (0..height)
        .step_by(step as usize)
        .map(|from| RenderTile { from, to: from.saturating_add(step).min(height) })
        .collect()
}

/// `count` bands whose heights differ by at most one row.
pub fn partition_count(height: u32, count: u32) -> Vec<RenderTile> {
    if height == 0 {
        return Vec::new();
    }
    let count = count.clamp(1, height);
    let base = height / count;
    let extra = height % count;

    let mut tiles = Vec::with_capacity(count as usize);
    let mut from = 0;
    for i in 0..count {
        let len = base + u32::from(i < extra);
        tiles.push(RenderTile { from, to: from + len });
        from += len;
    }
    tiles
}

/// Counters a tile worker fills while shading its rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileStats {
    pub pixels: u64,
    pub bounces: u64,
}

impl TileStats {
    fn merge(self, other: Self) -> Self {
        Self {
            pixels: self.pixels + other.pixels,
            bounces: self.bounces + other.bounces,
        }
    }
}

/// Fixed tile layout for one image size, built once and reused every frame.
#[derive(Clone, Debug)]
pub struct TileScheduler {
    width: u32,
    height: u32,
    tiles: Vec<RenderTile>,
}

impl TileScheduler {
    pub fn new(width: u32, height: u32, tiles: Vec<RenderTile>) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage { width, height });
        }

        let mut next = 0;
        for tile in &tiles {
            if tile.is_empty() {
                return Err(RenderError::TileLayout(format!("empty tile {}..{}", tile.from, tile.to)));
            }
            if tile.from != next {
                return Err(RenderError::TileLayout(format!(
                    "tile {}..{} does not start at row {next}",
                    tile.from, tile.to
                )));
            }
            next = tile.to;
        }
        if next != height {
            return Err(RenderError::TileLayout(format!("tiles cover rows 0..{next}, image has {height}")));
        }

        tracing::debug!(width, height, tiles = tiles.len(), "tile layout ready");
        Ok(Self { width, height, tiles })
    }

    pub fn with_rows_per_tile(width: u32, height: u32, rows_per_tile: u32) -> Result<Self, RenderError> {
        Self::new(width, height, partition_rows(height, rows_per_tile))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tiles(&self) -> &[RenderTile] {
        &self.tiles
    }

    /// Shade every pixel once, one parallel task per tile.
    ///
    /// Each task owns the disjoint slice of `pixels` covering its rows.
    /// Returns after all tasks have finished.
    pub fn dispatch<F>(&self, pixels: &mut [Bgra], shade: F) -> Result<TileStats, RenderError>
    where
        F: Fn(u32, u32, &mut TileStats) -> Vec3 + Sync,
    {
        let width = self.width as usize;
        let expected = width * self.height as usize;
        if pixels.len() != expected {
            return Err(RenderError::BufferSize {
                width: self.width,
                height: self.height,
                expected: expected * Bgra::BYTES,
                actual: pixels.len() * Bgra::BYTES,
            });
        }

        let mut bands = Vec::with_capacity(self.tiles.len());
        let mut rest = pixels;
        for tile in &self.tiles {
            let (band, tail) = std::mem::take(&mut rest).split_at_mut(tile.len() as usize * width);
            bands.push((*tile, band));
            rest = tail;
        }

        let stats = bands
            .into_par_iter()
            .map(|(tile, band)| {
                let mut stats = TileStats::default();
                for (row, y) in band.chunks_exact_mut(width).zip(tile.rows()) {
                    for (x, px) in row.iter_mut().enumerate() {
                        *px = Bgra::from_radiance(shade(x as u32, y, &mut stats));
                        stats.pixels += 1;
                    }
                }
                tracing::trace!(from = tile.from, to = tile.to, "tile done");
                stats
            })
            .reduce(TileStats::default, TileStats::merge);

        Ok(stats)
    }
}
