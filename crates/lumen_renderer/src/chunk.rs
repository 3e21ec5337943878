//! Chunk generation for parallel rendering.
//!
//! Divides the image into rectangles (chunks) that are rendered independently
//! and in parallel using rayon. Chunks cover the image exactly once.

use serde::{Deserialize, Serialize};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Stable index in generation order
    pub id: usize,
    /// X coordinate of the top-left corner
    pub x: u32,
    /// Y coordinate of the top-left corner
    pub y: u32,
    pub size_x: u32,
    pub size_y: u32,
}

impl Chunk {
    pub fn new(id: usize, x: u32, y: u32, size_x: u32, size_y: u32) -> Self {
        Self {
            id,
            x,
            y,
            size_x,
            size_y,
        }
    }

    /// Get the total number of pixels in this chunk.
    pub fn pixel_count(&self) -> u32 {
        self.size_x * self.size_y
    }

    /// Pixel coordinates in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.y + self.size_y).flat_map(move |y| (self.x..self.x + self.size_x).map(move |x| (x, y)))
    }
}

/// How the image is split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStrategy {
    /// Full height columns
    #[default]
    VerticalStripes,
    /// Full width rows
    HorizontalStripes,
    /// Near-square grid
    Rectangles,
}

/// Split `length` into `count` spans; the remainder goes to the last span.
fn split_axis(length: u32, count: u32) -> impl Iterator<Item = (u32, u32)> {
    let count = count.clamp(1, length.max(1));
    let step = length / count;
    (0..count).map(move |i| {
        let start = i * step;
        let size = if i == count - 1 { length - start } else { step };
        (start, size)
    })
}

/// Generate chunks covering a `width` x `height` image.
///
/// `target_count` is a hint. It is clamped so no chunk is empty and treated as
/// 1 when zero.
pub fn generate_chunks(
    strategy: ChunkStrategy,
    target_count: u32,
    width: u32,
    height: u32,
) -> Vec<Chunk> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let target_count = target_count.max(1);

    let (columns, rows) = match strategy {
        ChunkStrategy::VerticalStripes => (target_count, 1),
        ChunkStrategy::HorizontalStripes => (1, target_count),
        ChunkStrategy::Rectangles => grid_shape(target_count, width, height),
    };

    let mut chunks = Vec::new();
    for (y, size_y) in split_axis(height, rows) {
        for (x, size_x) in split_axis(width, columns) {
            chunks.push(Chunk::new(chunks.len(), x, y, size_x, size_y));
        }
    }
    chunks
}

/// Columns and rows giving roughly `count` cells with square-ish aspect.
fn grid_shape(count: u32, width: u32, height: u32) -> (u32, u32) {
    let aspect = width as f32 / height as f32;
    let columns = ((count as f32 * aspect).sqrt().round() as u32).max(1);
    let rows = (count as f32 / columns as f32).round().max(1.0) as u32;
    (columns, rows)
}
