use crate::error::{ReclassError, Result};
use log::debug;

/// Window of the raster processed in one pass. Max bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkBounds {
    pub x_min: usize,
    pub y_min: usize,
    pub x_max: usize,
    pub y_max: usize,
}

impl ChunkBounds {
    pub fn width(&self) -> usize {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> usize {
        self.y_max - self.y_min
    }

    pub fn offset(&self) -> (isize, isize) {
        (self.x_min as isize, self.y_min as isize)
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width(), self.height())
    }
}

/// Non-overlapping square windows covering a raster, in row-major chunk order.
pub struct ChunkGrid {
    raster_width: usize,
    raster_height: usize,
    chunk_size: usize,
    pub num_chunks_x: usize,
    pub num_chunks_y: usize,
    pub total_chunks: usize,
}

impl ChunkGrid {
    pub fn new(raster_width: usize, raster_height: usize, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ReclassError::InvalidChunkSize(chunk_size));
        }

        let num_chunks_x = raster_width.div_ceil(chunk_size);
        let num_chunks_y = raster_height.div_ceil(chunk_size);
        let total_chunks = num_chunks_x * num_chunks_y;

        debug!(
            "ChunkGrid: {}x{} raster, chunk_size={} → {}x{} chunks ({} total)",
            raster_width, raster_height, chunk_size, num_chunks_x, num_chunks_y, total_chunks
        );

        Ok(Self {
            raster_width,
            raster_height,
            chunk_size,
            num_chunks_x,
            num_chunks_y,
            total_chunks,
        })
    }

    pub fn iter(&self) -> ChunkIterator<'_> {
        ChunkIterator::new(self)
    }

    pub fn get_chunk_bounds(&self, chunk_idx: usize) -> ChunkBounds {
        let chunk_y = chunk_idx / self.num_chunks_x;
        let chunk_x = chunk_idx % self.num_chunks_x;

        ChunkBounds {
            x_min: chunk_x * self.chunk_size,
            y_min: chunk_y * self.chunk_size,
            x_max: ((chunk_x + 1) * self.chunk_size).min(self.raster_width),
            y_max: ((chunk_y + 1) * self.chunk_size).min(self.raster_height),
        }
    }
}

pub struct ChunkIterator<'a> {
    grid: &'a ChunkGrid,
    current_idx: usize,
}

impl<'a> ChunkIterator<'a> {
    fn new(grid: &'a ChunkGrid) -> Self {
        Self {
            grid,
            current_idx: 0,
        }
    }
}

impl<'a> Iterator for ChunkIterator<'a> {
    type Item = (usize, ChunkBounds);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_idx < self.grid.total_chunks {
            let bounds = self.grid.get_chunk_bounds(self.current_idx);
            let idx = self.current_idx;
            self.current_idx += 1;
            Some((idx, bounds))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_grid_simple() {
        let grid = ChunkGrid::new(4000, 4000, 2000).unwrap();
        assert_eq!(grid.num_chunks_x, 2);
        assert_eq!(grid.num_chunks_y, 2);
        assert_eq!(grid.total_chunks, 4);
    }

    #[test]
    fn test_chunk_grid_rejects_zero_size() {
        assert!(matches!(
            ChunkGrid::new(10, 10, 0),
            Err(ReclassError::InvalidChunkSize(0))
        ));
    }

    #[test]
    fn test_chunk_bounds_clipped_at_edge() {
        let grid = ChunkGrid::new(5000, 3000, 2000).unwrap();
        assert_eq!(grid.num_chunks_x, 3);
        assert_eq!(grid.num_chunks_y, 2);

        let bounds = grid.get_chunk_bounds(5); // bottom-right
        assert_eq!(bounds.x_min, 4000);
        assert_eq!(bounds.x_max, 5000);
        assert_eq!(bounds.y_min, 2000);
        assert_eq!(bounds.y_max, 3000);
        assert_eq!(bounds.size(), (1000, 1000));
    }

    #[test]
    fn test_chunks_cover_raster_exactly() {
        let grid = ChunkGrid::new(17, 9, 4).unwrap();
        let covered: usize = grid.iter().map(|(_, b)| b.width() * b.height()).sum();
        assert_eq!(covered, 17 * 9);
    }

    #[test]
    fn test_chunk_iterator() {
        let grid = ChunkGrid::new(4000, 4000, 2000).unwrap();
        let chunks: Vec<_> = grid.iter().collect();

        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].0, 0);
        assert_eq!(chunks[3].0, 3);
        assert_eq!(chunks[1].1.offset(), (2000, 0));
    }
}
