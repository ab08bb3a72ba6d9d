//! Grid abstraction between the reclassification engine and raster storage.

use crate::error::{ReclassError, Result};
use crate::pixel::OutputType;
use ndarray::Array2;

/// Read access to a multi-band grid of samples.
pub trait SampleGrid {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn band_count(&self) -> usize;

    /// Sample at (row, col) of a zero-based band.
    fn sample_at(&self, row: usize, col: usize, band: usize) -> f64;
}

/// Write access to a single-band output grid.
pub trait WritableGrid {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn set_sample(&mut self, row: usize, col: usize, value: f64);
}

/// In-memory grid, one `Array2` per band, all of the same shape.
#[derive(Debug, Clone)]
pub struct MemoryGrid {
    bands: Vec<Array2<f64>>,
    width: usize,
    height: usize,
}

impl MemoryGrid {
    pub fn new(bands: Vec<Array2<f64>>) -> Result<Self> {
        let (height, width) = bands.first().map(|b| b.dim()).unwrap_or((0, 0));

        if let Some(band) = bands.iter().find(|b| b.dim() != (height, width)) {
            let (h, w) = band.dim();
            return Err(ReclassError::SizeMismatch {
                expected_width: width,
                expected_height: height,
                width: w,
                height: h,
            });
        }

        Ok(Self {
            bands,
            width,
            height,
        })
    }

    pub fn from_band(band: Array2<f64>) -> Self {
        let (height, width) = band.dim();
        Self {
            bands: vec![band],
            width,
            height,
        }
    }

    pub fn band(&self, band: usize) -> Option<&Array2<f64>> {
        self.bands.get(band)
    }
}

impl SampleGrid for MemoryGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn band_count(&self) -> usize {
        self.bands.len()
    }

    #[inline]
    fn sample_at(&self, row: usize, col: usize, band: usize) -> f64 {
        self.bands[band][[row, col]]
    }
}

/// Classified output band, stored in the selected pixel type.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassGrid {
    Int16(Array2<i16>),
    Int32(Array2<i32>),
    Float32(Array2<f32>),
}

impl ClassGrid {
    /// Zero-filled grid of the given size and pixel type.
    pub fn create(width: usize, height: usize, pixel_type: OutputType) -> Self {
        let shape = (height, width);
        match pixel_type {
            OutputType::Int16 => ClassGrid::Int16(Array2::zeros(shape)),
            OutputType::Int32 => ClassGrid::Int32(Array2::zeros(shape)),
            OutputType::Float32 => ClassGrid::Float32(Array2::zeros(shape)),
        }
    }

    pub fn pixel_type(&self) -> OutputType {
        match self {
            ClassGrid::Int16(_) => OutputType::Int16,
            ClassGrid::Int32(_) => OutputType::Int32,
            ClassGrid::Float32(_) => OutputType::Float32,
        }
    }

    /// (height, width)
    pub fn dim(&self) -> (usize, usize) {
        match self {
            ClassGrid::Int16(a) => a.dim(),
            ClassGrid::Int32(a) => a.dim(),
            ClassGrid::Float32(a) => a.dim(),
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        match self {
            ClassGrid::Int16(a) => a.get((row, col)).map(|&v| v as f64),
            ClassGrid::Int32(a) => a.get((row, col)).map(|&v| v as f64),
            ClassGrid::Float32(a) => a.get((row, col)).map(|&v| v as f64),
        }
    }

    /// All samples in row-major order, widened to f64.
    pub fn to_f64(&self) -> Array2<f64> {
        match self {
            ClassGrid::Int16(a) => a.mapv(|v| v as f64),
            ClassGrid::Int32(a) => a.mapv(|v| v as f64),
            ClassGrid::Float32(a) => a.mapv(|v| v as f64),
        }
    }
}

impl WritableGrid for ClassGrid {
    fn width(&self) -> usize {
        self.dim().1
    }

    fn height(&self) -> usize {
        self.dim().0
    }

    #[inline]
    fn set_sample(&mut self, row: usize, col: usize, value: f64) {
        match self {
            ClassGrid::Int16(a) => a[[row, col]] = value as i16,
            ClassGrid::Int32(a) => a[[row, col]] = value as i32,
            ClassGrid::Float32(a) => a[[row, col]] = value as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_memory_grid_dimensions() {
        let grid = MemoryGrid::from_band(arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]));
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.band_count(), 1);
        assert_eq!(grid.sample_at(1, 2, 0), 6.0);
    }

    #[test]
    fn test_memory_grid_rejects_mismatched_bands() {
        let result = MemoryGrid::new(vec![Array2::zeros((2, 2)), Array2::zeros((3, 2))]);
        assert!(matches!(result, Err(ReclassError::SizeMismatch { .. })));
    }

    #[test]
    fn test_memory_grid_multiband() {
        let grid = MemoryGrid::new(vec![arr2(&[[1.0, 2.0]]), arr2(&[[10.0, 20.0]])]).unwrap();
        assert_eq!(grid.band_count(), 2);
        assert_eq!(grid.sample_at(0, 1, 1), 20.0);
    }

    #[test]
    fn test_class_grid_stores_selected_type() {
        let mut grid = ClassGrid::create(4, 3, OutputType::Int16);
        assert_eq!(grid.dim(), (3, 4));
        assert_eq!(grid.pixel_type(), OutputType::Int16);

        grid.set_sample(2, 3, -32768.0);
        assert_eq!(grid.get(2, 3), Some(-32768.0));
        assert_eq!(grid.get(3, 0), None);
    }

    #[test]
    fn test_class_grid_float_nodata_survives() {
        let mut grid = ClassGrid::create(1, 1, OutputType::Float32);
        let nodata = OutputType::Float32.nodata();
        grid.set_sample(0, 0, nodata);
        assert_eq!(grid.get(0, 0), Some(nodata));
    }
}
