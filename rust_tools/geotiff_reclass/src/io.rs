use crate::chunking::ChunkBounds;
use crate::error::{ReclassError, Result};
use crate::grid::{ClassGrid, MemoryGrid};
use crate::pixel::OutputType;
use crate::stats::ClassStatistics;
use gdal::cpl::CslStringList;
use gdal::raster::{Buffer, GdalType, RasterBand};
use gdal::{Dataset, Driver, DriverManager, Metadata};
use log::{debug, info};
use ndarray::Array2;

/// Description given to every classified output band.
pub const OUTPUT_BAND_DESCRIPTION: &str = "Reclass";

#[derive(Debug, Clone)]
pub struct RasterMetadata {
    pub width: usize,
    pub height: usize,
    pub band_count: usize,
    pub geotransform: [f64; 6],
    pub projection: String,
    /// NoData of each band, index 0 is band 1
    pub nodata: Vec<Option<f64>>,
}

impl RasterMetadata {
    /// NoData of a 1-based band.
    pub fn band_nodata(&self, band: usize) -> Option<f64> {
        band.checked_sub(1)
            .and_then(|idx| self.nodata.get(idx))
            .copied()
            .flatten()
    }
}

/// Open the input raster and read its metadata without loading any samples.
pub fn open_input(path: &str) -> Result<(Dataset, RasterMetadata)> {
    info!("Opening input raster: {}", path);
    let dataset = Dataset::open(path)?;
    let metadata = extract_metadata_from_dataset(&dataset)?;

    debug!(
        "Raster dimensions: {}x{}, {} bands",
        metadata.width, metadata.height, metadata.band_count
    );
    Ok((dataset, metadata))
}

/// Extract metadata from a dataset without reading all data
pub fn extract_metadata_from_dataset(dataset: &Dataset) -> Result<RasterMetadata> {
    let (width, height) = dataset.raster_size();
    let band_count = dataset.raster_count() as usize;

    if width == 0 || height == 0 {
        return Err(ReclassError::InvalidDimensions(width, height));
    }

    let nodata = (1..=band_count)
        .map(|idx| -> Result<Option<f64>> { Ok(dataset.rasterband(idx)?.no_data_value()) })
        .collect::<Result<Vec<_>>>()?;

    Ok(RasterMetadata {
        width,
        height,
        band_count,
        geotransform: dataset.geo_transform()?,
        projection: dataset.projection(),
        nodata,
    })
}

/// Read one window of the given 1-based bands as f64, band order preserved.
pub fn read_bands_chunk(dataset: &Dataset, bands: &[usize], bounds: &ChunkBounds) -> Result<MemoryGrid> {
    debug!(
        "Reading chunk: offset=({},{}), size=({},{}), bands={:?}",
        bounds.x_min,
        bounds.y_min,
        bounds.width(),
        bounds.height(),
        bands
    );

    let data = bands
        .iter()
        .map(|&band| -> Result<Array2<f64>> {
            let rasterband: RasterBand = dataset.rasterband(band)?;
            let buffer = rasterband.read_as::<f64>(bounds.offset(), bounds.size(), bounds.size(), None)?;
            let data_vec: Vec<f64> = buffer.into_iter().collect();
            Ok(Array2::from_shape_vec((bounds.height(), bounds.width()), data_vec)?)
        })
        .collect::<Result<Vec<_>>>()?;

    MemoryGrid::new(data)
}

/// Create the output dataset with one band of `pixel_type` per classified band.
pub fn create_output_dataset(
    path: &str,
    metadata: &RasterMetadata,
    pixel_type: OutputType,
    num_bands: usize,
    options: Vec<String>,
) -> Result<Dataset> {
    info!("Creating output dataset: {} ({} x {})", path, num_bands, pixel_type);

    let driver = DriverManager::get_driver_by_name("GTiff")?;

    let mut gdal_options = CslStringList::new();
    for opt in options {
        gdal_options.add_string(&opt)?;
    }

    let mut dataset = match pixel_type {
        OutputType::Int16 => create_typed::<i16>(&driver, path, metadata, num_bands, &gdal_options)?,
        OutputType::Int32 => create_typed::<i32>(&driver, path, metadata, num_bands, &gdal_options)?,
        OutputType::Float32 => create_typed::<f32>(&driver, path, metadata, num_bands, &gdal_options)?,
    };

    dataset.set_geo_transform(&metadata.geotransform)?;
    dataset.set_projection(&metadata.projection)?;

    Ok(dataset)
}

fn create_typed<T: GdalType>(
    driver: &Driver,
    path: &str,
    metadata: &RasterMetadata,
    num_bands: usize,
    options: &CslStringList,
) -> Result<Dataset> {
    Ok(driver.create_with_band_type_with_options::<T, _>(
        path,
        metadata.width,
        metadata.height,
        num_bands,
        options,
    )?)
}

/// Write a classified chunk to a 1-based band of the output dataset
pub fn write_chunk_to_band(
    dataset: &mut Dataset,
    band_index: usize,
    chunk: &ClassGrid,
    bounds: &ChunkBounds,
) -> Result<()> {
    let (height, width) = chunk.dim();
    if (width, height) != bounds.size() {
        return Err(ReclassError::SizeMismatch {
            expected_width: bounds.width(),
            expected_height: bounds.height(),
            width,
            height,
        });
    }

    let mut raster_band = dataset.rasterband(band_index)?;
    match chunk {
        ClassGrid::Int16(data) => write_window(&mut raster_band, data, bounds)?,
        ClassGrid::Int32(data) => write_window(&mut raster_band, data, bounds)?,
        ClassGrid::Float32(data) => write_window(&mut raster_band, data, bounds)?,
    }

    debug!(
        "Wrote chunk to band {} at ({},{}) size {}x{}",
        band_index, bounds.x_min, bounds.y_min, width, height
    );

    Ok(())
}

fn write_window<T: GdalType + Copy>(
    raster_band: &mut RasterBand,
    data: &Array2<T>,
    bounds: &ChunkBounds,
) -> Result<()> {
    // Array2::iter walks in logical row-major order, which is what GDAL expects
    let values: Vec<T> = data.iter().copied().collect();
    let mut buffer = Buffer::new(bounds.size(), values);
    raster_band.write(bounds.offset(), bounds.size(), &mut buffer)?;
    Ok(())
}

/// Attach NoData, description and statistics to a finished output band.
pub fn finalize_band(
    dataset: &mut Dataset,
    band_index: usize,
    nodata: f64,
    statistics: Option<ClassStatistics>,
) -> Result<()> {
    let mut raster_band = dataset.rasterband(band_index)?;

    raster_band.set_no_data_value(Some(nodata))?;
    raster_band.set_description(OUTPUT_BAND_DESCRIPTION)?;

    match statistics {
        Some(stats) => {
            raster_band.set_metadata_item("STATISTICS_MINIMUM", &stats.min.to_string(), "")?;
            raster_band.set_metadata_item("STATISTICS_MAXIMUM", &stats.max.to_string(), "")?;
            raster_band.set_metadata_item("STATISTICS_VALID_COUNT", &stats.count.to_string(), "")?;
            info!(
                "Band {}: {} classified cells, class range [{}, {}]",
                band_index, stats.count, stats.min, stats.max
            );
        }
        None => info!("Band {}: no cell matched any range", band_index),
    }

    Ok(())
}
