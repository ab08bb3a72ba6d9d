use crate::error::{ReclassError, Result};
use crate::grid::{ClassGrid, SampleGrid, WritableGrid};
use crate::pixel::OutputEncoding;
use crate::ranges::{RangeTable, TOLERANCE};
use crate::stats::RunningStatistics;
use log::debug;
use rayon::prelude::*;

/// Classified band together with its encoding and statistics.
#[derive(Debug, Clone)]
pub struct Reclassified {
    pub grid: ClassGrid,
    pub encoding: OutputEncoding,
    pub statistics: RunningStatistics,
}

/// One band to reclassify, with the NoData value of that band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRequest {
    pub band: usize,
    pub nodata: Option<f64>,
}

/// Reclassify one band of `input` into a new grid of the smallest fitting pixel type.
pub fn reclassify<G>(
    input: &G,
    band: usize,
    input_nodata: Option<f64>,
    table: &RangeTable,
) -> Result<Reclassified>
where
    G: SampleGrid + ?Sized,
{
    let encoding = OutputEncoding::for_table(table);
    reclassify_with(input, band, input_nodata, table, encoding)
}

/// Reclassify one band using an already selected encoding.
pub fn reclassify_with<G>(
    input: &G,
    band: usize,
    input_nodata: Option<f64>,
    table: &RangeTable,
    encoding: OutputEncoding,
) -> Result<Reclassified>
where
    G: SampleGrid + ?Sized,
{
    check_band(input, band)?;
    Ok(reclassify_checked(input, band, input_nodata, table, encoding))
}

fn reclassify_checked<G>(
    input: &G,
    band: usize,
    input_nodata: Option<f64>,
    table: &RangeTable,
    encoding: OutputEncoding,
) -> Reclassified
where
    G: SampleGrid + ?Sized,
{
    let mut grid = ClassGrid::create(input.width(), input.height(), encoding.pixel_type);
    let mut statistics = RunningStatistics::new();
    scan_band(input, band, input_nodata, table, encoding, &mut grid, &mut statistics);

    Reclassified {
        grid,
        encoding,
        statistics,
    }
}

/// Scan `band` row by row, writing class codes or NoData into `output`.
///
/// Only classified cells reach `statistics`.
pub fn reclassify_into<G, W>(
    input: &G,
    band: usize,
    input_nodata: Option<f64>,
    table: &RangeTable,
    encoding: OutputEncoding,
    output: &mut W,
    statistics: &mut RunningStatistics,
) -> Result<()>
where
    G: SampleGrid + ?Sized,
    W: WritableGrid + ?Sized,
{
    check_band(input, band)?;

    let (width, height) = (input.width(), input.height());
    if output.width() != width || output.height() != height {
        return Err(ReclassError::SizeMismatch {
            expected_width: width,
            expected_height: height,
            width: output.width(),
            height: output.height(),
        });
    }

    scan_band(input, band, input_nodata, table, encoding, output, statistics);
    Ok(())
}

/// Row-major scan of a band already known to exist, into an output of matching size.
fn scan_band<G, W>(
    input: &G,
    band: usize,
    input_nodata: Option<f64>,
    table: &RangeTable,
    encoding: OutputEncoding,
    output: &mut W,
    statistics: &mut RunningStatistics,
) where
    G: SampleGrid + ?Sized,
    W: WritableGrid + ?Sized,
{
    let (width, height) = (input.width(), input.height());
    for row in 0..height {
        for col in 0..width {
            let value = input.sample_at(row, col, band);
            match classify_sample(value, input_nodata, table) {
                Some(class_value) => {
                    let stored = encoding.pixel_type.quantize(class_value);
                    output.set_sample(row, col, stored);
                    statistics.update(stored);
                }
                None => output.set_sample(row, col, encoding.nodata),
            }
        }
    }

    debug!(
        "Band {}: {} of {} cells classified",
        band,
        statistics.count(),
        width * height
    );
}

/// Reclassify several bands concurrently, one independent task per band.
///
/// Results are returned in request order.
pub fn reclassify_bands<G>(
    input: &G,
    requests: &[BandRequest],
    table: &RangeTable,
    encoding: OutputEncoding,
) -> Result<Vec<Reclassified>>
where
    G: SampleGrid + Sync + ?Sized,
{
    for request in requests {
        check_band(input, request.band)?;
    }

    Ok(requests
        .par_iter()
        .map(|request| {
            debug!("Processing band {}", request.band);
            reclassify_checked(input, request.band, request.nodata, table, encoding)
        })
        .collect())
}

/// Class value for a single sample, `None` for NoData and unclassified values.
#[inline]
pub fn classify_sample(value: f64, input_nodata: Option<f64>, table: &RangeTable) -> Option<f64> {
    if input_nodata.is_some_and(|nodata| is_nodata(value, nodata)) {
        return None;
    }
    table.classify(value)
}

#[inline]
fn is_nodata(value: f64, nodata: f64) -> bool {
    value == nodata || (value - nodata).abs() < TOLERANCE || (value.is_nan() && nodata.is_nan())
}

fn check_band<G>(input: &G, band: usize) -> Result<()>
where
    G: SampleGrid + ?Sized,
{
    let band_count = input.band_count();
    if band >= band_count {
        return Err(ReclassError::InvalidBand { band, band_count });
    }
    Ok(())
}
