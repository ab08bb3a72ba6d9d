//! Chunked GeoTIFF reclassification: read windows, classify, write, assemble.

use crate::chunking::ChunkGrid;
use crate::cli::Args;
use crate::cog;
use crate::error::{ReclassError, Result};
use crate::io;
use crate::pixel::OutputEncoding;
use crate::ranges::RangeTable;
use crate::reclass::{reclassify_bands, BandRequest};
use crate::stats::{ClassStatistics, RunningStatistics};
use log::{debug, info};

/// Reclassify the requested bands of `args.input` into `args.output`.
///
/// Returns the statistics of every output band, in `args.bands` order.
pub fn run(args: &Args) -> Result<Vec<Option<ClassStatistics>>> {
    // Range table and output type are settled before any file is touched
    let table = RangeTable::parse(&args.ranges)?;
    let encoding = OutputEncoding::for_table(&table);
    info!(
        "Parsed {} classification rules, output type {} (nodata {})",
        table.len(),
        encoding.pixel_type,
        encoding.nodata
    );

    cog::validate_compression(&args.compression)?;
    cog::validate_tile_size(args.tile_size)?;

    let (dataset, metadata) = io::open_input(&args.input)?;
    info!("Raster size: {}x{}", metadata.width, metadata.height);

    for &band in &args.bands {
        if band == 0 || band > metadata.band_count {
            return Err(ReclassError::InvalidBand {
                band,
                band_count: metadata.band_count,
            });
        }
    }

    // Chunk grids hold only the selected bands, in args.bands order
    let requests: Vec<BandRequest> = args
        .bands
        .iter()
        .enumerate()
        .map(|(idx, &band)| {
            let nodata = args.nodata.or_else(|| metadata.band_nodata(band));
            match nodata {
                Some(nd) => info!("Band {}: using nodata value {}", band, nd),
                None => info!("Band {}: no nodata value specified", band),
            }
            BandRequest { band: idx, nodata }
        })
        .collect();

    let chunks = ChunkGrid::new(metadata.width, metadata.height, args.chunk_size)?;

    let options = cog::create_dataset_options(&args.compression, args.tile_size);
    let mut output = io::create_output_dataset(
        &args.output,
        &metadata,
        encoding.pixel_type,
        requests.len(),
        options,
    )?;

    let mut statistics = vec![RunningStatistics::new(); requests.len()];

    for (chunk_idx, bounds) in chunks.iter() {
        let input = io::read_bands_chunk(&dataset, &args.bands, &bounds)?;
        let results = reclassify_bands(&input, &requests, &table, encoding)?;

        for (idx, result) in results.iter().enumerate() {
            io::write_chunk_to_band(&mut output, idx + 1, &result.grid, &bounds)?;
            statistics[idx].merge(&result.statistics);
        }

        debug!("Chunk {}/{} done", chunk_idx + 1, chunks.total_chunks);
    }

    let finished: Vec<Option<ClassStatistics>> = statistics.iter().map(RunningStatistics::finish).collect();
    for (idx, stats) in finished.iter().enumerate() {
        io::finalize_band(&mut output, idx + 1, encoding.nodata, *stats)?;
    }

    if args.cog {
        cog::build_overviews(&mut output)?;
    }

    info!("Successfully wrote {} bands to {}", requests.len(), args.output);
    Ok(finished)
}
