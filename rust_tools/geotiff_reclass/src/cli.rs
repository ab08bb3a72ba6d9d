use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "geotiff-reclass")]
#[command(about = "Reclassify raster band values into class codes from a table of value ranges")]
#[command(version)]
#[command(author = "Huimori Project")]
pub struct Args {
    /// Input raster path (any GDAL-readable format)
    #[arg(short, long, value_name = "FILE")]
    pub input: String,

    /// Output GeoTIFF path (one classified band per input band)
    #[arg(short, long, value_name = "FILE")]
    pub output: String,

    /// Range table, e.g. "0 30 1; 30 270 2; 270 365 3" (min max class, or min class)
    #[arg(short, long, value_name = "SPEC", env = "RECLASS_RANGES")]
    pub ranges: String,

    /// Input band to reclassify, 1-based (repeat for several bands)
    #[arg(short, long = "band", value_name = "N", default_value = "1")]
    pub bands: Vec<usize>,

    /// Override nodata value (default: read from each input band)
    #[arg(long, value_name = "VALUE", allow_negative_numbers = true)]
    pub nodata: Option<f64>,

    /// Size in pixels of the square windows read and written at a time
    #[arg(long, value_name = "PIXELS", default_value = "2048")]
    pub chunk_size: usize,

    /// Output compression: DEFLATE, LZW, ZSTD or NONE
    #[arg(long, value_name = "TYPE", default_value = "DEFLATE")]
    pub compression: String,

    /// Output tile size in pixels (multiple of 16)
    #[arg(long, value_name = "PIXELS", default_value = "512")]
    pub tile_size: usize,

    /// Add internal overviews to the tiled GTiff output (NEAREST resampling)
    #[arg(long)]
    pub cog: bool,

    /// Number of threads (default: all available)
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
