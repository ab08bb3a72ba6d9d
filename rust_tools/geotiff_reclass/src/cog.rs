use crate::error::{ReclassError, Result};
#[cfg(feature = "gdal")]
use gdal::Dataset;
#[cfg(feature = "gdal")]
use log::{debug, info};

/// Validate compression type
pub fn validate_compression(compression: &str) -> Result<()> {
    let valid_types = ["DEFLATE", "LZW", "ZSTD", "NONE"];
    if !valid_types.contains(&compression) {
        return Err(ReclassError::InvalidCompression(compression.to_string()));
    }
    Ok(())
}

/// Validate tile size (must be multiple of 16)
pub fn validate_tile_size(tile_size: usize) -> Result<()> {
    if tile_size == 0 || tile_size % 16 != 0 {
        return Err(ReclassError::InvalidTileSize(tile_size));
    }
    Ok(())
}

/// GTiff creation options for tiled, compressed output
pub fn create_dataset_options(compression: &str, tile_size: usize) -> Vec<String> {
    vec![
        format!("COMPRESS={}", compression),
        "TILED=YES".to_string(),
        format!("BLOCKXSIZE={}", tile_size),
        format!("BLOCKYSIZE={}", tile_size),
        "BIGTIFF=IF_SAFER".to_string(),
    ]
}

/// Overview decimation levels: powers of two until the smaller side drops below 256.
pub fn overview_levels(width: usize, height: usize) -> Vec<i32> {
    let min_dim = width.min(height);
    let mut levels = Vec::new();
    let mut level = 2;

    while (min_dim / level) >= 256 {
        levels.push(level as i32);
        level *= 2;
    }
    levels
}

/// Build internal overviews for all bands
#[cfg(feature = "gdal")]
pub fn build_overviews(dataset: &mut Dataset) -> Result<()> {
    info!("Building overviews for COG...");

    let (width, height) = dataset.raster_size();
    let levels = overview_levels(width, height);

    if levels.is_empty() {
        debug!("Raster too small for overviews ({}x{}), skipping", width, height);
        return Ok(());
    }

    info!("Creating {} overview levels: {:?}", levels.len(), levels);

    // Class codes are categorical, averaging would invent classes
    dataset
        .build_overviews("NEAREST", &levels, &[])
        .map_err(|e| ReclassError::CogCreationFailed(format!("Failed to build overviews: {}", e)))?;

    info!("Overviews created successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_compression_valid() {
        assert!(validate_compression("DEFLATE").is_ok());
        assert!(validate_compression("LZW").is_ok());
        assert!(validate_compression("ZSTD").is_ok());
        assert!(validate_compression("NONE").is_ok());
    }

    #[test]
    fn test_validate_compression_invalid() {
        assert!(validate_compression("INVALID").is_err());
        assert!(validate_compression("jpeg").is_err());
    }

    #[test]
    fn test_validate_tile_size() {
        assert!(validate_tile_size(256).is_ok());
        assert!(validate_tile_size(512).is_ok());
        assert!(validate_tile_size(0).is_err());
        assert!(validate_tile_size(100).is_err());
    }

    #[test]
    fn test_create_dataset_options() {
        let opts = create_dataset_options("LZW", 256);
        assert_eq!(opts.len(), 5);
        assert!(opts.contains(&"COMPRESS=LZW".to_string()));
        assert!(opts.contains(&"TILED=YES".to_string()));
        assert!(opts.contains(&"BLOCKXSIZE=256".to_string()));
    }

    #[test]
    fn test_overview_levels() {
        assert!(overview_levels(300, 300).is_empty());
        assert_eq!(overview_levels(2048, 4096), vec![2, 4, 8]);
    }
}
