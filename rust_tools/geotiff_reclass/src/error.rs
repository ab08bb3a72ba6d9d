use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReclassError {
    #[cfg(feature = "gdal")]
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Array shape error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),

    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },

    #[error("Invalid band index {band} (raster has {band_count} bands)")]
    InvalidBand { band: usize, band_count: usize },

    #[error("Input raster has invalid dimensions: {0}x{1}")]
    InvalidDimensions(usize, usize),

    #[error("Grid size mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    SizeMismatch {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },

    #[error("Invalid chunk size: {0} (must be positive)")]
    InvalidChunkSize(usize),

    #[error("COG creation failed: {0}")]
    CogCreationFailed(String),

    #[error("Invalid compression type: {0}")]
    InvalidCompression(String),

    #[error("Invalid tile size: {0} (must be multiple of 16)")]
    InvalidTileSize(usize),
}

impl ReclassError {
    pub(crate) fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        ReclassError::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReclassError>;
