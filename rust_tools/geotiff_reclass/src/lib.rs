// Library exports for testing and reuse

pub mod chunking;
pub mod cli;
pub mod cog;
pub mod error;
pub mod grid;
pub mod pixel;
pub mod ranges;
pub mod reclass;
pub mod stats;

#[cfg(feature = "gdal")]
pub mod io;
#[cfg(feature = "gdal")]
pub mod pipeline;

// Re-export commonly used types
pub use error::{ReclassError, Result};
pub use grid::{ClassGrid, MemoryGrid, SampleGrid, WritableGrid};
pub use pixel::{OutputEncoding, OutputType};
pub use ranges::{ClassificationRule, RangeTable, TOLERANCE};
pub use reclass::{reclassify, reclassify_bands, reclassify_into, BandRequest, Reclassified};
pub use stats::{ClassStatistics, RunningStatistics};
