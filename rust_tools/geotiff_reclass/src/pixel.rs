//! Output pixel type selection.

use crate::ranges::RangeTable;
use log::debug;
use std::fmt;

/// Pixel type of the classified output band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    Int16,
    Int32,
    Float32,
}

impl OutputType {
    /// Smallest type able to hold every class code of `table` next to its NoData sentinel.
    ///
    /// The decision is driven by the largest class code. Integer types reserve
    /// their minimum for NoData, and a fractional class code always needs Float32.
    pub fn select(table: &RangeTable) -> OutputType {
        let (Some(lowest), Some(highest)) = (table.min_class_value(), table.max_class_value()) else {
            return OutputType::Int16;
        };

        let integral = table.rules().iter().all(|rule| rule.class_value.fract() == 0.0);
        let fits = |min: f64, max: f64| integral && highest <= max && lowest > min;

        if fits(i16::MIN as f64, i16::MAX as f64) {
            OutputType::Int16
        } else if fits(i32::MIN as f64, i32::MAX as f64) {
            OutputType::Int32
        } else {
            OutputType::Float32
        }
    }

    /// Sentinel written for unclassified and NoData cells.
    pub fn nodata(self) -> f64 {
        match self {
            OutputType::Int16 => i16::MIN as f64,
            OutputType::Int32 => i32::MIN as f64,
            // smallest positive subnormal
            OutputType::Float32 => f32::from_bits(1) as f64,
        }
    }

    /// Value as it reads back after being stored in this type.
    #[inline]
    pub fn quantize(self, value: f64) -> f64 {
        match self {
            OutputType::Int16 => value as i16 as f64,
            OutputType::Int32 => value as i32 as f64,
            OutputType::Float32 => value as f32 as f64,
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputType::Int16 => "Int16",
            OutputType::Int32 => "Int32",
            OutputType::Float32 => "Float32",
        };
        f.write_str(name)
    }
}

/// Output pixel type together with the NoData sentinel that belongs to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputEncoding {
    pub pixel_type: OutputType,
    pub nodata: f64,
}

impl OutputEncoding {
    pub fn for_table(table: &RangeTable) -> Self {
        let pixel_type = OutputType::select(table);
        let encoding = Self {
            pixel_type,
            nodata: pixel_type.nodata(),
        };
        debug!(
            "Output type {} (nodata {}) for class values up to {:?}",
            encoding.pixel_type,
            encoding.nodata,
            table.max_class_value()
        );
        encoding
    }
}
