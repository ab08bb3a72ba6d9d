//! Range table parsing.
//!
//! A range specification is a `;`-separated list of rule descriptors:
//!
//! ```text
//! 0 30 1; 30 270 2; 270 365 3     explicit bounds: min max class
//! 400 4                           open-ended:      min class
//! ```
//!
//! Rules are kept ordered by class value, and that order decides which rule
//! wins when intervals overlap.

use crate::error::{ReclassError, Result};
use crate::pixel::OutputType;
use log::debug;
use std::fmt;
use std::str::FromStr;

/// Tolerance used for NoData comparison and for closing the upper bound of a rule.
pub const TOLERANCE: f64 = 1e-7;

/// One interval-to-code mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationRule {
    pub class_value: f64,
    pub minimum: f64,
    pub maximum: f64,
}

impl ClassificationRule {
    pub fn new(minimum: f64, maximum: f64, class_value: f64) -> Self {
        Self {
            class_value,
            minimum,
            maximum,
        }
    }

    /// Rule with no upper bound.
    pub fn open_ended(minimum: f64, class_value: f64) -> Self {
        Self::new(minimum, f64::MAX, class_value)
    }

    /// `minimum <= value < maximum + TOLERANCE`
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.minimum && value < self.maximum + TOLERANCE
    }

    fn validate(&self) -> Result<()> {
        if !self.class_value.is_finite() || self.class_value.abs() > f32::MAX as f64 {
            return Err(ReclassError::invalid_argument(
                self.class_value.to_string(),
                "class value cannot be stored in any output pixel type",
            ));
        }
        // Tiny codes round onto the Float32 NoData sentinel
        let float_nodata = OutputType::Float32.nodata();
        if OutputType::Float32.quantize(self.class_value) == float_nodata {
            return Err(ReclassError::invalid_argument(
                self.class_value.to_string(),
                format!("class value is indistinguishable from nodata {}", float_nodata),
            ));
        }
        if self.minimum > self.maximum {
            return Err(ReclassError::invalid_argument(
                self.to_string(),
                format!(
                    "minimum {} exceeds maximum {}",
                    self.minimum, self.maximum
                ),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for ClassificationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {} ~ {}", self.class_value, self.minimum, self.maximum)
    }
}

/// Classification rules ordered by ascending class value, one rule per class value.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeTable {
    rules: Vec<ClassificationRule>,
}

impl RangeTable {
    /// Parse a range specification.
    ///
    /// Descriptors with a token count other than two or three are skipped.
    /// Any token that is not a number fails the whole parse, as does a
    /// specification that yields no rule at all.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut table = RangeTable { rules: Vec::new() };

        for descriptor in spec.split(';') {
            let tokens: Vec<&str> = descriptor.split_whitespace().collect();
            let rule = match tokens.as_slice() {
                [min, max, class] => {
                    ClassificationRule::new(parse_token(min)?, parse_token(max)?, parse_token(class)?)
                }
                [min, class] => ClassificationRule::open_ended(parse_token(min)?, parse_token(class)?),
                _ => {
                    if !tokens.is_empty() {
                        debug!("Skipping range descriptor with {} tokens: {:?}", tokens.len(), descriptor.trim());
                    }
                    continue;
                }
            };

            rule.validate()?;
            table.insert(rule);
        }

        if table.is_empty() {
            return Err(empty_table());
        }

        debug!("Parsed {} classification rules", table.len());
        Ok(table)
    }

    /// Build a table from rules, applying the same validation and
    /// replace-on-duplicate semantics as [`RangeTable::parse`].
    pub fn from_rules<I>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = ClassificationRule>,
    {
        let mut table = RangeTable { rules: Vec::new() };
        for rule in rules {
            rule.validate()?;
            table.insert(rule);
        }
        if table.is_empty() {
            return Err(empty_table());
        }
        Ok(table)
    }

    /// Insert keeping class value order. A rule with an existing class value
    /// replaces the old one, which is returned.
    fn insert(&mut self, rule: ClassificationRule) -> Option<ClassificationRule> {
        match self
            .rules
            .binary_search_by(|r| r.class_value.total_cmp(&rule.class_value))
        {
            Ok(idx) => {
                let previous = std::mem::replace(&mut self.rules[idx], rule);
                debug!("Rule {} replaced by {}", previous, rule);
                Some(previous)
            }
            Err(idx) => {
                self.rules.insert(idx, rule);
                None
            }
        }
    }

    /// Class value of the first rule (in class value order) containing `value`.
    #[inline]
    pub fn classify(&self, value: f64) -> Option<f64> {
        self.rules
            .iter()
            .find(|rule| rule.contains(value))
            .map(|rule| rule.class_value)
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn min_class_value(&self) -> Option<f64> {
        self.rules.first().map(|rule| rule.class_value)
    }

    pub fn max_class_value(&self) -> Option<f64> {
        self.rules.last().map(|rule| rule.class_value)
    }
}

impl FromStr for RangeTable {
    type Err = ReclassError;

    fn from_str(s: &str) -> Result<Self> {
        RangeTable::parse(s)
    }
}

fn empty_table() -> ReclassError {
    ReclassError::invalid_argument("ranges", "specification produced no classification rules")
}

fn parse_token(token: &str) -> Result<f64> {
    match token.parse::<f64>() {
        Ok(value) if !value.is_nan() => Ok(value),
        Ok(_) => Err(ReclassError::invalid_argument(token, "NaN is not a valid bound or class value")),
        Err(e) => Err(ReclassError::invalid_argument(token, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_token_rules() {
        let table = RangeTable::parse("0 30 1; 30 270 2; 270 365 3").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rules()[0], ClassificationRule::new(0.0, 30.0, 1.0));
        assert_eq!(table.rules()[2], ClassificationRule::new(270.0, 365.0, 3.0));
    }

    #[test]
    fn test_parse_collapses_whitespace() {
        let table = RangeTable::parse("  0.00   30.00\t1 ;\n30.00  270.00 2  ").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rules()[1], ClassificationRule::new(30.0, 270.0, 2.0));
    }

    #[test]
    fn test_two_tokens_leave_maximum_open() {
        let table = RangeTable::parse("10 5").unwrap();
        assert_eq!(table.rules()[0], ClassificationRule::new(10.0, f64::MAX, 5.0));
    }

    #[test]
    fn test_other_token_counts_are_skipped() {
        let table = RangeTable::parse("1; 0 10 1; 1 2 3 4; ;").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.max_class_value(), Some(1.0));
    }

    #[test]
    fn test_rules_are_ordered_by_class_value() {
        let table = RangeTable::parse("100 200 3; 0 50 7; 50 100 1").unwrap();
        let classes: Vec<f64> = table.rules().iter().map(|r| r.class_value).collect();
        assert_eq!(classes, vec![1.0, 3.0, 7.0]);
    }

    #[test]
    fn test_duplicate_class_value_replaces_earlier_rule() {
        let table = RangeTable::parse("0 10 1; 20 30 1").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rules()[0], ClassificationRule::new(20.0, 30.0, 1.0));
    }

    #[test]
    fn test_invalid_token_names_argument() {
        let err = RangeTable::parse("0 abc 1").unwrap_err();
        match err {
            ReclassError::InvalidArgument { argument, .. } => assert_eq!(argument, "abc"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_token_after_valid_rules_fails_whole_parse() {
        assert!(RangeTable::parse("0 10 1; 10 20 x").is_err());
    }

    #[test]
    fn test_empty_specification() {
        for spec in ["", " ; ;", "1; 1 2 3 4"] {
            match RangeTable::parse(spec) {
                Err(ReclassError::InvalidArgument { argument, .. }) => assert_eq!(argument, "ranges"),
                other => panic!("unexpected result for {spec:?}: {other:?}"),
            }
        }
        assert!(matches!(
            RangeTable::from_rules(Vec::new()),
            Err(ReclassError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_nan_and_reversed_bounds_rejected() {
        assert!(RangeTable::parse("NaN 10 1").is_err());
        assert!(RangeTable::parse("10 0 1").is_err());
    }

    #[test]
    fn test_class_value_beyond_f32_rejected() {
        assert!(RangeTable::parse("0 10 1e39").is_err());
        assert!(RangeTable::parse("0 10 inf").is_err());
    }

    #[test]
    fn test_class_value_colliding_with_float_nodata_rejected() {
        for spec in ["0 10 1e-45", "0 10 1.2e-45", "0 10 1; 10 20 1.4e-45"] {
            assert!(
                matches!(RangeTable::parse(spec), Err(ReclassError::InvalidArgument { .. })),
                "{spec} should be rejected"
            );
        }
        // zero and the smallest normal float are still valid codes
        assert!(RangeTable::parse("0 10 0").is_ok());
        assert!(RangeTable::parse(&format!("0 10 {}", f32::MIN_POSITIVE)).is_ok());
    }

    #[test]
    fn test_infinite_bounds_allowed() {
        let table = RangeTable::parse("-inf 0 1; 0 inf 2").unwrap();
        assert_eq!(table.classify(-1e300), Some(1.0));
        assert_eq!(table.classify(1e300), Some(2.0));
    }

    #[test]
    fn test_from_rules_matches_parse() {
        let built = RangeTable::from_rules([
            ClassificationRule::new(30.0, 270.0, 2.0),
            ClassificationRule::new(0.0, 30.0, 1.0),
            ClassificationRule::open_ended(270.0, 3.0),
        ])
        .unwrap();
        let parsed = RangeTable::parse("0 30 1; 30 270 2; 270 3").unwrap();
        assert_eq!(built, parsed);
    }

    #[test]
    fn test_from_str() {
        let table: RangeTable = "0 1 1".parse().unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_upper_bound_tolerance() {
        let rule = ClassificationRule::new(270.0, 365.0, 3.0);
        assert!(rule.contains(365.0));
        assert!(rule.contains(365.0 + TOLERANCE / 2.0));
        assert!(!rule.contains(365.0 + TOLERANCE * 2.0));
        assert!(!rule.contains(269.9));
    }
}
