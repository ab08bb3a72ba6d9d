/// Min/max of the classified values seen during a scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningStatistics {
    min: f64,
    max: f64,
    count: u64,
}

/// Finalized statistics of a classified band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassStatistics {
    pub min: f64,
    pub max: f64,
    pub count: u64,
}

impl RunningStatistics {
    pub fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            count: 0,
        }
    }

    #[inline]
    pub fn update(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.count += 1;
    }

    pub fn merge(&mut self, other: &RunningStatistics) {
        if other.count == 0 {
            return;
        }
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.count += other.count;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// `None` when no cell was classified.
    pub fn finish(&self) -> Option<ClassStatistics> {
        (self.count > 0).then_some(ClassStatistics {
            min: self.min,
            max: self.max,
            count: self.count,
        })
    }
}

impl Default for RunningStatistics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_statistics() {
        assert_eq!(RunningStatistics::new().finish(), None);
    }

    #[test]
    fn test_update() {
        let mut stats = RunningStatistics::new();
        for v in [3.0, 1.0, 7.0, 1.0] {
            stats.update(v);
        }
        assert_eq!(
            stats.finish(),
            Some(ClassStatistics {
                min: 1.0,
                max: 7.0,
                count: 4
            })
        );
    }

    #[test]
    fn test_merge() {
        let mut a = RunningStatistics::new();
        a.update(5.0);
        let mut b = RunningStatistics::new();
        b.update(-2.0);
        b.update(9.0);

        a.merge(&b);
        a.merge(&RunningStatistics::new());

        let stats = a.finish().unwrap();
        assert_eq!((stats.min, stats.max, stats.count), (-2.0, 9.0, 3));
    }
}
