//! Descriptive statistics over execution samples

use serde::Serialize;

/// Count, mean, extremes and sample standard deviation of a series
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SampleStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
}

impl SampleStats {
    /// Non-finite values are ignored. An empty series gives all zeros.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if values.is_empty() {
            return Self::default();
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // n - 1 denominator; a single sample has no spread
        let std = if count < 2 {
            0.0
        } else {
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        };

        Self {
            count,
            mean,
            min,
            max,
            std,
        }
    }
}

/// Mean of a series, 0 when empty
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    SampleStats::from_values(values).mean
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stats() {
        let stats = SampleStats::from_values([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.count, 8);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert!((stats.std - 2.138089935).abs() < 1e-6);
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(SampleStats::from_values(Vec::new()), SampleStats::default());

        let single = SampleStats::from_values([0.3]);
        assert_eq!(single.count, 1);
        assert_eq!(single.std, 0.0);
        assert_eq!(single.min, 0.3);
    }

    #[test]
    fn test_non_finite_ignored() {
        let stats = SampleStats::from_values([1.0, f64::NAN, 3.0, f64::INFINITY]);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 2.0);
    }
}
