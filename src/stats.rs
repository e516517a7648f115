//! Shared statistics helpers
//!
//! Descriptive statistics, the independent two-sample Student's t-test, and
//! Cohen's d with pooled sample standard deviation. Everything returns
//! structured values; rendering is the caller's concern.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::AnalysisError;
use crate::types::{CohensD, EffectMagnitude, SummaryStats, TTestResult};

/// Round to `decimals` places using round-half-to-even (banker's rounding)
pub fn round_half_even(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    let floor = scaled.floor();
    // Tie detection tolerates the tiny drift from the scale multiply
    let rounded = if ((scaled - floor) - 0.5).abs() < 1e-9 {
        if (floor as i64) % 2 == 0 {
            floor
        } else {
            floor + 1.0
        }
    } else {
        scaled.round()
    };
    rounded / factor
}

/// Arithmetic mean; caller guarantees a non-empty slice
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median with midpoint averaging for even-length input
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Sample variance (ddof = 1); caller guarantees at least 2 observations
fn sample_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Compute the descriptive statistics bundle for one column of values.
///
/// The standard deviation is the sample (ddof = 1) form and is omitted
/// below 2 observations. All values are rounded at `decimals`.
pub fn describe(values: &[f64], label: &str, decimals: u32) -> Result<SummaryStats, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::too_few(label, 1, 0));
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let std_dev = if values.len() >= 2 {
        Some(round_half_even(sample_variance(values).sqrt(), decimals))
    } else {
        None
    };

    Ok(SummaryStats {
        label: label.to_string(),
        mean: round_half_even(mean(values), decimals),
        median: round_half_even(median(values), decimals),
        std_dev,
        min: round_half_even(min, decimals),
        max: round_half_even(max, decimals),
        count: values.len(),
    })
}

/// Independent two-sample Student's t-test (pooled variance, two-tailed).
///
/// Both samples need at least 2 observations; degrees of freedom are
/// n1 + n2 - 2. A degenerate pooled variance of zero is reported as a
/// `Statistics` error rather than an infinite statistic.
pub fn students_t_test(sample1: &[f64], sample2: &[f64]) -> Result<TTestResult, AnalysisError> {
    check_sample_size(sample1, "t-test sample 1")?;
    check_sample_size(sample2, "t-test sample 2")?;

    let (n1, n2) = (sample1.len() as f64, sample2.len() as f64);
    let (v1, v2) = (sample_variance(sample1), sample_variance(sample2));
    let df = n1 + n2 - 2.0;
    let pooled_var = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / df;

    let standard_error = (pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt();
    if standard_error == 0.0 {
        return Err(AnalysisError::Statistics(
            "zero pooled variance in t-test".to_string(),
        ));
    }

    let statistic = (mean(sample1) - mean(sample2)) / standard_error;
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| AnalysisError::Statistics(format!("t distribution: {e}")))?;
    let p_value = 2.0 * (1.0 - dist.cdf(statistic.abs()));

    Ok(TTestResult {
        statistic,
        p_value,
        df,
    })
}

/// Cohen's d for independent samples.
///
/// d = (mean1 - mean2) / pooled_std with ddof = 1 variances; the rounded
/// effect size is classified into magnitude bands by absolute value, so
/// the result is sign-symmetric under sample swap.
pub fn cohens_d(
    sample1: &[f64],
    sample2: &[f64],
    decimals: u32,
) -> Result<CohensD, AnalysisError> {
    check_sample_size(sample1, "Cohen's d sample 1")?;
    check_sample_size(sample2, "Cohen's d sample 2")?;

    let (n1, n2) = (sample1.len() as f64, sample2.len() as f64);
    let (v1, v2) = (sample_variance(sample1), sample_variance(sample2));
    let pooled_std = (((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / (n1 + n2 - 2.0)).sqrt();

    if pooled_std == 0.0 {
        return Err(AnalysisError::Statistics(
            "zero pooled standard deviation in Cohen's d".to_string(),
        ));
    }

    let effect_size = round_half_even((mean(sample1) - mean(sample2)) / pooled_std, decimals);

    Ok(CohensD {
        effect_size,
        magnitude: EffectMagnitude::classify(effect_size),
    })
}

fn check_sample_size(sample: &[f64], context: &str) -> Result<(), AnalysisError> {
    if sample.len() < 2 {
        return Err(AnalysisError::too_few(context, 2, sample.len()));
    }
    Ok(())
}

/// One bin of a histogram over `[lower, upper)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Bin counts over `[0, upper)` at `bin_width`; values outside the range
/// are dropped, matching fixed-edge histogram plotting
pub fn histogram(values: &[f64], bin_width: f64, upper: f64) -> Vec<HistogramBin> {
    let n_bins = (upper / bin_width).ceil() as usize;
    let mut bins: Vec<HistogramBin> = (0..n_bins)
        .map(|i| HistogramBin {
            lower: i as f64 * bin_width,
            upper: (i + 1) as f64 * bin_width,
            count: 0,
        })
        .collect();

    for &v in values {
        if v >= 0.0 && v < upper {
            let idx = ((v / bin_width) as usize).min(n_bins.saturating_sub(1));
            bins[idx].count += 1;
        }
    }

    bins
}
