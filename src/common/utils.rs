//! This file provides some common numeric helpers
//! such as posterior normalization and weighted error.
use crate::{Error, Result};


/// Divide `probs` by its sum so that it becomes a distribution.
/// A zero sum leaves `probs` untouched;
/// a NaN sum is an error.
#[inline]
pub(crate) fn normalize_posterior(probs: &mut [f64]) -> Result<()> {
    let mut sum = probs.iter().sum::<f64>();
    if sum.is_infinite() {
        // Finite entries whose sum overflows.
        let max = probs.iter().copied().fold(0.0, f64::max);
        probs.iter_mut()
            .for_each(|p| { *p /= max; });
        sum = probs.iter().sum::<f64>();
    }
    if sum.is_nan() {
        return Err(Error::NanPosterior);
    }
    if sum == 0.0 {
        return Ok(());
    }
    probs.iter_mut()
        .for_each(|p| { *p /= sum; });
    Ok(())
}


/// Index of the largest entry; ties go to the lowest index.
#[inline]
pub(crate) fn argmax(probs: &[f64]) -> usize {
    let mut best = 0;
    for (i, &p) in probs.iter().enumerate().skip(1) {
        if p > probs[best] {
            best = i;
        }
    }
    best
}


/// Fraction of positions where `predictions` equals `target`.
#[inline]
pub(crate) fn accuracy(target: &[usize], predictions: &[usize]) -> f64 {
    if target.is_empty() {
        return 0.0;
    }
    let correct = target.iter()
        .zip(predictions)
        .filter(|(y, p)| y == p)
        .count();
    correct as f64 / target.len() as f64
}


/// Rescale instance weights so that they sum to `weights.len()`.
/// Non-positive and non-finite weights become `0` and carry no mass.
/// Weights that are all exactly zero are replaced by ones.
#[inline]
pub(crate) fn rescale_weights(weights: &[f64]) -> Vec<f64> {
    if weights.iter().all(|&w| w == 0.0) {
        return vec![1.0; weights.len()];
    }
    let mut clamped = weights.iter()
        .map(|&w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
        .collect::<Vec<_>>();

    let sum = clamped.iter().sum::<f64>();
    if sum > 0.0 {
        let n_sample = weights.len() as f64;
        clamped.iter_mut()
            .for_each(|w| { *w *= n_sample / sum; });
    }
    clamped
}
