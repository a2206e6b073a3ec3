//! Weighted information measures over discrete columns.
//! Every measure uses natural logarithms and
//! treats the weights as unnormalized instance masses.
use std::collections::HashMap;

use rayon::prelude::*;

use crate::common::checker;
use crate::{Result, Sample};


/// `H(X)` of a column with values in `[0, states)`.
pub(crate) fn entropy(values: &[usize], states: usize, weights: &[f64]) -> f64 {
    let mut mass = vec![0.0; states];
    values.iter()
        .zip(weights)
        .for_each(|(&v, &w)| { mass[v] += w; });
    entropy_of_masses(&mass)
}


/// `H(X | Y)`.
pub(crate) fn conditional_entropy(
    x: &[usize],
    x_states: usize,
    y: &[usize],
    y_states: usize,
    weights: &[f64],
) -> f64
{
    let mut joint = vec![0.0; x_states * y_states];
    let mut marginal = vec![0.0; y_states];
    x.iter()
        .zip(y)
        .zip(weights)
        .for_each(|((&xv, &yv), &w)| {
            joint[yv * x_states + xv] += w;
            marginal[yv] += w;
        });

    let total = marginal.iter().sum::<f64>();
    if total <= 0.0 {
        return 0.0;
    }
    marginal.iter()
        .zip(joint.chunks(x_states))
        .filter(|(&m, _)| m > 0.0)
        .map(|(&m, row)| m / total * entropy_of_masses(row))
        .sum::<f64>()
}


/// `I(X; Y) = H(X) - H(X | Y)`.
pub(crate) fn mutual_information(
    x: &[usize],
    x_states: usize,
    y: &[usize],
    y_states: usize,
    weights: &[f64],
) -> f64
{
    let mi = entropy(x, x_states, weights)
        - conditional_entropy(x, x_states, y, y_states, weights);
    mi.max(0.0)
}


/// `SU(X, Y) = 2 I(X; Y) / (H(X) + H(Y))`, `0` when both entropies vanish.
pub(crate) fn symmetric_uncertainty(
    x: &[usize],
    x_states: usize,
    y: &[usize],
    y_states: usize,
    weights: &[f64],
) -> f64
{
    let denom = entropy(x, x_states, weights) + entropy(y, y_states, weights);
    if denom <= 0.0 {
        return 0.0;
    }
    2.0 * mutual_information(x, x_states, y, y_states, weights) / denom
}


#[inline]
fn entropy_of_masses(mass: &[f64]) -> f64 {
    let total = mass.iter().sum::<f64>();
    if total <= 0.0 {
        return 0.0;
    }
    mass.iter()
        .filter(|&&m| m > 0.0)
        .map(|&m| {
            let p = m / total;
            -p * p.ln()
        })
        .sum::<f64>()
}


/// Symmetric uncertainties of a weighted sample,
/// with the feature-feature values memoized.
pub(crate) struct SuCache<'a> {
    sample: &'a Sample,
    weights: &'a [f64],
    with_class: Vec<f64>,
    between: HashMap<(usize, usize), f64>,
}


impl<'a> SuCache<'a> {
    pub(crate) fn new(sample: &'a Sample, weights: &'a [f64]) -> Result<Self> {
        checker::check_sample(sample)?;
        checker::check_weights(weights, sample.shape().0)?;

        let target = sample.target();
        let n_classes = sample.n_classes();
        let with_class = sample.features()
            .par_iter()
            .zip(sample.states())
            .map(|(feat, &s)| {
                symmetric_uncertainty(&feat.values, s, target, n_classes, weights)
            })
            .collect::<Vec<_>>();

        Ok(Self { sample, weights, with_class, between: HashMap::new() })
    }


    /// `SU(feature, class)` of every feature.
    pub(crate) fn with_class(&self) -> &[f64] {
        &self.with_class[..]
    }


    /// `SU(a, b)` of two features.
    pub(crate) fn between(&mut self, a: usize, b: usize) -> f64 {
        let key = if a < b { (a, b) } else { (b, a) };
        let (sample, weights) = (self.sample, self.weights);
        *self.between.entry(key)
            .or_insert_with(|| {
                let features = sample.features();
                let states = sample.states();
                symmetric_uncertainty(
                    &features[key.0].values, states[key.0],
                    &features[key.1].values, states[key.1],
                    weights,
                )
            })
    }


    /// CFS merit of `subset`:
    /// `Σ SU(f, class) / sqrt(n + (n² - n) Σ_{pairs} SU(f, g))`.
    pub(crate) fn merit(&mut self, subset: &[usize]) -> f64 {
        let n = subset.len() as f64;
        if subset.is_empty() {
            return 0.0;
        }
        let rcf = subset.iter()
            .map(|&f| self.with_class[f])
            .sum::<f64>();
        let mut rff = 0.0;
        for (i, &a) in subset.iter().enumerate() {
            for &b in &subset[..i] {
                rff += self.between(a, b);
            }
        }
        rcf / (n + (n * n - n) * rff).sqrt()
    }


    /// Features sorted by decreasing `SU(feature, class)`;
    /// ties keep the lower index first.
    pub(crate) fn order_by_relevance(&self) -> Vec<usize> {
        let mut order = (0..self.with_class.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| self.with_class[b].total_cmp(&self.with_class[a]));
        order
    }
}
