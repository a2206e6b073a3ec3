use rayon::prelude::*;

use crate::common::checker;
use crate::{Result, Sample};
use super::metrics;


/// Rank the features of `sample` by their weighted mutual information
/// with the class and return the first `k` of them
/// (`k = 0` returns every feature).
/// Ties keep the lower feature index first in both orders.
pub fn select_k_best_weighted(
    sample: &Sample,
    weights: &[f64],
    ascending: bool,
    k: usize,
) -> Result<Vec<usize>>
{
    checker::check_sample(sample)?;
    let (n_sample, n_feature) = sample.shape();
    checker::check_weights(weights, n_sample)?;

    let target = sample.target();
    let n_classes = sample.n_classes();
    let scores = sample.features()
        .par_iter()
        .zip(sample.states())
        .map(|(feat, &s)| {
            metrics::mutual_information(&feat.values, s, target, n_classes, weights)
        })
        .collect::<Vec<_>>();

    let mut ranking = (0..n_feature).collect::<Vec<_>>();
    if ascending {
        ranking.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));
    } else {
        ranking.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    }

    if k > 0 {
        ranking.truncate(k);
    }
    Ok(ranking)
}
