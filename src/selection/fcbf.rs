use crate::{Result, Sample};
use super::metrics::SuCache;
use super::FeatureSelector;


/// Fast correlation-based filter.
/// Walks the features by decreasing `SU(f, class)`,
/// stops below `threshold` and drops every later feature `g`
/// with `SU(f, g) >= SU(g, class)`.
#[derive(Debug, Clone, Copy)]
pub struct Fcbf {
    threshold: f64,
    max_features: usize,
}


impl Fcbf {
    /// Selector with relevance `threshold`
    /// keeping at most `max_features` features (`0` means no limit).
    pub fn new(threshold: f64, max_features: usize) -> Self {
        Self { threshold, max_features }
    }
}


impl FeatureSelector for Fcbf {
    fn name(&self) -> &str {
        "FCBF"
    }


    fn select(&self, sample: &Sample, weights: &[f64]) -> Result<Vec<usize>> {
        let mut su = SuCache::new(sample, weights)?;
        let mut candidates = su.order_by_relevance();
        let relevance = su.with_class().to_vec();
        let limit = super::limit(self.max_features, sample.shape().1);

        let mut selected = Vec::new();
        while !candidates.is_empty() {
            let feature = candidates.remove(0);
            let score = relevance[feature];
            if score == 0.0 || score < self.threshold {
                break;
            }
            candidates.retain(|&other| su.between(feature, other) < relevance[other]);

            selected.push(feature);
            if selected.len() == limit {
                break;
            }
        }
        Ok(selected)
    }
}
