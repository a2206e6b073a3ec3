use crate::{Result, Sample};
use super::metrics::SuCache;
use super::FeatureSelector;


/// Incremental wrapper subset selection driven by the CFS merit.
/// Features are tried by decreasing `SU(f, class)`;
/// a feature is kept while the merit improves
/// or changes by less than `threshold` relative to the current merit.
#[derive(Debug, Clone, Copy)]
pub struct Iwss {
    threshold: f64,
    max_features: usize,
}


impl Iwss {
    /// Selector with relative tolerance `threshold`
    /// keeping at most `max_features` features (`0` means no limit).
    pub fn new(threshold: f64, max_features: usize) -> Self {
        Self { threshold, max_features }
    }
}


impl FeatureSelector for Iwss {
    fn name(&self) -> &str {
        "IWSS"
    }


    fn select(&self, sample: &Sample, weights: &[f64]) -> Result<Vec<usize>> {
        let mut su = SuCache::new(sample, weights)?;
        let order = su.order_by_relevance();
        let limit = super::limit(self.max_features, sample.shape().1);

        let mut selected = order.iter()
            .copied()
            .take(2.min(limit))
            .collect::<Vec<_>>();
        let mut merit = su.merit(&selected);

        for &feature in order.iter().skip(selected.len()) {
            if selected.len() >= limit {
                break;
            }
            selected.push(feature);
            let candidate = su.merit(&selected);
            let delta = if merit != 0.0 {
                (merit - candidate).abs() / merit
            } else {
                0.0
            };
            if candidate > merit || delta < self.threshold {
                merit = merit.max(candidate);
            } else {
                selected.pop();
                break;
            }
        }
        Ok(selected)
    }
}
