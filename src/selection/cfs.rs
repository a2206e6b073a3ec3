use crate::{Result, Sample};
use super::metrics::SuCache;
use super::FeatureSelector;


// Stop after this many fully expanded subsets without improvement.
const MAX_NON_IMPROVING: usize = 5;


/// Correlation-based feature selection.
/// Greedy forward search that maximizes the CFS merit
/// `Σ SU(f, class) / sqrt(n + (n² - n) Σ SU(f, g))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cfs {
    max_features: usize,
}


impl Cfs {
    /// Selector keeping at most `max_features` features
    /// (`0` means no limit).
    pub fn new(max_features: usize) -> Self {
        Self { max_features }
    }


    // `true` when the last `MAX_NON_IMPROVING` scores never increase.
    fn stalled(scores: &[f64]) -> bool {
        if scores.len() < MAX_NON_IMPROVING {
            return false;
        }
        scores[scores.len() - MAX_NON_IMPROVING..]
            .windows(2)
            .all(|w| w[1] <= w[0])
    }
}


impl FeatureSelector for Cfs {
    fn name(&self) -> &str {
        "CFS"
    }


    fn select(&self, sample: &Sample, weights: &[f64]) -> Result<Vec<usize>> {
        let mut su = SuCache::new(sample, weights)?;
        let mut remaining = su.order_by_relevance();

        let first = remaining.remove(0);
        let mut selected = vec![first];
        let mut scores = vec![su.with_class()[first]];

        let limit = super::limit(self.max_features, sample.shape().1);
        while selected.len() < limit && !remaining.is_empty() {
            let mut best: Option<(usize, f64)> = None;
            for (pos, &feature) in remaining.iter().enumerate() {
                selected.push(feature);
                let merit = su.merit(&selected);
                selected.pop();
                if best.map_or(true, |(_, m)| merit > m) {
                    best = Some((pos, merit));
                }
            }
            let Some((pos, merit)) = best else { break; };
            selected.push(remaining.remove(pos));
            scores.push(merit);

            if Self::stalled(&scores) {
                break;
            }
        }
        Ok(selected)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stalls_after_five_non_improving_scores() {
        assert!(!Cfs::stalled(&[0.5, 0.4, 0.3, 0.2]));
        assert!(Cfs::stalled(&[0.9, 0.5, 0.4, 0.3, 0.2, 0.1]));
        assert!(!Cfs::stalled(&[0.5, 0.4, 0.6, 0.3, 0.2]));
    }
}
