//! Feature relevance measures and the selectors
//! that seed the boosting ensemble.

pub(crate) mod metrics;
pub(crate) mod ranking;
pub(crate) mod cfs;
pub(crate) mod fcbf;
pub(crate) mod iwss;


use serde::{Serialize, Deserialize};

use crate::{Error, Result, Sample};

pub use ranking::select_k_best_weighted;
pub use cfs::Cfs;
pub use fcbf::Fcbf;
pub use iwss::Iwss;


/// A one-shot feature selector over a weighted sample.
pub trait FeatureSelector {
    /// Returns the name of the selector.
    fn name(&self) -> &str;


    /// Selected feature indices in selection order.
    fn select(&self, sample: &Sample, weights: &[f64]) -> Result<Vec<usize>>;
}


/// Selector used to seed the ensemble before boosting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectFeatures {
    /// No seeding.
    #[default]
    None,
    /// [`Cfs`].
    Cfs,
    /// [`Fcbf`], threshold in `[1e-7, 1]`.
    Fcbf,
    /// [`Iwss`], threshold in `[0, 0.5]`.
    Iwss,
}


impl SelectFeatures {
    /// Check `threshold` against the range the selector accepts.
    pub fn check_threshold(&self, threshold: f64) -> Result<()> {
        let valid = match self {
            Self::None | Self::Cfs => true,
            Self::Fcbf => (1e-7..=1.0).contains(&threshold),
            Self::Iwss => (0.0..=0.5).contains(&threshold),
        };
        if !valid {
            let message = format!(
                "invalid threshold {threshold} for {:?}", self
            );
            return Err(Error::InvalidConfig(message));
        }
        Ok(())
    }


    /// Build the selector, or `None` for [`SelectFeatures::None`].
    pub fn build(&self, threshold: f64, max_features: usize)
        -> Result<Option<Box<dyn FeatureSelector>>>
    {
        self.check_threshold(threshold)?;
        let selector: Box<dyn FeatureSelector> = match self {
            Self::None => return Ok(None),
            Self::Cfs => Box::new(Cfs::new(max_features)),
            Self::Fcbf => Box::new(Fcbf::new(threshold, max_features)),
            Self::Iwss => Box::new(Iwss::new(threshold, max_features)),
        };
        Ok(Some(selector))
    }
}


// `max_features = 0` means every feature.
#[inline]
fn limit(max_features: usize, n_features: usize) -> usize {
    if max_features == 0 { n_features } else { max_features.min(n_features) }
}
