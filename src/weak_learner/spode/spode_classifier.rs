use serde::{Serialize, Deserialize};

use crate::common::checker;
use crate::{Classifier, Result, Sample};
use super::smoothing::Smoothing;
use super::tables::ProbabilityTables;


/// Super-parent one-dependence estimator.
/// Every feature depends on the class and on the single
/// super-parent feature.
///
/// # Example
/// ```no_run
/// use spodeboost::prelude::*;
///
/// let x = vec![vec![0, 0, 1, 1], vec![0, 1, 0, 1]];
/// let y = vec![0, 0, 1, 1];
/// let sample = Sample::from_columns(x, y).unwrap();
///
/// let weights = vec![1.0; 4];
/// let spode = Spode::fit(&sample, &weights, 0, Smoothing::Original).unwrap();
///
/// assert_eq!(spode.predict_all(&sample).unwrap(), vec![0, 0, 1, 1]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spode {
    super_parent: usize,
    smoothing: Smoothing,
    tables: ProbabilityTables,
}


impl Spode {
    /// Fit a SPODE rooted at `super_parent` on `sample`
    /// with one non-negative weight per row.
    pub fn fit(
        sample: &Sample,
        weights: &[f64],
        super_parent: usize,
        smoothing: Smoothing,
    ) -> Result<Self>
    {
        checker::check_feature(super_parent, sample.shape().1)?;
        let alpha = smoothing.alpha(sample.shape().0);
        let tables = ProbabilityTables::from_sample(sample, weights, alpha)?;

        Ok(Self { super_parent, smoothing, tables })
    }


    /// Index of the super-parent feature.
    #[inline]
    pub fn super_parent(&self) -> usize {
        self.super_parent
    }


    /// Smoothing used at fit time.
    #[inline]
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }


    /// Fitted probability tables.
    #[inline]
    pub fn tables(&self) -> &ProbabilityTables {
        &self.tables
    }
}


impl Classifier for Spode {
    fn n_classes(&self) -> usize {
        self.tables.n_classes()
    }


    fn predict_proba(&self, instance: &[usize]) -> Result<Vec<f64>> {
        self.tables.predict_proba_spode(instance, self.super_parent)
    }
}
