use fixedbitset::FixedBitSet;
use serde::{Serialize, Deserialize};

use crate::common::{checker, utils};
use crate::{Classifier, Error, Result, Sample};
use super::smoothing::Smoothing;
use super::tables::ProbabilityTables;


/// Averaged one-dependence estimators over a set of active super-parents
/// that share one set of probability tables.
///
/// The posterior sums the unnormalized SPODE joints of the
/// active parents class-wise and normalizes the sum.
/// Active parents are added and removed from the tail only,
/// so the tables never need to be rebuilt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aode {
    smoothing: Smoothing,
    tables: ProbabilityTables,
    active_parents: Vec<usize>,
    is_active: FixedBitSet,
}


impl Aode {
    /// Fit the tables on `sample` and activate every feature.
    pub fn fit(sample: &Sample, weights: &[f64], smoothing: Smoothing)
        -> Result<Self>
    {
        let parents = (0..sample.shape().1).collect::<Vec<_>>();
        Self::fit_with_parents(sample, weights, &parents, smoothing)
    }


    /// Fit the tables on `sample` and activate `parents` in order.
    pub fn fit_with_parents(
        sample: &Sample,
        weights: &[f64],
        parents: &[usize],
        smoothing: Smoothing,
    ) -> Result<Self>
    {
        let (n_sample, n_feature) = sample.shape();
        let alpha = smoothing.alpha(n_sample);
        let tables = ProbabilityTables::from_sample(sample, weights, alpha)?;

        let mut aode = Self {
            smoothing,
            tables,
            active_parents: Vec::with_capacity(parents.len()),
            is_active: FixedBitSet::with_capacity(n_feature),
        };
        for &parent in parents {
            aode.add_active_parent(parent)?;
        }
        Ok(aode)
    }


    /// Append `parent` to the active parents.
    pub fn add_active_parent(&mut self, parent: usize) -> Result<()> {
        checker::check_feature(parent, self.tables.n_features())?;
        if self.is_active.contains(parent) {
            return Err(Error::DuplicateParent(parent));
        }
        self.is_active.insert(parent);
        self.active_parents.push(parent);
        Ok(())
    }


    /// Remove and return the most recently added active parent.
    pub fn remove_last_parent(&mut self) -> Result<usize> {
        let parent = self.active_parents.pop()
            .ok_or(Error::NoActiveParent)?;
        self.is_active.set(parent, false);
        Ok(parent)
    }


    /// Active parents in insertion order.
    #[inline]
    pub fn active_parents(&self) -> &[usize] {
        &self.active_parents[..]
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


    /// Posterior under the single super-parent `parent`,
    /// which does not need to be active.
    pub fn predict_proba_spode(&self, instance: &[usize], parent: usize)
        -> Result<Vec<f64>>
    {
        self.tables.predict_proba_spode(instance, parent)
    }


    /// Class predicted under the single super-parent `parent`.
    pub fn predict_spode(&self, instance: &[usize], parent: usize)
        -> Result<usize>
    {
        let probs = self.predict_proba_spode(instance, parent)?;
        Ok(utils::argmax(&probs))
    }
}


impl Classifier for Aode {
    fn n_classes(&self) -> usize {
        self.tables.n_classes()
    }


    fn predict_proba(&self, instance: &[usize]) -> Result<Vec<f64>> {
        self.tables.predict_proba_averaged(instance, &self.active_parents)
    }
}
