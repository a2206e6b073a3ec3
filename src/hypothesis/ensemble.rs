use fixedbitset::FixedBitSet;
use serde::{Serialize, Deserialize};

use crate::common::{checker, utils};
use crate::{Classifier, Error, Result};


/// Outcome flag of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    /// Every feature was used as a super-parent.
    #[default]
    Ok,
    /// Training stopped before every feature was used.
    Warning,
}


/// Human-readable notes on a training run and its [`Status`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    notes: Vec<String>,
    status: Status,
}


impl Diagnostics {
    /// Notes in the order they were recorded.
    pub fn notes(&self) -> &[String] {
        &self.notes[..]
    }


    /// Final status.
    pub fn status(&self) -> Status {
        self.status
    }


    pub(crate) fn add_note<S: Into<String>>(&mut self, note: S) {
        self.notes.push(note.into());
    }


    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}


/// A significance-weighted ensemble of classifiers,
/// each one owned by a distinct feature.
/// This is the struct the boosting algorithms in this crate return.
/// You can read/write this struct by `Serde` trait.
///
/// Members are pushed and popped from the tail only,
/// so the member list and the feature set never drift apart.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Ensemble<H> {
    n_features: usize,
    n_classes: usize,

    features: Vec<usize>,
    significances: Vec<f64>,
    hypotheses: Vec<H>,
    used: FixedBitSet,

    diagnostics: Diagnostics,
}


impl<H> Ensemble<H> {
    /// Construct an empty ensemble over `n_features` features
    /// and `n_classes` classes.
    pub fn new(n_features: usize, n_classes: usize) -> Self {
        Self {
            n_features,
            n_classes,
            features: Vec::new(),
            significances: Vec::new(),
            hypotheses: Vec::new(),
            used: FixedBitSet::with_capacity(n_features),
            diagnostics: Diagnostics::default(),
        }
    }


    /// Append `hypothesis`, owned by `feature`, with weight `significance`.
    #[inline]
    pub fn push(&mut self, feature: usize, hypothesis: H, significance: f64)
        -> Result<()>
    {
        checker::check_feature(feature, self.n_features)?;
        if self.used.contains(feature) {
            return Err(Error::DuplicateFeature(feature));
        }
        self.used.insert(feature);
        self.features.push(feature);
        self.hypotheses.push(hypothesis);
        self.significances.push(significance);
        Ok(())
    }


    /// Remove the most recently pushed member
    /// and return its feature, hypothesis and significance.
    #[inline]
    pub fn pop_last(&mut self) -> Result<(usize, H, f64)> {
        let feature = self.features.pop()
            .ok_or(Error::EmptyEnsemble)?;
        let hypothesis = self.hypotheses.pop()
            .ok_or(Error::EmptyEnsemble)?;
        let significance = self.significances.pop()
            .ok_or(Error::EmptyEnsemble)?;
        self.used.set(feature, false);
        Ok((feature, hypothesis, significance))
    }


    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.hypotheses.len()
    }


    /// Returns `true` if the ensemble has no member.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hypotheses.is_empty()
    }


    /// Returns `true` if `feature` owns a member.
    #[inline]
    pub fn contains_feature(&self, feature: usize) -> bool {
        self.used.contains(feature)
    }


    /// Owning features in insertion order.
    pub fn features(&self) -> &[usize] {
        &self.features[..]
    }


    /// Significances in insertion order.
    pub fn significances(&self) -> &[f64] {
        &self.significances[..]
    }


    /// Members in insertion order.
    pub fn hypotheses(&self) -> &[H] {
        &self.hypotheses[..]
    }


    /// Significance indexed by feature; `0` for features without a member.
    pub fn significance_by_feature(&self) -> Vec<f64> {
        let mut by_feature = vec![0.0; self.n_features];
        self.features.iter()
            .zip(&self.significances)
            .for_each(|(&f, &s)| { by_feature[f] = s; });
        by_feature
    }


    /// Notes and status of the training run.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }


    pub(crate) fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }


    /// Overwrite the significance of every member from `start` on.
    pub(crate) fn set_significances_from(&mut self, start: usize, significance: f64) {
        self.significances.iter_mut()
            .skip(start)
            .for_each(|s| { *s = significance; });
    }


    /// Decompose the ensemble
    /// into the owning features, the significances and the members.
    #[inline]
    pub fn decompose(self) -> (Vec<usize>, Vec<f64>, Vec<H>) {
        (self.features, self.significances, self.hypotheses)
    }
}


impl<H> Classifier for Ensemble<H>
    where H: Classifier,
{
    fn n_classes(&self) -> usize {
        self.n_classes
    }


    /// Significance-weighted average of the member posteriors.
    /// Members are averaged uniformly when every significance is zero.
    fn predict_proba(&self, instance: &[usize]) -> Result<Vec<f64>> {
        if self.is_empty() {
            return Err(Error::EmptyEnsemble);
        }
        let total = self.significances.iter().sum::<f64>();
        let uniform = total == 0.0;

        let mut probs = vec![0.0; self.n_classes];
        for (h, &s) in self.hypotheses.iter().zip(&self.significances) {
            let weight = if uniform { 1.0 } else { s };
            if weight == 0.0 {
                continue;
            }
            let p = h.predict_proba(instance)?;
            probs.iter_mut()
                .zip(p)
                .for_each(|(acc, p)| { *acc += weight * p; });
        }
        utils::normalize_posterior(&mut probs)?;
        Ok(probs)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    /// Always answers the same posterior.
    struct Constant(Vec<f64>);

    impl Classifier for Constant {
        fn n_classes(&self) -> usize {
            self.0.len()
        }

        fn predict_proba(&self, _: &[usize]) -> Result<Vec<f64>> {
            Ok(self.0.clone())
        }
    }


    #[test]
    fn stack_discipline() {
        let mut ensemble = Ensemble::new(3, 2);
        ensemble.push(2, Constant(vec![1.0, 0.0]), 0.5).unwrap();
        ensemble.push(0, Constant(vec![0.0, 1.0]), 0.25).unwrap();
        assert!(matches!(
            ensemble.push(2, Constant(vec![1.0, 0.0]), 1.0),
            Err(Error::DuplicateFeature(2))
        ));
        assert!(matches!(
            ensemble.push(3, Constant(vec![1.0, 0.0]), 1.0),
            Err(Error::FeatureOutOfRange { .. })
        ));
        assert_eq!(ensemble.significance_by_feature(), vec![0.25, 0.0, 0.5]);

        let (f, _, s) = ensemble.pop_last().unwrap();
        assert_eq!((f, s), (0, 0.25));
        assert!(!ensemble.contains_feature(0));
        assert_eq!(ensemble.significance_by_feature(), vec![0.0, 0.0, 0.5]);

        ensemble.pop_last().unwrap();
        assert!(matches!(ensemble.pop_last(), Err(Error::EmptyEnsemble)));
    }


    #[test]
    fn weighted_and_uniform_average() {
        let mut ensemble = Ensemble::new(2, 2);
        ensemble.push(0, Constant(vec![1.0, 0.0]), 3.0).unwrap();
        ensemble.push(1, Constant(vec![0.0, 1.0]), 1.0).unwrap();
        let p = ensemble.predict_proba(&[0, 0]).unwrap();
        assert!((p[0] - 0.75).abs() < 1e-12);

        ensemble.set_significances_from(0, 0.0);
        let p = ensemble.predict_proba(&[0, 0]).unwrap();
        assert!((p[0] - 0.5).abs() < 1e-12);
    }


    #[test]
    fn empty_ensemble_cannot_predict() {
        let ensemble = Ensemble::<Constant>::new(2, 2);
        assert!(matches!(ensemble.predict_proba(&[0, 0]), Err(Error::EmptyEnsemble)));
    }
}
