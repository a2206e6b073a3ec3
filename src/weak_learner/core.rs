//! Provides `WeakLearner` trait.

use crate::{Result, Sample};


/// The trait [`WeakLearner`] defines the behavior of the learners
/// a booster calls in each round.
/// Given a distribution over the training instances
/// and the feature the booster picked for this round,
/// a weak learner returns a hypothesis of type
/// [`WeakLearner::Hypothesis`].
pub trait WeakLearner {
    /// The hypothesis produced by [`WeakLearner::produce`].
    type Hypothesis;


    /// Returns the name of the weak learner.
    fn name(&self) -> &str;


    /// Returns the information of the weak learner as `String`s.
    fn info(&self) -> Option<Vec<(&str, String)>> {
        None
    }


    /// Fit a hypothesis rooted at `feature`
    /// on `sample` weighted by `dist`.
    fn produce(&self, sample: &Sample, dist: &[f64], feature: usize)
        -> Result<Self::Hypothesis>;
}
