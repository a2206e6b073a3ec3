use crate::{Result, Sample, WeakLearner};
use super::smoothing::Smoothing;
use super::spode_classifier::Spode;


/// A factory that produces a [`Spode`]
/// for a given distribution over training instances
/// and a given super-parent.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpodeLearner {
    smoothing: Smoothing,
}


impl SpodeLearner {
    /// Initializes the learner with `Smoothing::Original`.
    pub fn init() -> Self {
        Self::default()
    }


    /// Set the smoothing of the produced estimators.
    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }
}


impl WeakLearner for SpodeLearner {
    type Hypothesis = Spode;


    fn name(&self) -> &str {
        "SPODE"
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        let info = vec![
            ("Smoothing", format!("{:?}", self.smoothing)),
        ];
        Some(info)
    }


    fn produce(&self, sample: &Sample, dist: &[f64], feature: usize)
        -> Result<Self::Hypothesis>
    {
        Spode::fit(sample, dist, feature, self.smoothing)
    }
}
