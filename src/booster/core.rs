//! Provides `Booster` trait.

use std::ops::ControlFlow;

use crate::{Result, WeakLearner};


/// The trait [`Booster`] defines the standard framework of Boosting.
/// Here, the **standard framework** is defined as
/// a repeated game between **Booster** and **Weak Learner**
/// of the following form:
///
/// In each round `t = 1, 2, ...`,
/// 1. Booster chooses a distribution over training instances
///    and the features the weak learner is rooted at.
/// 2. Weak Learner returns one hypothesis per chosen feature.
///
/// # Required Methods
/// - [`Booster::name`]
/// - [`Booster::preprocess`]
/// - [`Booster::boost`]
/// - [`Booster::postprocess`]
/// - [`Booster::info`] ... optional.
///
/// # Provided Methods
/// - [`Booster::run`]
pub trait Booster<H> {
    /// The final hypothesis output by a boosting algorithm.
    type Output;


    /// Returns the name of the boosting algorithm.
    fn name(&self) -> &str;


    /// Returns the information of boosting algorithm as `String`.
    fn info(&self) -> Option<Vec<(&str, String)>> {
        None
    }


    /// A main function that runs boosting algorithm.
    fn run<W>(&mut self, weak_learner: &W) -> Result<Self::Output>
        where W: WeakLearner<Hypothesis = H>
    {
        self.preprocess(weak_learner)?;

        for iteration in 1.. {
            if self.boost(weak_learner, iteration)?.is_break() {
                break;
            }
        }

        self.postprocess()
    }


    /// Pre-processing for `self`.
    /// As you can see in [`Booster::run`],
    /// this method is called before the boosting process.
    fn preprocess<W>(&mut self, weak_learner: &W) -> Result<()>
        where W: WeakLearner<Hypothesis = H>;


    /// Boosting step per iteration.
    /// This method returns
    /// `ControlFlow::Continue(())` while the stopping criterion is not met,
    /// `ControlFlow::Break(terminated_iter)` otherwise.
    fn boost<W>(
        &mut self,
        weak_learner: &W,
        iteration: usize,
    ) -> Result<ControlFlow<usize>>
        where W: WeakLearner<Hypothesis = H>;


    /// Post-processing.
    fn postprocess(&mut self) -> Result<Self::Output>;
}
