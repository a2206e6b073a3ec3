//! Provides [`BoostAode`], boosting over super-parent one-dependence
//! estimators with feature-wise packs and hold-out convergence control.
use std::mem;
use std::ops::ControlFlow;

use fixedbitset::FixedBitSet;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::selection::{select_k_best_weighted, SelectFeatures};
use crate::{
    Booster,
    Classifier,
    Ensemble,
    Result,
    Sample,
    Status,
    WeakLearner,
};
use super::config::{BoostConfig, Order};
use super::convergence::ConvergenceTracker;
use super::update::update_weights;


// Stratified hold-out used by the convergence check.
const HOLDOUT_FOLDS: usize = 5;
const HOLDOUT_SEED: u64 = 271;


/// States of the boosting loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Reset and optional seeding by a feature selector.
    Init,
    /// Rank the unused features.
    SelectFeature,
    /// Fit one pack of estimators from the top of the ranking.
    PackFit,
    /// Measure the hold-out accuracy and decide whether to stop.
    ConvergenceCheck,
    /// Training is over.
    Done,
}


/// Boosting over super-parent one-dependence estimators.
///
/// Each round ranks the unused features by weighted mutual information
/// with the class, fits one estimator per feature for a pack of
/// `2^tolerance` features (or one feature without bisection)
/// and updates the instance weights AdaBoost-style.
/// Training stops when the weighted error exceeds `0.5`,
/// when the hold-out accuracy stops improving,
/// or when every feature has been used.
///
/// # Example
/// ```no_run
/// use spodeboost::prelude::*;
///
/// let x = vec![
///     vec![0, 0, 1, 1, 0, 1, 1, 0],
///     vec![0, 1, 0, 1, 1, 1, 0, 0],
///     vec![1, 1, 0, 0, 1, 0, 0, 1],
/// ];
/// let y = vec![0, 0, 1, 1, 0, 1, 1, 0];
/// let sample = Sample::from_columns(x, y).unwrap();
///
/// let mut booster = BoostAode::init(&sample)
///     .order(Order::Desc)
///     .convergence(false);
/// let weak_learner = SpodeLearner::init()
///     .smoothing(Smoothing::Laplace);
///
/// let ensemble = booster.run(&weak_learner).unwrap();
/// println!("{:?}", ensemble.diagnostics().notes());
/// ```
pub struct BoostAode<'a, H> {
    // Training sample as given
    sample: &'a Sample,

    config: BoostConfig,

    // Part of `sample` the estimators are fitted on,
    // and the hold-out part for the convergence check.
    train: Sample,
    validation: Option<Sample>,

    // Distribution over `train`
    weights: Vec<f64>,

    ensemble: Ensemble<H>,

    // Features that became super-parents, in order.
    used: FixedBitSet,
    used_order: Vec<usize>,

    phase: Phase,
    ranking: Vec<usize>,
    rng: StdRng,
    tracker: ConvergenceTracker,

    // Estimators added since the last improving pack
    items_in_pack: usize,
    finished: bool,
}


impl<'a, H> BoostAode<'a, H> {
    /// Initialize the `BoostAode` with the default [`BoostConfig`].
    pub fn init(sample: &'a Sample) -> Self {
        let (n_sample, n_feature) = sample.shape();
        let config = BoostConfig::default();

        Self {
            sample,

            train: sample.clone(),
            validation: None,

            weights: vec![1.0 / n_sample.max(1) as f64; n_sample],

            ensemble: Ensemble::new(n_feature, sample.n_classes()),

            used: FixedBitSet::with_capacity(n_feature),
            used_order: Vec::new(),

            phase: Phase::Init,
            ranking: Vec::new(),
            rng: StdRng::seed_from_u64(config.seed),
            tracker: ConvergenceTracker::new(config.convergence_best, config.max_tolerance),

            items_in_pack: 0,
            finished: false,

            config,
        }
    }


    /// Replace every hyperparameter at once.
    pub fn config(mut self, config: BoostConfig) -> Self {
        self.config = config;
        self
    }


    /// Set the feature order.
    pub fn order(mut self, order: Order) -> Self {
        self.config.order = order;
        self
    }


    /// Set the seed of the random feature order.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }


    /// Set the selector that seeds the ensemble.
    pub fn select_features(mut self, select_features: SelectFeatures) -> Self {
        self.config.select_features = select_features;
        self
    }


    /// Set the threshold of FCBF/IWSS.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }


    /// Set the upper bound on seeded features (`0` for no bound).
    pub fn max_features(mut self, max_features: usize) -> Self {
        self.config.max_features = max_features;
        self
    }


    /// Score candidates inside the ensemble instead of alone.
    pub fn alpha_block(mut self, alpha_block: bool) -> Self {
        self.config.alpha_block = alpha_block;
        self
    }


    /// Enable or disable the hold-out convergence check.
    pub fn convergence(mut self, convergence: bool) -> Self {
        self.config.convergence = convergence;
        self
    }


    /// Compare against the best accuracy instead of the last one.
    pub fn convergence_best(mut self, convergence_best: bool) -> Self {
        self.config.convergence_best = convergence_best;
        self
    }


    /// Set the number of non-improving packs tolerated.
    pub fn max_tolerance(mut self, max_tolerance: usize) -> Self {
        self.config.max_tolerance = max_tolerance;
        self
    }


    /// Enable or disable pack doubling.
    pub fn bisection(mut self, bisection: bool) -> Self {
        self.config.bisection = bisection;
        self
    }


    /// Current phase of the boosting loop.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }


    /// Current distribution over the training part.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights[..]
    }


    /// Features used as super-parents so far, in order.
    #[inline]
    pub fn used_features(&self) -> &[usize] {
        &self.used_order[..]
    }


    /// Ensemble built so far.
    #[inline]
    pub fn ensemble(&self) -> &Ensemble<H> {
        &self.ensemble
    }


    /// Consecutive non-improving packs so far.
    #[inline]
    pub fn tolerance(&self) -> usize {
        self.tracker.tolerance()
    }


    fn n_features(&self) -> usize {
        self.sample.shape().1
    }


    fn mark_used(&mut self, feature: usize) {
        if !self.used.contains(feature) {
            self.used.insert(feature);
            self.used_order.push(feature);
        }
    }


    /// Reset every piece of state from the current configuration.
    fn reset(&mut self) -> Result<()> {
        self.config.validate()?;

        let (train, validation) = if self.config.convergence {
            let (train, validation) = self.sample
                .stratified_holdout(HOLDOUT_FOLDS, HOLDOUT_SEED);
            if train.shape().0 == 0 || validation.shape().0 == 0 {
                warn!(
                    n_sample = self.sample.shape().0,
                    "sample too small for a hold-out split; convergence check disabled"
                );
                (self.sample.clone(), None)
            } else {
                (train, Some(validation))
            }
        } else {
            (self.sample.clone(), None)
        };

        let n_train = train.shape().0;
        let n_feature = self.n_features();

        self.train = train;
        self.validation = validation;
        self.weights = vec![1.0 / n_train.max(1) as f64; n_train];
        self.ensemble = Ensemble::new(n_feature, self.sample.n_classes());
        self.used = FixedBitSet::with_capacity(n_feature);
        self.used_order.clear();
        self.ranking.clear();
        self.rng = StdRng::seed_from_u64(self.config.seed);
        self.tracker = ConvergenceTracker::new(
            self.config.convergence_best,
            self.config.max_tolerance,
        );
        self.items_in_pack = 0;
        self.finished = false;
        Ok(())
    }
}


impl<'a, H> BoostAode<'a, H>
    where H: Classifier,
{
    /// Advance the boosting loop by one transition
    /// and return the new phase.
    /// Stepping from [`Phase::Init`] resets the whole state;
    /// stepping from [`Phase::Done`] does nothing.
    pub fn step<W>(&mut self, weak_learner: &W) -> Result<Phase>
        where W: WeakLearner<Hypothesis = H>
    {
        self.phase = match self.phase {
            Phase::Init => {
                self.reset()?;
                self.initialize(weak_learner)?;
                if self.finished || self.used_order.len() == self.n_features() {
                    self.finished = true;
                    Phase::Done
                } else {
                    Phase::SelectFeature
                }
            },
            Phase::SelectFeature => {
                self.rank_features()?;
                Phase::PackFit
            },
            Phase::PackFit => {
                self.fit_pack(weak_learner)?;
                Phase::ConvergenceCheck
            },
            Phase::ConvergenceCheck => {
                self.check_convergence()?;
                if self.finished { Phase::Done } else { Phase::SelectFeature }
            },
            Phase::Done => Phase::Done,
        };
        Ok(self.phase)
    }


    /// Seed the ensemble with the features picked by the selector.
    /// The seeded estimators share the significance of one weight update.
    fn initialize<W>(&mut self, weak_learner: &W) -> Result<()>
        where W: WeakLearner<Hypothesis = H>
    {
        let selector = self.config.select_features
            .build(self.config.threshold, self.config.max_features)?;
        let Some(selector) = selector else { return Ok(()); };

        let features = selector.select(&self.train, &self.weights)?;
        for &feature in &features {
            let model = weak_learner.produce(&self.train, &self.weights, feature)?;
            self.ensemble.push(feature, model, 1.0)?;
            self.mark_used(feature);
        }

        let note = format!(
            "Used features in initialization: {} of {} with {}",
            self.used_order.len(),
            self.n_features(),
            selector.name(),
        );
        info!(selector = selector.name(), n_seeded = features.len(), "{note}");
        self.ensemble.diagnostics_mut().add_note(note);

        if self.ensemble.is_empty() {
            return Ok(());
        }
        match self.ensemble.predict_all(&self.train) {
            Ok(predictions) => {
                let update = update_weights(
                    self.train.target(), &predictions, &self.weights
                )?;
                self.weights = update.weights;
                self.finished = update.finished;
                self.ensemble.set_significances_from(0, update.significance);
            },
            Err(e) => {
                warn!(error = %e, "seeded ensemble could not be evaluated");
                self.ensemble.set_significances_from(0, 0.0);
            },
        }
        Ok(())
    }


    /// Rank the unused features under the current weights.
    fn rank_features(&mut self) -> Result<()> {
        let ascending = self.config.order == Order::Asc;
        let mut ranking = select_k_best_weighted(
            &self.train, &self.weights, ascending, 0
        )?;
        if self.config.order == Order::Rand {
            ranking.shuffle(&mut self.rng);
        }
        ranking.retain(|&f| !self.used.contains(f));

        debug!(ranking = ?ranking, "ranked unused features");
        self.ranking = ranking;
        Ok(())
    }


    /// Fit up to `2^tolerance` estimators from the top of the ranking.
    fn fit_pack<W>(&mut self, weak_learner: &W) -> Result<()>
        where W: WeakLearner<Hypothesis = H>
    {
        let k = if self.config.bisection {
            1_usize << self.tracker.tolerance()
        } else {
            1
        };
        let pack = self.ranking.iter()
            .copied()
            .take(k)
            .collect::<Vec<_>>();
        debug!(k, n_candidates = self.ranking.len(), "fit pack");

        for feature in pack {
            let model = weak_learner.produce(&self.train, &self.weights, feature)?;

            let (model, predictions) = if self.config.alpha_block {
                self.ensemble.push(feature, model, 1.0)?;
                let predictions = self.ensemble.predict_all(&self.train);
                let (_, model, _) = self.ensemble.pop_last()?;
                (model, predictions)
            } else {
                let predictions = model.predict_all(&self.train);
                (model, predictions)
            };

            let significance = match predictions {
                Ok(predictions) => {
                    let update = update_weights(
                        self.train.target(), &predictions, &self.weights
                    )?;
                    self.weights = update.weights;
                    self.finished = update.finished;
                    update.significance
                },
                Err(e) => {
                    warn!(feature, error = %e, "estimator could not be evaluated");
                    0.0
                },
            };

            self.ensemble.push(feature, model, significance)?;
            self.mark_used(feature);
            self.items_in_pack += 1;
            debug!(
                feature,
                significance,
                finished = self.finished,
                n_models = self.ensemble.len(),
                "added estimator"
            );

            if self.finished {
                break;
            }
        }
        self.ranking.clear();
        Ok(())
    }


    /// Compare the hold-out accuracy with the prior one
    /// and decide whether the loop is over.
    fn check_convergence(&mut self) -> Result<()> {
        if self.config.convergence && !self.finished {
            if let Some(validation) = &self.validation {
                let accuracy = self.ensemble.score(validation)?;
                if self.tracker.observe(accuracy) {
                    self.items_in_pack = 0;
                }
                debug!(
                    accuracy,
                    tolerance = self.tracker.tolerance(),
                    "convergence check"
                );
            }
        }
        self.finished = self.finished
            || self.tracker.exhausted()
            || self.used_order.len() == self.n_features();
        Ok(())
    }
}


impl<'a, H> Booster<H> for BoostAode<'a, H>
    where H: Classifier,
{
    type Output = Ensemble<H>;


    fn name(&self) -> &str {
        "BoostAODE"
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        let (n_sample, n_feature) = self.sample.shape();
        let info = vec![
            ("# of examples", format!("{n_sample}")),
            ("# of features", format!("{n_feature}")),
            ("Order", format!("{:?}", self.config.order)),
            ("Feature selection", format!("{:?}", self.config.select_features)),
            ("Convergence", format!("{}", self.config.convergence)),
            ("Max tolerance", format!("{}", self.config.max_tolerance)),
            ("Bisection", format!("{}", self.config.bisection)),
        ];
        Some(info)
    }


    fn preprocess<W>(&mut self, weak_learner: &W) -> Result<()>
        where W: WeakLearner<Hypothesis = H>
    {
        self.phase = Phase::Init;
        self.step(weak_learner)?;
        Ok(())
    }


    /// One round: rank, fit one pack, check convergence.
    fn boost<W>(
        &mut self,
        weak_learner: &W,
        iteration: usize,
    ) -> Result<ControlFlow<usize>>
        where W: WeakLearner<Hypothesis = H>
    {
        loop {
            match self.step(weak_learner)? {
                Phase::Done => {
                    info!(iteration, n_models = self.ensemble.len(), "boosting finished");
                    return Ok(ControlFlow::Break(iteration));
                },
                Phase::SelectFeature => return Ok(ControlFlow::Continue(())),
                _ => {},
            }
        }
    }


    /// Roll back the last pack if the tolerance ran out
    /// and record the diagnostics.
    fn postprocess(&mut self) -> Result<Self::Output> {
        let n_feature = self.n_features();

        if self.tracker.exhausted() {
            let eliminated = if self.items_in_pack < self.ensemble.len() {
                for _ in 0..self.items_in_pack {
                    self.ensemble.pop_last()?;
                }
                self.items_in_pack
            } else {
                0
            };
            let note = format!(
                "Convergence threshold reached & {eliminated} models eliminated"
            );
            info!(eliminated, "{note}");
            self.ensemble.diagnostics_mut().add_note(note);
        }

        let n_used = self.used_order.len();
        if n_used != n_feature {
            let note = format!("Used features in train: {n_used} of {n_feature}");
            warn!(n_used, n_feature, "{note}");
            let diagnostics = self.ensemble.diagnostics_mut();
            diagnostics.add_note(note);
            diagnostics.set_status(Status::Warning);
        }

        let note = format!("Number of models: {}", self.ensemble.len());
        info!("{note}");
        self.ensemble.diagnostics_mut().add_note(note);

        self.phase = Phase::Done;
        let empty = Ensemble::new(n_feature, self.sample.n_classes());
        Ok(mem::replace(&mut self.ensemble, empty))
    }
}
