#![warn(missing_docs)]

//!
//! A crate that provides super-parent one-dependence estimators
//! and a boosting algorithm that assembles them into an ensemble.
//!
//! - [`Spode`] conditions every feature on the class
//!     and on one super-parent feature.
//! - [`Aode`] averages the SPODEs of several active super-parents
//!     that share one set of probability tables.
//! - [`BoostAode`] picks super-parents one pack at a time
//!     by weighted mutual information, weighs each SPODE AdaBoost-style
//!     and stops when a hold-out accuracy stops improving.
//! - [`BatchPredictor`] runs inference over large batches
//!     on a bounded number of worker threads.
//!
//! Every feature and the class are integer-encoded
//! with contiguous values starting at `0`.
//!
//! ```no_run
//! use spodeboost::prelude::*;
//!
//! let x = vec![vec![0, 0, 1, 1], vec![0, 1, 0, 1]];
//! let y = vec![0, 0, 1, 1];
//! let sample = Sample::from_columns(x, y).unwrap();
//!
//! let mut booster = BoostAode::init(&sample)
//!     .convergence(false);
//! let weak_learner = SpodeLearner::init();
//! let ensemble = booster.run(&weak_learner).unwrap();
//!
//! let predictions = ensemble.predict_all(&sample).unwrap();
//! ```

pub mod error;
pub(crate) mod common;
pub mod sample;
pub mod weak_learner;
pub mod hypothesis;
pub mod selection;
pub mod booster;
pub mod parallel;

pub mod prelude;


pub use error::{Error, Result};

pub use sample::{DiscreteFeature, Sample};

pub use weak_learner::{
    WeakLearner,

    Aode,
    ProbabilityTables,
    Smoothing,
    Spode,
    SpodeLearner,
    TableLayout,
    TableState,
};

pub use hypothesis::{
    Classifier,
    Diagnostics,
    Ensemble,
    Status,
};

pub use selection::{
    FeatureSelector,
    SelectFeatures,
};

pub use booster::{
    Booster,
    BoostAode,
    BoostConfig,
    Order,
    Phase,
};

pub use parallel::{
    BatchPredictor,
    CountingSemaphore,
};
