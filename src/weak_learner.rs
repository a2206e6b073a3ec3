//! The files in `weak_learner/` directory defines
//! `WeakLearner` trait and the one-dependence estimators.

/// Provides WeakLearner trait.
pub mod core;

/// Defines SPODE, AODE and their probability tables.
pub mod spode;


pub use self::core::WeakLearner;

pub use self::spode::{
    Aode,
    ProbabilityTables,
    Smoothing,
    Spode,
    SpodeLearner,
    TableLayout,
    TableState,
};
