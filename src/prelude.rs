//! Exports the estimators, the booster and the traits.
//!
pub use crate::{
    // Errors
    Error,
    Result,

    // Data
    Sample,
    DiscreteFeature,


    // Traits
    Booster,
    WeakLearner,
    Classifier,
    FeatureSelector,


    // One-dependence estimators
    Spode,
    Aode,
    SpodeLearner,
    Smoothing,


    // Boosting
    BoostAode,
    BoostConfig,
    Order,
    Phase,
    SelectFeatures,
    Ensemble,
    Diagnostics,
    Status,


    // Inference
    BatchPredictor,
    CountingSemaphore,
};
