//! Error type shared by every module of this crate.

use polars::prelude::PolarsError;
use thiserror::Error;

use crate::weak_learner::TableState;


/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;


/// Errors reported by the estimators, the booster and the batch predictor.
#[derive(Debug, Error)]
pub enum Error {
    /// A feature or the class has no possible value.
    #[error("cardinality of {what} must be positive")]
    NonPositiveCardinality {
        /// The feature or the class.
        what: String,
    },

    /// `ProbabilityTables::init` was called on initialized tables.
    #[error("probability tables are already initialized")]
    AlreadyInitialized,

    /// A sample was added while the tables were not accumulating counts.
    #[error("probability tables do not accept samples in state {0:?}")]
    NotCounting(TableState),

    /// `ProbabilityTables::compute_probabilities` was called twice.
    #[error("probabilities have already been computed")]
    AlreadyComputed,

    /// Inference was requested before fitting.
    #[error("classifier has not been fitted")]
    NotFitted,

    /// A feature value lies outside `[0, states)`.
    #[error("value {value} of feature {feature} is outside [0, {states})")]
    ValueOutOfRange {
        /// Feature index.
        feature: usize,
        /// Offending value.
        value: usize,
        /// Cardinality of the feature.
        states: usize,
    },

    /// A class value lies outside `[0, n_classes)`.
    #[error("class value {value} is outside [0, {n_classes})")]
    ClassOutOfRange {
        /// Offending class value.
        value: usize,
        /// Number of class values.
        n_classes: usize,
    },

    /// An instance does not have one value per feature.
    #[error("expected {expected} features, got {got}")]
    FeatureCountMismatch {
        /// Number of features of the model.
        expected: usize,
        /// Number of values given.
        got: usize,
    },

    /// The weight vector does not have one weight per instance.
    #[error("weight vector has length {got}, expected {expected}")]
    WeightLengthMismatch {
        /// Number of instances.
        expected: usize,
        /// Number of weights given.
        got: usize,
    },

    /// A feature index does not name a feature of the sample.
    #[error("feature index {feature} is out of range (n_features = {n_features})")]
    FeatureOutOfRange {
        /// Offending feature index.
        feature: usize,
        /// Number of features.
        n_features: usize,
    },

    /// The posterior contained a NaN and can't be normalized.
    #[error("can't normalize posterior: sum is NaN")]
    NanPosterior,

    /// The feature already owns an estimator in the ensemble.
    #[error("feature {0} is already used by the ensemble")]
    DuplicateFeature(usize),

    /// The feature is already an active parent.
    #[error("feature {0} is already an active parent")]
    DuplicateParent(usize),

    /// Pop or predict on an ensemble without members.
    #[error("ensemble is empty")]
    EmptyEnsemble,

    /// Pop on an estimator without active parents.
    #[error("there is no active parent to remove")]
    NoActiveParent,

    /// The sample has no instance or no feature.
    #[error("sample is empty")]
    EmptySample,

    /// Hyperparameters are out of range or unknown.
    #[error("invalid hyperparameters: {0}")]
    InvalidConfig(String),

    /// An integer-encoded column holds a negative value.
    #[error("column `{column}` holds the negative value {value}")]
    NegativeValue {
        /// Column name.
        column: String,
        /// Offending value.
        value: i64,
    },

    /// A column holds a missing value.
    #[error("column `{0}` holds missing values")]
    MissingValue(String),

    /// Columns of a sample have different lengths.
    #[error("column `{column}` has {got} values, expected {expected}")]
    RaggedColumns {
        /// Column name.
        column: String,
        /// Length of the first column.
        expected: usize,
        /// Length of this column.
        got: usize,
    },

    /// An inference worker panicked.
    #[error("inference worker panicked")]
    WorkerPanicked,

    /// An inference worker thread could not be spawned.
    #[error("failed to spawn inference worker: {0}")]
    Spawn(#[from] std::io::Error),

    /// Hyperparameter JSON could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A DataFrame column could not be read as integers.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}
