//! One-dependence estimators over integer-encoded features.

pub(crate) mod layout;
pub(crate) mod tables;
pub(crate) mod smoothing;
pub(crate) mod spode_classifier;
pub(crate) mod aode_classifier;
pub(crate) mod spode_learner;


pub use layout::TableLayout;
pub use tables::{ProbabilityTables, TableState};
pub use smoothing::Smoothing;
pub use spode_classifier::Spode;
pub use aode_classifier::Aode;
pub use spode_learner::SpodeLearner;
