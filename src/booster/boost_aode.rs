//! BoostAODE: boosting over super-parent one-dependence estimators.

pub(crate) mod boost_aode_algorithm;
pub(crate) mod config;
pub(crate) mod convergence;
pub(crate) mod update;


pub use boost_aode_algorithm::{BoostAode, Phase};
pub use config::{BoostConfig, Order};
pub use update::{update_weights, WeightUpdate};
