//! This directory provides the `Booster` trait
//! and the boosting algorithms.

/// Provides `Booster` trait.
pub mod core;

/// BoostAODE.
pub mod boost_aode;


pub use self::core::Booster;

pub use self::boost_aode::{
    BoostAode,
    BoostConfig,
    Order,
    Phase,
    WeightUpdate,
    update_weights,
};
