//! Struct `Sample` represents an integer-encoded training sample.

// Provides feature struct.
pub(crate) mod feature_struct;
// Provides sample struct.
pub(crate) mod sample_struct;


pub use sample_struct::Sample;
pub use feature_struct::DiscreteFeature;
