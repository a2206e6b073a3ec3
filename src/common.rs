//! Defines some common functions used in this library.

/// Defines some useful functions such as posterior normalization.
pub(crate) mod utils;

/// Defines some checker functions.
pub(crate) mod checker;
