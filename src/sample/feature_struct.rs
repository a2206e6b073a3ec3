use polars::prelude::*;
use serde::{Serialize, Deserialize};

use std::ops::Index;

use crate::{Error, Result};


/// A named, integer-encoded categorical feature.
/// Values are `0`-based and contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteFeature {
    /// Feature name
    pub name: String,
    /// Feature values, one per example.
    pub values: Vec<usize>,
}


impl DiscreteFeature {
    /// Construct an empty feature named `name`.
    pub fn new<T: ToString>(name: T) -> Self {
        Self { name: name.to_string(), values: Vec::new(), }
    }


    /// Construct a feature from already encoded values.
    pub fn with_values<T: ToString>(name: T, values: Vec<usize>) -> Self {
        Self { name: name.to_string(), values, }
    }


    /// Convert an integer-castable `polars::Series` into a feature.
    /// Negative and missing values are rejected.
    pub fn from_series(series: &Series) -> Result<Self> {
        let name = series.name().to_string();
        let casted = series.cast(&DataType::Int64)?;

        let values = casted.i64()?
            .into_iter()
            .map(|value| {
                let value = value.ok_or_else(|| {
                    Error::MissingValue(name.clone())
                })?;
                usize::try_from(value).map_err(|_| {
                    Error::NegativeValue { column: name.clone(), value }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { name, values })
    }


    /// Append a value.
    #[inline]
    pub fn append(&mut self, value: usize) {
        self.values.push(value);
    }


    /// Returns the feature name.
    pub fn name(&self) -> &str {
        &self.name
    }


    /// Number of examples in this feature.
    pub fn len(&self) -> usize {
        self.values.len()
    }


    /// Returns `true` if the feature holds no example.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }


    /// Cardinality derived from the data, `max + 1`.
    /// An empty feature has cardinality `0`.
    pub fn observed_states(&self) -> usize {
        self.values.iter()
            .copied()
            .max()
            .map_or(0, |max| max + 1)
    }


    /// Returns a new feature holding the values at `ix`.
    pub(super) fn select(&self, ix: &[usize]) -> Self {
        let values = ix.iter()
            .map(|&i| self.values[i])
            .collect();
        Self { name: self.name.clone(), values, }
    }
}


impl Index<usize> for DiscreteFeature {
    type Output = usize;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.values[idx]
    }
}


impl AsRef<[usize]> for DiscreteFeature {
    fn as_ref(&self) -> &[usize] {
        &self.values[..]
    }
}
