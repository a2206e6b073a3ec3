//! Offset tables that map `(feature, value[, class])` keys
//! onto the flat arrays held by [`ProbabilityTables`].
//!
//! Feature values are laid out one after another:
//! the key `(f, v)` has the *value index* `feature_offset[f] + v`.
//! Pair cells are stored only for `higher > lower`.
//! The block of `(higher, hv)` starts at `pair_offset[(higher, hv)]`
//! and holds one slot per value of every feature below `higher`,
//! so that the slot of `(lower, lv)` is
//! `pair_offset[(higher, hv)] + feature_offset[lower] + lv`.
//! Every slot is then widened by the number of classes.
//!
//! [`ProbabilityTables`]: super::ProbabilityTables
use serde::{Serialize, Deserialize};

use crate::common::checker;
use crate::Result;


/// Offset tables for the flat probability arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    states: Vec<usize>,
    n_classes: usize,
    feature_offset: Vec<usize>,
    pair_offset: Vec<usize>,
    n_values: usize,
    n_pair_slots: usize,
}


impl TableLayout {
    /// Build the offset tables for the given cardinalities.
    pub fn new(states: &[usize], n_classes: usize) -> Result<Self> {
        checker::check_cardinalities(states, n_classes)?;

        let n_values = states.iter().sum::<usize>();
        let mut feature_offset = Vec::with_capacity(states.len());
        let mut pair_offset = Vec::with_capacity(n_values);

        let mut value_index = 0;
        let mut slot = 0;
        for &s in states {
            feature_offset.push(value_index);
            for _ in 0..s {
                pair_offset.push(slot);
                // one slot per value of every lower feature
                slot += value_index;
            }
            value_index += s;
        }

        Ok(Self {
            states: states.to_vec(),
            n_classes,
            feature_offset,
            pair_offset,
            n_values,
            n_pair_slots: slot,
        })
    }


    /// Number of features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.states.len()
    }


    /// Number of class values.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }


    /// Cardinality of every feature.
    #[inline]
    pub fn states(&self) -> &[usize] {
        &self.states[..]
    }


    /// Length of the `(feature, value, class)` arrays.
    #[inline]
    pub fn feature_class_len(&self) -> usize {
        self.n_values * self.n_classes
    }


    /// Length of the pair arrays.
    #[inline]
    pub fn pair_len(&self) -> usize {
        self.n_pair_slots * self.n_classes
    }


    #[inline(always)]
    fn value_index(&self, feature: usize, value: usize) -> usize {
        debug_assert!(value < self.states[feature]);
        self.feature_offset[feature] + value
    }


    /// First index of the class block of `(feature, value)`
    /// in the `(feature, value, class)` arrays.
    #[inline(always)]
    pub fn feature_class_base(&self, feature: usize, value: usize) -> usize {
        self.value_index(feature, value) * self.n_classes
    }


    /// Index of `(feature, value, class)`.
    #[inline(always)]
    pub fn feature_class_index(&self, feature: usize, value: usize, class: usize)
        -> usize
    {
        self.feature_class_base(feature, value) + class
    }


    /// First index of the class block of the pair
    /// `(higher, higher_value), (lower, lower_value)`.
    /// Requires `higher > lower`.
    #[inline(always)]
    pub fn pair_base(
        &self,
        higher: usize,
        higher_value: usize,
        lower: usize,
        lower_value: usize,
    ) -> usize
    {
        debug_assert!(higher > lower);
        let block = self.pair_offset[self.value_index(higher, higher_value)];
        (block + self.value_index(lower, lower_value)) * self.n_classes
    }


    /// Index of the pair cell for `class`.
    /// Requires `higher > lower`.
    #[inline(always)]
    pub fn pair_index(
        &self,
        higher: usize,
        higher_value: usize,
        lower: usize,
        lower_value: usize,
        class: usize,
    ) -> usize
    {
        self.pair_base(higher, higher_value, lower, lower_value) + class
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;


    #[test]
    fn storage_is_lower_triangular() {
        let states = [2, 3, 4];
        let layout = TableLayout::new(&states, 2).unwrap();

        // Σ_i states[i] * Σ_{j<i} states[j]
        let expected = 3 * 2 + 4 * (2 + 3);
        assert_eq!(layout.pair_len(), expected * 2);
        assert_eq!(layout.feature_class_len(), (2 + 3 + 4) * 2);
    }


    #[test]
    fn pair_indices_are_a_bijection() {
        let states = [2, 3, 1, 4];
        let n_classes = 3;
        let layout = TableLayout::new(&states, n_classes).unwrap();

        let mut seen = HashSet::new();
        for hi in 0..states.len() {
            for hv in 0..states[hi] {
                for lo in 0..hi {
                    for lv in 0..states[lo] {
                        for c in 0..n_classes {
                            let ix = layout.pair_index(hi, hv, lo, lv, c);
                            assert!(ix < layout.pair_len());
                            assert!(seen.insert(ix), "index {ix} used twice");
                        }
                    }
                }
            }
        }
        assert_eq!(seen.len(), layout.pair_len());
    }


    #[test]
    fn feature_class_indices_are_a_bijection() {
        let states = [3, 1, 2];
        let layout = TableLayout::new(&states, 2).unwrap();

        let mut seen = HashSet::new();
        for f in 0..states.len() {
            for v in 0..states[f] {
                for c in 0..2 {
                    assert!(seen.insert(layout.feature_class_index(f, v, c)));
                }
            }
        }
        assert_eq!(seen.len(), layout.feature_class_len());
    }


    #[test]
    fn zero_cardinality_fails() {
        assert!(TableLayout::new(&[2, 0], 2).is_err());
        assert!(TableLayout::new(&[2, 2], 0).is_err());
    }
}
