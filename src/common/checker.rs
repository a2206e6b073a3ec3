//! This file defines some functions that checks some pre-conditions
//! E.g., Shape of data

use crate::{Error, Result, Sample};


/// Check whether every cardinality is positive.
#[inline]
pub(crate) fn check_cardinalities(states: &[usize], n_classes: usize)
    -> Result<()>
{
    if let Some(f) = states.iter().position(|&s| s == 0) {
        return Err(Error::NonPositiveCardinality {
            what: format!("feature {f}"),
        });
    }
    if n_classes == 0 {
        return Err(Error::NonPositiveCardinality {
            what: "the class".to_string(),
        });
    }
    Ok(())
}


/// Check whether the training sample is valid or not.
/// Every feature value and every class value must lie in
/// the range declared by the cardinalities of `sample`.
pub(crate) fn check_sample(sample: &Sample) -> Result<()> {
    let (n_sample, n_feature) = sample.shape();
    if n_sample == 0 || n_feature == 0 {
        return Err(Error::EmptySample);
    }
    check_cardinalities(sample.states(), sample.n_classes())?;

    for (feature, (column, &states)) in sample.features()
        .iter()
        .zip(sample.states())
        .enumerate()
    {
        if let Some(&value) = column.values.iter().find(|&&v| v >= states) {
            return Err(Error::ValueOutOfRange { feature, value, states });
        }
    }

    let n_classes = sample.n_classes();
    if let Some(&value) = sample.target().iter().find(|&&y| y >= n_classes) {
        return Err(Error::ClassOutOfRange { value, n_classes });
    }
    Ok(())
}


/// Check that `instance` has one value per feature
/// and that each value lies in `[0, states[f])`.
#[inline]
pub(crate) fn check_instance(instance: &[usize], states: &[usize])
    -> Result<()>
{
    if instance.len() != states.len() {
        return Err(Error::FeatureCountMismatch {
            expected: states.len(),
            got: instance.len(),
        });
    }
    let out_of_range = instance.iter()
        .zip(states)
        .position(|(&v, &s)| v >= s);
    match out_of_range {
        Some(feature) => Err(Error::ValueOutOfRange {
            feature,
            value: instance[feature],
            states: states[feature],
        }),
        None => Ok(()),
    }
}


/// Check that there is exactly one weight per example.
#[inline]
pub(crate) fn check_weights(weights: &[f64], n_sample: usize) -> Result<()> {
    if weights.len() != n_sample {
        return Err(Error::WeightLengthMismatch {
            expected: n_sample,
            got: weights.len(),
        });
    }
    Ok(())
}


/// Check that `feature` names a feature.
#[inline]
pub(crate) fn check_feature(feature: usize, n_features: usize) -> Result<()> {
    if feature >= n_features {
        return Err(Error::FeatureOutOfRange { feature, n_features });
    }
    Ok(())
}
