use std::collections::HashMap;
use std::ops::Index;

use polars::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use crate::common::checker;
use crate::{Error, Result};
use super::feature_struct::DiscreteFeature;


/// Struct `Sample` holds an integer-encoded training sample
/// in feature-major (column) layout,
/// together with the cardinality of every feature and of the class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub(super) name_to_index: HashMap<String, usize>,
    pub(super) features: Vec<DiscreteFeature>,
    pub(super) target: Vec<usize>,
    pub(super) states: Vec<usize>,
    pub(super) n_classes: usize,
    pub(super) n_sample: usize,
    pub(super) n_feature: usize,
}


impl Sample {
    /// Build a sample from feature columns and the target column.
    /// Features are named `Feat. [1]`, `Feat. [2]`, ...
    /// and the cardinalities are derived as `max + 1`.
    pub fn from_columns(features: Vec<Vec<usize>>, target: Vec<usize>)
        -> Result<Self>
    {
        let features = features.into_iter()
            .enumerate()
            .map(|(i, values)| {
                let name = format!("Feat. [{}]", i + 1);
                DiscreteFeature::with_values(name, values)
            })
            .collect::<Vec<_>>();
        Self::from_features(features, target)
    }


    /// Build a sample from named features and the target column.
    pub fn from_features(features: Vec<DiscreteFeature>, target: Vec<usize>)
        -> Result<Self>
    {
        let n_sample = target.len();
        let n_feature = features.len();
        if n_sample == 0 || n_feature == 0 {
            return Err(Error::EmptySample);
        }

        for feature in &features {
            if feature.len() != n_sample {
                return Err(Error::RaggedColumns {
                    column: feature.name().to_string(),
                    expected: n_sample,
                    got: feature.len(),
                });
            }
        }

        let states = features.iter()
            .map(DiscreteFeature::observed_states)
            .collect::<Vec<_>>();
        let n_classes = target.iter()
            .copied()
            .max()
            .map_or(0, |max| max + 1);

        let name_to_index = features.iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();

        Ok(Self {
            name_to_index,
            features,
            target,
            states,
            n_classes,
            n_sample,
            n_feature,
        })
    }


    /// Convert `polars::DataFrame` and `polars::Series` into `Sample`.
    /// Every column must be castable to integers without negative values.
    pub fn from_dataframe(data: DataFrame, target: Series) -> Result<Self> {
        let features = data.get_columns()
            .par_iter()
            .map(DiscreteFeature::from_series)
            .collect::<Result<Vec<_>>>()?;

        let target = DiscreteFeature::from_series(&target)?.values;

        Self::from_features(features, target)
    }


    /// Replace the derived cardinalities with the given ones.
    /// Every observed value must lie in its declared range.
    pub fn with_states(mut self, states: Vec<usize>, n_classes: usize)
        -> Result<Self>
    {
        if states.len() != self.n_feature {
            return Err(Error::FeatureCountMismatch {
                expected: self.n_feature,
                got: states.len(),
            });
        }
        checker::check_cardinalities(&states, n_classes)?;

        self.states = states;
        self.n_classes = n_classes;
        checker::check_sample(&self)?;
        Ok(self)
    }


    /// Returns the pair of the number of examples and
    /// the number of features
    pub fn shape(&self) -> (usize, usize) {
        (self.n_sample, self.n_feature)
    }


    /// Number of states of each feature.
    pub fn states(&self) -> &[usize] {
        &self.states[..]
    }


    /// Number of class values.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }


    /// Returns the class column.
    pub fn target(&self) -> &[usize] {
        &self.target[..]
    }


    /// Returns the feature columns.
    pub fn features(&self) -> &[DiscreteFeature] {
        &self.features[..]
    }


    /// Returns the feature names in column order.
    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter()
            .map(DiscreteFeature::name)
            .collect()
    }


    /// Returns the `row`-th instance without its class.
    pub fn instance(&self, row: usize) -> Vec<usize> {
        self.features.iter()
            .map(|feat| feat[row])
            .collect()
    }


    /// Writes the `row`-th instance into `buf`,
    /// which must hold one slot per feature.
    #[inline]
    pub fn fill_instance(&self, row: usize, buf: &mut [usize]) {
        buf.iter_mut()
            .zip(&self.features)
            .for_each(|(x, feat)| { *x = feat[row]; });
    }


    /// Returns the sub-sample made of the rows in `ix`.
    /// The cardinalities are kept so that the sub-sample
    /// and `self` share one encoding.
    pub fn split(&self, ix: &[usize]) -> Self {
        let features = self.features.iter()
            .map(|feat| feat.select(ix))
            .collect::<Vec<_>>();
        let target = ix.iter()
            .map(|&i| self.target[i])
            .collect::<Vec<_>>();

        Self {
            name_to_index: self.name_to_index.clone(),
            features,
            target,
            states: self.states.clone(),
            n_classes: self.n_classes,
            n_sample: ix.len(),
            n_feature: self.n_feature,
        }
    }


    /// Split `self` into a training part and a validation part.
    /// The examples of every class are shuffled with `seed`
    /// and dealt round-robin into `n_folds` folds;
    /// fold `0` becomes the validation part.
    pub fn stratified_holdout(&self, n_folds: usize, seed: u64)
        -> (Self, Self)
    {
        let n_folds = n_folds.max(2);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut by_class = vec![Vec::new(); self.n_classes];
        self.target.iter()
            .enumerate()
            .for_each(|(i, &y)| by_class[y].push(i));

        let mut train = Vec::with_capacity(self.n_sample);
        let mut validation = Vec::new();
        for mut rows in by_class {
            rows.shuffle(&mut rng);
            for (k, i) in rows.into_iter().enumerate() {
                if k % n_folds == 0 {
                    validation.push(i);
                } else {
                    train.push(i);
                }
            }
        }
        train.sort_unstable();
        validation.sort_unstable();

        (self.split(&train), self.split(&validation))
    }
}


impl<S> Index<S> for Sample
    where S: AsRef<str>
{
    type Output = DiscreteFeature;


    fn index(&self, name: S) -> &Self::Output {
        let name: &str = name.as_ref();
        let k = self.name_to_index[name];
        &self.features[k]
    }
}
