use crate::common::utils;
use crate::{Result, Sample};


/// A trait that defines the behavor of a probabilistic classifier
/// over integer-encoded instances.
/// You only need to implement
/// [`n_classes`](Classifier::n_classes) and
/// [`predict_proba`](Classifier::predict_proba).
pub trait Classifier {
    /// Number of class values.
    fn n_classes(&self) -> usize;


    /// Computes the posterior over the classes of `instance`,
    /// one value per feature.
    fn predict_proba(&self, instance: &[usize]) -> Result<Vec<f64>>;


    /// Predicts the class of `instance`.
    /// Ties are broken by the lowest class index.
    fn predict(&self, instance: &[usize]) -> Result<usize> {
        let probs = self.predict_proba(instance)?;
        Ok(utils::argmax(&probs))
    }


    /// Computes the posteriors of every row of `sample`.
    fn predict_proba_all(&self, sample: &Sample) -> Result<Vec<Vec<f64>>> {
        let n_sample = sample.shape().0;
        (0..n_sample).map(|row| self.predict_proba(&sample.instance(row)))
            .collect()
    }


    /// Predicts the classes of every row of `sample`.
    fn predict_all(&self, sample: &Sample) -> Result<Vec<usize>> {
        let n_sample = sample.shape().0;
        (0..n_sample).map(|row| self.predict(&sample.instance(row)))
            .collect()
    }


    /// Fraction of the rows of `sample` whose class is predicted correctly.
    fn score(&self, sample: &Sample) -> Result<f64> {
        let predictions = self.predict_all(sample)?;
        Ok(utils::accuracy(sample.target(), &predictions))
    }
}


impl<C: Classifier + ?Sized> Classifier for &C {
    fn n_classes(&self) -> usize {
        (**self).n_classes()
    }


    fn predict_proba(&self, instance: &[usize]) -> Result<Vec<f64>> {
        (**self).predict_proba(instance)
    }
}
