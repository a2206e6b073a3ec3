use serde::{Serialize, Deserialize};


/// Additive smoothing applied when counts become probabilities.
/// The pseudo-count `alpha` is fixed at fit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Smoothing {
    /// No pseudo-count, `alpha = 0`.
    None,
    /// Laplace smoothing, `alpha = 1`.
    Laplace,
    /// m-estimate smoothing, `alpha = 1 / n_sample`.
    #[default]
    Original,
}


impl Smoothing {
    /// Pseudo-count for a training sample of `n_sample` instances.
    #[inline]
    pub fn alpha(&self, n_sample: usize) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Laplace => 1.0,
            Self::Original => 1.0 / n_sample.max(1) as f64,
        }
    }
}
