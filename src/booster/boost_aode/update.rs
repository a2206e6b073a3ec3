use crate::{Error, Result};


/// Outcome of one weight update.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightUpdate {
    /// Weights for the next round, summing to one
    /// (unchanged when `finished`).
    pub weights: Vec<f64>,
    /// Significance of the evaluated hypothesis.
    pub significance: f64,
    /// `true` when the weighted error exceeds `0.5`.
    pub finished: bool,
}


/// AdaBoost update of the instance weights.
///
/// With the weighted error `ε = Σ_{wrong} w_i`,
/// `ε > 0.5` stops the boosting and leaves the weights untouched.
/// Otherwise the significance is `½ ln((1 - ε) / ε)` (`1` when `ε = 0`),
/// misclassified weights are multiplied by `e^α`,
/// the others by `e^{-α}`,
/// and the weights are normalized to sum to one.
pub fn update_weights(target: &[usize], predictions: &[usize], weights: &[f64])
    -> Result<WeightUpdate>
{
    let n_sample = target.len();
    for got in [predictions.len(), weights.len()] {
        if got != n_sample {
            return Err(Error::WeightLengthMismatch { expected: n_sample, got });
        }
    }

    let epsilon = target.iter()
        .zip(predictions)
        .zip(weights)
        .filter(|((y, p), _)| y != p)
        .map(|(_, w)| w)
        .sum::<f64>();

    if epsilon > 0.5 {
        return Ok(WeightUpdate {
            weights: weights.to_vec(),
            significance: 0.0,
            finished: true,
        });
    }

    let significance = if epsilon == 0.0 {
        1.0
    } else {
        0.5 * ((1.0 - epsilon) / epsilon).ln()
    };
    let (up, down) = (significance.exp(), (-significance).exp());

    let mut new_weights = target.iter()
        .zip(predictions)
        .zip(weights)
        .map(|((y, p), w)| if y != p { w * up } else { w * down })
        .collect::<Vec<_>>();

    let total = new_weights.iter().sum::<f64>();
    if total > 0.0 {
        new_weights.iter_mut()
            .for_each(|w| { *w /= total; });
    }

    Ok(WeightUpdate { weights: new_weights, significance, finished: false })
}


#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;


    #[test]
    fn standard_update() {
        let y = [0, 0, 1, 1];
        let p = [0, 1, 1, 1];
        let w = [0.25; 4];
        let update = update_weights(&y, &p, &w).unwrap();

        assert!(!update.finished);
        assert!((update.significance - 0.5 * 3f64.ln()).abs() < EPS);
        assert!((update.weights.iter().sum::<f64>() - 1.0).abs() < EPS);
        // the misclassified instance carries half of the mass
        assert!((update.weights[1] - 0.5).abs() < 1e-9);
    }


    #[test]
    fn perfect_prediction() {
        let y = [0, 1, 2];
        let w = [1.0 / 3.0; 3];
        let update = update_weights(&y, &y, &w).unwrap();
        assert_eq!(update.significance, 1.0);
        assert!(!update.finished);
        for w in update.weights {
            assert!((w - 1.0 / 3.0).abs() < EPS);
        }
    }


    #[test]
    fn worse_than_random_finishes() {
        let y = [0, 0, 1, 1];
        let p = [1, 1, 0, 1];
        let w = [0.25; 4];
        let update = update_weights(&y, &p, &w).unwrap();
        assert!(update.finished);
        assert_eq!(update.significance, 0.0);
        assert_eq!(update.weights, w.to_vec());
    }


    #[test]
    fn length_mismatch() {
        assert!(update_weights(&[0, 1], &[0], &[0.5, 0.5]).is_err());
    }
}
