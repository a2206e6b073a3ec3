use serde::{Serialize, Deserialize};

use crate::selection::SelectFeatures;
use crate::{Error, Result};


/// Order in which unused features become super-parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Increasing weighted mutual information with the class.
    Asc,
    /// Decreasing weighted mutual information with the class.
    #[default]
    Desc,
    /// Seeded random shuffle.
    Rand,
}


/// Hyperparameters of [`BoostAode`](super::BoostAode).
///
/// Every field has a default, so a JSON object only needs the keys
/// that differ; unknown keys are rejected.
///
/// ```
/// use spodeboost::prelude::*;
///
/// let config = BoostConfig::from_json(r#"{"order": "rand", "max_tolerance": 1}"#)
///     .unwrap();
/// assert_eq!(config.order, Order::Rand);
/// assert!(config.bisection);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoostConfig {
    /// Feature order.
    pub order: Order,
    /// Seed of the random order.
    pub seed: u64,
    /// Selector that seeds the ensemble before boosting.
    pub select_features: SelectFeatures,
    /// Threshold of FCBF (`[1e-7, 1]`) or IWSS (`[0, 0.5]`).
    pub threshold: f64,
    /// Upper bound on the seeded features, `0` for no bound.
    pub max_features: usize,
    /// Score candidates inside the ensemble instead of alone.
    pub alpha_block: bool,
    /// Stop when the hold-out accuracy stops improving.
    pub convergence: bool,
    /// Compare against the best accuracy instead of the last one.
    pub convergence_best: bool,
    /// Non-improving packs tolerated before stopping.
    pub max_tolerance: usize,
    /// Double the pack size after every non-improving pack.
    pub bisection: bool,
}


impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            order: Order::Desc,
            seed: 173,
            select_features: SelectFeatures::None,
            threshold: -1.0,
            max_features: 0,
            alpha_block: false,
            convergence: true,
            convergence_best: false,
            max_tolerance: 3,
            bisection: true,
        }
    }
}


impl BoostConfig {
    /// Parse a hyperparameter object and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }


    /// Check the threshold against the chosen selector
    /// and `max_tolerance` against `[1, 6]`.
    pub fn validate(&self) -> Result<()> {
        self.select_features.check_threshold(self.threshold)?;
        if !(1..=6).contains(&self.max_tolerance) {
            let message = format!(
                "max_tolerance must lie in [1, 6], got {}",
                self.max_tolerance
            );
            return Err(Error::InvalidConfig(message));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BoostConfig::from_json("{}").unwrap();
        assert_eq!(config, BoostConfig::default());
        assert_eq!(config.order, Order::Desc);
        assert_eq!(config.max_tolerance, 3);
        assert!(config.convergence);
    }


    #[test]
    fn unknown_keys_are_rejected() {
        let err = BoostConfig::from_json(r#"{"n_estimators": 3}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }


    #[test]
    fn thresholds_are_checked() {
        let fcbf = r#"{"select_features": "fcbf", "threshold": 1e-3}"#;
        assert!(BoostConfig::from_json(fcbf).is_ok());

        let fcbf = r#"{"select_features": "fcbf"}"#;
        assert!(matches!(
            BoostConfig::from_json(fcbf),
            Err(Error::InvalidConfig(_))
        ));

        let iwss = r#"{"select_features": "iwss", "threshold": 0.7}"#;
        assert!(matches!(
            BoostConfig::from_json(iwss),
            Err(Error::InvalidConfig(_))
        ));

        let cfs = r#"{"select_features": "cfs"}"#;
        assert!(BoostConfig::from_json(cfs).is_ok());

        let tolerance = r#"{"max_tolerance": 0}"#;
        assert!(BoostConfig::from_json(tolerance).is_err());
    }
}
