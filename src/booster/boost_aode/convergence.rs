// Smallest accuracy gain that counts as an improvement.
const CONVERGENCE_THRESHOLD: f64 = 1e-4;


/// Tracks the hold-out accuracy across packs.
#[derive(Debug, Clone)]
pub(crate) struct ConvergenceTracker {
    keep_best: bool,
    max_tolerance: usize,
    prior: Option<f64>,
    tolerance: usize,
}


impl ConvergenceTracker {
    pub(crate) fn new(keep_best: bool, max_tolerance: usize) -> Self {
        Self { keep_best, max_tolerance, prior: None, tolerance: 0 }
    }


    /// Record the accuracy of the latest pack.
    /// Returns `true` if it improved on the prior accuracy;
    /// the first observation always does.
    pub(crate) fn observe(&mut self, accuracy: f64) -> bool {
        let improved = match self.prior {
            None => true,
            Some(prior) => accuracy - prior >= CONVERGENCE_THRESHOLD,
        };
        if improved {
            self.tolerance = 0;
        } else {
            self.tolerance += 1;
        }

        self.prior = match self.prior {
            Some(prior) if self.keep_best => Some(prior.max(accuracy)),
            _ => Some(accuracy),
        };
        improved
    }


    /// Number of consecutive non-improving packs.
    #[inline]
    pub(crate) fn tolerance(&self) -> usize {
        self.tolerance
    }


    /// `true` once the tolerance exceeds its maximum.
    #[inline]
    pub(crate) fn exhausted(&self) -> bool {
        self.tolerance > self.max_tolerance
    }
}
