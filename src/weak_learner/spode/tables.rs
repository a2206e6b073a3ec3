use serde::{Serialize, Deserialize};

use crate::common::{checker, utils};
use crate::{Error, Result, Sample};
use super::layout::TableLayout;


/// Life cycle of [`ProbabilityTables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TableState {
    /// Just created; `init` has not been called.
    #[default]
    Empty,
    /// Accumulating weighted counts.
    Counts,
    /// Holding conditional probabilities. Read-only.
    Probs,
}


/// Weighted sufficient statistics of a one-dependence model
/// and the conditional probability tables derived from them.
///
/// The tables are filled in three steps:
/// [`init`](ProbabilityTables::init),
/// [`add_sample`](ProbabilityTables::add_sample) once per instance, and
/// [`compute_probabilities`](ProbabilityTables::compute_probabilities)
/// exactly once.
/// Afterwards they only answer queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbabilityTables {
    state: TableState,
    layout: TableLayout,
    alpha: f64,
    scale: f64,

    class_counts: Vec<f64>,
    class_priors: Vec<f64>,

    feature_class_counts: Vec<f64>,
    feature_class_probs: Vec<f64>,

    // Pair counts while in `Counts`,
    // `P(lower = lv | higher = hv, c)` once in `Probs`.
    lower_given_higher: Vec<f64>,
    // `P(higher = hv | lower = lv, c)`.
    higher_given_lower: Vec<f64>,
}


impl ProbabilityTables {
    /// Construct empty tables.
    pub fn new() -> Self {
        Self::default()
    }


    /// Allocate every table for the given cardinalities
    /// and start accumulating counts.
    pub fn init(&mut self, states: &[usize], n_classes: usize) -> Result<()> {
        if self.state != TableState::Empty {
            return Err(Error::AlreadyInitialized);
        }
        let layout = TableLayout::new(states, n_classes)?;

        self.class_counts = vec![0.0; n_classes];
        self.class_priors = vec![0.0; n_classes];
        self.feature_class_counts = vec![0.0; layout.feature_class_len()];
        self.feature_class_probs = vec![0.0; layout.feature_class_len()];
        self.lower_given_higher = vec![0.0; layout.pair_len()];
        self.higher_given_lower = vec![0.0; layout.pair_len()];
        self.layout = layout;
        self.state = TableState::Counts;
        Ok(())
    }


    /// Accumulate one weighted instance.
    /// `instance` holds one value per feature followed by the class.
    /// Non-positive weights are ignored.
    pub fn add_sample(&mut self, instance: &[usize], weight: f64) -> Result<()> {
        if self.state != TableState::Counts {
            return Err(Error::NotCounting(self.state));
        }
        let n_features = self.layout.n_features();
        if instance.len() != n_features + 1 {
            return Err(Error::FeatureCountMismatch {
                expected: n_features + 1,
                got: instance.len(),
            });
        }
        let (x, c) = (&instance[..n_features], instance[n_features]);
        let n_classes = self.layout.n_classes();
        if c >= n_classes {
            return Err(Error::ClassOutOfRange { value: c, n_classes });
        }
        checker::check_instance(x, self.layout.states())?;

        if !(weight > 0.0) {
            return Ok(());
        }

        self.class_counts[c] += weight;
        for higher in 0..n_features {
            let hv = x[higher];
            let ix = self.layout.feature_class_index(higher, hv, c);
            self.feature_class_counts[ix] += weight;

            for lower in 0..higher {
                let ix = self.layout.pair_index(higher, hv, lower, x[lower], c);
                self.lower_given_higher[ix] += weight;
            }
        }
        Ok(())
    }


    /// Turn the accumulated counts into probabilities
    /// with the additive pseudo-count `alpha`.
    ///
    /// ```text
    /// P(c)                 = (N_c + α/|C|)         / (N + α)
    /// P(x_f = v | c)       = (N_{f=v,c} + α/|f|)   / (N_c + α)
    /// P(x_l = lv | x_h = hv, c) = (N_{h,l,c} + α/|l|) / (N_{h=hv,c} + α)
    /// P(x_h = hv | x_l = lv, c) = (N_{h,l,c} + α/|h|) / (N_{l=lv,c} + α)
    /// ```
    /// A zero denominator yields the uniform distribution
    /// over the states of the predicted variable.
    pub fn compute_probabilities(&mut self, alpha: f64) -> Result<()> {
        match self.state {
            TableState::Counts => {},
            TableState::Probs => return Err(Error::AlreadyComputed),
            TableState::Empty => return Err(Error::NotCounting(self.state)),
        }
        self.alpha = alpha;
        let n_features = self.layout.n_features();
        let n_classes = self.layout.n_classes();
        let states = self.layout.states().to_vec();

        // (1) P(c)
        let total = self.class_counts.iter().sum::<f64>();
        let k = n_classes as f64;
        for (prior, &count) in self.class_priors.iter_mut()
            .zip(&self.class_counts)
        {
            *prior = smoothed(count, total, alpha, k);
        }

        // (2) P(x_f = v | c)
        for (f, &s) in states.iter().enumerate() {
            for v in 0..s {
                let base = self.layout.feature_class_base(f, v);
                for c in 0..n_classes {
                    self.feature_class_probs[base + c] = smoothed(
                        self.feature_class_counts[base + c],
                        self.class_counts[c],
                        alpha,
                        s as f64,
                    );
                }
            }
        }

        // (3) both directions of every pair
        for higher in 1..n_features {
            for hv in 0..states[higher] {
                let higher_base = self.layout.feature_class_base(higher, hv);
                for lower in 0..higher {
                    for lv in 0..states[lower] {
                        let lower_base = self.layout.feature_class_base(lower, lv);
                        let base = self.layout.pair_base(higher, hv, lower, lv);
                        for c in 0..n_classes {
                            let count = self.lower_given_higher[base + c];
                            self.lower_given_higher[base + c] = smoothed(
                                count,
                                self.feature_class_counts[higher_base + c],
                                alpha,
                                states[lower] as f64,
                            );
                            self.higher_given_lower[base + c] = smoothed(
                                count,
                                self.feature_class_counts[lower_base + c],
                                alpha,
                                states[higher] as f64,
                            );
                        }
                    }
                }
            }
        }

        // Scale applied to every joint so long products stay representable.
        self.scale = f64::MAX / (n_features * n_features) as f64;
        self.state = TableState::Probs;
        Ok(())
    }


    /// Count every row of `sample` with the matching weight
    /// and compute the probabilities with pseudo-count `alpha`.
    /// The weights are rescaled to sum to the number of rows.
    pub(crate) fn from_sample(sample: &Sample, weights: &[f64], alpha: f64)
        -> Result<Self>
    {
        checker::check_sample(sample)?;
        let (n_sample, n_feature) = sample.shape();
        checker::check_weights(weights, n_sample)?;
        let weights = utils::rescale_weights(weights);

        let mut tables = Self::new();
        tables.init(sample.states(), sample.n_classes())?;

        let target = sample.target();
        let mut row_buf = vec![0; n_feature + 1];
        for (row, &w) in weights.iter().enumerate() {
            sample.fill_instance(row, &mut row_buf[..n_feature]);
            row_buf[n_feature] = target[row];
            tables.add_sample(&row_buf, w)?;
        }
        tables.compute_probabilities(alpha)?;
        Ok(tables)
    }


    /// Current life-cycle state.
    #[inline]
    pub fn state(&self) -> TableState {
        self.state
    }


    /// Offset layout of the tables.
    #[inline]
    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }


    /// Number of features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.layout.n_features()
    }


    /// Number of class values.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.layout.n_classes()
    }


    /// Cardinality of every feature.
    #[inline]
    pub fn states(&self) -> &[usize] {
        self.layout.states()
    }


    /// Pseudo-count used by `compute_probabilities`.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }


    /// `P(c)`.
    pub fn class_prior(&self, class: usize) -> f64 {
        self.class_priors[class]
    }


    /// `P(x_feature = value | c)`.
    pub fn feature_probability(&self, feature: usize, value: usize, class: usize)
        -> f64
    {
        self.feature_class_probs[self.layout.feature_class_index(feature, value, class)]
    }


    /// `P(x_child = child_value | x_parent = parent_value, c)`
    /// for any two distinct features.
    pub fn conditional(
        &self,
        child: usize,
        child_value: usize,
        parent: usize,
        parent_value: usize,
        class: usize,
    ) -> f64
    {
        let (table, base) = self.child_block(child, child_value, parent, parent_value);
        table[base + class]
    }


    /// Table and class block that hold
    /// `P(x_child = child_value | x_parent = parent_value, ·)`.
    /// A child below the parent is read from `lower_given_higher`,
    /// a child above it from `higher_given_lower`.
    #[inline(always)]
    fn child_block(
        &self,
        child: usize,
        child_value: usize,
        parent: usize,
        parent_value: usize,
    ) -> (&[f64], usize)
    {
        if child < parent {
            let base = self.layout.pair_base(parent, parent_value, child, child_value);
            (&self.lower_given_higher[..], base)
        } else {
            let base = self.layout.pair_base(child, child_value, parent, parent_value);
            (&self.higher_given_lower[..], base)
        }
    }


    /// Writes the scaled joint
    /// `P(c) P(x_parent | c) Π_{child ≠ parent} P(x_child | c, x_parent)`
    /// into `joint`.
    #[inline]
    fn spode_joint_into(&self, instance: &[usize], parent: usize, joint: &mut [f64]) {
        let n_classes = self.layout.n_classes();
        let parent_value = instance[parent];

        let base = self.layout.feature_class_base(parent, parent_value);
        joint.iter_mut()
            .zip(&self.class_priors)
            .zip(&self.feature_class_probs[base..base + n_classes])
            .for_each(|((j, prior), p)| { *j = prior * p * self.scale; });

        for (child, &child_value) in instance.iter().enumerate() {
            if child == parent {
                continue;
            }
            let (table, base) = self.child_block(child, child_value, parent, parent_value);
            joint.iter_mut()
                .zip(&table[base..base + n_classes])
                .for_each(|(j, p)| { *j *= p; });
        }
    }


    fn check_query(&self, instance: &[usize]) -> Result<()> {
        if self.state != TableState::Probs {
            return Err(Error::NotFitted);
        }
        checker::check_instance(instance, self.layout.states())
    }


    /// Posterior over the classes under the single super-parent `parent`.
    /// A zero joint is returned unnormalized.
    pub fn predict_proba_spode(&self, instance: &[usize], parent: usize)
        -> Result<Vec<f64>>
    {
        self.check_query(instance)?;
        checker::check_feature(parent, self.n_features())?;

        let mut probs = vec![0.0; self.n_classes()];
        self.spode_joint_into(instance, parent, &mut probs);
        utils::normalize_posterior(&mut probs)?;
        Ok(probs)
    }


    /// Posterior over the classes averaged over the super-parents
    /// in `parents`: the joints of every parent are summed class-wise
    /// and the sum is normalized.
    pub fn predict_proba_averaged(&self, instance: &[usize], parents: &[usize])
        -> Result<Vec<f64>>
    {
        self.check_query(instance)?;
        let n_classes = self.n_classes();

        let mut probs = vec![0.0; n_classes];
        let mut joint = vec![0.0; n_classes];
        for &parent in parents {
            checker::check_feature(parent, self.n_features())?;
            self.spode_joint_into(instance, parent, &mut joint);
            probs.iter_mut()
                .zip(&joint)
                .for_each(|(p, j)| { *p += j; });
        }
        utils::normalize_posterior(&mut probs)?;
        Ok(probs)
    }


    /// Number of nodes of the equivalent network family.
    pub fn n_nodes(&self) -> usize {
        let n = self.n_features();
        (n + 1) * n
    }


    /// Number of edges of the equivalent network family.
    pub fn n_edges(&self) -> usize {
        let n = self.n_features();
        if n == 0 { 0 } else { n * (2 * n - 1) }
    }


    /// Number of states of the equivalent network family.
    pub fn n_states(&self) -> usize {
        let states = self.states().iter().sum::<usize>() + self.n_classes();
        states * self.n_features()
    }
}


/// `(count + α / n_states) / (total + α)`,
/// uniform when the denominator vanishes.
#[inline(always)]
fn smoothed(count: f64, total: f64, alpha: f64, n_states: f64) -> f64 {
    let denom = total + alpha;
    if denom <= 0.0 {
        1.0 / n_states
    } else {
        (count + alpha / n_states) / denom
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    // (x0, x1, class)
    const TOY: [[usize; 3]; 4] = [
        [0, 0, 0],
        [0, 1, 0],
        [1, 1, 1],
        [1, 1, 1],
    ];


    fn toy_tables(alpha: f64) -> ProbabilityTables {
        let mut tables = ProbabilityTables::new();
        tables.init(&[2, 2], 2).unwrap();
        for row in TOY {
            tables.add_sample(&row, 1.0).unwrap();
        }
        tables.compute_probabilities(alpha).unwrap();
        tables
    }


    #[test]
    fn unsmoothed_probabilities() {
        let t = toy_tables(0.0);
        assert!((t.class_prior(0) - 0.5).abs() < EPS);
        assert!((t.feature_probability(0, 0, 0) - 1.0).abs() < EPS);
        assert!((t.feature_probability(1, 0, 0) - 0.5).abs() < EPS);
        assert!((t.feature_probability(1, 1, 1) - 1.0).abs() < EPS);

        // P(x0 = 0 | x1 = 0, c = 0), stored in the primary table
        assert!((t.conditional(0, 0, 1, 0, 0) - 1.0).abs() < EPS);
        // P(x1 = 0 | x0 = 0, c = 0), stored in the symmetric table
        assert!((t.conditional(1, 0, 0, 0, 0) - 0.5).abs() < EPS);
        assert!((t.conditional(1, 1, 0, 1, 1) - 1.0).abs() < EPS);
    }


    #[test]
    fn zero_mass_falls_back_to_uniform() {
        let t = toy_tables(0.0);
        // no instance with x1 = 0 and c = 1
        assert!((t.conditional(0, 0, 1, 0, 1) - 0.5).abs() < EPS);
        // no instance with x0 = 1 and c = 0
        assert!((t.conditional(1, 0, 0, 1, 0) - 0.5).abs() < EPS);
    }


    #[test]
    fn laplace_probabilities() {
        let t = toy_tables(1.0);
        assert!((t.class_prior(0) - 2.5 / 5.0).abs() < EPS);
        assert!((t.feature_probability(0, 0, 0) - 2.5 / 3.0).abs() < EPS);
        // (1 + 1/2) / (2 + 1)
        assert!((t.conditional(1, 0, 0, 0, 0) - 1.5 / 3.0).abs() < EPS);
    }


    #[test]
    fn conditionals_sum_to_one() {
        for alpha in [0.0, 0.25, 1.0] {
            let t = toy_tables(alpha);
            for c in 0..2 {
                for pv in 0..2 {
                    let up = (0..2).map(|v| t.conditional(1, v, 0, pv, c)).sum::<f64>();
                    let down = (0..2).map(|v| t.conditional(0, v, 1, pv, c)).sum::<f64>();
                    assert!((up - 1.0).abs() < 1e-9, "alpha = {alpha}");
                    assert!((down - 1.0).abs() < 1e-9, "alpha = {alpha}");
                }
                let f = (0..2).map(|v| t.feature_probability(0, v, c)).sum::<f64>();
                assert!((f - 1.0).abs() < 1e-9);
            }
        }
    }


    #[test]
    fn spode_posterior() {
        let t = toy_tables(0.0);
        let p = t.predict_proba_spode(&[0, 0], 0).unwrap();
        assert!((p[0] - 1.0).abs() < EPS);
        assert!(p[1].abs() < EPS);

        let p = t.predict_proba_spode(&[1, 1], 1).unwrap();
        assert!(p[1] > p[0]);
    }


    #[test]
    fn averaged_posterior_sums_joints() {
        let t = toy_tables(1.0);
        let x = [0, 1];
        let avg = t.predict_proba_averaged(&x, &[0, 1]).unwrap();
        assert!((avg.iter().sum::<f64>() - 1.0).abs() < 1e-9);

        let empty = t.predict_proba_averaged(&x, &[]).unwrap();
        assert_eq!(empty, vec![0.0, 0.0]);

        let single = t.predict_proba_averaged(&x, &[1]).unwrap();
        let spode = t.predict_proba_spode(&x, 1).unwrap();
        for (a, b) in single.iter().zip(&spode) {
            assert!((a - b).abs() < 1e-12);
        }
    }


    #[test]
    fn non_positive_weight_is_ignored() {
        let mut tables = ProbabilityTables::new();
        tables.init(&[2], 2).unwrap();
        tables.add_sample(&[1, 1], 0.0).unwrap();
        tables.add_sample(&[1, 1], -3.0).unwrap();
        tables.add_sample(&[0, 0], 1.0).unwrap();
        tables.compute_probabilities(0.0).unwrap();
        assert!((tables.class_prior(0) - 1.0).abs() < EPS);
    }


    #[test]
    fn negative_weights_add_nothing_when_fitting() {
        // x0 equals the class
        let sample = Sample::from_columns(vec![vec![0, 0, 1, 1]], vec![0, 0, 1, 1])
            .unwrap();

        // no row carries mass, so every table falls back to uniform
        let t = ProbabilityTables::from_sample(&sample, &[-1.0; 4], 0.0).unwrap();
        assert!((t.class_prior(1) - 0.5).abs() < EPS);
        let p = t.predict_proba_spode(&[0], 0).unwrap();
        assert!((p[0] - 0.5).abs() < EPS);
        assert!((p[1] - 0.5).abs() < EPS);

        // the last row is dropped instead of offsetting the others
        let t = ProbabilityTables::from_sample(&sample, &[1.0, 1.0, 1.0, -3.0], 0.0)
            .unwrap();
        assert!((t.class_prior(1) - 1.0 / 3.0).abs() < EPS);
    }


    #[test]
    fn life_cycle_errors() {
        let mut tables = ProbabilityTables::new();
        assert!(matches!(
            tables.add_sample(&[0, 0], 1.0),
            Err(Error::NotCounting(TableState::Empty))
        ));
        assert!(tables.predict_proba_spode(&[0], 0).is_err());

        tables.init(&[2], 2).unwrap();
        assert!(matches!(tables.init(&[2], 2), Err(Error::AlreadyInitialized)));
        assert!(matches!(
            tables.add_sample(&[2, 0], 1.0),
            Err(Error::ValueOutOfRange { feature: 0, value: 2, states: 2 })
        ));
        assert!(matches!(
            tables.add_sample(&[0, 5], 1.0),
            Err(Error::ClassOutOfRange { value: 5, n_classes: 2 })
        ));

        tables.add_sample(&[0, 0], 1.0).unwrap();
        tables.compute_probabilities(1.0).unwrap();
        assert_eq!(tables.state(), TableState::Probs);

        assert!(matches!(
            tables.compute_probabilities(1.0),
            Err(Error::AlreadyComputed)
        ));
        assert!(matches!(
            tables.add_sample(&[0, 0], 1.0),
            Err(Error::NotCounting(TableState::Probs))
        ));
    }


    #[test]
    fn nan_weight_is_ignored() {
        let mut tables = ProbabilityTables::new();
        tables.init(&[2], 2).unwrap();
        tables.add_sample(&[0, 1], f64::NAN).unwrap();
        tables.add_sample(&[0, 0], 1.0).unwrap();
        tables.compute_probabilities(0.0).unwrap();
        let p = tables.predict_proba_spode(&[0], 0).unwrap();
        assert!(p.iter().all(|v| v.is_finite()));
    }


    #[test]
    fn structure_statistics() {
        let t = toy_tables(0.0);
        assert_eq!(t.n_nodes(), 6);
        assert_eq!(t.n_edges(), 6);
        assert_eq!(t.n_states(), (2 + 2 + 2) * 2);
    }
}
