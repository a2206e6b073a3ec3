use polars::prelude::*;
use spodeboost::prelude::*;


/// Tests for `Sample`.
#[cfg(test)]
pub mod sample_tests {
    use super::*;


    #[test]
    fn columns_and_derived_states() {
        let x = vec![vec![0, 2, 1, 0], vec![1, 1, 0, 0]];
        let y = vec![0, 1, 1, 0];
        let sample = Sample::from_columns(x, y).unwrap();

        assert_eq!(sample.shape(), (4, 2));
        assert_eq!(sample.states(), &[3, 2]);
        assert_eq!(sample.n_classes(), 2);
        assert_eq!(sample.feature_names(), vec!["Feat. [1]", "Feat. [2]"]);
        assert_eq!(sample.instance(1), vec![2, 1]);
        assert_eq!(sample["Feat. [2]"].values, vec![1, 1, 0, 0]);

        let mut buf = [0; 2];
        sample.fill_instance(2, &mut buf);
        assert_eq!(buf, [1, 0]);
    }


    #[test]
    fn malformed_columns_are_rejected() {
        let ragged = Sample::from_columns(vec![vec![0, 1], vec![0]], vec![0, 1]);
        assert!(matches!(ragged, Err(Error::RaggedColumns { .. })));

        let empty = Sample::from_columns(Vec::new(), Vec::new());
        assert!(matches!(empty, Err(Error::EmptySample)));
    }


    #[test]
    fn declared_states_are_checked() {
        let sample = Sample::from_columns(vec![vec![0, 2]], vec![0, 1]).unwrap();
        assert!(matches!(
            sample.clone().with_states(vec![2], 2),
            Err(Error::ValueOutOfRange { feature: 0, value: 2, states: 2 })
        ));
        assert!(matches!(
            sample.clone().with_states(vec![3], 1),
            Err(Error::ClassOutOfRange { value: 1, n_classes: 1 })
        ));
        assert!(matches!(
            sample.clone().with_states(vec![3, 3], 2),
            Err(Error::FeatureCountMismatch { expected: 1, got: 2 })
        ));
        assert!(matches!(
            sample.clone().with_states(vec![0], 2),
            Err(Error::NonPositiveCardinality { .. })
        ));

        let widened = sample.with_states(vec![5], 4).unwrap();
        assert_eq!(widened.states(), &[5]);
        assert_eq!(widened.n_classes(), 4);
    }


    #[test]
    fn from_dataframe() {
        let data = df!(
            "color" => &[0i64, 1, 2, 1],
            "size"  => &[1i32, 0, 1, 1]
        ).unwrap();
        let target = Series::new("class", &[0i64, 1, 1, 0]);

        let sample = Sample::from_dataframe(data, target).unwrap();
        assert_eq!(sample.shape(), (4, 2));
        assert_eq!(sample.feature_names(), vec!["color", "size"]);
        assert_eq!(sample.states(), &[3, 2]);
        assert_eq!(sample["size"].values, vec![1, 0, 1, 1]);
        assert_eq!(sample.target(), &[0, 1, 1, 0]);
    }


    #[test]
    fn negative_and_missing_values() {
        let data = df!("a" => &[0i64, -1]).unwrap();
        let target = Series::new("class", &[0i64, 1]);
        assert!(matches!(
            Sample::from_dataframe(data, target),
            Err(Error::NegativeValue { value: -1, .. })
        ));

        let data = df!("a" => &[Some(0i64), None]).unwrap();
        let target = Series::new("class", &[0i64, 1]);
        assert!(matches!(
            Sample::from_dataframe(data, target),
            Err(Error::MissingValue(_))
        ));
    }


    #[test]
    fn stratified_holdout() {
        let n = 103;
        let target = (0..n).map(|i| usize::from(i % 4 == 0)).collect::<Vec<_>>();
        let feature = (0..n).collect::<Vec<usize>>();
        let sample = Sample::from_columns(vec![feature], target).unwrap();

        let (train, validation) = sample.stratified_holdout(5, 271);
        assert_eq!(train.shape().0 + validation.shape().0, n);
        assert_eq!(train.states(), sample.states());

        // Every row lands in exactly one part.
        let mut rows = train["Feat. [1]"].values.clone();
        rows.extend(&validation["Feat. [1]"].values);
        rows.sort_unstable();
        assert_eq!(rows, (0..n).collect::<Vec<_>>());

        // Fold 0 of each class holds ceil(count / 5) rows.
        let positives = validation.target().iter().filter(|&&y| y == 1).count();
        let negatives = validation.target().len() - positives;
        assert_eq!(positives, 26_usize.div_ceil(5));
        assert_eq!(negatives, 77_usize.div_ceil(5));

        let (again, _) = sample.stratified_holdout(5, 271);
        assert_eq!(again.target(), train.target());
    }
}
