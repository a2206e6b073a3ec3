use spodeboost::prelude::*;
use spodeboost::selection::{
    select_k_best_weighted,
    Cfs,
    Fcbf,
    Iwss,
};


/// Tests for the feature selectors.
#[cfg(test)]
pub mod selection_tests {
    use super::*;


    // Feature 0 is the class, feature 1 copies it
    // and feature 2 is independent of both.
    fn redundant_sample() -> Sample {
        let n = 400;
        let y = (0..n).map(|i| i % 2).collect::<Vec<usize>>();
        let noise = (0..n).map(|i| (i / 2) % 2).collect::<Vec<usize>>();
        Sample::from_columns(vec![y.clone(), y.clone(), noise], y).unwrap()
    }


    #[test]
    fn fcbf_drops_redundant_and_irrelevant_features() {
        let sample = redundant_sample();
        let w = vec![1.0; 400];
        let selected = Fcbf::new(0.05, 0).select(&sample, &w).unwrap();
        assert_eq!(selected, vec![0]);
    }


    #[test]
    fn iwss_keeps_the_two_most_relevant() {
        let sample = redundant_sample();
        let w = vec![1.0; 400];
        let selected = Iwss::new(0.0, 0).select(&sample, &w).unwrap();
        assert_eq!(selected, vec![0, 1]);

        let selected = Iwss::new(0.0, 1).select(&sample, &w).unwrap();
        assert_eq!(selected, vec![0]);
    }


    #[test]
    fn cfs_starts_from_the_most_relevant() {
        let sample = redundant_sample();
        let w = vec![1.0; 400];
        let selected = Cfs::new(0).select(&sample, &w).unwrap();
        assert_eq!(selected[0], 0);

        let mut sorted = selected.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), selected.len());

        let selected = Cfs::new(2).select(&sample, &w).unwrap();
        assert_eq!(selected.len(), 2);
    }


    #[test]
    fn k_best_ranking() {
        let sample = redundant_sample();
        let w = vec![1.0; 400];
        assert_eq!(select_k_best_weighted(&sample, &w, false, 0).unwrap(), vec![0, 1, 2]);
        assert_eq!(select_k_best_weighted(&sample, &w, true, 1).unwrap(), vec![2]);
        assert!(select_k_best_weighted(&sample, &w[..10], false, 1).is_err());
    }


    #[test]
    fn selector_factory() {
        assert!(SelectFeatures::None.build(-1.0, 0).unwrap().is_none());

        let selector = SelectFeatures::Fcbf.build(1e-3, 0).unwrap().unwrap();
        assert_eq!(selector.name(), "FCBF");
        assert!(SelectFeatures::Fcbf.build(0.0, 0).is_err());
        assert!(SelectFeatures::Iwss.build(0.7, 0).is_err());

        let selector = SelectFeatures::Cfs.build(-1.0, 3).unwrap().unwrap();
        assert_eq!(selector.name(), "CFS");
    }
}
