use std::sync::Arc;

use rand::prelude::*;
use rand::rngs::StdRng;
use spodeboost::prelude::*;
use spodeboost::parallel::default_capacity;


/// Tests for `BatchPredictor`.
#[cfg(test)]
pub mod batch_predictor_tests {
    use super::*;


    fn random_columns(n_rows: usize, states: &[usize], seed: u64) -> Vec<Vec<usize>> {
        let mut rng = StdRng::seed_from_u64(seed);
        states.iter()
            .map(|&s| (0..n_rows).map(|_| rng.gen_range(0..s)).collect())
            .collect()
    }


    fn fitted_aode() -> (Sample, Aode) {
        let states = [3, 2, 4, 3];
        let features = random_columns(600, &states, 1);
        let mut rng = StdRng::seed_from_u64(2);
        let target = features[0].iter()
            .zip(&features[2])
            .map(|(&a, &b)| if rng.gen_bool(0.1) { rng.gen_range(0..3) } else { (a + b) % 3 })
            .collect::<Vec<_>>();
        let sample = Sample::from_columns(features, target)
            .unwrap()
            .with_states(states.to_vec(), 3)
            .unwrap();
        let aode = Aode::fit(&sample, &[1.0; 600], Smoothing::Original).unwrap();
        (sample, aode)
    }


    #[test]
    fn output_does_not_depend_on_the_cap() {
        let (_, aode) = fitted_aode();
        let batch = random_columns(2_345, &[3, 2, 4, 3], 3);

        let serial = BatchPredictor::with_semaphore(Arc::new(CountingSemaphore::new(1)));
        let parallel = BatchPredictor::with_semaphore(
            Arc::new(CountingSemaphore::new(default_capacity()))
        );

        let a = serial.predict_proba(&aode, &batch).unwrap();
        let b = parallel.predict_proba(&aode, &batch).unwrap();
        assert_eq!(a, b);

        let a = serial.predict(&aode, &batch).unwrap();
        let b = parallel.predict(&aode, &batch).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2_345);
    }


    #[test]
    fn matches_sequential_inference() {
        let (sample, aode) = fitted_aode();
        let predictor = BatchPredictor::new();

        let batch = predictor.predict_proba(&aode, sample.features()).unwrap();
        let sequential = aode.predict_proba_all(&sample).unwrap();
        assert_eq!(batch, sequential);

        let score = predictor.score(&aode, sample.features(), sample.target()).unwrap();
        assert_eq!(score, aode.score(&sample).unwrap());
    }


    #[test]
    fn ensembles_and_spodes_are_batchable() {
        let (sample, _) = fitted_aode();
        let mut booster = BoostAode::init(&sample).max_tolerance(2);
        let ensemble = booster.run(&SpodeLearner::init()).unwrap();

        let predictor = BatchPredictor::with_semaphore(Arc::new(CountingSemaphore::new(2)));
        let predictions = predictor.predict(&ensemble, sample.features()).unwrap();
        assert_eq!(predictions, ensemble.predict_all(&sample).unwrap());

        let spode = &ensemble.hypotheses()[0];
        let predictions = predictor.predict(spode, sample.features()).unwrap();
        assert_eq!(predictions, spode.predict_all(&sample).unwrap());
    }


    #[test]
    fn invalid_rows_are_reported() {
        let (_, aode) = fitted_aode();
        let mut batch = random_columns(500, &[3, 2, 4, 3], 4);
        batch[1][420] = 7;

        let predictor = BatchPredictor::with_semaphore(Arc::new(CountingSemaphore::new(3)));
        let result = predictor.predict(&aode, &batch);
        assert!(matches!(
            result,
            Err(Error::ValueOutOfRange { feature: 1, value: 7, states: 2 })
        ));

        let short_labels = vec![0; 10];
        let batch = random_columns(500, &[3, 2, 4, 3], 5);
        assert!(predictor.score(&aode, &batch, &short_labels).is_err());
    }


    #[test]
    fn concurrent_calls_share_the_global_cap() {
        let (_, aode) = fitted_aode();
        let batch = random_columns(1_000, &[3, 2, 4, 3], 6);
        let expected = BatchPredictor::new().predict(&aode, &batch).unwrap();

        std::thread::scope(|s| {
            let handles = (0..4)
                .map(|_| s.spawn(|| BatchPredictor::new().predict(&aode, &batch).unwrap()))
                .collect::<Vec<_>>();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
