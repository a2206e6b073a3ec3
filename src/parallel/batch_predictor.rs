use std::sync::Arc;
use std::thread;

use tracing::debug;

use crate::common::utils;
use crate::{Classifier, Error, Result};
use super::semaphore::CountingSemaphore;


// Upper bound on the rows one worker handles.
const MAX_CHUNK: usize = 150;


/// Column-major batch inference on scoped worker threads.
///
/// The batch is cut into contiguous chunks of
/// `min(150, n_rows / capacity + 1)` rows.
/// One worker runs per chunk and every worker holds a permit of the
/// semaphore while it runs, so at most `capacity` of them run at once.
/// Each worker writes only its own slice of the pre-sized output,
/// so the result does not depend on scheduling.
///
/// ```no_run
/// use spodeboost::prelude::*;
///
/// let x = vec![vec![0, 0, 1, 1], vec![0, 1, 0, 1]];
/// let y = vec![0, 0, 1, 1];
/// let sample = Sample::from_columns(x.clone(), y).unwrap();
/// let spode = Spode::fit(&sample, &[1.0; 4], 0, Smoothing::Laplace).unwrap();
///
/// let predictor = BatchPredictor::new();
/// let predictions = predictor.predict(&spode, &x).unwrap();
/// assert_eq!(predictions, vec![0, 0, 1, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct BatchPredictor {
    semaphore: Arc<CountingSemaphore>,
}


impl Default for BatchPredictor {
    fn default() -> Self {
        Self::new()
    }
}


impl BatchPredictor {
    /// Predictor bounded by the process-wide semaphore.
    pub fn new() -> Self {
        Self { semaphore: CountingSemaphore::global() }
    }


    /// Predictor bounded by `semaphore`.
    pub fn with_semaphore(semaphore: Arc<CountingSemaphore>) -> Self {
        Self { semaphore }
    }


    /// Number of workers allowed to run at once.
    pub fn capacity(&self) -> usize {
        self.semaphore.capacity()
    }


    /// Rows handled by one worker for a batch of `n_rows` rows.
    pub fn chunk_size(&self, n_rows: usize) -> usize {
        MAX_CHUNK.min(n_rows / self.capacity() + 1)
    }


    /// Apply `f` to every row of the column-major batch `columns`
    /// and return the results in row order.
    /// The first error reported by a worker is returned
    /// once every worker has been joined.
    pub fn map_rows<C, T, F>(&self, columns: &[C], f: F) -> Result<Vec<T>>
        where C: AsRef<[usize]> + Sync,
              T: Send,
              F: Fn(&[usize]) -> Result<T> + Sync,
    {
        let n_rows = n_rows(columns)?;
        if n_rows == 0 {
            return Ok(Vec::new());
        }
        let n_features = columns.len();
        let chunk = self.chunk_size(n_rows);
        debug!(n_rows, chunk, capacity = self.capacity(), "batch prediction");

        let mut output = (0..n_rows).map(|_| None)
            .collect::<Vec<Option<T>>>();
        let f = &f;
        let semaphore = &*self.semaphore;

        thread::scope(|s| -> Result<()> {
            let mut handles = Vec::new();
            for (i, slots) in output.chunks_mut(chunk).enumerate() {
                let begin = i * chunk;
                let permit = semaphore.acquire();
                let handle = thread::Builder::new()
                    .name(format!("predict-{begin}-{}", slots.len()))
                    .spawn_scoped(s, move || -> Result<()> {
                        let _permit = permit;
                        let mut instance = vec![0; n_features];
                        for (k, slot) in slots.iter_mut().enumerate() {
                            let row = begin + k;
                            instance.iter_mut()
                                .zip(columns)
                                .for_each(|(x, col)| { *x = col.as_ref()[row]; });
                            *slot = Some(f(&instance)?);
                        }
                        Ok(())
                    })?;
                handles.push(handle);
            }

            let mut result = Ok(());
            for handle in handles {
                let joined = handle.join()
                    .unwrap_or(Err(Error::WorkerPanicked));
                if result.is_ok() {
                    result = joined;
                }
            }
            result
        })?;

        output.into_iter()
            .map(|slot| slot.ok_or(Error::WorkerPanicked))
            .collect()
    }


    /// Posterior of every row.
    pub fn predict_proba<M, C>(&self, model: &M, columns: &[C])
        -> Result<Vec<Vec<f64>>>
        where M: Classifier + Sync,
              C: AsRef<[usize]> + Sync,
    {
        self.map_rows(columns, |instance| model.predict_proba(instance))
    }


    /// Predicted class of every row.
    pub fn predict<M, C>(&self, model: &M, columns: &[C]) -> Result<Vec<usize>>
        where M: Classifier + Sync,
              C: AsRef<[usize]> + Sync,
    {
        self.map_rows(columns, |instance| model.predict(instance))
    }


    /// Fraction of rows whose class matches `labels`.
    pub fn score<M, C>(&self, model: &M, columns: &[C], labels: &[usize])
        -> Result<f64>
        where M: Classifier + Sync,
              C: AsRef<[usize]> + Sync,
    {
        let predictions = self.predict(model, columns)?;
        if labels.len() != predictions.len() {
            return Err(Error::RaggedColumns {
                column: "labels".to_string(),
                expected: predictions.len(),
                got: labels.len(),
            });
        }
        Ok(utils::accuracy(labels, &predictions))
    }
}


/// Common length of the columns.
fn n_rows<C: AsRef<[usize]>>(columns: &[C]) -> Result<usize> {
    let Some(first) = columns.first() else {
        return Err(Error::EmptySample);
    };
    let expected = first.as_ref().len();
    for (i, column) in columns.iter().enumerate() {
        let got = column.as_ref().len();
        if got != expected {
            return Err(Error::RaggedColumns {
                column: format!("feature {i}"),
                expected,
                got,
            });
        }
    }
    Ok(expected)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_size_formula() {
        let predictor = BatchPredictor::with_semaphore(Arc::new(CountingSemaphore::new(4)));
        assert_eq!(predictor.chunk_size(10), 3);
        assert_eq!(predictor.chunk_size(10_000), 150);

        let single = BatchPredictor::with_semaphore(Arc::new(CountingSemaphore::new(1)));
        assert_eq!(single.chunk_size(100), 101);
    }


    #[test]
    fn rows_keep_their_order() {
        let predictor = BatchPredictor::with_semaphore(Arc::new(CountingSemaphore::new(3)));
        let columns = vec![(0..500).collect::<Vec<usize>>(), vec![1; 500]];
        let sums = predictor.map_rows(&columns, |x| Ok(x[0] + x[1])).unwrap();
        assert_eq!(sums, (1..=500).collect::<Vec<_>>());
    }


    #[test]
    fn worker_errors_are_returned() {
        let predictor = BatchPredictor::with_semaphore(Arc::new(CountingSemaphore::new(2)));
        let columns = vec![(0..400).collect::<Vec<usize>>()];
        let result = predictor.map_rows(&columns, |x| {
            if x[0] == 321 { Err(Error::NanPosterior) } else { Ok(x[0]) }
        });
        assert!(matches!(result, Err(Error::NanPosterior)));
    }


    #[test]
    fn ragged_and_empty_batches() {
        let predictor = BatchPredictor::new();
        let ragged = vec![vec![0, 1], vec![0]];
        assert!(matches!(
            predictor.map_rows(&ragged, |_| Ok(())),
            Err(Error::RaggedColumns { .. })
        ));

        let empty: Vec<Vec<usize>> = Vec::new();
        assert!(matches!(
            predictor.map_rows(&empty, |_| Ok(())),
            Err(Error::EmptySample)
        ));

        let no_rows = vec![Vec::<usize>::new()];
        assert!(predictor.map_rows(&no_rows, |_| Ok(())).unwrap().is_empty());
    }
}
