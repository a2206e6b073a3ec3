//! Bounded-concurrency batch inference.

pub(crate) mod semaphore;
pub(crate) mod batch_predictor;


pub use semaphore::{CountingSemaphore, SemaphorePermit, default_capacity};
pub use batch_predictor::BatchPredictor;
