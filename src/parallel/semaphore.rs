use std::sync::{Arc, Condvar, LazyLock, Mutex, PoisonError};
use std::thread;


static GLOBAL_SEMAPHORE: LazyLock<Arc<CountingSemaphore>> =
    LazyLock::new(|| Arc::new(CountingSemaphore::new(default_capacity())));


/// `max(1, floor(0.95 * available_parallelism))`.
pub fn default_capacity() -> usize {
    let hardware = thread::available_parallelism()
        .map_or(1, |n| n.get());
    ((0.95 * hardware as f64) as usize).max(1)
}


/// Counting semaphore that caps the number of running workers.
#[derive(Debug)]
pub struct CountingSemaphore {
    capacity: usize,
    available: Mutex<usize>,
    released: Condvar,
}


impl CountingSemaphore {
    /// Semaphore with `capacity` permits (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            available: Mutex::new(capacity),
            released: Condvar::new(),
        }
    }


    /// Process-wide semaphore shared by every batch prediction.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_SEMAPHORE)
    }


    /// Total number of permits.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }


    /// Permits not currently held.
    pub fn available(&self) -> usize {
        *self.available.lock()
            .unwrap_or_else(PoisonError::into_inner)
    }


    /// Block until a permit is free and take it.
    /// The permit is given back when the guard is dropped.
    pub fn acquire(&self) -> SemaphorePermit<'_> {
        // The counter is only changed by whole `+= 1`/`-= 1` steps,
        // so a poisoned lock still guards a consistent value.
        let mut available = self.available.lock()
            .unwrap_or_else(PoisonError::into_inner);
        while *available == 0 {
            available = self.released.wait(available)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *available -= 1;
        SemaphorePermit { semaphore: self }
    }


    fn release(&self) {
        let mut available = self.available.lock()
            .unwrap_or_else(PoisonError::into_inner);
        *available += 1;
        debug_assert!(*available <= self.capacity);
        self.released.notify_one();
    }
}


/// A held permit of a [`CountingSemaphore`].
#[derive(Debug)]
pub struct SemaphorePermit<'a> {
    semaphore: &'a CountingSemaphore,
}


impl Drop for SemaphorePermit<'_> {
    fn drop(&mut self) {
        self.semaphore.release();
    }
}
