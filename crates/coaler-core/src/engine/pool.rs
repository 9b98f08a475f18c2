use super::error::EngineError;

/// Worker pool owned by one aligner.
///
/// With the `parallel` feature this wraps a dedicated rayon pool, so concurrent aligners never
/// share or resize the global one. Without it, work runs inline on the calling thread.
#[cfg(feature = "parallel")]
pub struct WorkerPool {
    pool: rayon::ThreadPool,
}

#[cfg(not(feature = "parallel"))]
pub struct WorkerPool {
    num_threads: usize,
}

impl WorkerPool {
    #[cfg(feature = "parallel")]
    pub fn new(num_threads: usize) -> Result<Self, EngineError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|idx| format!("coaler-worker-{idx}"))
            .build()
            .map_err(|e| EngineError::WorkerPool(e.to_string()))?;
        Ok(Self { pool })
    }

    #[cfg(not(feature = "parallel"))]
    pub fn new(num_threads: usize) -> Result<Self, EngineError> {
        if num_threads == 0 {
            return Err(EngineError::WorkerPool(
                "at least one worker is required".to_string(),
            ));
        }
        Ok(Self { num_threads })
    }

    #[cfg(feature = "parallel")]
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    #[cfg(not(feature = "parallel"))]
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Runs `op` with this pool as the target of any parallel iterator inside it.
    #[cfg(feature = "parallel")]
    pub fn install<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    #[cfg(not(feature = "parallel"))]
    pub fn install<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        op()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_reports_requested_worker_count() {
        let pool = WorkerPool::new(3).unwrap();
        assert_eq!(pool.num_threads(), 3);
    }

    #[test]
    fn install_returns_the_closure_result() {
        let pool = WorkerPool::new(1).unwrap();
        assert_eq!(pool.install(|| 6 * 7), 42);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn install_runs_on_named_workers() {
        let pool = WorkerPool::new(2).unwrap();
        let name = pool.install(|| std::thread::current().name().map(str::to_owned));
        assert!(name.is_some_and(|name| name.starts_with("coaler-worker-")));
    }
}
