use std::{num::NonZeroUsize, sync::Arc};

use once_cell::sync::Lazy;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::warn;

use crate::errors::GraphError;

pub const MAX_THREADS_ENV: &str = "TEMPUS_MAX_THREADS";

/// Shared pool used for batch ingestion and parallel traversal unless a graph was built
/// with its own thread count.
pub static POOL: Lazy<Arc<ThreadPool>> = Lazy::new(|| {
    let num_threads = std::env::var(MAX_THREADS_ENV)
        .ok()
        .and_then(|s| match s.parse::<NonZeroUsize>() {
            Ok(n) => Some(n.get()),
            Err(_) => {
                warn!("{MAX_THREADS_ENV} must be a positive number, got '{s}'");
                None
            }
        })
        .unwrap_or_else(default_num_threads);

    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("tempus-{i}"))
        .build()
        .expect("failed to build the tempus thread pool");

    Arc::new(pool)
});

pub fn default_num_threads() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

pub fn custom_pool(n_threads: usize) -> Result<Arc<ThreadPool>, GraphError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .thread_name(|i| format!("tempus-{i}"))
        .build()?;

    Ok(Arc::new(pool))
}
