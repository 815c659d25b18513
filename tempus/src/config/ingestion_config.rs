use serde::{Deserialize, Serialize};

/// How batches are applied to a graph.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Serialize)]
pub struct IngestionConfig {
    /// Worker threads of the graph's own pool. `None` shares the process wide pool.
    pub num_threads: Option<usize>,
    /// Apply batches with one task per timestamp. When `false` batches are applied on the
    /// calling thread.
    pub parallel: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            parallel: true,
        }
    }
}
