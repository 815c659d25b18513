pub mod graph;

pub use tempus_api::core::entities::{TemporalEdge, Timestamp, VertexId};
