//! # tempus-core
//!
//! `tempus-core` holds the concurrent data structures behind a tempus graph: the
//! [`TimeIndex`](storage::timeindex::TimeIndex) of live timestamps and the two-level
//! [`TemporalEdgeStore`](entities::graph::tgraph::TemporalEdgeStore) mapping
//! `time -> source -> destinations`.
//!
//! **Note** this crate is not meant to be used on its own, but through the `tempus` crate
//! which adds batch ingestion, windowed traversal and the algorithms.
//!
//! ## Supported Platforms
//!
//! `tempus` supports the following platforms:
//!
//!    * `Linux`
//!    * `Windows`
//!    * `macOS`
//!

pub mod entities;
pub mod storage;
