//! Algorithms over windows of a temporal graph.

pub mod components;
