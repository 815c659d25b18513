mod connected_components;

pub use connected_components::{connected_components, ConnectedComponents};
