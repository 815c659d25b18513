//! Update streams and the dataset tools that produce them.

pub mod delay;
pub mod snap;
pub mod updates;
