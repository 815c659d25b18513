pub mod internal;
mod range;

pub use range::RangeOps;
