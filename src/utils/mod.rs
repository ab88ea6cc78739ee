//! Shared statistical utilities.

mod stats;

pub use stats::{mean, pearson, std_dev, variance};
