//! Data transformations applied before comparing period shapes.

pub mod scale;

pub use scale::{min_max_scale, MinMaxScale};
