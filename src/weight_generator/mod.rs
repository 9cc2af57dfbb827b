//! Iterators of reproducible weight vectors
//!
//! This module provides seeded iterators of `num` non-negative floats meant
//! to feed a [`crate::Sampler`] in tests and benchmarks. The floats are
//! represented by `NotNan<f64>`, because this type implements `Ord`, which
//! makes it easy to sort and compare generated vectors.

mod random;
mod spread;

use ordered_float::NotNan;
use std::iter::FusedIterator;

/// The main trait representing an iterator of weights
pub trait WeightGenerator:
    Iterator<Item = NotNan<f64>> + ExactSizeIterator + FusedIterator
{
}

pub use random::RandomWeights;
pub use spread::SpreadWeights;
