use super::WeightGenerator;
use ordered_float::NotNan;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::iter::{ExactSizeIterator, FusedIterator};

/// An iterator of weights spread over a span of binary exponents
///
/// Each weight is produced by picking an exponent uniformly in
/// `min_exponent..max_exponent` and a mantissa uniformly in `[1, 2)`, so the
/// values land in every power-of-two interval of the span. Useful to
/// exercise long level sequences in a sampler.
pub struct SpreadWeights {
    remaining: usize,
    min_exponent: i32,
    max_exponent: i32,
    rng: Pcg64,
}

impl SpreadWeights {
    /// Create a new iterator with the given parameters
    ///
    /// # Example
    /// ```
    /// use fast_sampler::weight_generator::*;
    /// let weights: Vec<_> = SpreadWeights::new(4, -2, 3, 17).collect();
    /// assert_eq!(weights.len(), 4);
    /// assert!(weights.iter().all(|w| w.into_inner() >= 0.25 && w.into_inner() < 8.));
    /// ```
    pub fn new(num: usize, min_exponent: i32, max_exponent: i32, seed: u64) -> SpreadWeights {
        assert!(
            min_exponent < max_exponent,
            "invalid exponent span {}..{}",
            min_exponent,
            max_exponent
        );
        SpreadWeights {
            remaining: num,
            min_exponent,
            max_exponent,
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl Iterator for SpreadWeights {
    type Item = NotNan<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let exponent = self.rng.gen_range(self.min_exponent..self.max_exponent);
        let mantissa = 1. + self.rng.gen::<f64>();
        Some(NotNan::from((exponent as f64).exp2() * mantissa))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl FusedIterator for SpreadWeights {}

impl ExactSizeIterator for SpreadWeights {}

impl WeightGenerator for SpreadWeights {}
