use super::WeightGenerator;
use ordered_float::NotNan;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::iter::{ExactSizeIterator, FusedIterator};

/// An iterator of `Uniform[0, 1)` weights with a controlled share of zeros
///
/// Zero weights model held entries, which a sampler keeps but never draws.
pub struct RandomWeights {
    remaining: usize,
    zero_ratio: f64,
    rng: Pcg64,
}

impl RandomWeights {
    /// Create a new iterator with the given parameters
    ///
    /// # Example
    /// ```
    /// use fast_sampler::weight_generator::*;
    /// let weights: Vec<_> = RandomWeights::new(5, 0., 17).collect();
    /// assert_eq!(weights.len(), 5);
    /// assert!(weights.iter().all(|w| w.into_inner() > 0. && w.into_inner() < 1.));
    /// ```
    pub fn new(num: usize, zero_ratio: f64, seed: u64) -> RandomWeights {
        assert!(
            (0. ..=1.).contains(&zero_ratio),
            "invalid zero ratio {}: out of range",
            zero_ratio
        );
        RandomWeights {
            remaining: num,
            zero_ratio,
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    fn next_positive_random(&mut self) -> f64 {
        let mut r = self.rng.gen();
        while r == 0. {
            r = self.rng.gen();
        }
        r
    }
}

impl Iterator for RandomWeights {
    type Item = NotNan<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        // Zero is drawn explicitly so that the positive values stay clear
        // of it
        let weight = if self.rng.gen::<f64>() < self.zero_ratio {
            0.
        } else {
            self.next_positive_random()
        };
        Some(NotNan::from(weight))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl FusedIterator for RandomWeights {}

impl ExactSizeIterator for RandomWeights {}

impl WeightGenerator for RandomWeights {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn respect_seed() {
        let first: Vec<_> = RandomWeights::new(20, 0.2, 17).collect();
        let again: Vec<_> = RandomWeights::new(20, 0.2, 17).collect();
        assert_eq!(first, again);

        let other: Vec<_> = RandomWeights::new(20, 0.2, 18).collect();
        assert_ne!(first, other);
    }

    #[test]
    fn zero_ratio_extremes() {
        assert!(RandomWeights::new(50, 0., 17).all(|w| w.into_inner() > 0.));
        assert!(RandomWeights::new(50, 1., 17).all(|w| w.into_inner() == 0.));
    }

    #[test]
    #[should_panic]
    fn zero_ratio_out_of_range() {
        RandomWeights::new(1, 1.5, 17);
    }
}
