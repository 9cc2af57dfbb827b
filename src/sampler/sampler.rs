use super::error::Error;
use super::level::{Bounds, Level};
use crate::floor_log2;
use rand::Rng;

/// A discrete distribution over element indices `0..len`, sampled with
/// replacement and mutable in place.
///
/// Element `i` is drawn with probability `weights[i] / sum`. Elements with
/// weight zero are held but never drawn. The nonzero weights are bucketed
/// into levels by the binary exponent of their value, one level per
/// power-of-two interval, ordered from the largest interval down:
///
/// - a draw walks the cumulative level sums to pick a level, then runs
///   acceptance-rejection among its members. The walk is O(log d) in the
///   dynamic range `d` of the positive weights and the rejection loop needs
///   at most two candidates on average, because members of one level differ
///   by less than a factor of two;
/// - a weight update moves one element between levels in O(1);
/// - appending is amortized O(1) and deletion by index is O(n) because every
///   member index past the deleted one shifts down.
///
/// ```
/// use fast_sampler::Sampler;
/// use rand::thread_rng;
///
/// let mut sampler = Sampler::new(vec![2.0, 1.5, 0.0, 3.5]).unwrap();
/// sampler.set(1, 8.0).unwrap();
/// let index = sampler.draw(&mut thread_rng()).unwrap();
/// assert!(index != 2);
/// ```
#[derive(Debug, Clone)]
pub struct Sampler {
    /// The weight of every element, in append order
    weights: Vec<f64>,
    /// Levels in descending order of bounds: `levels[0]` covers the largest
    /// weights, and adjacent levels cover adjacent power-of-two intervals
    levels: Vec<Level>,
    /// Running total of all weights
    sum: f64,
    /// Offset of every element inside its level's member list; `None` for
    /// zero-weight elements, which belong to no level
    positions: Vec<Option<usize>>,
    /// The exponent of `levels[0].bounds.hi`, meaningful only while `levels`
    /// is nonempty
    max_log2_upper: i32,
}

impl Sampler {
    /// Build a sampler owning the given weights.
    ///
    /// Runs in Θ(n + log d): one scan finds the exponent span of the
    /// positive weights, the level sequence is allocated across that span
    /// and a second scan places every nonzero element. An empty or all-zero
    /// vector produces a sampler with no levels, on which [`Sampler::draw`]
    /// fails but every other operation works.
    pub fn new(weights: Vec<f64>) -> Result<Sampler, Error> {
        for &weight in &weights {
            Self::check_weight(weight)?;
        }

        let mut sampler = Sampler {
            positions: vec![None; weights.len()],
            weights,
            levels: Vec::new(),
            sum: 0.,
            max_log2_upper: 0,
        };

        let mut min_max = None;
        for &weight in sampler.weights.iter().filter(|&&weight| weight > 0.) {
            min_max = Some(match min_max {
                None => (weight, weight),
                Some((min, max)) => (f64::min(min, weight), f64::max(max, weight)),
            });
        }
        let (min, max) = match min_max {
            None => return Ok(sampler),
            Some(min_max) => min_max,
        };

        // The top level is the interval containing the largest weight, the
        // bottom one the interval containing the smallest
        let uppermost_log = floor_log2(max) + 1;
        let num_levels = (uppermost_log - floor_log2(min)) as usize;
        sampler.levels = (0..num_levels)
            .map(|offset| Level::new(Bounds::from_exponent(uppermost_log - 1 - offset as i32)))
            .collect();
        sampler.max_log2_upper = uppermost_log;

        for index in 0..sampler.weights.len() {
            let weight = sampler.weights[index];
            if weight > 0. {
                let offset = (uppermost_log - 1 - floor_log2(weight)) as usize;
                sampler.levels[offset].add(index, &sampler.weights, &mut sampler.positions);
                sampler.sum += weight;
            }
        }
        Ok(sampler)
    }

    /// Number of elements, including the zero-weight ones
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// All weights, in element-index order
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The weight of element `index`
    pub fn get(&self, index: usize) -> Result<f64, Error> {
        self.weights.get(index).copied().ok_or(Error::IndexOutOfRange {
            index,
            len: self.weights.len(),
        })
    }

    /// Set the weight of element `index`, returning the applied change
    /// `new - old`.
    ///
    /// O(1): at most one level loses the element and one gains it. The level
    /// sequence is extended when the new weight falls outside the current
    /// exponent range and trimmed when the old level was at an end of the
    /// sequence and became empty.
    pub fn set(&mut self, index: usize, weight: f64) -> Result<f64, Error> {
        Self::check_weight(weight)?;
        let old = self.get(index)?;

        match (old > 0., weight > 0.) {
            (false, false) => {
                self.weights[index] = weight;
            }
            (false, true) => {
                self.weights[index] = weight;
                self.insert_into_level(index);
                self.sum += weight;
            }
            (true, false) => {
                self.remove_from_level(index);
                self.weights[index] = weight;
                self.sum -= old;
            }
            // Handled uniformly as remove-then-add even when the level does
            // not change, so that `(max, num_max)` can never go stale
            (true, true) => {
                self.remove_from_level(index);
                self.weights[index] = weight;
                self.insert_into_level(index);
                self.sum += weight - old;
            }
        }
        Ok(weight - old)
    }

    /// Append a new element, returning the index assigned to it.
    ///
    /// Amortized O(1): a zero weight only records a hold, a nonzero weight
    /// is placed like in [`Sampler::set`].
    pub fn push(&mut self, weight: f64) -> Result<usize, Error> {
        Self::check_weight(weight)?;
        let index = self.weights.len();
        self.weights.push(weight);
        if weight > 0. {
            // `insert_into_level` extends `positions` while adding
            self.insert_into_level(index);
            self.sum += weight;
        } else {
            self.positions.push(None);
        }
        Ok(index)
    }

    /// Delete element `index`, shifting every element past it down by one.
    /// Returns the new length.
    ///
    /// O(n): every level member referring to a shifted element must be
    /// renumbered.
    pub fn remove(&mut self, index: usize) -> Result<usize, Error> {
        let weight = self.get(index)?;
        if weight > 0. {
            self.remove_from_level(index);
            self.sum -= weight;
        }
        self.weights.remove(index);
        self.positions.remove(index);

        for level in &mut self.levels {
            for member in &mut level.members {
                if *member > index {
                    *member -= 1;
                }
            }
        }
        Ok(self.weights.len())
    }

    /// Draw one element index with probability proportional to its weight.
    ///
    /// Fails with [`Error::EmptyDistribution`] when no element has a
    /// positive weight.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize, Error> {
        if self.levels.is_empty() {
            return Err(Error::EmptyDistribution);
        }

        // Stage one: pick a level with probability proportional to its sum,
        // walking from the largest bounds down so that the biggest
        // contributions enter the cumulative sum first
        let target = rng.gen::<f64>() * self.sum;
        let mut cumulative = 0.;
        let mut chosen = None;
        for level in &self.levels {
            cumulative += level.sum;
            if cumulative > target {
                chosen = Some(level);
                break;
            }
        }
        let (level, first_uniform) = match chosen {
            // The residue of the walk is already uniform on [0, 1)
            // conditional on the chosen level, so the rejection stage below
            // starts without drawing again
            Some(level) => (level, (target - cumulative + level.sum) / level.sum),
            // Rounding in the running sums can leave the walk unterminated
            // when `target` lands at the very top of the range; the back
            // level is populated whenever any level exists
            None => (&self.levels[self.levels.len() - 1], rng.gen()),
        };

        // Stage two: acceptance-rejection among the members. Every member
        // weight exceeds half of `level.max`, so each round accepts with
        // probability above one half
        let mut r = first_uniform;
        loop {
            let member = level.members[rng.gen_range(0..level.members.len())];
            if self.weights[member] > r * level.max {
                return Ok(member);
            }
            r = rng.gen();
        }
    }

    fn check_weight(weight: f64) -> Result<(), Error> {
        if !weight.is_finite() {
            Err(Error::NonFiniteWeight(weight))
        } else if weight < 0. {
            Err(Error::NegativeWeight(weight))
        } else {
            Ok(())
        }
    }

    /// Offset into `levels` of the interval containing `weight`.
    ///
    /// `None` when the weight is zero or no levels exist. The offset falls
    /// outside `0..levels.len()` when the interval has no level yet.
    fn level_offset(&self, weight: f64) -> Option<isize> {
        if weight == 0. || self.levels.is_empty() {
            return None;
        }
        Some(self.max_log2_upper as isize - floor_log2(weight) as isize - 1)
    }

    /// Place the nonzero element `index` into the level for its current
    /// weight, extending the level sequence when that level does not exist
    /// yet
    fn insert_into_level(&mut self, index: usize) {
        let weight = self.weights[index];
        let offset = match self
            .level_offset(weight)
            .filter(|&offset| offset >= 0 && (offset as usize) < self.levels.len())
        {
            Some(offset) => offset as usize,
            None => {
                self.extend_levels(Bounds::around(weight));
                (self.max_log2_upper - 1 - floor_log2(weight)) as usize
            }
        };
        self.levels[offset].add(index, &self.weights, &mut self.positions);
    }

    /// Take the nonzero element `index` out of the level currently holding
    /// it, trimming the sequence when a level at either end became empty
    fn remove_from_level(&mut self, index: usize) {
        let offset = (self.max_log2_upper - 1 - floor_log2(self.weights[index])) as usize;
        self.levels[offset].remove(index, &self.weights, &mut self.positions);
        if !self.levels[offset].is_populated()
            && (offset == 0 || offset == self.levels.len() - 1)
        {
            self.trim_levels();
        }
    }

    /// Grow the level sequence so that a level with the given bounds exists.
    ///
    /// # Panics
    /// Panics if `bounds` is not a power-of-two interval `[lo, 2lo)`, or if
    /// the interval already lies inside the covered exponent range.
    fn extend_levels(&mut self, bounds: Bounds) {
        assert!(
            bounds.hi == 2. * bounds.lo,
            "invalid level bounds [{}, {})",
            bounds.lo,
            bounds.hi
        );

        if self.levels.is_empty() {
            self.max_log2_upper = floor_log2(bounds.hi);
            self.levels.push(Level::new(bounds));
            return;
        }

        let front_exponent = floor_log2(self.levels[0].bounds.lo);
        let back_exponent = floor_log2(self.levels[self.levels.len() - 1].bounds.lo);
        let target_exponent = floor_log2(bounds.lo);
        if target_exponent > front_exponent {
            let new_levels = (front_exponent + 1..=target_exponent)
                .rev()
                .map(|exponent| Level::new(Bounds::from_exponent(exponent)));
            self.levels.splice(0..0, new_levels);
            self.max_log2_upper = target_exponent + 1;
        } else if target_exponent < back_exponent {
            let new_levels = (target_exponent..back_exponent)
                .rev()
                .map(|exponent| Level::new(Bounds::from_exponent(exponent)));
            self.levels.extend(new_levels);
        } else {
            panic!(
                "level [{}, {}) is already present",
                bounds.lo, bounds.hi
            );
        }
    }

    /// Drop unpopulated levels from both ends of the sequence, keeping the
    /// empty interior ones
    fn trim_levels(&mut self) {
        match self.levels.iter().position(Level::is_populated) {
            None => self.levels.clear(),
            Some(first) => {
                let last = self
                    .levels
                    .iter()
                    .rposition(Level::is_populated)
                    .expect("a populated level was just found");
                self.levels.truncate(last + 1);
                self.levels.drain(..first);
                self.max_log2_upper = floor_log2(self.levels[0].bounds.hi);
            }
        }
    }
}

#[cfg(test)]
impl Sampler {
    /// Assert every structural invariant of the sampler, recomputing all
    /// cached quantities from scratch
    pub(crate) fn check_consistency(&self) {
        const TOLERANCE: f64 = 1e-9;

        assert_eq!(self.weights.len(), self.positions.len());

        if let Some(front) = self.levels.first() {
            assert_eq!(floor_log2(front.bounds.hi), self.max_log2_upper);
            assert!(front.is_populated(), "unpopulated front level");
            assert!(
                self.levels[self.levels.len() - 1].is_populated(),
                "unpopulated back level"
            );
        }

        let mut level_sum_total = 0.;
        let mut num_members = 0;
        for (offset, level) in self.levels.iter().enumerate() {
            let expected = Bounds::from_exponent(self.max_log2_upper - 1 - offset as i32);
            assert_eq!(level.bounds, expected, "level {} has wrong bounds", offset);

            let mut sum = 0.;
            let mut max = 0.;
            let mut num_max = 0;
            for (member_offset, &member) in level.members.iter().enumerate() {
                let weight = self.weights[member];
                assert!(
                    level.bounds.contains(weight),
                    "member {} with weight {} is misplaced in [{}, {})",
                    member,
                    weight,
                    level.bounds.lo,
                    level.bounds.hi
                );
                assert_eq!(
                    self.positions[member],
                    Some(member_offset),
                    "member {} has a stale position",
                    member
                );
                sum += weight;
                if weight > max {
                    max = weight;
                    num_max = 1;
                } else if weight == max {
                    num_max += 1;
                }
            }
            assert!(
                (level.sum - sum).abs() < TOLERANCE,
                "level {} sum {} drifted from {}",
                offset,
                level.sum,
                sum
            );
            assert_eq!(level.max, max, "level {} max is stale", offset);
            assert_eq!(level.num_max, num_max, "level {} num_max is stale", offset);
            level_sum_total += level.sum;
            num_members += level.members.len();
        }

        let mut weight_total = 0.;
        let mut num_positive = 0;
        for (index, &weight) in self.weights.iter().enumerate() {
            weight_total += weight;
            if weight == 0. {
                assert_eq!(self.positions[index], None, "zero weight {} has a position", index);
            } else {
                num_positive += 1;
                let offset = (self.max_log2_upper - 1 - floor_log2(weight)) as usize;
                let member_offset = self.positions[index].expect("positive weight in no level");
                assert_eq!(self.levels[offset].members[member_offset], index);
            }
        }
        // Together with the per-member position check above, equal counts
        // mean every positive element sits in exactly one level
        assert_eq!(num_members, num_positive);

        let scale = f64::max(1., weight_total.abs());
        assert!(
            (self.sum - level_sum_total).abs() < TOLERANCE * scale,
            "sampler sum {} drifted from the level total {}",
            self.sum,
            level_sum_total
        );
        assert!(
            (self.sum - weight_total).abs() < TOLERANCE * scale,
            "sampler sum {} drifted from the weight total {}",
            self.sum,
            weight_total
        );
    }

    pub(crate) fn level_spec(&self) -> Vec<((f64, f64), Vec<usize>, f64, f64)> {
        self.levels
            .iter()
            .map(|level| {
                let mut members = level.members.clone();
                members.sort_unstable();
                ((level.bounds.lo, level.bounds.hi), members, level.sum, level.max)
            })
            .collect()
    }

    pub(crate) fn total(&self) -> f64 {
        self.sum
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn construction_buckets_by_exponent() {
        let sampler = Sampler::new(vec![2.0, 1.5, 2.5, 0.0, 0.3, 3.5]).unwrap();
        sampler.check_consistency();

        assert_eq!(
            sampler.level_spec(),
            vec![
                ((2., 4.), vec![0, 2, 5], 8.0, 3.5),
                ((1., 2.), vec![1], 1.5, 1.5),
                ((0.5, 1.), vec![], 0.0, 0.0),
                ((0.25, 0.5), vec![4], 0.3, 0.3),
            ],
        );
        assert!((sampler.total() - 9.8).abs() < 1e-9);
        assert_eq!(sampler.len(), 6);
    }

    #[test]
    fn construction_with_no_positive_weight() {
        let empty = Sampler::new(vec![]).unwrap();
        empty.check_consistency();
        assert_eq!(empty.len(), 0);
        assert_eq!(empty.level_spec(), vec![]);

        let zeroed = Sampler::new(vec![0., 0., 0.]).unwrap();
        zeroed.check_consistency();
        assert_eq!(zeroed.len(), 3);
        assert_eq!(zeroed.level_spec(), vec![]);
        assert_eq!(zeroed.get(1), Ok(0.));
        assert_eq!(zeroed.weights(), &[0., 0., 0.]);
    }

    #[test]
    fn construction_rejects_invalid_weights() {
        assert_eq!(
            Sampler::new(vec![1., -2.]).unwrap_err(),
            Error::NegativeWeight(-2.),
        );
        assert!(matches!(
            Sampler::new(vec![1., f64::NAN]).unwrap_err(),
            Error::NonFiniteWeight(_),
        ));
        assert_eq!(
            Sampler::new(vec![f64::INFINITY]).unwrap_err(),
            Error::NonFiniteWeight(f64::INFINITY),
        );
    }

    #[test]
    fn set_into_a_new_top_level() {
        let mut sampler = Sampler::new(vec![2.0, 1.5, 2.5, 0.0, 0.3, 3.5]).unwrap();

        // Previously zero, now above every existing level
        assert_eq!(sampler.set(3, 8.0), Ok(8.0));
        sampler.check_consistency();

        let spec = sampler.level_spec();
        assert_eq!(spec[0], ((8., 16.), vec![3], 8.0, 8.0));
        assert_eq!(spec[1], ((4., 8.), vec![], 0.0, 0.0));
        assert_eq!(spec.len(), 6);
        assert!((sampler.total() - 17.8).abs() < 1e-9);
    }

    #[test]
    fn set_to_zero_trims_the_leading_level() {
        let mut sampler = Sampler::new(vec![2.0, 1.5, 2.5, 0.0, 0.3, 3.5]).unwrap();

        assert_eq!(sampler.set(0, 0.), Ok(-2.0));
        assert_eq!(sampler.set(2, 0.), Ok(-2.5));
        assert_eq!(sampler.set(5, 0.), Ok(-3.5));
        sampler.check_consistency();

        // The emptied top level is gone, the empty interior one remains
        assert_eq!(
            sampler.level_spec(),
            vec![
                ((1., 2.), vec![1], 1.5, 1.5),
                ((0.5, 1.), vec![], 0.0, 0.0),
                ((0.25, 0.5), vec![4], 0.3, 0.3),
            ],
        );
    }

    #[test]
    fn set_moves_between_levels() {
        let mut sampler = Sampler::new(vec![2.0, 1.5, 2.5, 0.0, 0.3, 3.5]).unwrap();

        // Down into an existing level
        assert_eq!(sampler.set(0, 0.6), Ok(0.6 - 2.0));
        sampler.check_consistency();
        assert_eq!(sampler.level_spec()[2], ((0.5, 1.), vec![0], 0.6, 0.6));

        // Below every existing level
        sampler.set(0, 0.1).unwrap();
        sampler.check_consistency();
        let spec = sampler.level_spec();
        assert_eq!(spec[spec.len() - 1], ((0.0625, 0.125), vec![0], 0.1, 0.1));

        // Same level, new maximum
        sampler.set(5, 3.9).unwrap();
        sampler.check_consistency();
        assert_eq!(sampler.level_spec()[0], ((2., 4.), vec![2, 5], 2.5 + 3.9, 3.9));
    }

    #[test]
    fn set_same_level_keeps_max_fresh() {
        let mut sampler = Sampler::new(vec![3.5, 2.5, 3.5]).unwrap();

        // The replaced weight tied the maximum; the new one is smaller
        sampler.set(0, 2.1).unwrap();
        sampler.check_consistency();
        assert_eq!(
            sampler.level_spec()[0],
            ((2., 4.), vec![0, 1, 2], 6.0 + 2.1, 3.5),
        );

        sampler.set(2, 2.2).unwrap();
        sampler.check_consistency();
        assert_eq!(
            sampler.level_spec()[0],
            ((2., 4.), vec![0, 1, 2], 6.0 + 2.1 - 3.5 + 2.2, 2.5),
        );
    }

    #[test]
    fn set_only_element_to_another_level() {
        let mut sampler = Sampler::new(vec![4.0]).unwrap();
        sampler.set(0, 0.3).unwrap();
        sampler.check_consistency();
        assert_eq!(
            sampler.level_spec(),
            vec![((0.25, 0.5), vec![0], 0.3, 0.3)],
        );
    }

    #[test]
    fn set_rejects_bad_input_without_mutating() {
        let mut sampler = Sampler::new(vec![2.0, 1.5]).unwrap();

        assert_eq!(sampler.set(2, 1.), Err(Error::IndexOutOfRange { index: 2, len: 2 }));
        assert_eq!(sampler.set(0, -1.), Err(Error::NegativeWeight(-1.)));
        assert_eq!(
            sampler.set(0, f64::INFINITY),
            Err(Error::NonFiniteWeight(f64::INFINITY)),
        );
        assert!(matches!(sampler.set(0, f64::NAN), Err(Error::NonFiniteWeight(_))));

        sampler.check_consistency();
        assert_eq!(sampler.weights(), &[2.0, 1.5]);
    }

    #[test]
    fn push_into_the_same_level() {
        let mut sampler = Sampler::new(vec![4.0]).unwrap();
        for expected_index in 1..5 {
            assert_eq!(sampler.push(4.0), Ok(expected_index));
        }
        sampler.check_consistency();

        assert_eq!(sampler.len(), 5);
        assert_eq!(
            sampler.level_spec(),
            vec![((4., 8.), vec![0, 1, 2, 3, 4], 20.0, 4.0)],
        );
    }

    #[test]
    fn push_zero_and_out_of_range() {
        let mut sampler = Sampler::new(vec![1.0]).unwrap();
        assert_eq!(sampler.push(0.), Ok(1));
        assert_eq!(sampler.push(16.), Ok(2));
        sampler.check_consistency();
        assert_eq!(sampler.get(1), Ok(0.));
        assert_eq!(sampler.level_spec()[0], ((16., 32.), vec![2], 16.0, 16.0));
    }

    #[test]
    fn remove_renumbers_members() {
        let mut sampler = Sampler::new(vec![2.5, 6.0, 70.0, 0.001, 0.0, 4.2, 1.1]).unwrap();
        sampler.check_consistency();

        // Deleting renumbers the later elements at every step
        for (delete, expected_len) in [(1, 6), (4, 5), (1, 4), (2, 3), (1, 2), (0, 1), (0, 0)] {
            assert_eq!(sampler.remove(delete), Ok(expected_len));
            sampler.check_consistency();
            assert_eq!(sampler.len(), expected_len);
        }
        assert_eq!(sampler.level_spec(), vec![]);
        assert_eq!(sampler.remove(0), Err(Error::IndexOutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn draw_fails_with_no_positive_weight() {
        let mut rng = Pcg64::seed_from_u64(17);

        let empty = Sampler::new(vec![]).unwrap();
        assert_eq!(empty.draw(&mut rng), Err(Error::EmptyDistribution));

        let zeroed = Sampler::new(vec![0., 0.]).unwrap();
        assert_eq!(zeroed.draw(&mut rng), Err(Error::EmptyDistribution));

        let mut drained = Sampler::new(vec![1., 2.]).unwrap();
        drained.set(0, 0.).unwrap();
        drained.set(1, 0.).unwrap();
        assert_eq!(drained.draw(&mut rng), Err(Error::EmptyDistribution));
    }

    #[test]
    fn draw_skips_zero_weights() {
        let sampler = Sampler::new(vec![1.0, 0.0, 3.0]).unwrap();
        let mut rng = Pcg64::seed_from_u64(17);
        for _ in 0..1_000 {
            assert_ne!(sampler.draw(&mut rng), Ok(1));
        }
    }

    #[test]
    fn draw_from_a_single_element() {
        let sampler = Sampler::new(vec![0., 0.7, 0.]).unwrap();
        let mut rng = Pcg64::seed_from_u64(17);
        for _ in 0..100 {
            assert_eq!(sampler.draw(&mut rng), Ok(1));
        }
    }

    #[test]
    fn set_back_restores_the_state() {
        let mut sampler = Sampler::new(vec![2.0, 1.5, 2.5, 0.0, 0.3, 3.5]).unwrap();
        let before_spec = sampler.level_spec();
        let before_sum = sampler.total();

        // A no-op write
        let same = sampler.get(2).unwrap();
        assert_eq!(sampler.set(2, same), Ok(0.));
        sampler.check_consistency();
        assert_eq!(sampler.level_spec(), before_spec);

        // A write followed by its inverse
        sampler.set(2, 40.0).unwrap();
        sampler.set(2, same).unwrap();
        sampler.check_consistency();
        assert_eq!(sampler.level_spec(), before_spec);
        assert!((sampler.total() - before_sum).abs() < 1e-9);
    }

    #[test]
    fn push_then_remove_restores_the_state() {
        let mut sampler = Sampler::new(vec![2.0, 1.5, 2.5, 0.0, 0.3, 3.5]).unwrap();
        let before_spec = sampler.level_spec();
        let before_sum = sampler.total();

        let index = sampler.push(70.0).unwrap();
        sampler.remove(index).unwrap();
        sampler.check_consistency();
        assert_eq!(sampler.level_spec(), before_spec);
        assert!((sampler.total() - before_sum).abs() < 1e-9);
    }

    #[test]
    fn sum_stays_tight_under_many_updates() {
        let mut sampler = Sampler::new(vec![1.0; 100]).unwrap();
        let mut rng = Pcg64::seed_from_u64(17);

        for _ in 0..10_000 {
            let index = rng.gen_range(0..sampler.len());
            let weight = rng.gen::<f64>() * 10.;
            sampler.set(index, weight).unwrap();
        }
        sampler.check_consistency();

        let exact: f64 = sampler.weights().iter().sum();
        assert!((sampler.total() - exact).abs() < 1e-9 * f64::max(1., exact));
    }
}
