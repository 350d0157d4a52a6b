use super::error::EvalError;
use super::EResult;
use rand::{
    distributions::{DistIter, Distribution, Uniform},
    Rng,
};
use tracing::trace;

/// Source of die faces.
pub trait Roller {
    type RollIter<'a>: Iterator<Item = i64> + 'a
    where
        Self: 'a;

    /// One face in `1..=sides`; `sides` is at least 1.
    fn roll(&mut self, sides: i64) -> i64;

    fn roll_iter(&mut self, num: usize, sides: i64) -> Self::RollIter<'_>;
}

impl<R: Rng> Roller for R {
    type RollIter<'a> = std::iter::Take<DistIter<Uniform<i64>, &'a mut Self, i64>>
    where
        Self: 'a;

    fn roll(&mut self, sides: i64) -> i64 {
        self.gen_range(1..=sides)
    }

    fn roll_iter(&mut self, num: usize, sides: i64) -> Self::RollIter<'_> {
        Uniform::new_inclusive(1, sides).sample_iter(self).take(num)
    }
}

/// Rolls from the operating system's entropy source.
pub type DefaultRoller = rand::rngs::OsRng;

/// Bounds on what a single evaluation may ask for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Limits {
    pub max_dice: i64,
    pub max_sides: i64,
    pub max_repetitions: i64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_dice: 1000,
            max_sides: 1000,
            max_repetitions: 1000,
        }
    }
}

/// Throws `count` dice with `sides` faces, dropping the `drop_highest` highest
/// and `drop_lowest` lowest faces from the total.
///
/// Faces come back sorted ascending.
pub fn roll<R: Roller>(
    roller: &mut R,
    limits: &Limits,
    count: i64,
    sides: i64,
    drop_highest: i64,
    drop_lowest: i64,
) -> EResult<(Vec<i64>, i64)> {
    if count > limits.max_dice {
        return Err(EvalError::TooManyDice);
    }
    if sides > limits.max_sides {
        return Err(EvalError::TooManySides);
    }
    if sides < 1 {
        return Err(EvalError::ZeroSidedDie);
    }
    if count < 0 {
        return Err(EvalError::NegativeDice);
    }
    if drop_highest < 0
        || drop_lowest < 0
        || drop_highest > count
        || drop_lowest > count - drop_highest
    {
        return Err(EvalError::TooManyDropped);
    }

    let mut faces: Vec<i64> = roller.roll_iter(count as usize, sides).collect();
    faces.sort_unstable();

    let kept = &faces[drop_lowest as usize..(count - drop_highest) as usize];
    let total = kept.iter().sum();
    trace!(count, sides, drop_highest, drop_lowest, ?faces, total, "threw dice");
    Ok((faces, total))
}

/// One integer in `min..=max`.
///
/// A degenerate range where `min == max` yields 1 regardless of the bound.
pub fn uniform<R: Rng>(rng: &mut R, min: i64, max: i64) -> EResult<i64> {
    if max <= 0 || min < 0 {
        return Err(EvalError::ZeroSidedDie);
    }
    if max == min {
        return Ok(1);
    }
    if min > max {
        return Err(EvalError::ZeroSidedDie);
    }
    Ok(rng.gen_range(min..=max))
}

#[cfg(test)]
pub(crate) use step::StepRoller;

#[cfg(test)]
mod step {
    use super::*;

    /// Deterministic roller: faces count up from `initial` by `step`, wrapping
    /// at the number of sides.
    pub(crate) struct StepRoller {
        current: i64,
        step: i64,
    }

    impl StepRoller {
        pub fn new(initial: i64, step: i64) -> Self {
            Self {
                current: initial,
                step,
            }
        }
    }

    impl Roller for StepRoller {
        type RollIter<'a> = StepIter<'a>;

        fn roll(&mut self, sides: i64) -> i64 {
            let ret = (self.current - 1).rem_euclid(sides) + 1;
            self.current += self.step;
            ret
        }

        fn roll_iter(&mut self, num: usize, sides: i64) -> Self::RollIter<'_> {
            StepIter {
                roller: self,
                num,
                sides,
            }
        }
    }

    pub(crate) struct StepIter<'a> {
        roller: &'a mut StepRoller,
        num: usize,
        sides: i64,
    }

    impl Iterator for StepIter<'_> {
        type Item = i64;

        fn next(&mut self) -> Option<Self::Item> {
            if self.num == 0 {
                None
            } else {
                self.num -= 1;
                Some(self.roller.roll(self.sides))
            }
        }
    }
}
