//! Exact distribution of a single throw's total.
//!
//! Outcomes are split on how many dice show the highest face. Those dice are
//! the first to be dropped by `-H` and the last to be dropped by `-L`, and the
//! remaining dice are a smaller throw over one face fewer, which is solved the
//! same way. Every sub-problem is memoized on `(count, sides, drop_highest,
//! drop_lowest)`.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use tracing::debug;

type Key = (i64, i64, i64, i64);
type Distribution = BTreeMap<i64, f64>;

/// Memo of solved sub-throws. Reusing one table across calls shares the work.
#[derive(Debug, Default)]
pub struct OutcomeTable {
    memo: HashMap<Key, Rc<Distribution>>,
}

impl OutcomeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }

    /// Percentage chance of every total of `count`d`sides`, dropping the
    /// `drop_highest` highest and `drop_lowest` lowest faces.
    pub fn probability(
        &mut self,
        count: i64,
        sides: i64,
        drop_highest: i64,
        drop_lowest: i64,
    ) -> Distribution {
        if count < 0 || sides < 0 || drop_highest < 0 || drop_lowest < 0 {
            return Distribution::new();
        }

        let weights = self.outcomes(count, sides, drop_highest, drop_lowest);
        let total: f64 = weights.values().sum();
        debug!(
            count,
            sides,
            drop_highest,
            drop_lowest,
            memo = self.memo.len(),
            "computed distribution"
        );
        if total == 0.0 {
            return Distribution::new();
        }
        weights
            .iter()
            .map(|(&sum, &w)| (sum, w / total * 100.0))
            .collect()
    }

    fn outcomes(&mut self, count: i64, sides: i64, h: i64, l: i64) -> Rc<Distribution> {
        let key = (count, sides, h, l);
        if let Some(hit) = self.memo.get(&key) {
            return Rc::clone(hit);
        }

        let mut result = Distribution::new();
        if count == 0 || (sides > 0 && (h >= count || l >= count - h)) {
            result.insert(0, 1.0);
        } else if sides > 0 {
            for (k, weight) in top_face_weights(count, sides) {
                if weight == 0.0 {
                    continue;
                }
                let kept_top = (k - h).min(count - h - l).max(0);
                let top_sum = sides * kept_top;
                let rest = self.outcomes(count - k, sides - 1, (h - k).max(0), l);
                for (&sum, &p) in rest.iter() {
                    *result.entry(top_sum + sum).or_default() += weight * p;
                }
            }
        }

        let result = Rc::new(result);
        self.memo.insert(key, Rc::clone(&result));
        result
    }
}

/// Chance that exactly `k` of `count` dice show the top face, for every `k`.
fn top_face_weights(count: i64, sides: i64) -> Vec<(i64, f64)> {
    if sides == 1 {
        let mut weights: Vec<_> = (0..count).map(|k| (k, 0.0)).collect();
        weights.push((count, 1.0));
        return weights;
    }

    let p = 1.0 / sides as f64;
    let q = 1.0 - p;
    let mut weights = Vec::with_capacity(count as usize + 1);
    let mut pmf = q.powi(count as i32);
    for k in 0..=count {
        weights.push((k, pmf));
        pmf *= (count - k) as f64 / (k + 1) as f64 * p / q;
    }
    weights
}

/// Percentage chance of every total of a single throw, with a fresh memo.
pub fn probability(count: i64, sides: i64, drop_highest: i64, drop_lowest: i64) -> Distribution {
    OutcomeTable::new().probability(count, sides, drop_highest, drop_lowest)
}
