use super::error::EvalError;
use super::roller::{self, Limits, Roller};
use super::EResult;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Where in the command a throw was written, as the `d` token's line and column.
pub type Slot = (usize, usize);

/// One throw of `count` identical dice.
#[derive(Debug, Clone, PartialEq)]
pub struct Dice {
    pub count: i64,
    pub sides: i64,
    pub total: i64,
    pub faces: Vec<i64>,
    pub min: i64,
    pub max: i64,
    pub drop_highest: i64,
    pub drop_lowest: i64,
    pub color: String,
    pub slot: Slot,
}

impl Dice {
    pub fn new(count: i64, sides: i64) -> Self {
        Self {
            count,
            sides,
            total: 0,
            faces: Vec::new(),
            min: 0,
            max: 0,
            drop_highest: 0,
            drop_lowest: 0,
            color: String::new(),
            slot: (0, 0),
        }
    }

    pub fn at(mut self, slot: Slot) -> Self {
        self.slot = slot;
        self
    }

    /// Throws the dice once; a throw that already produced a total keeps it.
    pub fn roll<R: Roller>(&mut self, roller: &mut R, limits: &Limits) -> EResult<i64> {
        if self.total != 0 {
            return Ok(self.total);
        }
        let (faces, total) = roller::roll(
            roller,
            limits,
            self.count,
            self.sides,
            self.drop_highest,
            self.drop_lowest,
        )?;
        let kept = self.count - self.drop_highest - self.drop_lowest;
        self.faces = faces;
        self.total = total;
        self.min = kept;
        self.max = kept * self.sides;
        Ok(total)
    }

    pub fn faces_string(&self) -> String {
        let faces: Vec<_> = self.faces.iter().map(i64::to_string).collect();
        faces.join(", ")
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if self.drop_lowest > 0 {
            write!(f, "-L{}", self.drop_lowest)?;
        }
        if self.drop_highest > 0 {
            write!(f, "-H{}", self.drop_highest)?;
        }
        if !self.color.is_empty() {
            write!(f, " {}", self.color)?;
        }
        Ok(())
    }
}

/// Everything one evaluation threw, and the totals grouped by colour.
///
/// Besides the record, the set carries the evaluator's scratch state: the
/// pending drop registers, the colour stack and how deep inside arithmetic the
/// evaluator currently is.
#[derive(Default, Clone)]
pub struct DiceSet {
    pub dice: Vec<Dice>,
    pub totals_by_color: BTreeMap<String, f64>,
    pub(crate) drop_highest: i64,
    pub(crate) drop_lowest: i64,
    pub(crate) colors: Vec<String>,
    pub(crate) color_depth: usize,
    pub(crate) additive_chain: bool,
    /// Whether the throw at the same index has had its colour committed.
    settled: Vec<bool>,
    /// Running sum of values committed by colour groups below the top level.
    early_settled: f64,
}

impl DiceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the pending drops, throws `dice` and records it.
    ///
    /// Outside any arithmetic the throw is committed right away, under the
    /// colour tagged since `colors_since`.
    pub fn push_and_roll<R: Roller>(
        &mut self,
        mut dice: Dice,
        roller: &mut R,
        limits: &Limits,
        colors_since: usize,
    ) -> EResult<i64> {
        let top_level = self.color_depth == 0;
        if top_level {
            dice.color = self.take_color(colors_since)?;
        }
        dice.drop_highest = std::mem::take(&mut self.drop_highest);
        dice.drop_lowest = std::mem::take(&mut self.drop_lowest);

        let total = dice.roll(roller, limits)?;
        if top_level {
            *self.totals_by_color.entry(dice.color.clone()).or_default() += total as f64;
        }
        debug!(dice = %dice, faces = ?dice.faces, total, "pushed dice");
        self.dice.push(dice);
        self.settled.push(top_level);
        Ok(total)
    }

    /// Pops every colour pushed since `since`; they must all agree.
    pub(crate) fn take_color(&mut self, since: usize) -> EResult<String> {
        let since = since.min(self.colors.len());
        let taken: Vec<String> = self.colors.drain(since..).collect();
        match taken.split_last() {
            None => Ok(String::new()),
            Some((last, rest)) => {
                if rest.iter().any(|c| c != last) {
                    Err(EvalError::MixedColors)
                } else {
                    Ok(last.clone())
                }
            }
        }
    }

    pub(crate) fn distinct_colors_since(&self, since: usize) -> usize {
        let mut seen: Vec<&str> = Vec::new();
        for c in self.colors.iter().skip(since) {
            if !seen.contains(&c.as_str()) {
                seen.push(c.as_str());
            }
        }
        seen.len()
    }

    pub(crate) fn early_settled(&self) -> f64 {
        self.early_settled
    }

    /// Commits the value of an arithmetic group: its uncommitted throws take
    /// `color`, and whatever part of `value` was not already committed by a
    /// nested group is added to that colour's total.
    pub(crate) fn commit(
        &mut self,
        color: String,
        value: f64,
        dice_since: usize,
        settled_before: f64,
        nested: bool,
    ) {
        let remainder = value - (self.early_settled - settled_before);
        let mut unsettled = 0;
        let pending = self.dice.iter_mut().zip(self.settled.iter_mut());
        for (dice, settled) in pending.skip(dice_since) {
            if !*settled {
                dice.color = color.clone();
                *settled = true;
                unsettled += 1;
            }
        }
        debug!(color = %color, value, remainder, unsettled, "committed color group");

        if remainder != 0.0 || unsettled > 0 || !color.is_empty() {
            *self.totals_by_color.entry(color).or_default() += remainder;
        }
        if nested {
            self.early_settled += remainder;
        }
    }

    /// Records a literal evaluated outside any arithmetic.
    pub(crate) fn settle_literal(&mut self, color: String, value: f64) {
        *self.totals_by_color.entry(color).or_default() += value;
    }

    pub fn grand_total(&self) -> f64 {
        self.totals_by_color.values().sum()
    }
}

impl fmt::Debug for DiceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiceSet")
            .field("dice", &self.dice)
            .field("totals_by_color", &self.totals_by_color)
            .finish()
    }
}
