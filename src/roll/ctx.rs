use super::dice::{Dice, DiceSet};
use super::error::EvalError;
use super::roller::{DefaultRoller, Limits, Roller};
use super::EResult;
use crate::parse::ast::{title_case, Node, Symbol};
use crate::parse::visit::{Accept, AstVisitor};
use tracing::{debug, trace};

/// Evaluates parsed commands, throwing dice with `R`.
pub struct RollContext<R = DefaultRoller> {
    limits: Limits,
    roller: R,
    ds: DiceSet,
}

impl<R: Roller> RollContext<R> {
    pub fn new(limits: Limits, roller: R) -> Self {
        Self {
            limits,
            roller,
            ds: DiceSet::new(),
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Evaluates `ast` against a fresh [`DiceSet`] and returns the grand total
    /// with everything that was thrown.
    pub fn eval(&mut self, ast: &Node) -> EResult<(f64, DiceSet)> {
        self.ds = DiceSet::new();
        let total = self.eval_node(ast, false);
        let ds = std::mem::take(&mut self.ds);
        let total = total?;
        debug!(total, dice = ds.dice.len(), totals = ?ds.totals_by_color, "evaluated command");
        Ok((total, ds))
    }

    /// `chain` tells an arithmetic child that its parent is part of a run of
    /// `+` nodes starting at the top level.
    fn eval_node(&mut self, node: &Node, chain: bool) -> EResult<f64> {
        self.ds.additive_chain = chain;
        node.accept(self)
    }

    /// Evaluates an operand that feeds a throw, a count or a comparison.
    /// Colours tagged inside it stay inside it.
    fn nested(&mut self, node: &Node) -> EResult<f64> {
        let colors_before = self.ds.colors.len();
        self.ds.color_depth += 1;
        let value = self.eval_node(node, false);
        self.ds.color_depth -= 1;
        self.ds.colors.truncate(colors_before);
        value
    }

    fn evaluate_boolean(&mut self, node: &Node) -> EResult<bool> {
        let value = if node.symbol.is_comparison() {
            self.eval_node(node, false)?
        } else {
            self.nested(node)?
        };
        Ok(value != 0.0)
    }

    fn child<'n>(node: &'n Node, index: usize) -> EResult<&'n Node> {
        node.children
            .get(index)
            .ok_or_else(|| EvalError::MalformedNode(node.symbol.to_string()))
    }

    fn binary_operands(node: &Node) -> EResult<(&Node, &Node)> {
        let operands: Vec<&Node> = node.operands().collect();
        match operands[..] {
            [l, r] => Ok((l, r)),
            _ => Err(EvalError::MalformedNode(node.symbol.to_string())),
        }
    }
}

impl Default for RollContext {
    fn default() -> Self {
        Self::new(Limits::default(), DefaultRoller::default())
    }
}

fn number(node: &Node) -> EResult<f64> {
    node.value
        .parse()
        .map_err(|_| EvalError::InvalidNumber(node.value.clone()))
}

fn fold(symbol: Symbol, values: &[f64]) -> EResult<f64> {
    let malformed = || EvalError::MalformedNode(symbol.to_string());
    let (first, rest) = values.split_first().ok_or_else(malformed)?;
    if rest.is_empty() {
        return match symbol {
            Symbol::Minus => Ok(-first),
            _ => Err(malformed()),
        };
    }

    rest.iter().try_fold(*first, |acc, &x| match symbol {
        Symbol::Plus => Ok(acc + x),
        Symbol::Minus => Ok(acc - x),
        Symbol::Star => Ok(acc * x),
        Symbol::Slash if x == 0.0 => Err(EvalError::DivisionByZero),
        Symbol::Slash => Ok(acc / x),
        Symbol::Caret => Ok(acc.powf(x)),
        Symbol::Mod if x == 0.0 => Err(EvalError::ModuloByZero),
        Symbol::Mod => Ok(acc % x),
        _ => Err(malformed()),
    })
}

fn compare(symbol: Symbol, l: f64, r: f64) -> EResult<bool> {
    Ok(match symbol {
        Symbol::LessThan => l < r,
        Symbol::GreaterThan => l > r,
        Symbol::LessEqual => l <= r,
        Symbol::GreaterEqual => l >= r,
        Symbol::EqualEqual => l == r,
        Symbol::BangEqual => l != r,
        _ => return Err(EvalError::MalformedNode(symbol.to_string())),
    })
}

impl<R: Roller> AstVisitor for RollContext<R> {
    type Output = EResult<f64>;

    fn visit_number(&mut self, node: &Node) -> Self::Output {
        let value = number(node)?;
        let colors_before = self.ds.colors.len();
        for child in &node.children {
            if child.symbol.is_drop() {
                return Err(EvalError::DropWithoutDice);
            }
            self.eval_node(child, false)?;
        }
        if self.ds.color_depth == 0 {
            let color = self.ds.take_color(colors_before)?;
            self.ds.settle_literal(color, value);
        }
        Ok(value)
    }

    fn visit_ident(&mut self, node: &Node) -> Self::Output {
        self.ds.colors.push(title_case(&node.value));
        Ok(0.0)
    }

    fn visit_dice(&mut self, node: &Node) -> Self::Output {
        let colors_before = self.ds.colors.len();
        let (count, sides) = Self::binary_operands(node)?;
        let count = self.nested(count)? as i64;
        let sides = self.nested(sides)? as i64;

        for child in &node.children {
            if child.symbol.is_drop() || child.is(Symbol::Ident) {
                self.eval_node(child, false)?;
            }
        }

        let total = self.ds.push_and_roll(
            Dice::new(count, sides).at((node.line, node.column)),
            &mut self.roller,
            &self.limits,
            colors_before,
        )?;
        Ok(total as f64)
    }

    fn visit_drop(&mut self, node: &Node) -> Self::Output {
        let mut sum = 0.0;
        for child in &node.children {
            sum += self.nested(child)?;
        }
        let count = sum.trunc() as i64;
        if node.is(Symbol::DropHigh) {
            self.ds.drop_highest = count;
        } else {
            self.ds.drop_lowest = count;
        }
        Ok(0.0)
    }

    fn visit_arithmetic(&mut self, node: &Node) -> Self::Output {
        let in_chain = std::mem::take(&mut self.ds.additive_chain);
        let top = self.ds.color_depth == 0;
        let dice_before = self.ds.dice.len();
        let colors_before = self.ds.colors.len();
        let settled_before = self.ds.early_settled();

        let binary = node.operands().count() == 2;
        let chain = node.is(Symbol::Plus) && binary && (top || in_chain);

        self.ds.color_depth += 1;
        let mut values = Vec::with_capacity(node.children.len());
        for child in &node.children {
            if child.is(Symbol::Ident) {
                self.eval_node(child, false)?;
            } else if child.symbol.is_drop() {
                return Err(EvalError::DropWithoutDice);
            } else {
                values.push(self.eval_node(child, chain)?);
            }
        }
        self.ds.color_depth -= 1;

        let value = fold(node.symbol, &values)?;

        let pending = self.ds.distinct_colors_since(colors_before);
        if pending > 1 {
            return Err(EvalError::MixedColors);
        }
        if top {
            let color = self.ds.take_color(colors_before)?;
            self.ds.commit(color, value, dice_before, settled_before, false);
        } else if in_chain && pending == 1 {
            let color = self.ds.take_color(colors_before)?;
            trace!(color = %color, value, "committed nested color group");
            self.ds.commit(color, value, dice_before, settled_before, true);
        }
        Ok(value)
    }

    fn visit_comparison(&mut self, node: &Node) -> Self::Output {
        let (l, r) = Self::binary_operands(node)?;
        let l = self.nested(l)?;
        let r = self.nested(r)?;
        Ok(if compare(node.symbol, l, r)? { 1.0 } else { 0.0 })
    }

    fn visit_if(&mut self, node: &Node) -> Self::Output {
        let cond = Self::child(node, 0)?;
        let then = Self::child(node, 1)?;
        if self.evaluate_boolean(cond)? {
            self.eval_node(then, false)
        } else {
            match node.children.get(2) {
                Some(otherwise) => self.eval_node(otherwise, false),
                None => Ok(0.0),
            }
        }
    }

    fn visit_rep(&mut self, node: &Node) -> Self::Output {
        let body = Self::child(node, 0)?;
        let count = self.nested(Self::child(node, 1)?)? as i64;
        if count > self.limits.max_repetitions {
            return Err(EvalError::TooManyRepetitions);
        }

        let mut sum = 0.0;
        for _ in 0..count.max(0) {
            sum += self.eval_node(body, false)?;
        }
        Ok(sum)
    }

    fn visit_statements(&mut self, node: &Node) -> Self::Output {
        let mut sum = 0.0;
        for child in &node.children {
            sum += self.eval_node(child, false)?;
        }
        Ok(sum)
    }

    fn visit_call(&mut self, node: &Node) -> Self::Output {
        self.visit_unsupported(node)
    }

    fn visit_eof(&mut self, _: &Node) -> Self::Output {
        Ok(0.0)
    }

    fn visit_unsupported(&mut self, node: &Node) -> Self::Output {
        Err(EvalError::UnsupportedSymbol(node.symbol.to_string()))
    }
}
