use super::dice::{DiceSet, Slot};
use super::error::AstError;
use crate::parse::ast::{title_case, Node, Symbol};
use crate::parse::grammar::{self, BP_COMBINE, BP_DICE, BP_IF, BP_REP, BP_TAG};
use crate::parse::registry::PREFIX_BP;
use crate::parse::visit::{Accept, AstVisitor};
use std::collections::HashMap;

pub type AResult<T> = Result<T, AstError>;

/// Binding strength of something that never needs parentheses.
const ATOM: u32 = u32::MAX;

/// Turns a tree back into command text.
///
/// Parentheses are only emitted where re-parsing the text would otherwise
/// build a different tree, so the output of a re-parse re-strings to itself.
#[derive(Debug, Clone)]
pub struct Restringer {
    placeholders: bool,
    slots: Vec<Slot>,
}

impl Restringer {
    /// Emits a `(%s)` after every throw, to be filled by [`fill_faces`].
    pub fn new() -> Self {
        Self {
            placeholders: true,
            slots: Vec::new(),
        }
    }

    /// Emits plain command text.
    pub fn canonical() -> Self {
        Self {
            placeholders: false,
            slots: Vec::new(),
        }
    }

    pub fn restring(&mut self, ast: &Node) -> AResult<String> {
        self.template(ast).map(|t| t.text)
    }

    pub fn template(&mut self, ast: &Node) -> AResult<Template> {
        self.slots.clear();
        let text = self.emit(ast)?;
        Ok(Template {
            text,
            slots: std::mem::take(&mut self.slots),
        })
    }

    /// Emits `node`, wrapping it when it carries drop or colour modifiers
    /// that its own visitor does not print.
    fn emit(&mut self, node: &Node) -> AResult<String> {
        let body = node.accept(self)?;
        if matches!(node.symbol, Symbol::Number | Symbol::Dice) || !has_modifiers(node) {
            return Ok(body);
        }
        Ok(format!("({}){}", body, self.modifiers(node)?))
    }

    fn operand(&mut self, node: &Node, parens: bool) -> AResult<String> {
        let s = self.emit(node)?;
        Ok(if parens { format!("({})", s) } else { s })
    }

    /// An operand the parser read before the operator.
    fn left(&mut self, node: &Node, bp: u32) -> AResult<String> {
        self.operand(node, precedence(node) < bp)
    }

    /// An operand the parser read with `expression(bp)`.
    fn right(&mut self, node: &Node, bp: u32) -> AResult<String> {
        self.operand(node, precedence(node) <= bp)
    }

    /// Drops written tight, then colour tags.
    fn modifiers(&mut self, node: &Node) -> AResult<String> {
        let mut out = String::new();
        for child in node.children.iter().filter(|c| c.symbol.is_drop()) {
            let count = child
                .children
                .first()
                .ok_or_else(|| malformed(child))?;
            out.push_str(child.symbol.as_str());
            out.push_str(&count.value);
        }
        for tag in node.tags() {
            out.push(' ');
            out.push_str(&title_case(&tag.value));
        }
        Ok(out)
    }

    fn block(&mut self, node: &Node) -> AResult<String> {
        let statements = node
            .operands()
            .filter(|c| !c.is(Symbol::Eof))
            .map(|c| self.emit(c))
            .collect::<AResult<Vec<_>>>()?;
        Ok(if statements.is_empty() {
            "{ }".to_string()
        } else {
            format!("{{ {} }}", statements.join("\n"))
        })
    }
}

impl Default for Restringer {
    fn default() -> Self {
        Self::new()
    }
}

fn malformed(node: &Node) -> AstError {
    AstError::MalformedNode(node.symbol.to_string())
}

fn has_modifiers(node: &Node) -> bool {
    node.children
        .iter()
        .any(|c| c.is(Symbol::Ident) || c.symbol.is_drop())
}

fn bp_of(symbol: Symbol) -> u32 {
    grammar::registry().get(symbol).map_or(0, |def| def.bp)
}

/// How tightly the text emitted for `node` holds together.
fn precedence(node: &Node) -> u32 {
    use Symbol::*;

    if node.children.iter().any(|c| c.symbol.is_drop()) {
        return BP_DICE;
    }
    if node.tags().next().is_some() {
        return if node.is(Dice) { BP_DICE } else { BP_TAG };
    }
    match node.symbol {
        Number | Ident | Eof => ATOM,
        Minus if node.operands().count() == 1 => PREFIX_BP,
        If if node.is_block_if() => 0,
        Rep => match repeat_count(node) {
            Ok(1) => node.children.first().map_or(ATOM, precedence),
            Ok(n) if n <= 0 => BP_REP,
            _ => BP_COMBINE,
        },
        Root | Roll | LeftBrace => 0,
        sym => bp_of(sym),
    }
}

fn repeat_count(node: &Node) -> AResult<i64> {
    let count = node.children.get(1).ok_or_else(|| malformed(node))?;
    if !count.is(Symbol::Number) {
        return Err(AstError::NonLiteralRepeat);
    }
    count
        .value
        .parse::<f64>()
        .map(|n| n.trunc() as i64)
        .map_err(|_| AstError::NonLiteralRepeat)
}

impl AstVisitor for Restringer {
    type Output = AResult<String>;

    fn visit_number(&mut self, node: &Node) -> Self::Output {
        Ok(format!("{}{}", node.value, self.modifiers(node)?))
    }

    fn visit_ident(&mut self, node: &Node) -> Self::Output {
        Ok(title_case(&node.value))
    }

    fn visit_dice(&mut self, node: &Node) -> Self::Output {
        let operands: Vec<&Node> = node.operands().collect();
        let (count, sides) = match operands[..] {
            [count, sides] => (count, sides),
            _ => return Err(malformed(node)),
        };

        // the count is written flush against the `d`
        let count_parens = precedence(count) < BP_DICE
            || count.is(Symbol::Ident)
            || count.tags().next().is_some();
        let count = self.operand(count, count_parens)?;
        let sides_parens = precedence(sides) <= BP_TAG || sides.is(Symbol::Ident);
        let sides = self.operand(sides, sides_parens)?;

        let placeholder = if self.placeholders {
            self.slots.push((node.line, node.column));
            "(%s)"
        } else {
            ""
        };
        Ok(format!(
            "{}d{}{}{}",
            count,
            sides,
            placeholder,
            self.modifiers(node)?
        ))
    }

    fn visit_drop(&mut self, node: &Node) -> Self::Output {
        Err(malformed(node))
    }

    fn visit_arithmetic(&mut self, node: &Node) -> Self::Output {
        let bp = bp_of(node.symbol);
        let operands: Vec<&Node> = node.operands().collect();
        match operands[..] {
            [] => Err(malformed(node)),
            [x] if node.is(Symbol::Minus) => {
                Ok(format!("-{}", self.right(x, PREFIX_BP)?))
            }
            [_] => Err(malformed(node)),
            [first, ref rest @ ..] => {
                let right_assoc = node.is(Symbol::Caret);
                let first_parens = if right_assoc {
                    precedence(first) <= bp
                } else {
                    precedence(first) < bp
                };
                let mut out = self.operand(first, first_parens)?;
                for x in rest {
                    let parens = if right_assoc {
                        precedence(x) < bp
                    } else {
                        precedence(x) <= bp
                    };
                    out.push_str(&format!(" {} {}", node.symbol, self.operand(x, parens)?));
                }
                Ok(out)
            }
        }
    }

    fn visit_comparison(&mut self, node: &Node) -> Self::Output {
        let bp = bp_of(node.symbol);
        let operands: Vec<&Node> = node.operands().collect();
        match operands[..] {
            [l, r] => Ok(format!(
                "{} {} {}",
                self.left(l, bp)?,
                node.symbol,
                self.right(r, bp)?
            )),
            _ => Err(malformed(node)),
        }
    }

    fn visit_if(&mut self, node: &Node) -> Self::Output {
        let cond = node.children.first().ok_or_else(|| malformed(node))?;
        let then = node.children.get(1).ok_or_else(|| malformed(node))?;
        let otherwise = node.children.get(2);

        if node.is_block_if() {
            let mut out = format!("if {} {}", self.emit(cond)?, self.block(then)?);
            match otherwise {
                Some(e) if e.is(Symbol::LeftBrace) => {
                    out.push_str(" else ");
                    out.push_str(&self.block(e)?);
                }
                Some(e) => {
                    out.push_str(" else ");
                    out.push_str(&self.emit(e)?);
                }
                None => {}
            }
            return Ok(out);
        }

        let otherwise = otherwise.ok_or_else(|| malformed(node))?;
        Ok(format!(
            "{} if {} else {}",
            self.left(then, BP_IF)?,
            self.right(cond, BP_COMBINE)?,
            self.right(otherwise, BP_COMBINE)?
        ))
    }

    fn visit_rep(&mut self, node: &Node) -> Self::Output {
        let body = node.children.first().ok_or_else(|| malformed(node))?;
        let count = repeat_count(node)?;
        if count <= 0 {
            // nothing is thrown, so the command keeps its `rep`
            let times = node.children.get(1).ok_or_else(|| malformed(node))?;
            return Ok(format!("{} rep {}", self.left(body, BP_REP)?, times.value));
        }

        let first_slot = self.slots.len();
        let body = if count > 1 {
            self.left(body, BP_COMBINE)?
        } else {
            self.emit(body)?
        };
        let body_slots = self.slots.split_off(first_slot);
        for _ in 0..count {
            self.slots.extend_from_slice(&body_slots);
        }
        let copies = vec![body; count as usize];
        Ok(copies.join(", "))
    }

    fn visit_statements(&mut self, node: &Node) -> Self::Output {
        match node.symbol {
            Symbol::Root => {
                let statements = node
                    .operands()
                    .filter(|c| !c.is(Symbol::Eof))
                    .map(|c| self.emit(c))
                    .collect::<AResult<Vec<_>>>()?;
                Ok(statements.join("\n"))
            }
            Symbol::Roll => {
                let body = node.operands().next().ok_or_else(|| malformed(node))?;
                self.emit(body)
            }
            Symbol::LeftBrace => self.block(node),
            _ => {
                let mut out = Vec::new();
                for (i, child) in node.operands().enumerate() {
                    out.push(if i == 0 {
                        self.left(child, BP_COMBINE)?
                    } else {
                        self.right(child, BP_COMBINE)?
                    });
                }
                let separator = if node.is(Symbol::And) { " and " } else { ", " };
                Ok(out.join(separator))
            }
        }
    }

    fn visit_call(&mut self, node: &Node) -> Self::Output {
        let (callee, args) = node.children.split_first().ok_or_else(|| malformed(node))?;
        let callee = self.left(callee, bp_of(Symbol::LeftParen))?;
        let args = args
            .iter()
            .map(|a| self.right(a, BP_COMBINE))
            .collect::<AResult<Vec<_>>>()?;
        Ok(format!("{}({})", callee, args.join(", ")))
    }

    fn visit_eof(&mut self, _: &Node) -> Self::Output {
        Ok(String::new())
    }

    fn visit_unsupported(&mut self, node: &Node) -> Self::Output {
        Err(malformed(node))
    }
}

/// Re-strings `ast` with a `(%s)` placeholder after every throw.
pub fn restring(ast: &Node) -> AResult<String> {
    Restringer::new().restring(ast)
}

/// Re-strings `ast` as plain command text.
pub fn canonical(ast: &Node) -> AResult<String> {
    Restringer::canonical().restring(ast)
}

/// Re-strings `ast` with placeholders, remembering which throw each belongs to.
pub fn template(ast: &Node) -> AResult<Template> {
    Restringer::new().template(ast)
}

/// Replaces each `%s` in `template` with the faces of its throw.
pub fn fill_faces(template: &Template, ds: &DiceSet) -> String {
    template.fill(ds)
}

/// Re-stringed command text with one `%s` per throw.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub text: String,
    /// The throw each placeholder stands for, in text order.
    slots: Vec<Slot>,
}

impl Template {
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Fills placeholders from the throws of an evaluation.
    ///
    /// A slot written `n` times (under `rep`) takes its throws in order. A
    /// throw that never happened, such as the branch of an `if` not taken,
    /// leaves its placeholder empty.
    pub fn fill(&self, ds: &DiceSet) -> String {
        let mut used: HashMap<Slot, usize> = HashMap::new();
        let mut parts = self.text.split("%s");
        let mut out = String::with_capacity(self.text.len());
        if let Some(first) = parts.next() {
            out.push_str(first);
        }
        for (i, part) in parts.enumerate() {
            if let Some(&slot) = self.slots.get(i) {
                let nth = used.entry(slot).or_insert(0);
                let thrown = ds.dice.iter().filter(|d| d.slot == slot).nth(*nth);
                *nth += 1;
                if let Some(dice) = thrown {
                    out.push_str(&dice.faces_string());
                }
            }
            out.push_str(part);
        }
        out
    }
}
