//! The dice language, declared as binding powers and handlers.

use super::ast::{title_case, Node, Symbol};
use super::error::ParseErrorKind;
use super::lexer::Token;
use super::parser::{PResult, Parser};
use super::registry::Registry;
use once_cell::sync::Lazy;
use vec1::Vec1;

pub const BP_REP: u32 = 10;
pub const BP_IF: u32 = 20;
pub const BP_COMBINE: u32 = 25;
pub const BP_COMPARE: u32 = 30;
pub const BP_SUM: u32 = 50;
pub const BP_PRODUCT: u32 = 60;
pub const BP_POWER: u32 = 70;
pub const BP_DICE: u32 = 80;
pub const BP_CALL: u32 = 90;
pub const BP_MOD: u32 = 95;
pub const BP_TAG: u32 = 300;

pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    use Symbol::*;

    let mut r = Registry::new();
    r.symbol(Number, 0)
        .symbol(Ident, 0)
        .infix_with(Ident, BP_TAG, led_tag);

    r.consumable(Newline).statement(Newline, std_newline);
    for sym in [Eof, RightParen, RightBrace, Else, Comma, And] {
        r.consumable(sym);
    }

    for sym in [LessThan, GreaterThan, LessEqual, GreaterEqual, EqualEqual, BangEqual] {
        r.infix(sym, BP_COMPARE);
    }
    r.infix_with(If, BP_IF, led_if).statement(If, std_if);

    r.infix(Plus, BP_SUM).infix(Minus, BP_SUM).prefix(Minus);
    r.infix(Star, BP_PRODUCT).infix(Slash, BP_PRODUCT);
    r.infix_right(Caret, BP_POWER);
    r.infix(Mod, BP_MOD);

    r.infix_with(Dice, BP_DICE, led_dice);
    r.infix_with(DropLow, BP_DICE, led_drop)
        .infix_with(DropHigh, BP_DICE, led_drop);

    r.infix_with(LeftParen, BP_CALL, led_call)
        .prefix_with(LeftParen, nud_group);

    r.infix_with(Comma, BP_COMBINE, led_combine)
        .infix_with(And, BP_COMBINE, led_combine);
    r.infix_with(Rep, BP_REP, led_rep);

    r.statement(Roll, std_roll);
    r.statement(LeftBrace, std_block);
    r
});

pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// `x fire` attaches a colour tag to the expression on its left.
fn led_tag(t: Token, _: &mut Parser<'_>, mut left: Node) -> PResult<Node> {
    let tag = Node::new(Symbol::Ident, title_case(&t.value), t.line, t.column, t.bp());
    left.push(tag);
    Ok(left)
}

fn led_dice(t: Token, p: &mut Parser<'_>, left: Node) -> PResult<Node> {
    let sides = p.expression(BP_TAG)?;
    Ok(Node::from(t).with_child(left).with_child(sides))
}

/// `-L` / `-H` with an optional literal count, defaulting to one die.
fn led_drop(t: Token, p: &mut Parser<'_>, mut left: Node) -> PResult<Node> {
    let count = if p.peek_is(Symbol::Number)? {
        Node::from(p.next()?)
    } else {
        Node::literal("1", t.line, t.column)
    };
    left.push(Node::from(t).with_child(count));
    Ok(left)
}

fn led_if(t: Token, p: &mut Parser<'_>, left: Node) -> PResult<Node> {
    let cond = p.expression(BP_COMBINE)?;
    p.advance(Symbol::Else)?;
    let otherwise = p.expression(BP_COMBINE)?;
    Ok(Node::from(t)
        .with_child(cond)
        .with_child(left)
        .with_child(otherwise))
}

fn led_call(t: Token, p: &mut Parser<'_>, left: Node) -> PResult<Node> {
    let mut call = Node::from(t).with_child(left);
    if !p.peek_is(Symbol::RightParen)? {
        loop {
            call.push(p.expression(BP_COMBINE)?);
            if !p.peek_is(Symbol::Comma)? {
                break;
            }
            p.next()?;
        }
    }
    p.advance(Symbol::RightParen)?;
    Ok(call)
}

/// A parenthesised group. Only the first expression survives; any further
/// expressions before `)` are parsed and dropped.
fn nud_group(_: Token, p: &mut Parser<'_>) -> PResult<Node> {
    let mut group = Vec1::new(p.expression(0)?);
    while !p.peek_is(Symbol::RightParen)? && !p.peek_is(Symbol::Eof)? {
        group.push(p.expression(0)?);
    }
    p.advance(Symbol::RightParen)?;
    let (first, _) = group.split_off_first();
    Ok(first)
}

/// `a, b, c` and `a and b and c` collapse into one node per chain.
fn led_combine(t: Token, p: &mut Parser<'_>, mut left: Node) -> PResult<Node> {
    let right = p.expression(t.bp())?;
    if left.is(t.symbol()) {
        left.push(right);
        Ok(left)
    } else {
        Ok(Node::from(t).with_child(left).with_child(right))
    }
}

/// `x rep n` repeats everything on its left. The count stops at `,` / `and`.
fn led_rep(t: Token, p: &mut Parser<'_>, left: Node) -> PResult<Node> {
    let count = p.expression(BP_COMBINE)?;
    Ok(Node::from(t).with_child(left).with_child(count))
}

fn std_roll(t: Token, p: &mut Parser<'_>) -> PResult<Node> {
    let body = p.statement()?;
    Ok(Node::from(t).with_child(body))
}

/// Blank lines separate statements; trailing ones yield an `(EOF)` node the
/// caller discards.
fn std_newline(_: Token, p: &mut Parser<'_>) -> PResult<Node> {
    skip_newlines(p)?;
    if p.peek_is(Symbol::Eof)? || p.peek_is(Symbol::RightBrace)? {
        let end = p.peek()?;
        return Ok(Node::new(Symbol::Eof, "", end.line, end.column, 0));
    }
    p.statement()
}

fn std_block(t: Token, p: &mut Parser<'_>) -> PResult<Node> {
    let mut block = Node::from(t);
    loop {
        let next = p.peek()?;
        if next.is(Symbol::RightBrace) {
            p.next()?;
            return Ok(block);
        }
        if next.is(Symbol::Eof) {
            return Err(next.error(ParseErrorKind::UnmatchedBlock));
        }
        let statement = p.statement()?;
        if !statement.is(Symbol::Eof) {
            block.push(statement);
        }
    }
}

/// `if C { ... } [else if ... | else { ... }]`
fn std_if(t: Token, p: &mut Parser<'_>) -> PResult<Node> {
    let cond = p.expression(0)?;
    let brace = p.advance(Symbol::LeftBrace)?;
    let then = std_block(brace, p)?;
    let mut node = Node::from(t).with_child(cond).with_child(then);

    skip_newlines(p)?;
    if p.peek_is(Symbol::Else)? {
        p.next()?;
        let otherwise = if p.peek_is(Symbol::If)? {
            let t = p.next()?;
            std_if(t, p)?
        } else {
            let brace = p.advance(Symbol::LeftBrace)?;
            std_block(brace, p)?
        };
        node.push(otherwise);
    }
    Ok(node)
}

fn skip_newlines(p: &mut Parser<'_>) -> PResult<()> {
    while p.peek_is(Symbol::Newline)? {
        p.next()?;
    }
    Ok(())
}
