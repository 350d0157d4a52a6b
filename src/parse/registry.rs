use super::ast::{Node, Symbol};
use super::lexer::Token;
use super::parser::{PResult, Parser};
use std::collections::HashMap;
use std::fmt;

/// Handler for a token in prefix position.
pub type Nud = fn(Token, &mut Parser<'_>) -> PResult<Node>;
/// Handler for a token in infix position; receives the tree parsed so far.
pub type Led = fn(Token, &mut Parser<'_>, Node) -> PResult<Node>;
/// Handler for a token at the head of a statement.
pub type Std = fn(Token, &mut Parser<'_>) -> PResult<Node>;

/// Binding power prefix operators recurse with.
pub const PREFIX_BP: u32 = 200;

/// Everything the parser knows about one symbol.
#[derive(Copy, Clone)]
pub struct TokenDef {
    pub symbol: Symbol,
    pub bp: u32,
    pub nud: Option<Nud>,
    pub led: Option<Led>,
    pub std: Option<Std>,
}

impl TokenDef {
    fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bp: 0,
            nud: None,
            led: None,
            std: None,
        }
    }
}

impl fmt::Debug for TokenDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenDef")
            .field("symbol", &self.symbol)
            .field("bp", &self.bp)
            .field("nud", &self.nud.is_some())
            .field("led", &self.led.is_some())
            .field("std", &self.std.is_some())
            .finish()
    }
}

/// Symbol table driving the Pratt parser.
///
/// Registration merges: a handler slot is only filled if it is still empty and
/// the binding power only ever rises, so declarations may come in any order.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    defs: HashMap<Symbol, TokenDef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        symbol: Symbol,
        bp: u32,
        nud: Option<Nud>,
        led: Option<Led>,
        std: Option<Std>,
    ) -> &mut Self {
        let def = self
            .defs
            .entry(symbol)
            .or_insert_with(|| TokenDef::new(symbol));
        def.bp = def.bp.max(bp);
        if def.nud.is_none() {
            def.nud = nud;
        }
        if def.led.is_none() {
            def.led = led;
        }
        if def.std.is_none() {
            def.std = std;
        }
        self
    }

    pub fn defined(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn get(&self, symbol: Symbol) -> Option<&TokenDef> {
        self.defs.get(&symbol)
    }

    pub fn lookup(&self, name: &str) -> Option<&TokenDef> {
        Symbol::from_name(name).and_then(|s| self.get(s))
    }

    /// A token that stands for itself in prefix position.
    pub fn symbol(&mut self, symbol: Symbol, bp: u32) -> &mut Self {
        self.register(symbol, bp, Some(nud_itself), None, None)
    }

    /// A token that is part of the language but carries no action of its own.
    pub fn consumable(&mut self, symbol: Symbol) -> &mut Self {
        self.register(symbol, 0, None, None, None)
    }

    pub fn infix(&mut self, symbol: Symbol, bp: u32) -> &mut Self {
        self.register(symbol, bp, None, Some(led_infix), None)
    }

    pub fn infix_right(&mut self, symbol: Symbol, bp: u32) -> &mut Self {
        self.register(symbol, bp, None, Some(led_infix_right), None)
    }

    pub fn infix_with(&mut self, symbol: Symbol, bp: u32, led: Led) -> &mut Self {
        self.register(symbol, bp, None, Some(led), None)
    }

    pub fn prefix(&mut self, symbol: Symbol) -> &mut Self {
        self.register(symbol, 0, Some(nud_prefix), None, None)
    }

    pub fn prefix_with(&mut self, symbol: Symbol, nud: Nud) -> &mut Self {
        self.register(symbol, 0, Some(nud), None, None)
    }

    pub fn statement(&mut self, symbol: Symbol, std: Std) -> &mut Self {
        self.register(symbol, 0, None, None, Some(std))
    }
}

fn nud_itself(t: Token, _: &mut Parser<'_>) -> PResult<Node> {
    Ok(t.into())
}

fn nud_prefix(t: Token, p: &mut Parser<'_>) -> PResult<Node> {
    let operand = p.expression(PREFIX_BP)?;
    Ok(Node::from(t).with_child(operand))
}

fn led_infix(t: Token, p: &mut Parser<'_>, left: Node) -> PResult<Node> {
    let bp = t.bp();
    let right = p.expression(bp)?;
    Ok(Node::from(t).with_child(left).with_child(right))
}

fn led_infix_right(t: Token, p: &mut Parser<'_>, left: Node) -> PResult<Node> {
    let bp = t.bp().saturating_sub(1);
    let right = p.expression(bp)?;
    Ok(Node::from(t).with_child(left).with_child(right))
}
