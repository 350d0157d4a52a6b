use super::ast::{Node, Symbol};
use super::error::{ParseError, ParseErrorKind};
use super::grammar;
use super::lexer::{Lexer, Token};
use super::numerals::Numerals;

pub type PResult<T> = Result<T, ParseError>;

/// Top-down operator-precedence parser over the registered grammar.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::from_lexer(Lexer::new(source, grammar::registry()))
    }

    pub fn with_numerals(source: &'a str, numerals: &'a dyn Numerals) -> Self {
        Self::from_lexer(Lexer::with_numerals(source, grammar::registry(), numerals))
    }

    pub fn from_lexer(lexer: Lexer<'a>) -> Self {
        Self { lexer }
    }

    /// Parses every statement up to end of input under a `(rootnode)`.
    pub fn statements(&mut self) -> PResult<Node> {
        let mut root = Node::new(Symbol::Root, "", 1, 1, 0);
        loop {
            let next = self.peek()?;
            if next.is(Symbol::Eof) {
                break;
            }
            if next.is(Symbol::RightBrace) {
                return Err(next.error(ParseErrorKind::UnmatchedBlock));
            }
            let statement = self.statement()?;
            if !statement.is(Symbol::Eof) {
                root.push(statement);
            }
        }
        Ok(root)
    }

    /// Parses exactly one statement.
    pub fn statement(&mut self) -> PResult<Node> {
        let std = self.peek()?.def.std;
        if let Some(std) = std {
            let t = self.next()?;
            return std(t, self);
        }
        self.expression(0)
    }

    pub fn expression(&mut self, rbp: u32) -> PResult<Node> {
        let t = self.next()?;
        let nud = match t.def.nud {
            Some(nud) => nud,
            None => return Err(t.error(ParseErrorKind::NotPrefix(t.to_string()))),
        };
        let mut left = nud(t, self)?;

        while self.peek()?.bp() > rbp {
            let t = self.next()?;
            let led = match t.def.led {
                Some(led) => led,
                None => return Err(t.error(ParseErrorKind::NotInfix(t.to_string()))),
            };
            left = led(t, self, left)?;
        }

        Ok(left)
    }

    /// Consumes the next token, which must be `symbol`.
    pub fn advance(&mut self, symbol: Symbol) -> PResult<Token> {
        let t = self.next()?;
        if t.is(symbol) {
            Ok(t)
        } else {
            Err(t.error(ParseErrorKind::Expected {
                expected: symbol.as_str().to_string(),
                found: t.to_string(),
            }))
        }
    }

    pub fn next(&mut self) -> PResult<Token> {
        self.lexer.next()
    }

    pub fn peek(&mut self) -> PResult<&Token> {
        self.lexer.peek()
    }

    pub fn peek_is(&mut self, symbol: Symbol) -> PResult<bool> {
        Ok(self.peek()?.is(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Symbol::*;

    /// Compact s-expression of a tree, ignoring positions.
    fn sexpr(node: &Node) -> String {
        let head = match node.symbol {
            Number | Ident => node.value.clone(),
            sym => sym.as_str().to_string(),
        };
        if node.children.is_empty() {
            head
        } else {
            let children: Vec<_> = node.children.iter().map(sexpr).collect();
            format!("({} {})", head, children.join(" "))
        }
    }

    fn parse(s: &str) -> PResult<Node> {
        Parser::new(s).statements()
    }

    fn check(s: &str, expected: &str) {
        let root = parse(s).unwrap();
        let statements: Vec<_> = root.children.iter().map(sexpr).collect();
        assert_eq!(statements.join(" ; "), expected, "{:?}", s);
    }

    fn check_err(s: &str, expected: ParseErrorKind, line: usize, column: usize) {
        assert_eq!(parse(s).unwrap_err(), ParseError::new(expected, line, column));
    }

    #[test]
    fn test_parse_dice() {
        check("1d20", "(d 1 20)");
        check("roll 2d6+3", "(roll (+ (d 2 6) 3))");
        check("(1+1)d6", "(d (+ 1 1) 6)");
        check("2d6d4", "(d (d 2 6) 4)");
    }

    #[test]
    fn test_parse_precedence() {
        check("1 + 2 * 3", "(+ 1 (* 2 3))");
        check("1 - 2 - 3", "(- (- 1 2) 3)");
        check("2 ^ 3 ^ 2", "(^ 2 (^ 3 2))");
        check("(8d1+10)*2+5", "(+ (* (+ (d 8 1) 10) 2) 5)");
        check("7 mod 2 * 3", "(* (mod 7 2) 3)");
        check("-2 + 1", "(+ (- 2) 1)");
        check("1d20 >= 10", "(>= (d 1 20) 10)");
    }

    #[test]
    fn test_parse_drops() {
        check("3d6-L", "(d 3 6 (-L 1))");
        check("4d6-L2", "(d 4 6 (-L 2))");
        check("20d4-H5 + 1", "(+ (d 20 4 (-H 5)) 1)");
    }

    #[test]
    fn test_parse_colors() {
        check("1d20 fire", "(d 1 20 Fire)");
        check("roll 20d1 MUNDANE", "(roll (d 20 1 Mundane))");
        check("4d6-L2 fire", "(d 4 6 (-L 2) Fire)");
        check(
            "(8d1+10)*2+5 mundane + 6d1/2 fire",
            "(+ (+ (* (+ (d 8 1) 10) 2) (5 Mundane)) (/ (d 6 1) (2 Fire)))",
        );
        check("(1d4 + 1) ice", "(+ (d 1 4) 1 Ice)");
    }

    #[test]
    fn test_parse_combiners() {
        check("roll 2d6+3 fire, 1d20", "(roll (, (+ (d 2 6) (3 Fire)) (d 1 20)))");
        check("1d4, 1d6, 1d8", "(, (d 1 4) (d 1 6) (d 1 8))");
        check("1d4 and 1d6", "(and (d 1 4) (d 1 6))");
    }

    #[test]
    fn test_parse_rep() {
        check("roll 1d20 rep 5", "(roll (rep (d 1 20) 5))");
        check("1d20+5 rep three", "(rep (+ (d 1 20) 5) 3)");
        check("1d20 rep 2, 1d1", "(, (rep (d 1 20) 2) (d 1 1))");
        check("1d20 rep 2 and 1d1", "(and (rep (d 1 20) 2) (d 1 1))");
    }

    #[test]
    fn test_parse_if() {
        check("1d20 if 1 > 0 else 2", "(if (> 1 0) (d 1 20) 2)");
        check("if 1 < 2 { 1d4 }", "(if (< 1 2) ({ (d 1 4)))");
        check(
            "if 1 < 2 { 1d4 } else { 1d6\n1d8 }",
            "(if (< 1 2) ({ (d 1 4)) ({ (d 1 6) (d 1 8)))",
        );
        check(
            "if 1 == 2 {\n1\n} else if 2 != 3 {\n2\n} else {\n3\n}",
            "(if (== 1 2) ({ 1) (if (!= 2 3) ({ 2) ({ 3)))",
        );
    }

    #[test]
    fn test_parse_statements() {
        check("1d20\n\n2d6\n", "(d 1 20) ; (d 2 6)");
        check("1d20 2d6", "(d 1 20) ; (d 2 6)");
        check("# only a comment\n", "");
    }

    #[test]
    fn test_parse_groups() {
        check("(1d4 2d6)", "(d 1 4)");
        check("1d6(2, 3)", "(( (d 1 6) 2 3)");
    }

    #[test]
    fn test_parse_errors() {
        check_err("roll", ParseErrorKind::NotPrefix("(EOF)".to_string()), 1, 5);
        check_err("1 +", ParseErrorKind::NotPrefix("(EOF)".to_string()), 1, 4);
        check_err("}", ParseErrorKind::UnmatchedBlock, 1, 1);
        check_err("{ 1d4", ParseErrorKind::UnmatchedBlock, 1, 6);
        check_err(
            "(1d4",
            ParseErrorKind::Expected {
                expected: ")".to_string(),
                found: "(EOF)".to_string(),
            },
            1,
            5,
        );
        check_err("1 else 2", ParseErrorKind::NotPrefix("else".to_string()), 1, 3);
    }
}
