use super::ast::{Node, Symbol};
use super::error::{ParseError, ParseErrorKind};
use super::numerals::{English, Numerals};
use super::registry::{Registry, TokenDef};
use logos::Logos;
use std::fmt;

/// Raw lexemes; the [`Lexer`] turns them into registered tokens.
#[derive(Logos, Debug, Copy, Clone, PartialEq)]
enum Lexeme {
    #[regex(r"[0-9]+(\.[0-9]*)?")]
    Number,
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Word,
    #[token("\n")]
    Newline,

    #[token("<=")]
    #[token(">=")]
    #[token("==")]
    #[token("!=")]
    #[token("-L")]
    #[token("-H")]
    Pair,
    #[regex(r#"[\^*()\-+=/?.,:;"|{}\[\]<>]"#)]
    Operator,

    #[regex(r"#[^\n]*", logos::skip)]
    #[regex(r"[ \t\r\x0B\x0C\x{A0}\x{85}]+", logos::skip)]
    #[error]
    Error,
}

/// A registered symbol at a concrete position.
#[derive(Debug, Clone)]
pub struct Token {
    pub def: &'static TokenDef,
    pub value: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn symbol(&self) -> Symbol {
        self.def.symbol
    }

    pub fn bp(&self) -> u32 {
        self.def.bp
    }

    pub fn is(&self, symbol: Symbol) -> bool {
        self.def.symbol == symbol
    }

    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.line, self.column)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Symbol::Number | Symbol::Ident => write!(f, "{:?}", self.value),
            sym => f.write_str(sym.as_str()),
        }
    }
}

impl From<Token> for Node {
    fn from(t: Token) -> Self {
        Node::new(t.def.symbol, t.value, t.line, t.column, t.def.bp)
    }
}

#[derive(Debug, Copy, Clone)]
struct Cursor {
    index: usize,
    line: usize,
    column: usize,
}

/// Pull-based tokenizer with one token of lookahead.
pub struct Lexer<'a> {
    source: &'a str,
    cursor: Cursor,
    peeked: Option<(Token, Cursor)>,
    registry: &'static Registry,
    numerals: &'a dyn Numerals,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, registry: &'static Registry) -> Self {
        Self::with_numerals(source, registry, &English)
    }

    pub fn with_numerals(
        source: &'a str,
        registry: &'static Registry,
        numerals: &'a dyn Numerals,
    ) -> Self {
        Self {
            source,
            cursor: Cursor {
                index: 0,
                line: 1,
                column: 1,
            },
            peeked: None,
            registry,
            numerals,
        }
    }

    pub fn next(&mut self) -> Result<Token, ParseError> {
        if let Some((token, end)) = self.peeked.take() {
            self.cursor = end;
            return Ok(token);
        }
        self.lex()
    }

    /// Looks at the next token without moving past it.
    pub fn peek(&mut self) -> Result<&Token, ParseError> {
        let peeked = match self.peeked.take() {
            Some(peeked) => peeked,
            None => {
                let start = self.cursor;
                let token = self.lex();
                let end = self.cursor;
                self.cursor = start;
                (token?, end)
            }
        };
        Ok(&self.peeked.insert(peeked).0)
    }

    fn lex(&mut self) -> Result<Token, ParseError> {
        let source = self.source;
        let rest = &source[self.cursor.index..];
        let mut raw = Lexeme::lexer(rest);

        let kind = match raw.next() {
            Some(kind) => kind,
            None => {
                self.bump(rest.len());
                return self.token(Symbol::Eof, "", self.cursor.line, self.cursor.column);
            }
        };

        let span = raw.span();
        self.bump(span.start);
        let (line, column) = (self.cursor.line, self.cursor.column);
        if kind == Lexeme::Error {
            let c = rest[span.start..].chars().next().unwrap_or('\0');
            return Err(ParseError::new(
                ParseErrorKind::InvalidCharacter(c),
                line,
                column,
            ));
        }
        let slice = &rest[span];

        match kind {
            Lexeme::Number => {
                self.bump(slice.len());
                self.token(Symbol::Number, slice, line, column)
            }
            Lexeme::Newline => {
                self.bump(1);
                self.token(Symbol::Newline, "\n", line, column)
            }
            Lexeme::Word => self.word(slice, line, column),
            Lexeme::Pair => {
                if self.registry.defined(slice) {
                    self.bump(2);
                    self.operator(slice, line, column)
                } else {
                    self.bump(1);
                    self.operator(&slice[..1], line, column)
                }
            }
            Lexeme::Operator | Lexeme::Error => {
                self.bump(1);
                self.operator(slice, line, column)
            }
        }
    }

    fn word(&mut self, slice: &'a str, line: usize, column: usize) -> Result<Token, ParseError> {
        // `d20` is the dice operator followed by a number, not an identifier
        let mut chars = slice.chars();
        if matches!(chars.next(), Some('d' | 'D'))
            && chars.next().map_or(false, |c| c.is_ascii_digit())
        {
            self.bump(1);
            return self.token(Symbol::Dice, "d", line, column);
        }

        self.bump(slice.len());
        let lower = slice.to_ascii_lowercase();
        if let Some(def) = self.registry.lookup(&lower) {
            let symbol = def.symbol;
            return self.token(symbol, lower, line, column);
        }
        if self.numerals.is_numeral(slice) {
            return self.numeral(slice, line, column);
        }
        self.token(Symbol::Ident, slice, line, column)
    }

    /// Extends a numeral word into the longest phrase that still converts.
    fn numeral(&mut self, first: &'a str, line: usize, column: usize) -> Result<Token, ParseError> {
        let source = self.source;
        let mut words = vec![first];
        let mut value = self.numerals.convert(&words);

        loop {
            let rest = &source[self.cursor.index..];
            let after_space = rest.trim_start_matches(|c: char| c == ' ' || c == '\t');
            let gap = rest.len() - after_space.len();
            let (gap, after, hyphen) = match (gap, after_space.strip_prefix('-')) {
                (0, Some(after)) => (1, after, true),
                (0, None) => break,
                (_, _) => (gap, after_space, false),
            };
            let len = after
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            let word = &after[..len];
            if word.is_empty() || !self.numerals.is_numeral(word) {
                break;
            }
            if hyphen && !self.numerals.joins_hyphenated(words[words.len() - 1], word) {
                break;
            }

            words.push(word);
            match self.numerals.convert(&words) {
                Some(v) => {
                    value = Some(v);
                    self.bump(gap + len);
                }
                None => {
                    words.pop();
                    break;
                }
            }
        }

        match value {
            Some(v) => self.token(Symbol::Number, v.to_string(), line, column),
            None => self.token(Symbol::Ident, first, line, column),
        }
    }

    fn operator(&self, text: &str, line: usize, column: usize) -> Result<Token, ParseError> {
        match self.registry.lookup(text) {
            Some(def) => {
                let symbol = def.symbol;
                self.token(symbol, text, line, column)
            }
            None => Err(ParseError::new(
                ParseErrorKind::UnknownOperator(text.to_string()),
                line,
                column,
            )),
        }
    }

    fn token(
        &self,
        symbol: Symbol,
        value: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Result<Token, ParseError> {
        match self.registry.get(symbol) {
            Some(def) => Ok(Token {
                def,
                value: value.into(),
                line,
                column,
            }),
            None => Err(ParseError::new(
                ParseErrorKind::UnknownOperator(symbol.as_str().to_string()),
                line,
                column,
            )),
        }
    }

    fn bump(&mut self, len: usize) {
        let end = self.cursor.index + len;
        for c in self.source[self.cursor.index..end].chars() {
            if c == '\n' {
                self.cursor.line += 1;
                self.cursor.column = 1;
            } else {
                self.cursor.column += 1;
            }
        }
        self.cursor.index = end;
    }
}
