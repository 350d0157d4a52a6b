use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("error at line {line}, column {column}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }

    pub fn is_friendly(&self) -> bool {
        matches!(self.kind, ParseErrorKind::EmptyCommand)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("zero length command is invalid")]
    EmptyCommand,
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),
    #[error("unknown operator {0:?}")]
    UnknownOperator(String),
    #[error("token {0} is not prefix")]
    NotPrefix(String),
    #[error("token {0} is not infix")]
    NotInfix(String),
    #[error("expected {expected}, found {found}")]
    Expected { expected: String, found: String },
    #[error("unmatched block terminator")]
    UnmatchedBlock,
}
