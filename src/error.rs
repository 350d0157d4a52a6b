use crate::parse::ParseError;
use crate::roll::{AstError, EvalError};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Eval(#[from] EvalError),
    #[error("{0}")]
    Ast(#[from] AstError),
}

/// How a host should present an [`Error`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    InvalidCommand,
    InvalidAst,
    /// The message is meant for the person who typed the command.
    Friendly,
    Unexpected,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(e) if e.is_friendly() => ErrorKind::Friendly,
            Self::Parse(_) => ErrorKind::InvalidCommand,
            Self::Eval(e) if e.is_friendly() => ErrorKind::Friendly,
            Self::Eval(_) => ErrorKind::Unexpected,
            Self::Ast(_) => ErrorKind::InvalidAst,
        }
    }

    pub fn friendly_message(&self) -> Option<String> {
        match self {
            Self::Parse(e) if e.is_friendly() => Some(e.kind.to_string()),
            Self::Eval(e) if e.is_friendly() => Some(e.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ParseErrorKind;

    #[test]
    fn test_classification() {
        let empty: Error = ParseError::new(ParseErrorKind::EmptyCommand, 1, 1).into();
        assert_eq!(empty.kind(), ErrorKind::Friendly);
        assert_eq!(
            empty.friendly_message().as_deref(),
            Some("zero length command is invalid")
        );

        let bad: Error = ParseError::new(ParseErrorKind::InvalidCharacter('!'), 1, 3).into();
        assert_eq!(bad.kind(), ErrorKind::InvalidCommand);
        assert_eq!(bad.friendly_message(), None);

        let many: Error = EvalError::TooManyDice.into();
        assert_eq!(many.kind(), ErrorKind::Friendly);
        assert_eq!(
            many.friendly_message().as_deref(),
            Some("I can't hold that many dice")
        );

        let odd: Error = EvalError::UnsupportedSymbol("else".to_string()).into();
        assert_eq!(odd.kind(), ErrorKind::Unexpected);

        let ast: Error = AstError::NonLiteralRepeat.into();
        assert_eq!(ast.kind(), ErrorKind::InvalidAst);
    }
}
