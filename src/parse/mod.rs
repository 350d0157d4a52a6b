pub mod ast;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod numerals;
pub mod parser;
pub mod registry;
pub mod visit;

pub use error::{ParseError, ParseErrorKind};
use tracing::debug;

/// Parses a whole command into a tree rooted at `(rootnode)`.
pub fn parse(source: &str) -> Result<ast::Node, ParseError> {
    if source.trim().is_empty() {
        return Err(ParseError::new(ParseErrorKind::EmptyCommand, 1, 1));
    }
    let root = parser::Parser::new(source).statements()?;
    debug!(len = source.len(), statements = root.children.len(), "parsed command");
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command() {
        for s in ["", "   ", "\n\t\n"] {
            let err = parse(s).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::EmptyCommand);
            assert!(err.is_friendly());
            assert_eq!(err.kind.to_string(), "zero length command is invalid");
        }
    }

    #[test]
    fn test_parse_root() {
        let root = parse("roll 1d20\n2d6").unwrap();
        assert!(root.is(ast::Symbol::Root));
        assert_eq!(root.children.len(), 2);
        assert!(root.children[0].is(ast::Symbol::Roll));
    }

    #[test]
    fn test_roll_alone_reports_position() {
        let err = parse("roll").unwrap_err();
        assert_eq!((err.line, err.column), (1, 5));
        assert!(!err.is_friendly());
    }
}
