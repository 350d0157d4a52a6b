use std::fmt;

/// The closed set of symbols a token or AST node can carry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Symbol {
    Number,
    Ident,
    Newline,
    Eof,
    Root,
    Roll,
    Rep,
    Dice,
    DropHigh,
    DropLow,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Mod,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
    EqualEqual,
    BangEqual,
    If,
    Else,
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    Comma,
    And,
}

impl Symbol {
    pub const ALL: &'static [Self] = &[
        Self::Number,
        Self::Ident,
        Self::Newline,
        Self::Eof,
        Self::Root,
        Self::Roll,
        Self::Rep,
        Self::Dice,
        Self::DropHigh,
        Self::DropLow,
        Self::Plus,
        Self::Minus,
        Self::Star,
        Self::Slash,
        Self::Caret,
        Self::Mod,
        Self::LessThan,
        Self::GreaterThan,
        Self::LessEqual,
        Self::GreaterEqual,
        Self::EqualEqual,
        Self::BangEqual,
        Self::If,
        Self::Else,
        Self::LeftBrace,
        Self::RightBrace,
        Self::LeftParen,
        Self::RightParen,
        Self::Comma,
        Self::And,
    ];

    pub const fn as_str(&self) -> &'static str {
        use Symbol::*;

        match self {
            Number => "(NUMBER)",
            Ident => "(IDENT)",
            Newline => "(NEWLINE)",
            Eof => "(EOF)",
            Root => "(rootnode)",
            Roll => "roll",
            Rep => "rep",
            Dice => "d",
            DropHigh => "-H",
            DropLow => "-L",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Caret => "^",
            Mod => "mod",
            LessThan => "<",
            GreaterThan => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            EqualEqual => "==",
            BangEqual => "!=",
            If => "if",
            Else => "else",
            LeftBrace => "{",
            RightBrace => "}",
            LeftParen => "(",
            RightParen => ")",
            Comma => ",",
            And => "and",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == name)
    }

    pub const fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Self::Plus | Self::Minus | Self::Star | Self::Slash | Self::Caret | Self::Mod
        )
    }

    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::LessThan
                | Self::GreaterThan
                | Self::LessEqual
                | Self::GreaterEqual
                | Self::EqualEqual
                | Self::BangEqual
        )
    }

    pub const fn is_drop(&self) -> bool {
        matches!(self, Self::DropHigh | Self::DropLow)
    }

    pub const fn is_combiner(&self) -> bool {
        matches!(self, Self::Comma | Self::And)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the parsed command.
///
/// Children are ordered as the parser produced them and their meaning depends
/// on the symbol: `d` holds `(count, sides, modifiers...)`, arithmetic holds its
/// operands followed by any colour tags, `if` holds `(cond, then, else?)`, and
/// `rep` holds `(body, count)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub symbol: Symbol,
    pub value: String,
    pub line: usize,
    pub column: usize,
    pub bp: u32,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(symbol: Symbol, value: impl Into<String>, line: usize, column: usize, bp: u32) -> Self {
        Self {
            symbol,
            value: value.into(),
            line,
            column,
            bp,
            children: Vec::new(),
        }
    }

    pub fn literal(value: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(Symbol::Number, value, line, column, 0)
    }

    pub fn push(&mut self, child: Node) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn is(&self, symbol: Symbol) -> bool {
        self.symbol == symbol
    }

    /// Children that are colour tags.
    pub fn tags(&self) -> impl Iterator<Item = &Node> + '_ {
        self.children.iter().filter(|c| c.is(Symbol::Ident))
    }

    /// Children that are neither colour tags nor drop modifiers.
    pub fn operands(&self) -> impl Iterator<Item = &Node> + '_ {
        self.children
            .iter()
            .filter(|c| !c.is(Symbol::Ident) && !c.symbol.is_drop())
    }

    /// `true` for the statement form `if Cond { ... }`, whose body is a block.
    pub fn is_block_if(&self) -> bool {
        self.is(Symbol::If) && self.children.get(1).map_or(false, |c| c.is(Symbol::LeftBrace))
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.symbol, indent = depth * 2)?;
        if matches!(self.symbol, Symbol::Number | Symbol::Ident) {
            write!(f, " {}", self.value)?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Prints the tree one node per line, children indented under their parent.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// Upper-cases the first character and lower-cases the rest.
pub fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_names_round_trip() {
        for sym in Symbol::ALL {
            assert_eq!(Symbol::from_name(sym.as_str()), Some(*sym));
        }
        assert_eq!(Symbol::from_name("fire"), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("fire"), "Fire");
        assert_eq!(title_case("MUNDANE"), "Mundane");
        assert_eq!(title_case("cold_iron"), "Cold_iron");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_tree_display() {
        let tree = Node::new(Symbol::Dice, "d", 1, 2, 80)
            .with_child(Node::literal("1", 1, 1))
            .with_child(Node::literal("20", 1, 3))
            .with_child(Node::new(Symbol::Ident, "Fire", 1, 6, 300));
        assert_eq!(
            tree.to_string(),
            "d\n  (NUMBER) 1\n  (NUMBER) 20\n  (IDENT) Fire\n"
        );
    }

    #[test]
    fn test_operands_skip_modifiers() {
        let tree = Node::new(Symbol::Dice, "d", 1, 2, 80)
            .with_child(Node::literal("3", 1, 1))
            .with_child(Node::literal("6", 1, 3))
            .with_child(Node::new(Symbol::DropLow, "-L", 1, 4, 80).with_child(Node::literal("1", 1, 6)))
            .with_child(Node::new(Symbol::Ident, "Fire", 1, 8, 300));
        assert_eq!(tree.operands().count(), 2);
        assert_eq!(tree.tags().map(|t| t.value.as_str()).collect::<Vec<_>>(), ["Fire"]);
    }
}
