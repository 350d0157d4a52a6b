use super::ast::{Node, Symbol};

/// Walks a parsed command, one method per kind of node.
pub trait AstVisitor {
    type Output;

    fn visit<T: ?Sized>(&mut self, node: &T) -> Self::Output
    where
        T: Accept<Self>,
    {
        node.accept(self)
    }

    fn visit_number(&mut self, node: &Node) -> Self::Output;

    fn visit_ident(&mut self, node: &Node) -> Self::Output;

    fn visit_dice(&mut self, node: &Node) -> Self::Output;

    /// `-H` / `-L` modifiers.
    fn visit_drop(&mut self, node: &Node) -> Self::Output;

    fn visit_arithmetic(&mut self, node: &Node) -> Self::Output;

    fn visit_comparison(&mut self, node: &Node) -> Self::Output;

    fn visit_if(&mut self, node: &Node) -> Self::Output;

    fn visit_rep(&mut self, node: &Node) -> Self::Output;

    /// Nodes whose children are independent statements: the root, `roll`,
    /// blocks and the `,` / `and` combiners.
    fn visit_statements(&mut self, node: &Node) -> Self::Output;

    fn visit_call(&mut self, node: &Node) -> Self::Output;

    fn visit_eof(&mut self, node: &Node) -> Self::Output;

    /// Symbols that never head a well-formed tree.
    fn visit_unsupported(&mut self, node: &Node) -> Self::Output;
}

pub trait Accept<V: AstVisitor + ?Sized> {
    fn accept(&self, v: &mut V) -> V::Output;
}

impl<V: AstVisitor + ?Sized> Accept<V> for Node {
    fn accept(&self, v: &mut V) -> V::Output {
        use Symbol::*;

        match self.symbol {
            Number => v.visit_number(self),
            Ident => v.visit_ident(self),
            Dice => v.visit_dice(self),
            DropHigh | DropLow => v.visit_drop(self),
            Plus | Minus | Star | Slash | Caret | Mod => v.visit_arithmetic(self),
            LessThan | GreaterThan | LessEqual | GreaterEqual | EqualEqual | BangEqual => {
                v.visit_comparison(self)
            }
            If => v.visit_if(self),
            Rep => v.visit_rep(self),
            Root | Roll | LeftBrace | Comma | And => v.visit_statements(self),
            LeftParen => v.visit_call(self),
            Eof => v.visit_eof(self),
            Newline | Else | RightBrace | RightParen => v.visit_unsupported(self),
        }
    }
}
