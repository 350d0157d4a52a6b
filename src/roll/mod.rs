mod ctx;
mod dice;
mod error;
mod probability;
pub(crate) mod roller;
mod stringify;

use crate::parse::ast::Node;

type EResult<T> = Result<T, EvalError>;

pub use ctx::RollContext;
pub use dice::{Dice, DiceSet, Slot};
pub use error::{AstError, EvalError};
pub use probability::{probability, OutcomeTable};
pub use roller::{uniform, DefaultRoller, Limits, Roller};
pub use stringify::{canonical, fill_faces, restring, template, AResult, Restringer, Template};

/// Evaluates `ast` with the default limits, rolling from the OS entropy source.
pub fn evaluate(ast: &Node) -> EResult<(f64, DiceSet)> {
    RollContext::default().eval(ast)
}

pub fn evaluate_with<R: Roller>(ast: &Node, roller: R, limits: Limits) -> EResult<(f64, DiceSet)> {
    RollContext::new(limits, roller).eval(ast)
}
