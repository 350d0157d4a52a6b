use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("I can't hold that many dice")]
    TooManyDice,
    #[error("A die with that many sides is basically round")]
    TooManySides,
    #[error("A zero sided die is not a die")]
    ZeroSidedDie,
    #[error("I can't roll a negative number of dice")]
    NegativeDice,
    #[error("I can't drop more dice than I rolled")]
    TooManyDropped,
    #[error("I won't repeat that many times")]
    TooManyRepetitions,
    #[error("cannot perform arithmetic on different color dice, try ',' or 'and' instead")]
    MixedColors,
    #[error("I can't divide by zero")]
    DivisionByZero,
    #[error("I can't take a modulus by zero")]
    ModuloByZero,
    #[error("drops can only follow a dice throw")]
    DropWithoutDice,
    #[error("unsupported symbol {0}")]
    UnsupportedSymbol(String),
    #[error("malformed {0} node")]
    MalformedNode(String),
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}

impl EvalError {
    /// Errors caused by what the user asked for rather than by a broken tree.
    pub fn is_friendly(&self) -> bool {
        !matches!(
            self,
            Self::UnsupportedSymbol(_) | Self::MalformedNode(_) | Self::InvalidNumber(_)
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AstError {
    #[error("repeat count must be a literal number")]
    NonLiteralRepeat,
    #[error("malformed {0} node")]
    MalformedNode(String),
}
