pub mod error;
pub mod parse;
pub mod roll;

pub use error::{Error, ErrorKind};
pub use parse::{ast::Node, parse, ParseError};
pub use roll::{
    canonical, evaluate, probability, restring, AstError, Dice, DiceSet, EvalError, Limits,
    Roller,
};

/// A command that has been parsed, evaluated and written back out.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub ast: Node,
    pub total: f64,
    pub dice_set: DiceSet,
    /// The command in canonical form with each throw's faces filled in.
    pub text: String,
}

/// Parses and evaluates `source` with the default roller and limits.
pub fn roll(source: &str) -> Result<Outcome, Error> {
    roll_with(source, roll::DefaultRoller::default(), Limits::default())
}

pub fn roll_with<R: Roller>(source: &str, roller: R, limits: Limits) -> Result<Outcome, Error> {
    let ast = parse(source)?;
    let template = roll::template(&ast)?;
    let (total, dice_set) = roll::evaluate_with(&ast, roller, limits)?;
    let text = template.fill(&dice_set);
    Ok(Outcome {
        ast,
        total,
        dice_set,
        text,
    })
}
