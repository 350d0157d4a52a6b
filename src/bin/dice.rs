use anyhow::{Context, Result};
use clap::Parser;
use dice_lang::roll::{DefaultRoller, OutcomeTable};
use dice_lang::{Error, ErrorKind, Limits, Outcome};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::debug;

const RULE: &str = "----------";

/// Rolls dice commands and prints what was thrown
#[derive(Parser)]
#[command(name = "dice")]
struct Args {
    /// Evaluate a single command
    #[arg(long)]
    cmd: Option<String>,

    /// Evaluate every non-empty line of a file
    #[arg(long)]
    path: Option<PathBuf>,

    /// Print the parsed tree
    #[arg(long = "v")]
    verbose: bool,

    /// Print the probability map of every throw
    #[arg(long = "p")]
    probabilities: bool,

    /// Log filter
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Most dice a single throw may hold
    #[arg(long, default_value_t = 1000)]
    max_dice: i64,

    /// Most sides a single die may have
    #[arg(long, default_value_t = 1000)]
    max_sides: i64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(&args.log_level)
        .with_writer(io::stderr)
        .init();

    let limits = Limits {
        max_dice: args.max_dice,
        max_sides: args.max_sides,
        ..Limits::default()
    };

    if let Some(cmd) = &args.cmd {
        run(&args, limits, cmd);
    } else if let Some(path) = &args.path {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        for line in source.lines().filter(|l| !l.trim().is_empty()) {
            run(&args, limits, line);
        }
    } else {
        for line in io::stdin().lock().lines() {
            let line = line.context("failed to read standard input")?;
            if !line.trim().is_empty() {
                run(&args, limits, &line);
            }
        }
    }
    Ok(())
}

fn run(args: &Args, limits: Limits, command: &str) {
    debug!(command, "running command");
    match dice_lang::roll_with(command, DefaultRoller::default(), limits) {
        Ok(outcome) => print_outcome(args, &outcome),
        Err(why) => report(&why),
    }
}

fn print_outcome(args: &Args, outcome: &Outcome) {
    if args.verbose {
        println!("AST:");
        println!("{}", RULE);
        print!("{}", outcome.ast);
        println!("{}", RULE);
    }
    if args.probabilities {
        let mut table = OutcomeTable::new();
        for dice in &outcome.dice_set.dice {
            println!("Probability Map for {}:", dice);
            let dist = table.probability(dice.count, dice.sides, dice.drop_highest, dice.drop_lowest);
            for (sum, pct) in dist {
                println!("{}:  {:.5}%", sum, pct);
            }
            println!("{}", RULE);
        }
    }
    println!("Total: {}", outcome.total);
    println!("Color Map: {:?}", outcome.dice_set.totals_by_color);
    println!("{}", outcome.text);
    println!("{}", RULE);
    println!("{:?}", outcome.dice_set);
    println!("{}", RULE);
}

fn report(why: &Error) {
    match why.kind() {
        ErrorKind::Friendly => {
            let msg = why.friendly_message().unwrap_or_else(|| why.to_string());
            println!("{}", msg);
        }
        ErrorKind::InvalidCommand => eprintln!("Invalid command: {}", why),
        ErrorKind::InvalidAst => eprintln!("Invalid AST: {}", why),
        ErrorKind::Unexpected => eprintln!("Unexpected error: {}", why),
    }
}
