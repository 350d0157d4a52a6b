use dice_lang::{canonical, parse, roll, roll_with, Error, ErrorKind, EvalError, Limits};
use rand::{rngs::StdRng, SeedableRng};
use std::collections::BTreeMap;

fn colors(expected: &[(&str, f64)]) -> BTreeMap<String, f64> {
    expected.iter().map(|(c, v)| (c.to_string(), *v)).collect()
}

fn seeded(s: &str) -> Result<dice_lang::Outcome, Error> {
    roll_with(s, StdRng::seed_from_u64(42), Limits::default())
}

#[test]
fn d1_throws_are_exact() {
    let outcome = roll("roll 20d1").unwrap();
    assert_eq!(outcome.total, 20.0);
    let dice = &outcome.dice_set.dice[0];
    assert_eq!(dice.faces, vec![1; 20]);
    assert_eq!((dice.min, dice.max), (20, 20));
    assert_eq!(dice.color, "");
    assert_eq!(outcome.dice_set.totals_by_color, colors(&[("", 20.0)]));

    let outcome = roll("roll 20d1 mundane").unwrap();
    assert_eq!(outcome.total, 20.0);
    assert_eq!(outcome.dice_set.dice[0].color, "Mundane");
    assert_eq!(outcome.dice_set.totals_by_color, colors(&[("Mundane", 20.0)]));
}

#[test]
fn colour_groups() {
    let outcome = roll("ROLL (8d1+10)*2+5 mundane + 6d1/2 fire").unwrap();
    assert_eq!(
        outcome.dice_set.totals_by_color,
        colors(&[("Mundane", 41.0), ("Fire", 3.0)])
    );
    assert_eq!(outcome.total, 44.0);

    let outcome = roll("roll (21d1+7)/2 mundane + 4d1 fire").unwrap();
    assert_eq!(
        outcome.dice_set.totals_by_color,
        colors(&[("Mundane", 14.0), ("Fire", 4.0)])
    );

    let outcome = roll("ROLL (8d1+10)*2+5").unwrap();
    assert_eq!(outcome.dice_set.totals_by_color, colors(&[("", 41.0)]));
}

#[test]
fn mixed_colours_are_rejected() {
    let err = roll("20d1 red + 12d1 blue").unwrap_err();
    assert_eq!(err, Error::Eval(EvalError::MixedColors));
    assert_eq!(err.kind(), ErrorKind::Friendly);
    assert_eq!(
        err.to_string(),
        "cannot perform arithmetic on different color dice, try ',' or 'and' instead"
    );
}

#[test]
fn colour_groups_inside_sums() {
    let outcome = roll("20d1 red + 12d1 blue * 1").unwrap();
    assert_eq!(
        outcome.dice_set.totals_by_color,
        colors(&[("Red", 20.0), ("Blue", 12.0)])
    );
    let outcome = roll("1 + 20d1 red + 12d1 blue").unwrap();
    assert_eq!(
        outcome.dice_set.totals_by_color,
        colors(&[("Red", 21.0), ("Blue", 12.0)])
    );
}

#[test]
fn repeated_throws() {
    let outcome = seeded("roll 1d20 rep 5").unwrap();
    assert_eq!(outcome.dice_set.dice.len(), 5);
    for dice in &outcome.dice_set.dice {
        assert_eq!((dice.count, dice.sides), (1, 20));
        assert!((1..=20).contains(&dice.total));
    }
}

#[test]
fn repeat_count_stops_at_combiners() {
    let outcome = seeded("1d20 rep 2, 1d1").unwrap();
    let sides: Vec<i64> = outcome.dice_set.dice.iter().map(|d| d.sides).collect();
    assert_eq!(sides, vec![20, 20, 1]);
    assert_eq!(canonical(&outcome.ast).unwrap(), "1d20, 1d20, 1d1");

    let outcome = seeded("1d20 rep 0").unwrap();
    assert!(outcome.dice_set.dice.is_empty());
    assert_eq!(outcome.text, "1d20() rep 0");
}

#[test]
fn oversized_drops_are_rejected() {
    let err = seeded("3d6-L9223372036854775807-H9223372036854775807").unwrap_err();
    assert_eq!(err, Error::Eval(EvalError::TooManyDropped));
    assert_eq!(err.kind(), ErrorKind::Friendly);
}

#[test]
fn drop_bounds() {
    let check = |s: &str, min: i64, max: i64| {
        let outcome = seeded(s).unwrap();
        let dice = &outcome.dice_set.dice[0];
        assert_eq!((dice.min, dice.max), (min, max), "{:?}", s);
        assert!((min..=max).contains(&dice.total), "{:?}", s);
    };
    check("1d4", 1, 4);
    check("2d4", 2, 8);
    check("2d4-L", 1, 4);
    check("2d4-H", 1, 4);
    check("20d4-H5", 15, 60);
}

#[test]
fn faces_are_filled_in() {
    let outcome = roll("4d1-L1 fire + 2").unwrap();
    assert_eq!(outcome.text, "4d1(1, 1, 1, 1)-L1 Fire + 2");

    let outcome = roll("1d4 if 0 > 1 else 2d1").unwrap();
    assert_eq!(outcome.text, "1d4() if 0 > 1 else 2d1(1, 1)");

    let outcome = roll("2d1 if 1d1 > 0 else 3").unwrap();
    assert_eq!(outcome.text, "2d1(1, 1) if 1d1(1) > 0 else 3");
}

#[test]
fn canonical_form_is_stable() {
    let inputs = [
        "roll 1d20",
        "roll (8d1+10)*2+5 mundane + 6d1/2 fire",
        "4d6-L fire, 1d20 ice and 2d4",
        "2 ^ (3 ^ 2) - -1d4",
        "(1d20 rep three), 2d6",
        "if 1d20 >= 10 { 2d6 fire } else { 1d4 }",
        "1d20 if 1d4 > 2 else 1d6 mod 3",
        "twenty-one d six",
    ];
    for s in inputs {
        let once = canonical(&parse(s).unwrap()).unwrap();
        let twice = canonical(&parse(&once).unwrap()).unwrap();
        assert_eq!(once, twice, "{:?}", s);
    }
}

#[test]
fn colours_are_title_cased() {
    let text = canonical(&parse("1d20 FIRE + 2 fIrE").unwrap()).unwrap();
    assert_eq!(text, "1d20 Fire + 2 Fire");
}

#[test]
fn parser_diagnostics() {
    let err = roll("").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Friendly);
    assert_eq!(
        err.friendly_message().as_deref(),
        Some("zero length command is invalid")
    );

    match roll("roll").unwrap_err() {
        Error::Parse(e) => assert_eq!((e.line, e.column), (1, 5)),
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(roll("1d6 !").unwrap_err().kind(), ErrorKind::InvalidCommand);
}

#[test]
fn limits_reach_the_evaluator() {
    let limits = Limits {
        max_dice: 3,
        ..Limits::default()
    };
    let err = roll_with("4d6", StdRng::seed_from_u64(1), limits).unwrap_err();
    assert_eq!(err.friendly_message().as_deref(), Some("I can't hold that many dice"));
}
