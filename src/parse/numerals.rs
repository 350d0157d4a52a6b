//! Natural-language numerals ("twenty", "four hundred two").
//!
//! The lexer only needs to know whether a word can take part in a numeral and
//! what a run of such words adds up to, so the table is hidden behind
//! [`Numerals`] and other languages can be plugged in.

/// Converts number words to integers.
pub trait Numerals: Send + Sync {
    /// Whether `word` can appear in a numeral phrase.
    fn is_numeral(&self, word: &str) -> bool;

    /// The value of a complete phrase, or `None` if the words do not form a number.
    fn convert(&self, words: &[&str]) -> Option<i64>;

    /// Whether `left-right` is a single hyphenated numeral.
    fn joins_hyphenated(&self, _left: &str, _right: &str) -> bool {
        false
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Word {
    Unit(i64),
    Teen(i64),
    Tens(i64),
    Hundred,
    Scale(i64),
}

/// English cardinal numbers up to the millions.
#[derive(Debug, Default, Copy, Clone)]
pub struct English;

impl English {
    fn classify(word: &str) -> Option<Word> {
        use Word::*;

        Some(match word.to_ascii_lowercase().as_str() {
            "zero" => Unit(0),
            "one" => Unit(1),
            "two" => Unit(2),
            "three" => Unit(3),
            "four" => Unit(4),
            "five" => Unit(5),
            "six" => Unit(6),
            "seven" => Unit(7),
            "eight" => Unit(8),
            "nine" => Unit(9),
            "ten" => Teen(10),
            "eleven" => Teen(11),
            "twelve" => Teen(12),
            "thirteen" => Teen(13),
            "fourteen" => Teen(14),
            "fifteen" => Teen(15),
            "sixteen" => Teen(16),
            "seventeen" => Teen(17),
            "eighteen" => Teen(18),
            "nineteen" => Teen(19),
            "twenty" => Tens(20),
            "thirty" => Tens(30),
            "forty" => Tens(40),
            "fifty" => Tens(50),
            "sixty" => Tens(60),
            "seventy" => Tens(70),
            "eighty" => Tens(80),
            "ninety" => Tens(90),
            "hundred" => Hundred,
            "thousand" => Scale(1_000),
            "million" => Scale(1_000_000),
            _ => return None,
        })
    }
}

impl Numerals for English {
    fn is_numeral(&self, word: &str) -> bool {
        Self::classify(word).is_some()
    }

    fn convert(&self, words: &[&str]) -> Option<i64> {
        use Word::*;

        if words.is_empty() {
            return None;
        }

        let mut total: i64 = 0;
        let mut group: i64 = 0;
        let mut last: Option<Word> = None;

        for word in words {
            let kind = Self::classify(word)?;
            match kind {
                Unit(v) => {
                    if matches!(last, Some(Unit(_) | Teen(_))) {
                        return None;
                    }
                    group += v;
                }
                Teen(v) | Tens(v) => {
                    if matches!(last, Some(Unit(_) | Teen(_) | Tens(_))) {
                        return None;
                    }
                    group += v;
                }
                Hundred => {
                    if matches!(last, Some(Hundred)) || group >= 100 {
                        return None;
                    }
                    group = group.max(1) * 100;
                }
                Scale(scale) => {
                    if matches!(last, Some(Scale(_))) {
                        return None;
                    }
                    total = total.checked_add(group.max(1).checked_mul(scale)?)?;
                    group = 0;
                }
            }
            last = Some(kind);
        }

        total.checked_add(group)
    }

    fn joins_hyphenated(&self, left: &str, right: &str) -> bool {
        matches!(
            (Self::classify(left), Self::classify(right)),
            (Some(Word::Tens(_)), Some(Word::Unit(1..=9)))
        )
    }
}
