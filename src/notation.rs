//! Dice notation module.
//!
//! Turns strings such as `"3d6+2"`, `"d8"`, `"2d6*10"` or `"2"` into a typed
//! [`Notation`] that can be rolled any number of times without re-parsing.
//!
//! Grammar (whitespace is allowed between tokens but never inside a number,
//! `d` is case-insensitive):
//!
//! ```text
//! notation := term ('*' integer)?
//! term     := count? 'd' sides (('+' | '-') modifier)?
//!           | integer
//! ```
//!
//! The multiplier is split off first; its left-hand side is parsed as a term
//! of its own. [`Notation::parse`] is strict. [`Notation::parse_lenient`],
//! [`parse_dice_notation`] and [`parse_dice_notation_detailed`] turn
//! anything unparseable into a notation that always evaluates to `0`.

use crate::error::{DiceError, NotationError};
use crate::result::{canonical_notation, DiceRollResult, GeneratorResult};
use crate::roller::{self, DieSource};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::warn;

static DICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<count>\d*)\s*[dD]\s*(?P<sides>\d+)\s*(?:(?P<sign>[+-])\s*(?P<modifier>\d+))?$",
    )
    .expect("valid regex")
});
static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\s*\d+$").expect("valid regex"));

/// A validated `NdS±M` dice term.
///
/// # Examples
///
/// ```rust
/// use grimdice::DiceSpec;
///
/// let spec = DiceSpec::new(3, 6, 2).unwrap();
/// assert_eq!(spec.to_string(), "3d6+2");
/// assert_eq!(spec.min(), 5);
/// assert_eq!(spec.max(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiceSpec {
    count: u32,
    sides: u32,
    modifier: i64,
}

impl DiceSpec {
    /// Create a dice term, rejecting impossible dice and totals outside the
    /// `i64` range.
    pub fn new(count: u32, sides: u32, modifier: i64) -> Result<Self, DiceError> {
        roller::validate(sides, count, modifier)?;
        Ok(Self {
            count,
            sides,
            modifier,
        })
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn modifier(&self) -> i64 {
        self.modifier
    }

    /// Lowest possible total.
    pub fn min(&self) -> i64 {
        i64::from(self.count) + self.modifier
    }

    /// Highest possible total.
    pub fn max(&self) -> i64 {
        i64::from(self.count) * i64::from(self.sides) + self.modifier
    }

    /// Roll and return the total.
    pub fn roll<D: DieSource + ?Sized>(&self, dice: &mut D) -> Result<i64, DiceError> {
        roller::roll_dice(dice, self.sides, self.count, self.modifier)
    }

    /// Roll and keep the per-die breakdown.
    pub fn roll_detailed<D: DieSource + ?Sized>(
        &self,
        dice: &mut D,
    ) -> Result<DiceRollResult, DiceError> {
        roller::roll_dice_detailed(dice, self.sides, self.count, self.modifier)
    }
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&canonical_notation(self.count, self.sides, self.modifier))
    }
}

/// The base of a notation: dice, a constant, or unparseable text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A dice roll such as `3d6+2`.
    Dice(DiceSpec),
    /// A fixed value such as `2`.
    Constant(i64),
    /// Text that matched no rule. Always evaluates to `0`.
    Unparseable(String),
}

impl Term {
    fn parse(text: &str) -> Result<Self, NotationError> {
        if let Some(caps) = DICE_RE.captures(text) {
            let count = match &caps["count"] {
                "" => 1,
                digits => parse_number::<u32>(digits, text)?,
            };
            let sides = parse_number::<u32>(&caps["sides"], text)?;
            let modifier = match caps.name("modifier") {
                Some(m) => {
                    let magnitude = parse_number::<i64>(m.as_str(), text)?;
                    if &caps["sign"] == "-" {
                        -magnitude
                    } else {
                        magnitude
                    }
                }
                None => 0,
            };
            return Ok(Term::Dice(DiceSpec::new(count, sides, modifier)?));
        }
        if INTEGER_RE.is_match(text) {
            return Ok(Term::Constant(parse_integer(text, text)?));
        }
        Err(NotationError::Malformed(text.to_string()))
    }

    fn min(&self) -> i64 {
        match self {
            Term::Dice(spec) => spec.min(),
            Term::Constant(n) => *n,
            Term::Unparseable(_) => 0,
        }
    }

    fn max(&self) -> i64 {
        match self {
            Term::Dice(spec) => spec.max(),
            Term::Constant(n) => *n,
            Term::Unparseable(_) => 0,
        }
    }

    /// Evaluate, returning the value and the dice breakdown if any.
    fn evaluate<D: DieSource + ?Sized>(
        &self,
        dice: &mut D,
    ) -> Result<(i64, Option<DiceRollResult>), DiceError> {
        match self {
            Term::Dice(spec) => {
                let result = spec.roll_detailed(dice)?;
                Ok((result.total, Some(result)))
            }
            Term::Constant(n) => Ok((*n, None)),
            Term::Unparseable(_) => Ok((0, None)),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Dice(spec) => write!(f, "{}", spec),
            Term::Constant(n) => write!(f, "{}", n),
            Term::Unparseable(raw) => f.write_str(raw),
        }
    }
}

fn parse_number<T: FromStr>(digits: &str, whole: &str) -> Result<T, NotationError> {
    digits
        .parse()
        .map_err(|_| NotationError::Malformed(whole.to_string()))
}

/// Parse text already matched by `INTEGER_RE`, where whitespace can only
/// sit between the sign and the digits.
fn parse_integer(text: &str, whole: &str) -> Result<i64, NotationError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    parse_number(&compact, whole)
}

/// A parsed dice expression: a term and an optional integer multiplier.
///
/// # Examples
///
/// ```rust
/// use grimdice::{FixedDice, Notation};
///
/// let silver: Notation = "2d6*10".parse().unwrap();
/// let mut dice = FixedDice::new(vec![3, 4]);
/// let result = silver.roll_detailed(&mut dice, "Silver").unwrap();
/// assert_eq!(result.value, 70);
/// assert_eq!(result.formula, "2d6*10 = (7) × 10");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Notation {
    term: Term,
    multiplier: Option<i64>,
}

impl Notation {
    /// Build a notation from a term and optional multiplier.
    pub fn new(term: Term, multiplier: Option<i64>) -> Self {
        Self { term, multiplier }
    }

    /// A plain dice notation.
    pub fn dice(spec: DiceSpec) -> Self {
        Self::new(Term::Dice(spec), None)
    }

    /// A constant notation.
    pub fn constant(value: i64) -> Self {
        Self::new(Term::Constant(value), None)
    }

    /// Strictly parse a notation string.
    ///
    /// # Errors
    ///
    /// [`NotationError::Empty`] for blank input,
    /// [`NotationError::Malformed`] when nothing matches and
    /// [`NotationError::Dice`] for impossible dice such as `0d6`, `2d1` or a
    /// modifier that pushes the total past `i64::MAX`.
    pub fn parse(input: &str) -> Result<Self, NotationError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(NotationError::Empty);
        }

        match text.split_once('*') {
            Some((lhs, rhs)) => {
                let rhs = rhs.trim();
                if !INTEGER_RE.is_match(rhs) {
                    return Err(NotationError::Malformed(text.to_string()));
                }
                let multiplier = parse_integer(rhs, text)?;
                Ok(Self::new(Term::parse(lhs.trim())?, Some(multiplier)))
            }
            None => Ok(Self::new(Term::parse(text)?, None)),
        }
    }

    /// Parse a notation, turning failures into a zero-valued notation.
    ///
    /// Malformed content silently becomes `0` this way, so every fallback is
    /// logged at `warn`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use grimdice::{Notation, Term};
    ///
    /// let notation = Notation::parse_lenient("garbage");
    /// assert!(!notation.is_valid());
    /// assert_eq!(notation.term(), &Term::Unparseable("garbage".to_string()));
    /// ```
    pub fn parse_lenient(input: &str) -> Self {
        Self::parse(input).unwrap_or_else(|err| {
            warn!(notation = input, error = %err, "unparseable dice notation, using 0");
            Self::new(Term::Unparseable(input.trim().to_string()), None)
        })
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn multiplier(&self) -> Option<i64> {
        self.multiplier
    }

    /// Whether this notation came from parseable text.
    pub fn is_valid(&self) -> bool {
        !matches!(self.term, Term::Unparseable(_))
    }

    /// Lowest possible value.
    pub fn min(&self) -> i64 {
        self.bounds().0
    }

    /// Highest possible value.
    pub fn max(&self) -> i64 {
        self.bounds().1
    }

    fn bounds(&self) -> (i64, i64) {
        let (lo, hi) = (self.term.min(), self.term.max());
        match self.multiplier {
            Some(k) => {
                let (a, b) = (lo.saturating_mul(k), hi.saturating_mul(k));
                (a.min(b), a.max(b))
            }
            None => (lo, hi),
        }
    }

    /// Roll and return the value only.
    pub fn roll<D: DieSource + ?Sized>(&self, dice: &mut D) -> Result<i64, DiceError> {
        let (base, _) = self.term.evaluate(dice)?;
        Ok(self.apply_multiplier(base))
    }

    /// Roll and return the value with its rolls and formula.
    pub fn roll_detailed<D: DieSource + ?Sized>(
        &self,
        dice: &mut D,
        label: &str,
    ) -> Result<GeneratorResult, DiceError> {
        let (base, roll) = self.term.evaluate(dice)?;
        let value = self.apply_multiplier(base);
        let formula = match (&self.term, self.multiplier) {
            (Term::Unparseable(raw), _) => format!("{} (unparseable) = 0", raw),
            (term, Some(k)) => format!("{}*{} = ({}) × {}", term, k, base, k),
            (term, None) => term.to_string(),
        };
        Ok(GeneratorResult::new(
            value,
            roll.into_iter().collect(),
            formula,
            label,
        ))
    }

    fn apply_multiplier(&self, base: i64) -> i64 {
        match self.multiplier {
            Some(k) => base.saturating_mul(k),
            None => base,
        }
    }
}

impl FromStr for Notation {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Notation::parse(s)
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.multiplier {
            Some(k) => write!(f, "{}*{}", self.term, k),
            None => write!(f, "{}", self.term),
        }
    }
}

/// Parse and roll a notation, returning the value only.
///
/// Unparseable input evaluates to `0`.
///
/// # Examples
///
/// ```rust
/// use grimdice::{parse_dice_notation, Roller};
///
/// let mut roller = Roller::from_seed(3);
/// assert_eq!(parse_dice_notation(&mut roller, "5"), 5);
/// assert_eq!(parse_dice_notation(&mut roller, "garbage"), 0);
/// let hp = parse_dice_notation(&mut roller, "d8");
/// assert!((1..=8).contains(&hp));
/// ```
pub fn parse_dice_notation<D: DieSource + ?Sized>(dice: &mut D, notation: &str) -> i64 {
    Notation::parse_lenient(notation)
        .roll(dice)
        .unwrap_or_else(|err| {
            warn!(notation, error = %err, "dice notation could not be rolled, using 0");
            0
        })
}

/// Parse and roll a notation, returning the full breakdown labelled `label`.
///
/// Unparseable input yields value `0` with no rolls.
pub fn parse_dice_notation_detailed<D: DieSource + ?Sized>(
    dice: &mut D,
    notation: &str,
    label: &str,
) -> GeneratorResult {
    let parsed = Notation::parse_lenient(notation);
    parsed.roll_detailed(dice, label).unwrap_or_else(|err| {
        warn!(notation, error = %err, "dice notation could not be rolled, using 0");
        GeneratorResult::new(0, Vec::new(), format!("{} (unparseable) = 0", parsed), label)
    })
}
