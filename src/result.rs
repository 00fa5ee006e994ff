//! Roll result module.
//!
//! Contains [`DiceRollResult`], the breakdown of a single executed dice
//! term, and [`GeneratorResult`], a resolved stat together with the rolls
//! and the formula that produced it. Both are plain values: created fresh
//! per roll, never mutated, serializable for display layers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one executed dice term.
///
/// `rolls` keeps the faces in the order they were drawn.
///
/// # Examples
///
/// ```rust
/// use grimdice::DiceRollResult;
///
/// let result = DiceRollResult::from_rolls(vec![4, 2, 6], 6, 2);
/// assert_eq!(result.count, 3);
/// assert_eq!(result.subtotal, 12);
/// assert_eq!(result.total, 14);
/// assert_eq!(result.notation, "3d6+2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRollResult {
    /// Individual faces in draw order.
    pub rolls: Vec<u32>,
    /// Die size.
    pub sides: u32,
    /// Number of dice rolled.
    pub count: u32,
    /// Flat adjustment added after summing the faces.
    pub modifier: i64,
    /// Sum of `rolls`.
    pub subtotal: i64,
    /// `subtotal + modifier`.
    pub total: i64,
    /// Canonical notation, e.g. `3d6+2` or `1d8`.
    pub notation: String,
}

impl DiceRollResult {
    /// Build a result from already drawn faces.
    ///
    /// `count`, `subtotal`, `total` and `notation` are derived from the
    /// arguments so the invariants between them always hold. A total that
    /// would leave the `i64` range saturates; the roller rejects such dice
    /// before drawing.
    pub fn from_rolls(rolls: Vec<u32>, sides: u32, modifier: i64) -> Self {
        let count = rolls.len() as u32;
        let subtotal: i64 = rolls.iter().map(|&face| i64::from(face)).sum();
        Self {
            notation: canonical_notation(count, sides, modifier),
            rolls,
            sides,
            count,
            modifier,
            subtotal,
            total: subtotal.saturating_add(modifier),
        }
    }

    /// Highest face rolled, if any.
    pub fn highest(&self) -> Option<u32> {
        self.rolls.iter().copied().max()
    }

    /// Lowest face rolled, if any.
    pub fn lowest(&self) -> Option<u32> {
        self.rolls.iter().copied().min()
    }
}

impl fmt::Display for DiceRollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces = self
            .rolls
            .iter()
            .map(|face| face.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} [{}] = {}", self.notation, faces, self.total)
    }
}

/// Canonical `NdS[+M|-M]` label. A zero modifier is omitted.
pub(crate) fn canonical_notation(count: u32, sides: u32, modifier: i64) -> String {
    match modifier {
        0 => format!("{}d{}", count, sides),
        m if m > 0 => format!("{}d{}+{}", count, sides, m),
        m => format!("{}d{}{}", count, sides, m),
    }
}

/// A named stat value with the rolls and formula behind it.
///
/// # Examples
///
/// ```rust
/// use grimdice::{DiceRollResult, GeneratorResult};
///
/// let roll = DiceRollResult::from_rolls(vec![5], 8, 0);
/// let result = GeneratorResult::new(6, vec![roll], "1d8 +1", "Hit Points");
/// assert_eq!(result.value, 6);
/// assert_eq!(result.rolls.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorResult {
    /// Final stat value after any multiplier or external modifier.
    pub value: i64,
    /// Dice terms rolled to produce `value`, in roll order.
    pub rolls: Vec<DiceRollResult>,
    /// Human-readable derivation, e.g. `2d6*10 = (7) × 10`.
    pub formula: String,
    /// Which stat this is, e.g. `Strength` or `Silver`.
    pub description: String,
}

impl GeneratorResult {
    /// Create a new `GeneratorResult`.
    pub fn new(
        value: i64,
        rolls: Vec<DiceRollResult>,
        formula: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            value,
            rolls,
            formula: formula.into(),
            description: description.into(),
        }
    }

    /// Replace the description label.
    pub fn labelled(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl fmt::Display for GeneratorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.description, self.value, self.formula)
    }
}
