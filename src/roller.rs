//! Dice roller module.
//!
//! Every roll draws its faces from a [`DieSource`]. Production code uses
//! [`Roller`], a seedable wrapper around `rand`'s `StdRng`; tests and
//! replays use [`FixedDice`], which hands out a scripted sequence of faces.
//!
//! Two flavours of every roll exist: a total-only one ([`roll_dice`]) and a
//! detailed one ([`roll_dice_detailed`]) that keeps each face in draw order.

use crate::error::DiceError;
use crate::result::DiceRollResult;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Upper bound on the number of dice in a single roll.
pub const MAX_DICE: u32 = 1000;

/// A source of individual die faces.
///
/// Implementations must return a value in `1..=sides` for any
/// `sides >= 2`. Callers in this crate validate `sides` before asking.
///
/// # Examples
///
/// ```rust
/// use grimdice::{DieSource, Roller};
///
/// let mut roller = Roller::from_seed(7);
/// let face = roller.roll_die(20);
/// assert!((1..=20).contains(&face));
/// ```
pub trait DieSource {
    /// Draw one face of a die with `sides` faces.
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<D: DieSource + ?Sized> DieSource for &mut D {
    fn roll_die(&mut self, sides: u32) -> u32 {
        (**self).roll_die(sides)
    }
}

/// Uniform die source backed by a seedable RNG.
#[derive(Debug, Clone)]
pub struct Roller {
    rng: StdRng,
}

impl Roller {
    /// Create a roller seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a reproducible roller.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use grimdice::{DieSource, Roller};
    ///
    /// let mut a = Roller::from_seed(42);
    /// let mut b = Roller::from_seed(42);
    /// assert_eq!(a.roll_die(6), b.roll_die(6));
    /// ```
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for Roller {
    fn default() -> Self {
        Self::new()
    }
}

impl DieSource for Roller {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.rng.random_range(1..=sides)
    }
}

/// Scripted die source that replays a fixed list of faces.
///
/// Faces are handed out in order and the script wraps around when
/// exhausted. A scripted face larger than the die is wrapped into range
/// (`9` on a d8 reads as `1`) so results always respect the die size.
/// An empty script always rolls `1`.
///
/// # Examples
///
/// ```rust
/// use grimdice::{DieSource, FixedDice};
///
/// let mut dice = FixedDice::new(vec![3, 5]);
/// assert_eq!(dice.roll_die(6), 3);
/// assert_eq!(dice.roll_die(6), 5);
/// assert_eq!(dice.roll_die(6), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixedDice {
    faces: Vec<u32>,
    next: usize,
}

impl FixedDice {
    /// Create a scripted source from a face sequence.
    pub fn new(faces: Vec<u32>) -> Self {
        Self { faces, next: 0 }
    }

    /// Number of faces handed out so far.
    pub fn draws(&self) -> usize {
        self.next
    }
}

impl DieSource for FixedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        if self.faces.is_empty() || sides == 0 {
            self.next += 1;
            return 1;
        }
        let face = self.faces[self.next % self.faces.len()];
        self.next += 1;
        (face.max(1) - 1) % sides + 1
    }
}

/// Reject impossible dice and totals that would not fit in an `i64`.
pub(crate) fn validate(sides: u32, count: u32, modifier: i64) -> Result<(), DiceError> {
    if sides < 2 {
        return Err(DiceError::InvalidSides { sides });
    }
    if count == 0 || count > MAX_DICE {
        return Err(DiceError::InvalidCount { count });
    }
    let highest = i64::from(count).checked_mul(i64::from(sides));
    let lowest = i64::from(count).checked_add(modifier);
    match (highest.and_then(|h| h.checked_add(modifier)), lowest) {
        (Some(_), Some(_)) => Ok(()),
        _ => Err(DiceError::Overflow {
            count,
            sides,
            modifier,
        }),
    }
}

/// Roll `count` dice with `sides` faces and add `modifier`.
///
/// # Errors
///
/// Returns [`DiceError`] when `sides < 2`, `count` is outside
/// `1..=MAX_DICE` or the total could overflow an `i64`.
///
/// # Examples
///
/// ```rust
/// use grimdice::{roll_dice, FixedDice};
///
/// let mut dice = FixedDice::new(vec![2, 4, 6]);
/// assert_eq!(roll_dice(&mut dice, 6, 3, 2).unwrap(), 14);
/// ```
pub fn roll_dice<D: DieSource + ?Sized>(
    dice: &mut D,
    sides: u32,
    count: u32,
    modifier: i64,
) -> Result<i64, DiceError> {
    validate(sides, count, modifier)?;
    let subtotal: i64 = (0..count).map(|_| i64::from(dice.roll_die(sides))).sum();
    let total = subtotal.checked_add(modifier).ok_or(DiceError::Overflow {
        count,
        sides,
        modifier,
    })?;
    trace!(sides, count, modifier, total, "rolled dice");
    Ok(total)
}

/// Roll like [`roll_dice`] but keep every face in draw order.
///
/// # Errors
///
/// Same conditions as [`roll_dice`].
///
/// # Examples
///
/// ```rust
/// use grimdice::{roll_dice_detailed, FixedDice};
///
/// let mut dice = FixedDice::new(vec![5, 1]);
/// let result = roll_dice_detailed(&mut dice, 6, 2, -1).unwrap();
/// assert_eq!(result.rolls, vec![5, 1]);
/// assert_eq!(result.total, 5);
/// assert_eq!(result.notation, "2d6-1");
/// ```
pub fn roll_dice_detailed<D: DieSource + ?Sized>(
    dice: &mut D,
    sides: u32,
    count: u32,
    modifier: i64,
) -> Result<DiceRollResult, DiceError> {
    validate(sides, count, modifier)?;
    let rolls: Vec<u32> = (0..count).map(|_| dice.roll_die(sides)).collect();
    let result = DiceRollResult::from_rolls(rolls, sides, modifier);
    trace!(
        notation = %result.notation,
        total = result.total,
        "rolled dice with breakdown"
    );
    Ok(result)
}

/// Roll a single d2.
pub fn roll_d2<D: DieSource + ?Sized>(dice: &mut D) -> u32 {
    dice.roll_die(2)
}

/// Roll a single d6.
pub fn roll_d6<D: DieSource + ?Sized>(dice: &mut D) -> u32 {
    dice.roll_die(6)
}

/// Roll a single d8.
pub fn roll_d8<D: DieSource + ?Sized>(dice: &mut D) -> u32 {
    dice.roll_die(8)
}

/// Roll a single d10.
pub fn roll_d10<D: DieSource + ?Sized>(dice: &mut D) -> u32 {
    dice.roll_die(10)
}

/// Roll a single d20.
pub fn roll_d20<D: DieSource + ?Sized>(dice: &mut D) -> u32 {
    dice.roll_die(20)
}

/// Roll 3d6 and add `modifier`, the classic ability roll.
pub fn roll_3d6<D: DieSource + ?Sized>(dice: &mut D, modifier: i64) -> i64 {
    let subtotal: i64 = (0..3).map(|_| i64::from(dice.roll_die(6))).sum();
    subtotal.saturating_add(modifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_dice_sums_faces_and_modifier() {
        let mut dice = FixedDice::new(vec![1, 2, 3]);
        assert_eq!(roll_dice(&mut dice, 6, 3, 0).unwrap(), 6);
        assert_eq!(roll_dice(&mut dice, 6, 3, -4).unwrap(), 2);
    }

    #[test]
    fn test_roll_dice_rejects_bad_dice() {
        let mut dice = FixedDice::default();
        assert_eq!(
            roll_dice(&mut dice, 1, 1, 0),
            Err(DiceError::InvalidSides { sides: 1 })
        );
        assert_eq!(
            roll_dice(&mut dice, 6, 0, 0),
            Err(DiceError::InvalidCount { count: 0 })
        );
        assert_eq!(
            roll_dice(&mut dice, 6, MAX_DICE + 1, 0),
            Err(DiceError::InvalidCount { count: MAX_DICE + 1 })
        );
        assert_eq!(dice.draws(), 0);
    }

    #[test]
    fn test_roll_dice_rejects_overflowing_modifier() {
        let mut dice = FixedDice::new(vec![3]);
        let overflow = DiceError::Overflow {
            count: 1,
            sides: 6,
            modifier: i64::MAX,
        };
        assert_eq!(roll_dice(&mut dice, 6, 1, i64::MAX), Err(overflow.clone()));
        assert_eq!(roll_dice_detailed(&mut dice, 6, 1, i64::MAX), Err(overflow));
        assert_eq!(dice.draws(), 0);

        // Largest modifier that still fits at the top of the range.
        let edge = i64::MAX - 6;
        assert_eq!(roll_dice(&mut dice, 6, 1, edge).unwrap(), edge + 3);
        assert_eq!(roll_dice(&mut dice, 6, 2, i64::MIN).unwrap(), i64::MIN + 6);
        assert_eq!(roll_3d6(&mut dice, i64::MAX), i64::MAX);
    }

    #[test]
    fn test_default_roller_rolls_in_range() {
        let mut roller = Roller::default();
        assert!((1..=6).contains(&roller.roll_die(6)));
    }

    #[test]
    fn test_detailed_preserves_draw_order() {
        let mut dice = FixedDice::new(vec![6, 1, 4]);
        let result = roll_dice_detailed(&mut dice, 6, 3, 2).unwrap();
        assert_eq!(result.rolls, vec![6, 1, 4]);
        assert_eq!(result.subtotal, 11);
        assert_eq!(result.total, 13);
        assert_eq!(result.notation, "3d6+2");
    }

    #[test]
    fn test_detailed_and_total_agree_on_same_faces() {
        let faces = vec![3, 8, 2, 7];
        let total = roll_dice(&mut FixedDice::new(faces.clone()), 8, 4, 1).unwrap();
        let detailed = roll_dice_detailed(&mut FixedDice::new(faces), 8, 4, 1).unwrap();
        assert_eq!(total, detailed.total);
    }

    #[test]
    fn test_fixed_dice_wraps_into_range() {
        let mut dice = FixedDice::new(vec![9, 0, 16]);
        assert_eq!(dice.roll_die(8), 1);
        assert_eq!(dice.roll_die(8), 1);
        assert_eq!(dice.roll_die(8), 8);
    }

    #[test]
    fn test_seeded_roller_is_reproducible() {
        let mut a = Roller::from_seed(1234);
        let mut b = Roller::from_seed(1234);
        let left: Vec<u32> = (0..20).map(|_| a.roll_die(20)).collect();
        let right: Vec<u32> = (0..20).map(|_| b.roll_die(20)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_roller_bounds() {
        let mut roller = Roller::new();
        for sides in [2, 6, 8, 10, 20, 100] {
            for _ in 0..200 {
                let face = roller.roll_die(sides);
                assert!(face >= 1 && face <= sides, "d{} rolled {}", sides, face);
            }
        }
    }

    #[test]
    fn test_convenience_dice() {
        let mut roller = Roller::from_seed(9);
        for _ in 0..100 {
            assert!((1..=2).contains(&roll_d2(&mut roller)));
            assert!((1..=6).contains(&roll_d6(&mut roller)));
            assert!((1..=8).contains(&roll_d8(&mut roller)));
            assert!((1..=10).contains(&roll_d10(&mut roller)));
            assert!((1..=20).contains(&roll_d20(&mut roller)));
            assert!((5..=20).contains(&roll_3d6(&mut roller, 2)));
        }
    }
}
