//! Ability scores and the score-to-modifier table.
//!
//! Characters have four abilities. A raw score maps to a modifier through
//! a fixed step table (see [`ability_score_to_modifier`]); modifiers are
//! always displayed with an explicit sign (see [`format_modifier`]).

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four character abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Agility,
    Presence,
    Toughness,
}

impl Ability {
    /// All abilities in sheet order.
    pub const ALL: [Ability; 4] = [
        Ability::Strength,
        Ability::Agility,
        Ability::Presence,
        Ability::Toughness,
    ];

    /// Display name, e.g. `Strength`.
    pub fn label(self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Agility => "Agility",
            Ability::Presence => "Presence",
            Ability::Toughness => "Toughness",
        }
    }

    /// Three-letter sheet abbreviation, e.g. `STR`.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Agility => "AGI",
            Ability::Presence => "PRE",
            Ability::Toughness => "TGH",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A complete block of ability scores.
///
/// # Examples
///
/// ```rust
/// use grimdice::{Abilities, Ability};
///
/// let abilities = Abilities::new(10, 14, 7, 16);
/// assert_eq!(abilities.get(Ability::Agility), 14);
/// assert_eq!(abilities.modifier(Ability::Toughness), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Abilities {
    pub strength: i64,
    pub agility: i64,
    pub presence: i64,
    pub toughness: i64,
}

impl Abilities {
    pub fn new(strength: i64, agility: i64, presence: i64, toughness: i64) -> Self {
        Self {
            strength,
            agility,
            presence,
            toughness,
        }
    }

    /// Raw score for one ability.
    pub fn get(&self, ability: Ability) -> i64 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Agility => self.agility,
            Ability::Presence => self.presence,
            Ability::Toughness => self.toughness,
        }
    }

    /// Overwrite one ability score.
    pub fn set(&mut self, ability: Ability, score: i64) {
        match ability {
            Ability::Strength => self.strength = score,
            Ability::Agility => self.agility = score,
            Ability::Presence => self.presence = score,
            Ability::Toughness => self.toughness = score,
        }
    }

    /// Table modifier for one ability.
    pub fn modifier(&self, ability: Ability) -> i64 {
        ability_score_to_modifier(self.get(ability))
    }
}

/// A score slot that may not have been rolled or entered yet.
///
/// Serializes as `null` when unset and as the integer otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum AbilityScore {
    #[default]
    Unset,
    Rolled(i64),
}

impl AbilityScore {
    pub fn value(self) -> Option<i64> {
        match self {
            AbilityScore::Unset => None,
            AbilityScore::Rolled(score) => Some(score),
        }
    }

    pub fn is_set(self) -> bool {
        matches!(self, AbilityScore::Rolled(_))
    }

    /// Table modifier, if a score is present.
    pub fn modifier(self) -> Option<i64> {
        self.value().map(ability_score_to_modifier)
    }
}

impl From<Option<i64>> for AbilityScore {
    fn from(value: Option<i64>) -> Self {
        value.map_or(AbilityScore::Unset, AbilityScore::Rolled)
    }
}

impl From<AbilityScore> for Option<i64> {
    fn from(score: AbilityScore) -> Self {
        score.value()
    }
}

/// Ability scores being filled in during character creation.
///
/// # Examples
///
/// ```rust
/// use grimdice::{Ability, DraftAbilities};
///
/// let mut draft = DraftAbilities::default();
/// draft.set(Ability::Strength, 12);
/// assert!(!draft.is_complete());
/// assert_eq!(draft.complete(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DraftAbilities {
    pub strength: AbilityScore,
    pub agility: AbilityScore,
    pub presence: AbilityScore,
    pub toughness: AbilityScore,
}

impl DraftAbilities {
    pub fn get(&self, ability: Ability) -> AbilityScore {
        match ability {
            Ability::Strength => self.strength,
            Ability::Agility => self.agility,
            Ability::Presence => self.presence,
            Ability::Toughness => self.toughness,
        }
    }

    pub fn set(&mut self, ability: Ability, score: i64) {
        let slot = match ability {
            Ability::Strength => &mut self.strength,
            Ability::Agility => &mut self.agility,
            Ability::Presence => &mut self.presence,
            Ability::Toughness => &mut self.toughness,
        };
        *slot = AbilityScore::Rolled(score);
    }

    pub fn clear(&mut self, ability: Ability) {
        match ability {
            Ability::Strength => self.strength = AbilityScore::Unset,
            Ability::Agility => self.agility = AbilityScore::Unset,
            Ability::Presence => self.presence = AbilityScore::Unset,
            Ability::Toughness => self.toughness = AbilityScore::Unset,
        }
    }

    pub fn is_complete(&self) -> bool {
        Ability::ALL.iter().all(|&ability| self.get(ability).is_set())
    }

    /// All four scores, or `None` while any slot is unset.
    pub fn complete(&self) -> Option<Abilities> {
        Some(Abilities {
            strength: self.strength.value()?,
            agility: self.agility.value()?,
            presence: self.presence.value()?,
            toughness: self.toughness.value()?,
        })
    }
}

impl From<Abilities> for DraftAbilities {
    fn from(abilities: Abilities) -> Self {
        Self {
            strength: AbilityScore::Rolled(abilities.strength),
            agility: AbilityScore::Rolled(abilities.agility),
            presence: AbilityScore::Rolled(abilities.presence),
            toughness: AbilityScore::Rolled(abilities.toughness),
        }
    }
}

/// Map a raw ability score to its modifier.
///
/// | Score | Modifier |
/// |---|---|
/// | ≤4 | −3 |
/// | 5–6 | −2 |
/// | 7–8 | −1 |
/// | 9–12 | 0 |
/// | 13–14 | +1 |
/// | 15–16 | +2 |
/// | 17–18 | +3 |
/// | 19–20 | +4 |
/// | 21–22 | +5 |
/// | ≥23 | +6 |
///
/// Total over all integers.
///
/// # Examples
///
/// ```rust
/// use grimdice::ability_score_to_modifier;
///
/// assert_eq!(ability_score_to_modifier(3), -3);
/// assert_eq!(ability_score_to_modifier(10), 0);
/// assert_eq!(ability_score_to_modifier(18), 3);
/// ```
pub fn ability_score_to_modifier(score: i64) -> i64 {
    match score {
        i64::MIN..=4 => -3,
        5..=6 => -2,
        7..=8 => -1,
        9..=12 => 0,
        13..=14 => 1,
        15..=16 => 2,
        17..=18 => 3,
        19..=20 => 4,
        21..=22 => 5,
        _ => 6,
    }
}

/// Render a modifier with an explicit sign: `+0`, `+3`, `-2`.
pub fn format_modifier(modifier: i64) -> String {
    if modifier >= 0 {
        format!("+{}", modifier)
    } else {
        modifier.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_table_boundaries() {
        let cases = [
            (i64::MIN, -3),
            (-5, -3),
            (1, -3),
            (4, -3),
            (5, -2),
            (6, -2),
            (7, -1),
            (8, -1),
            (9, 0),
            (12, 0),
            (13, 1),
            (14, 1),
            (15, 2),
            (16, 2),
            (17, 3),
            (18, 3),
            (19, 4),
            (20, 4),
            (21, 5),
            (22, 5),
            (23, 6),
            (100, 6),
            (i64::MAX, 6),
        ];
        for (score, expected) in cases {
            assert_eq!(ability_score_to_modifier(score), expected, "score {}", score);
        }
    }

    #[test]
    fn test_format_modifier() {
        assert_eq!(format_modifier(0), "+0");
        assert_eq!(format_modifier(3), "+3");
        assert_eq!(format_modifier(-2), "-2");
    }

    #[test]
    fn test_abilities_get_set() {
        let mut abilities = Abilities::default();
        for (i, ability) in Ability::ALL.into_iter().enumerate() {
            abilities.set(ability, i as i64 + 10);
        }
        assert_eq!(abilities, Abilities::new(10, 11, 12, 13));
        assert_eq!(abilities.modifier(Ability::Toughness), 1);
    }

    #[test]
    fn test_draft_completion() {
        let mut draft = DraftAbilities::default();
        assert_eq!(draft.get(Ability::Presence), AbilityScore::Unset);
        assert_eq!(draft.get(Ability::Presence).modifier(), None);

        for ability in Ability::ALL {
            draft.set(ability, 9);
        }
        assert!(draft.is_complete());
        assert_eq!(draft.complete(), Some(Abilities::new(9, 9, 9, 9)));

        draft.clear(Ability::Agility);
        assert!(!draft.is_complete());
        assert_eq!(draft.complete(), None);
    }

    #[test]
    fn test_draft_from_abilities() {
        let draft = DraftAbilities::from(Abilities::new(3, 8, 13, 20));
        assert_eq!(draft.toughness.modifier(), Some(4));
        assert_eq!(draft.complete(), Some(Abilities::new(3, 8, 13, 20)));
    }

    #[test]
    fn test_ability_score_serde() {
        let mut draft = DraftAbilities::default();
        draft.set(Ability::Strength, 14);
        let json = serde_json::to_value(draft).unwrap();
        assert_eq!(json["strength"], 14);
        assert!(json["agility"].is_null());

        let back: DraftAbilities = serde_json::from_value(json).unwrap();
        assert_eq!(back, draft);
    }

    #[test]
    fn test_ability_labels() {
        assert_eq!(Ability::Strength.to_string(), "Strength");
        assert_eq!(Ability::Toughness.abbreviation(), "TGH");
        assert_eq!(
            serde_json::to_value(Ability::Presence).unwrap(),
            serde_json::json!("presence")
        );
    }
}
