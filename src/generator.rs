//! Class-driven stat generator.
//!
//! [`StatGenerator`] rolls a class's pre-parsed formulas against a
//! [`DieSource`]. Every stat has a terse variant returning the number and a
//! detailed variant returning a [`GeneratorResult`] for display.
//!
//! Unknown class ids are always an error; the generator never substitutes
//! a default class.

use crate::ability::{ability_score_to_modifier, format_modifier, Abilities, Ability};
use crate::content::{ClassEntry, ContentRepository};
use crate::error::GeneratorError;
use crate::result::GeneratorResult;
use crate::roller::{roll_d2, roll_d6, DieSource};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Label used for hit point results.
pub const HIT_POINTS: &str = "Hit Points";
/// Label used for omen results.
pub const OMENS: &str = "Omens";
/// Label used for silver results.
pub const SILVER: &str = "Silver";

/// Everything rolled for a fresh character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartingStats {
    pub abilities: Abilities,
    pub max_hp: i64,
    pub max_omens: i64,
    pub silver: i64,
}

/// Rolls class stats and random table entries.
///
/// # Examples
///
/// ```rust
/// use grimdice::{ContentRepository, NotationPolicy, Roller, StatGenerator};
///
/// let json = r#"{"classes": [{
///     "id": "wretch", "name": "Wretch",
///     "abilityRolls": {"strength": "3d6", "agility": "3d6",
///                      "presence": "3d6", "toughness": "3d6"},
///     "hitDie": "d8", "startingOmens": "d2", "startingSilver": "2d6*10"
/// }]}"#;
/// let content = ContentRepository::from_json(json, NotationPolicy::Strict).unwrap();
/// let mut generator = StatGenerator::new(&content, Roller::from_seed(1));
///
/// let silver = generator.generate_silver_from_class("wretch").unwrap();
/// assert_eq!(silver % 10, 0);
/// assert!(generator.generate_omens_from_class("nobody").is_err());
/// ```
pub struct StatGenerator<'a, D: DieSource> {
    content: &'a ContentRepository,
    dice: D,
}

impl<'a, D: DieSource> StatGenerator<'a, D> {
    pub fn new(content: &'a ContentRepository, dice: D) -> Self {
        Self { content, dice }
    }

    pub fn content(&self) -> &'a ContentRepository {
        self.content
    }

    /// The die source, e.g. to inspect a scripted source in tests.
    pub fn dice(&self) -> &D {
        &self.dice
    }

    /// Give back the die source.
    pub fn into_dice(self) -> D {
        self.dice
    }

    fn class(&self, class_id: &str) -> Result<&'a ClassEntry, GeneratorError> {
        self.content
            .class(class_id)
            .ok_or_else(|| GeneratorError::ClassNotFound(class_id.to_string()))
    }

    /// Roll all four abilities of a class, each independently.
    pub fn generate_abilities_from_class(
        &mut self,
        class_id: &str,
    ) -> Result<Abilities, GeneratorError> {
        let formulas = &self.class(class_id)?.formulas;
        let abilities = Abilities {
            strength: formulas.strength.roll(&mut self.dice)?,
            agility: formulas.agility.roll(&mut self.dice)?,
            presence: formulas.presence.roll(&mut self.dice)?,
            toughness: formulas.toughness.roll(&mut self.dice)?,
        };
        debug!(class_id, ?abilities, "generated abilities");
        Ok(abilities)
    }

    /// Roll the class hit die and add an already computed toughness modifier.
    ///
    /// The modifier is added as is; look it up with
    /// [`ability_score_to_modifier`] first.
    pub fn generate_hp_from_class(
        &mut self,
        class_id: &str,
        toughness_modifier: i64,
    ) -> Result<i64, GeneratorError> {
        let formulas = &self.class(class_id)?.formulas;
        let hp = formulas
            .hit_die
            .roll(&mut self.dice)?
            .saturating_add(toughness_modifier);
        debug!(class_id, toughness_modifier, hp, "generated hit points");
        Ok(hp)
    }

    pub fn generate_omens_from_class(&mut self, class_id: &str) -> Result<i64, GeneratorError> {
        let formulas = &self.class(class_id)?.formulas;
        let omens = formulas.starting_omens.roll(&mut self.dice)?;
        debug!(class_id, omens, "generated omens");
        Ok(omens)
    }

    pub fn generate_silver_from_class(&mut self, class_id: &str) -> Result<i64, GeneratorError> {
        let formulas = &self.class(class_id)?.formulas;
        let silver = formulas.starting_silver.roll(&mut self.dice)?;
        debug!(class_id, silver, "generated silver");
        Ok(silver)
    }

    /// Roll one ability with its breakdown, labelled with the ability name.
    pub fn generate_ability_detailed(
        &mut self,
        class_id: &str,
        ability: Ability,
    ) -> Result<GeneratorResult, GeneratorError> {
        let formulas = &self.class(class_id)?.formulas;
        let result = formulas
            .ability(ability)
            .roll_detailed(&mut self.dice, ability.label())?;
        debug!(class_id, stat = ability.label(), value = result.value, "generated ability");
        Ok(result)
    }

    /// Roll all four abilities with breakdowns, in sheet order.
    pub fn generate_abilities_detailed(
        &mut self,
        class_id: &str,
    ) -> Result<Vec<GeneratorResult>, GeneratorError> {
        Ability::ALL
            .into_iter()
            .map(|ability| self.generate_ability_detailed(class_id, ability))
            .collect()
    }

    /// Roll hit points with a breakdown.
    ///
    /// The formula keeps the toughness modifier as its own term, e.g.
    /// `1d8 +1`; the rolls hold only the hit die.
    pub fn generate_hp_detailed(
        &mut self,
        class_id: &str,
        toughness_modifier: i64,
    ) -> Result<GeneratorResult, GeneratorError> {
        let formulas = &self.class(class_id)?.formulas;
        let hit_die = formulas.hit_die.roll_detailed(&mut self.dice, HIT_POINTS)?;
        let result = GeneratorResult::new(
            hit_die.value.saturating_add(toughness_modifier),
            hit_die.rolls,
            format!("{} {}", hit_die.formula, format_modifier(toughness_modifier)),
            HIT_POINTS,
        );
        debug!(class_id, formula = %result.formula, value = result.value, "generated hit points");
        Ok(result)
    }

    pub fn generate_omens_detailed(
        &mut self,
        class_id: &str,
    ) -> Result<GeneratorResult, GeneratorError> {
        let formulas = &self.class(class_id)?.formulas;
        Ok(formulas.starting_omens.roll_detailed(&mut self.dice, OMENS)?)
    }

    pub fn generate_silver_detailed(
        &mut self,
        class_id: &str,
    ) -> Result<GeneratorResult, GeneratorError> {
        let formulas = &self.class(class_id)?.formulas;
        Ok(formulas.starting_silver.roll_detailed(&mut self.dice, SILVER)?)
    }

    /// Roll abilities, hit points, omens and silver for a new character.
    ///
    /// Hit points use the modifier of the freshly rolled toughness. Omens and
    /// silver come from the class formulas, not the class-independent d2 and
    /// 2d6 × 10 of [`generate_omens_legacy`](Self::generate_omens_legacy) and
    /// [`generate_silver_legacy`](Self::generate_silver_legacy).
    pub fn roll_starting_stats(&mut self, class_id: &str) -> Result<StartingStats, GeneratorError> {
        let abilities = self.generate_abilities_from_class(class_id)?;
        let toughness_modifier = ability_score_to_modifier(abilities.toughness);
        Ok(StartingStats {
            abilities,
            max_hp: self.generate_hp_from_class(class_id, toughness_modifier)?,
            max_omens: self.generate_omens_from_class(class_id)?,
            silver: self.generate_silver_from_class(class_id)?,
        })
    }

    /// Re-roll hit points after toughness was edited by hand.
    pub fn reroll_hp_for_toughness(
        &mut self,
        class_id: &str,
        toughness: i64,
    ) -> Result<i64, GeneratorError> {
        self.generate_hp_from_class(class_id, ability_score_to_modifier(toughness))
    }

    /// Class-independent omens: d2.
    pub fn generate_omens_legacy(&mut self) -> i64 {
        i64::from(roll_d2(&mut self.dice))
    }

    /// Class-independent silver: 2d6 × 10.
    pub fn generate_silver_legacy(&mut self) -> i64 {
        let pair = roll_d6(&mut self.dice) + roll_d6(&mut self.dice);
        i64::from(pair) * 10
    }

    /// A name from the name grid: a row die, then a column die.
    pub fn generate_name(&mut self) -> Result<String, GeneratorError> {
        let rows = &self.content.tables().names;
        let row = pick(&mut self.dice, rows, "names")?;
        Ok(pick(&mut self.dice, row, "names")?.clone())
    }

    /// Two different terrible traits.
    pub fn generate_traits(&mut self) -> Result<[String; 2], GeneratorError> {
        let traits = &self.content.tables().terrible_traits;
        if traits.len() < 2 {
            return Err(GeneratorError::TableTooShort {
                table: "terribleTraits",
                needed: 2,
                found: traits.len(),
            });
        }
        let first = pick_index(&mut self.dice, traits.len());
        let mut second = pick_index(&mut self.dice, traits.len() - 1);
        if second >= first {
            second += 1;
        }
        Ok([traits[first].clone(), traits[second].clone()])
    }

    pub fn generate_body(&mut self) -> Result<String, GeneratorError> {
        let bodies = &self.content.tables().broken_bodies;
        Ok(pick(&mut self.dice, bodies, "brokenBodies")?.clone())
    }

    pub fn generate_habit(&mut self) -> Result<String, GeneratorError> {
        let habits = &self.content.tables().bad_habits;
        Ok(pick(&mut self.dice, habits, "badHabits")?.clone())
    }
}

/// Roll a die sized to the table and return the zero-based index.
fn pick_index<D: DieSource + ?Sized>(dice: &mut D, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let sides = u32::try_from(len).unwrap_or(u32::MAX);
    (dice.roll_die(sides) - 1) as usize
}

fn pick<'t, T, D: DieSource + ?Sized>(
    dice: &mut D,
    table: &'t [T],
    name: &'static str,
) -> Result<&'t T, GeneratorError> {
    if table.is_empty() {
        return Err(GeneratorError::TableTooShort {
            table: name,
            needed: 1,
            found: 0,
        });
    }
    Ok(&table[pick_index(dice, table.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{AbilityRolls, ClassDefinition, NotationPolicy, RandomTables};
    use crate::roller::{FixedDice, Roller};

    fn fixture() -> ContentRepository {
        let mut content = ContentRepository::new(NotationPolicy::Lenient);
        content
            .insert_class(ClassDefinition {
                id: "fanged-deserter".to_string(),
                name: "Fanged Deserter".to_string(),
                description: String::new(),
                ability_rolls: AbilityRolls {
                    strength: "3d6+2".to_string(),
                    agility: "3d6".to_string(),
                    presence: "3d6-1".to_string(),
                    toughness: "3d6".to_string(),
                },
                hit_die: "d10".to_string(),
                starting_omens: "d2".to_string(),
                starting_silver: "2d6*10".to_string(),
                special_abilities: Vec::new(),
                limitations: Vec::new(),
            })
            .unwrap();
        content.set_tables(RandomTables {
            names: vec![
                vec!["Aerg-Tval".to_string(), "Agn".to_string()],
                vec!["Belsum".to_string(), "Brint".to_string()],
            ],
            terrible_traits: vec![
                "Endlessly aggravated".to_string(),
                "Inferiority complex".to_string(),
                "Problems with authority".to_string(),
            ],
            broken_bodies: vec!["Staring manic gaze".to_string()],
            bad_habits: Vec::new(),
        });
        content
    }

    #[test]
    fn test_abilities_follow_formulas() {
        let content = fixture();
        let faces = vec![1, 2, 3, 4, 5, 6, 1, 1, 1, 6, 6, 6];
        let mut generator = StatGenerator::new(&content, FixedDice::new(faces));
        let abilities = generator.generate_abilities_from_class("fanged-deserter").unwrap();
        assert_eq!(abilities, Abilities::new(8, 15, 2, 18));
    }

    #[test]
    fn test_unknown_class_fails() {
        let content = fixture();
        let mut generator = StatGenerator::new(&content, FixedDice::default());
        let missing = GeneratorError::ClassNotFound("nobody".to_string());
        assert_eq!(generator.generate_abilities_from_class("nobody"), Err(missing.clone()));
        assert_eq!(generator.generate_hp_from_class("nobody", 1), Err(missing.clone()));
        assert_eq!(generator.generate_omens_detailed("nobody"), Err(missing.clone()));
        assert_eq!(generator.roll_starting_stats("nobody"), Err(missing));
        assert_eq!(generator.dice().draws(), 0);
    }

    #[test]
    fn test_hp_adds_modifier_verbatim() {
        let content = fixture();
        let mut generator = StatGenerator::new(&content, FixedDice::new(vec![7]));
        assert_eq!(generator.generate_hp_from_class("fanged-deserter", -2).unwrap(), 5);
        assert_eq!(generator.reroll_hp_for_toughness("fanged-deserter", 17).unwrap(), 10);
    }

    #[test]
    fn test_hp_detailed_formula() {
        let content = fixture();
        let mut generator = StatGenerator::new(&content, FixedDice::new(vec![4]));
        let hp = generator.generate_hp_detailed("fanged-deserter", -1).unwrap();
        assert_eq!(hp.value, 3);
        assert_eq!(hp.formula, "1d10 -1");
        assert_eq!(hp.description, HIT_POINTS);
        assert_eq!(hp.rolls.len(), 1);
        assert_eq!(hp.rolls[0].total, 4);
    }

    #[test]
    fn test_detailed_abilities_labels() {
        let content = fixture();
        let mut generator = StatGenerator::new(&content, Roller::from_seed(5));
        let results = generator.generate_abilities_detailed("fanged-deserter").unwrap();
        let labels: Vec<&str> = results.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(labels, vec!["Strength", "Agility", "Presence", "Toughness"]);
        assert_eq!(results[0].formula, "3d6+2");
        assert_eq!(results[2].formula, "3d6-1");
        for result in &results {
            assert_eq!(result.value, result.rolls[0].total);
        }
    }

    #[test]
    fn test_silver_and_omens_detailed() {
        let content = fixture();
        let mut generator = StatGenerator::new(&content, FixedDice::new(vec![2, 5, 2]));
        let silver = generator.generate_silver_detailed("fanged-deserter").unwrap();
        assert_eq!(silver.value, 70);
        assert_eq!(silver.formula, "2d6*10 = (7) × 10");
        assert_eq!(silver.description, SILVER);

        let omens = generator.generate_omens_detailed("fanged-deserter").unwrap();
        assert_eq!(omens.value, 2);
        assert_eq!(omens.description, OMENS);
    }

    #[test]
    fn test_starting_stats_use_toughness_modifier() {
        let content = fixture();
        // STR 5, AGI 3, PRE 2, TGH 18 (+3), hit die 5, omens 1, silver (1+1)*10
        let faces = vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 6, 6, 6, 5, 1, 1, 1];
        let mut generator = StatGenerator::new(&content, FixedDice::new(faces));
        let stats = generator.roll_starting_stats("fanged-deserter").unwrap();
        assert_eq!(stats.abilities, Abilities::new(5, 3, 2, 18));
        assert_eq!(stats.max_hp, 8);
        assert_eq!(stats.max_omens, 1);
        assert_eq!(stats.silver, 20);
    }

    #[test]
    fn test_hp_with_extreme_modifier_saturates() {
        let content = fixture();
        let mut generator = StatGenerator::new(&content, FixedDice::new(vec![5]));
        let hp = generator
            .generate_hp_from_class("fanged-deserter", i64::MAX)
            .unwrap();
        assert_eq!(hp, i64::MAX);
        let detailed = generator
            .generate_hp_detailed("fanged-deserter", i64::MIN)
            .unwrap();
        assert_eq!(detailed.value, i64::MIN + 5);
    }

    #[test]
    fn test_legacy_rolls() {
        let content = fixture();
        let mut generator = StatGenerator::new(&content, Roller::from_seed(11));
        for _ in 0..100 {
            assert!((1..=2).contains(&generator.generate_omens_legacy()));
            let silver = generator.generate_silver_legacy();
            assert!((20..=120).contains(&silver));
            assert_eq!(silver % 10, 0);
        }
    }

    #[test]
    fn test_table_picks() {
        let content = fixture();
        let mut generator = StatGenerator::new(&content, FixedDice::new(vec![2, 1]));
        assert_eq!(generator.generate_name().unwrap(), "Belsum");
        assert_eq!(generator.generate_body().unwrap(), "Staring manic gaze");
        assert_eq!(
            generator.generate_habit(),
            Err(GeneratorError::TableTooShort {
                table: "badHabits",
                needed: 1,
                found: 0
            })
        );
    }

    #[test]
    fn test_traits_are_distinct() {
        let content = fixture();
        // Same face twice: the second pick skips over the first.
        let mut generator = StatGenerator::new(&content, FixedDice::new(vec![2, 2]));
        let traits = generator.generate_traits().unwrap();
        assert_eq!(traits[0], "Inferiority complex");
        assert_eq!(traits[1], "Problems with authority");

        let mut generator = StatGenerator::new(&content, Roller::from_seed(3));
        for _ in 0..100 {
            let [a, b] = generator.generate_traits().unwrap();
            assert_ne!(a, b);
        }
    }
}
