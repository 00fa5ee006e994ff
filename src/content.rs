//! Game content module.
//!
//! Class definitions and random tables arrive as JSON authored by content
//! creators. Notation strings stay strings at that boundary, but the
//! [`ContentRepository`] parses every class formula once when the class is
//! loaded and keeps the typed [`Notation`] next to the definition.
//!
//! The repository is an explicit value: build one per test fixture or per
//! application and hand it to a [`StatGenerator`](crate::StatGenerator).

use crate::ability::Ability;
use crate::error::ContentError;
use crate::notation::Notation;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What to do with class formulas that fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotationPolicy {
    /// Keep the class; the broken formula always evaluates to `0`.
    #[default]
    Lenient,
    /// Reject the content with [`ContentError::InvalidNotation`].
    Strict,
}

/// A named class feature shown on the character sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialAbility {
    pub name: String,
    pub description: String,
}

/// Ability roll formulas of a class, one notation string per ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRolls {
    pub strength: String,
    pub agility: String,
    pub presence: String,
    pub toughness: String,
}

impl AbilityRolls {
    pub fn get(&self, ability: Ability) -> &str {
        match ability {
            Ability::Strength => &self.strength,
            Ability::Agility => &self.agility,
            Ability::Presence => &self.presence,
            Ability::Toughness => &self.toughness,
        }
    }
}

/// A character class as authored in content JSON.
///
/// # Examples
///
/// ```rust
/// use grimdice::ClassDefinition;
///
/// let json = r#"{
///     "id": "esoteric-hermit",
///     "name": "Esoteric Hermit",
///     "abilityRolls": {
///         "strength": "3d6-2", "agility": "3d6",
///         "presence": "3d6+2", "toughness": "3d6"
///     },
///     "hitDie": "d4",
///     "startingOmens": "d4",
///     "startingSilver": "2d6*10"
/// }"#;
/// let class: ClassDefinition = serde_json::from_str(json).unwrap();
/// assert_eq!(class.hit_die, "d4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub ability_rolls: AbilityRolls,
    pub hit_die: String,
    pub starting_omens: String,
    pub starting_silver: String,
    #[serde(default)]
    pub special_abilities: Vec<SpecialAbility>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub limitations: Vec<String>,
}

/// Parsed formulas of one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFormulas {
    pub strength: Notation,
    pub agility: Notation,
    pub presence: Notation,
    pub toughness: Notation,
    pub hit_die: Notation,
    pub starting_omens: Notation,
    pub starting_silver: Notation,
}

impl ClassFormulas {
    /// Parse every formula of `class` under `policy`.
    ///
    /// # Errors
    ///
    /// Under [`NotationPolicy::Strict`], the first formula that fails to
    /// parse is reported as [`ContentError::InvalidNotation`].
    pub fn compile(class: &ClassDefinition, policy: NotationPolicy) -> Result<Self, ContentError> {
        let parse = |field: &'static str, text: &str| -> Result<Notation, ContentError> {
            match policy {
                NotationPolicy::Lenient => Ok(Notation::parse_lenient(text)),
                NotationPolicy::Strict => {
                    Notation::parse(text).map_err(|source| ContentError::InvalidNotation {
                        class_id: class.id.clone(),
                        field,
                        source,
                    })
                }
            }
        };

        let rolls = &class.ability_rolls;
        Ok(Self {
            strength: parse("abilityRolls.strength", &rolls.strength)?,
            agility: parse("abilityRolls.agility", &rolls.agility)?,
            presence: parse("abilityRolls.presence", &rolls.presence)?,
            toughness: parse("abilityRolls.toughness", &rolls.toughness)?,
            hit_die: parse("hitDie", &class.hit_die)?,
            starting_omens: parse("startingOmens", &class.starting_omens)?,
            starting_silver: parse("startingSilver", &class.starting_silver)?,
        })
    }

    pub fn ability(&self, ability: Ability) -> &Notation {
        match ability {
            Ability::Strength => &self.strength,
            Ability::Agility => &self.agility,
            Ability::Presence => &self.presence,
            Ability::Toughness => &self.toughness,
        }
    }
}

/// A loaded class: the authored definition and its parsed formulas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    pub definition: ClassDefinition,
    pub formulas: ClassFormulas,
}

/// Random tables used for names and character flavour.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomTables {
    /// 6 rows by 8 columns, indexed by d6 then d8.
    #[serde(default)]
    pub names: Vec<Vec<String>>,
    #[serde(default)]
    pub terrible_traits: Vec<String>,
    #[serde(default)]
    pub broken_bodies: Vec<String>,
    #[serde(default)]
    pub bad_habits: Vec<String>,
}

/// A content document: classes and optional tables.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameContent {
    #[serde(default)]
    pub classes: Vec<ClassDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<RandomTables>,
}

/// Loaded classes and tables, with every class formula pre-parsed.
///
/// # Examples
///
/// ```rust
/// use grimdice::{ContentRepository, NotationPolicy};
///
/// let json = r#"{"classes": [{
///     "id": "wretch", "name": "Wretch",
///     "abilityRolls": {"strength": "3d6", "agility": "3d6",
///                      "presence": "3d6", "toughness": "3d6"},
///     "hitDie": "d8", "startingOmens": "d2", "startingSilver": "2d6*10"
/// }]}"#;
/// let content = ContentRepository::from_json(json, NotationPolicy::Strict).unwrap();
/// assert!(content.class("wretch").is_some());
/// assert!(content.class("missing").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContentRepository {
    classes: Vec<ClassEntry>,
    tables: RandomTables,
    policy: NotationPolicy,
}

impl ContentRepository {
    /// Create an empty repository.
    pub fn new(policy: NotationPolicy) -> Self {
        Self {
            classes: Vec::new(),
            tables: RandomTables::default(),
            policy,
        }
    }

    /// Build a repository from an in-memory content document.
    pub fn from_content(content: GameContent, policy: NotationPolicy) -> Result<Self, ContentError> {
        let mut repository = Self::new(policy);
        repository.merge(content)?;
        Ok(repository)
    }

    /// Build a repository from a JSON content document.
    ///
    /// # Errors
    ///
    /// [`ContentError::Json`] for malformed JSON,
    /// [`ContentError::EmptyContent`] for a document with neither classes
    /// nor tables, and [`ContentError::InvalidNotation`] for broken
    /// formulas under the strict policy.
    pub fn from_json(json: &str, policy: NotationPolicy) -> Result<Self, ContentError> {
        let mut repository = Self::new(policy);
        repository.merge_json(json)?;
        Ok(repository)
    }

    /// Merge a JSON content document into this repository.
    ///
    /// See [`ContentRepository::merge`] for the merge rules.
    pub fn merge_json(&mut self, json: &str) -> Result<(), ContentError> {
        let content: GameContent = serde_json::from_str(json)?;
        self.merge(content)
    }

    /// Merge custom content.
    ///
    /// New classes are appended. A class whose id is already loaded replaces
    /// the earlier definition in place. Tables, when present, replace the
    /// current tables. Nothing is changed if any class fails to compile.
    pub fn merge(&mut self, content: GameContent) -> Result<(), ContentError> {
        if content.classes.is_empty() && content.tables.is_none() {
            return Err(ContentError::EmptyContent);
        }

        let entries = content
            .classes
            .into_iter()
            .map(|definition| self.compile(definition))
            .collect::<Result<Vec<_>, _>>()?;

        for entry in entries {
            self.upsert(entry);
        }
        if let Some(tables) = content.tables {
            self.tables = tables;
        }
        Ok(())
    }

    /// Add or replace a single class.
    pub fn insert_class(&mut self, definition: ClassDefinition) -> Result<(), ContentError> {
        let entry = self.compile(definition)?;
        self.upsert(entry);
        Ok(())
    }

    /// Replace the random tables.
    pub fn set_tables(&mut self, tables: RandomTables) {
        self.tables = tables;
    }

    /// Look up a loaded class by id.
    pub fn class(&self, id: &str) -> Option<&ClassEntry> {
        self.classes.iter().find(|entry| entry.definition.id == id)
    }

    /// All loaded class definitions in load order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDefinition> {
        self.classes.iter().map(|entry| &entry.definition)
    }

    pub fn tables(&self) -> &RandomTables {
        &self.tables
    }

    pub fn policy(&self) -> NotationPolicy {
        self.policy
    }

    fn compile(&self, definition: ClassDefinition) -> Result<ClassEntry, ContentError> {
        let formulas = ClassFormulas::compile(&definition, self.policy)?;
        debug!(class_id = %definition.id, policy = ?self.policy, "compiled class formulas");
        Ok(ClassEntry {
            definition,
            formulas,
        })
    }

    fn upsert(&mut self, entry: ClassEntry) {
        match self
            .classes
            .iter_mut()
            .find(|existing| existing.definition.id == entry.definition.id)
        {
            Some(existing) => *existing = entry,
            None => self.classes.push(entry),
        }
    }
}
