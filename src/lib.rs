//! # grimdice - Dice Notation Engine and Class Stat Generator
//!
//! A small rules core for a Mörk Borg-style character companion:
//! - **Dice rolling** with per-die breakdowns kept in draw order
//! - **Notation parsing** of strings like `"3d6+2"`, `"d8"`, `"2d6*10"`, `"2"`
//! - **Class-driven generation** of abilities, hit points, omens and silver
//! - **Ability modifiers** from the fixed score-to-modifier step table
//!
//! ## Core Concepts
//!
//! ### Roll Pipeline
//!
//! ```text
//! [content JSON] → [ClassFormulas] → [StatGenerator] → i64 | GeneratorResult
//!                        ↑                 ↑
//!                    Notation          DieSource
//! ```
//!
//! 1. **Content** is loaded once into a [`ContentRepository`], which parses
//!    every class formula into a typed [`Notation`]
//! 2. A **[`DieSource`]** supplies faces: [`Roller`] for real play,
//!    [`FixedDice`] for tests and replays
//! 3. The **[`StatGenerator`]** rolls formulas and returns either a plain
//!    value or a [`GeneratorResult`] with rolls and a formula for display
//!
//! ### Leniency
//!
//! Unparseable notation evaluates to `0` instead of failing, and every such
//! fallback is logged with `tracing` at `warn`. Load content with
//! [`NotationPolicy::Strict`] to reject broken formulas up front.
//!
//! ## Example
//!
//! ```rust
//! use grimdice::*;
//!
//! let json = r#"{"classes": [{
//!     "id": "gutterborn-scum", "name": "Gutterborn Scum",
//!     "abilityRolls": {"strength": "3d6-2", "agility": "3d6",
//!                      "presence": "3d6", "toughness": "3d6"},
//!     "hitDie": "d6", "startingOmens": "d2", "startingSilver": "1d6*10"
//! }]}"#;
//! let content = ContentRepository::from_json(json, NotationPolicy::Strict).unwrap();
//! let mut generator = StatGenerator::new(&content, Roller::from_seed(666));
//!
//! let abilities = generator.generate_abilities_from_class("gutterborn-scum").unwrap();
//! let toughness = ability_score_to_modifier(abilities.toughness);
//! let hp = generator.generate_hp_detailed("gutterborn-scum", toughness).unwrap();
//!
//! assert!(hp.formula.starts_with("1d6 "));
//! assert!(hp.formula.ends_with(&format_modifier(toughness)));
//! ```
//!
//! ## Modules
//!
//! - [`roller`] - Die sources and raw dice rolls
//! - [`notation`] - Notation parsing and evaluation
//! - [`result`] - Roll and generator results
//! - [`ability`] - Abilities and the modifier table
//! - [`content`] - Class definitions, tables and the content repository
//! - [`generator`] - Class-driven stat generation
//! - [`error`] - Error types

pub mod ability;
pub mod content;
pub mod error;
pub mod generator;
pub mod notation;
pub mod result;
pub mod roller;

// Re-export main types for convenience
pub use ability::{
    ability_score_to_modifier, format_modifier, Abilities, Ability, AbilityScore, DraftAbilities,
};
pub use content::{
    AbilityRolls, ClassDefinition, ClassEntry, ClassFormulas, ContentRepository, GameContent,
    NotationPolicy, RandomTables, SpecialAbility,
};
pub use error::{ContentError, DiceError, GeneratorError, NotationError};
pub use generator::{StartingStats, StatGenerator};
pub use notation::{parse_dice_notation, parse_dice_notation_detailed, DiceSpec, Notation, Term};
pub use result::{DiceRollResult, GeneratorResult};

// Re-export the roller
pub use roller::{
    roll_3d6, roll_d10, roll_d2, roll_d20, roll_d6, roll_d8, roll_dice, roll_dice_detailed,
    DieSource, FixedDice, Roller, MAX_DICE,
};
