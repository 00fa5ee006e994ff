//! Character Creation Example
//!
//! Walks through what a character creation screen does with grimdice:
//! - Loading class content from JSON
//! - Rolling abilities with a full breakdown
//! - Deriving hit points from the toughness modifier
//! - Rolling omens, silver and flavour from the random tables
//! - Editing a score by hand and re-rolling hit points
//!
//! Run with `RUST_LOG=grimdice=debug cargo run --example character` to see
//! the generator's logging.

use grimdice::*;
use tracing_subscriber::EnvFilter;

const CONTENT: &str = r#"{
    "classes": [{
        "id": "esoteric-hermit",
        "name": "Esoteric Hermit",
        "abilityRolls": {
            "strength": "3d6-2", "agility": "3d6",
            "presence": "3d6+2", "toughness": "3d6"
        },
        "hitDie": "d4",
        "startingOmens": "d4",
        "startingSilver": "2d6*10"
    }],
    "tables": {
        "names": [["Agn", "Belum"], ["Graft", "Karg"]],
        "terribleTraits": ["Cowardly", "Bitter", "Arrogant"],
        "brokenBodies": ["Rotting face", "Limps"],
        "badHabits": ["Talks to the dead", "Never bathes"]
    }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let content = ContentRepository::from_json(CONTENT, NotationPolicy::Strict)?;
    let class_id = "esoteric-hermit";
    let mut generator = StatGenerator::new(&content, Roller::new());

    println!("=== {} ===", generator.generate_name()?);
    let [first, second] = generator.generate_traits()?;
    println!("Traits: {}, {}", first, second);
    println!("Body:   {}", generator.generate_body()?);
    println!("Habit:  {}", generator.generate_habit()?);
    println!();

    let mut draft = DraftAbilities::default();
    let rolled = generator.generate_abilities_detailed(class_id)?;
    for (ability, result) in Ability::ALL.into_iter().zip(&rolled) {
        draft.set(ability, result.value);
        let faces = &result.rolls[0].rolls;
        let modifier = ability_score_to_modifier(result.value);
        println!(
            "{:<10} {:>3} ({}) from {} {:?}",
            result.description,
            result.value,
            format_modifier(modifier),
            result.formula,
            faces
        );
    }

    let toughness = draft.toughness.modifier().unwrap_or_default();
    let hp = generator.generate_hp_detailed(class_id, toughness)?;
    println!();
    println!("{}", hp);
    println!("{}", generator.generate_omens_detailed(class_id)?);
    println!("{}", generator.generate_silver_detailed(class_id)?);

    // The player overrides toughness by hand; hit points follow.
    draft.set(Ability::Toughness, 16);
    let hp = generator.reroll_hp_for_toughness(class_id, 16)?;
    println!();
    println!("Toughness set to 16, hit points re-rolled: {}", hp);

    if let Some(final_abilities) = draft.complete() {
        println!("{}", serde_json::to_string_pretty(&final_abilities)?);
    }
    Ok(())
}
