//! Charforge - D&D 5e character sheets from the command line
//!
//! Characters live in a single JSON file. Every command loads the
//! sheet, runs the use case, and persists the re-derived result;
//! `serve` exposes the same use cases over a REST API.

mod application;
mod domain;
mod infrastructure;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::bail;
use axum::{routing::get, Router};
use clap::{Parser, Subcommand};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::services::character_service::CreateCharacterRequest;
use crate::application::services::equipment_service::WeaponSlot;
use crate::domain::entities::Character;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http;
use crate::infrastructure::state::AppState;

#[derive(Parser)]
#[command(name = "charforge", version, about = "D&D 5e character sheet engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new character
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        race: String,
        #[arg(long)]
        class: String,
        #[arg(long)]
        level: Option<i32>,
        #[arg(long)]
        player: Option<String>,
        #[arg(long)]
        background: Option<String>,
        #[arg(long)]
        alignment: Option<String>,
        /// Six base ability scores in order Str,Dex,Con,Int,Wis,Cha
        #[arg(long, value_delimiter = ',')]
        scores: Vec<i32>,
        /// Skill proficiency; repeat for more than one
        #[arg(long = "skill")]
        skills: Vec<String>,
    },
    /// Show a character sheet
    View { name: String },
    /// List all characters
    List,
    /// Delete a character
    Delete { name: String },
    /// Raise a character to a new level
    LevelUp { name: String, level: i32 },
    /// Equip a weapon, armor, or shield
    Equip {
        name: String,
        #[arg(long)]
        weapon: Option<String>,
        #[arg(long)]
        armor: Option<String>,
        #[arg(long)]
        shield: Option<String>,
        /// Weapon slot: "main hand" or "off hand"
        #[arg(long)]
        slot: Option<String>,
    },
    /// Remove a weapon, armor, or shield
    Unequip {
        name: String,
        #[arg(long)]
        weapon: Option<String>,
        #[arg(long)]
        armor: bool,
        #[arg(long)]
        shield: bool,
    },
    /// Add a spell to a known caster's spell list
    LearnSpell { name: String, spell: String },
    /// Prepare a spell at a slot level
    PrepareSpell {
        name: String,
        spell: String,
        #[arg(long)]
        slot_level: u8,
    },
    /// Fill the sheet with spells and equipment from the SRD API
    Enrich { name: String },
    /// Run the HTTP API server
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charforge=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let state = Arc::new(AppState::new(config).await?);

    match cli.command {
        Command::Create {
            name,
            race,
            class,
            level,
            player,
            background,
            alignment,
            scores,
            skills,
        } => {
            let character = state
                .character_service
                .create(CreateCharacterRequest {
                    name,
                    player_name: player.unwrap_or_default(),
                    race,
                    class,
                    level,
                    background: background.unwrap_or_default(),
                    alignment: alignment.unwrap_or_default(),
                    ability_scores: scores,
                    skill_proficiencies: skills,
                })
                .await?;
            println!("Created {}", character.name);
            print_sheet(&character);
        }
        Command::View { name } => {
            let character = state.character_service.get(&name).await?;
            print_sheet(&character);
        }
        Command::List => {
            let characters = state.character_service.list().await?;
            if characters.is_empty() {
                println!("No characters yet");
            }
            for c in characters {
                println!("{} ({} {}, level {})", c.name, c.race, c.class, c.level);
            }
        }
        Command::Delete { name } => {
            state.character_service.delete(&name).await?;
            println!("Deleted {name}");
        }
        Command::LevelUp { name, level } => {
            let character = state.character_service.level_up(&name, level).await?;
            println!(
                "{} is now level {} (proficiency bonus +{})",
                character.name, character.level, character.proficiency_bonus
            );
        }
        Command::Equip {
            name,
            weapon,
            armor,
            shield,
            slot,
        } => {
            if let Some(weapon) = weapon {
                let slot = WeaponSlot::parse(slot.as_deref().unwrap_or(""))?;
                let chosen = state
                    .equipment_service
                    .equip_weapon(&name, &weapon, slot)
                    .await?;
                println!("Equipped {} in the {}", weapon, chosen.as_str());
            } else if let Some(armor) = armor {
                state.equipment_service.equip_armor(&name, &armor).await?;
                println!("Equipped {armor}");
            } else if let Some(shield) = shield {
                state.equipment_service.equip_shield(&name, &shield).await?;
                println!("Equipped {shield}");
            } else {
                bail!("specify --weapon, --armor, or --shield");
            }
        }
        Command::Unequip {
            name,
            weapon,
            armor,
            shield,
        } => {
            if let Some(weapon) = weapon {
                state.equipment_service.unequip_weapon(&name, &weapon).await?;
                println!("Removed {weapon}");
            } else if armor {
                state.equipment_service.unequip_armor(&name).await?;
                println!("Removed armor");
            } else if shield {
                state.equipment_service.unequip_shield(&name).await?;
                println!("Removed shield");
            } else {
                bail!("specify --weapon, --armor, or --shield");
            }
        }
        Command::LearnSpell { name, spell } => {
            let learned = state.spell_service.learn_spell(&name, &spell).await?;
            println!("{} learned {} (level {})", name, learned.name, learned.level);
        }
        Command::PrepareSpell {
            name,
            spell,
            slot_level,
        } => {
            state
                .spell_service
                .prepare_spell(&name, &spell, slot_level)
                .await?;
            println!("{name} prepared {spell} at slot level {slot_level}");
        }
        Command::Enrich { name } => {
            let character = state.enrichment_service.enrich(&name).await?;
            println!("Enriched {} with API data", character.name);
            print_sheet(&character);
        }
        Command::Serve { port } => {
            let port = port.unwrap_or(state.config.server_port);
            serve(state, port).await?;
        }
    }

    Ok(())
}

async fn serve(state: Arc<AppState>, port: u16) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/health", get(health_check))
        .merge(http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

fn print_sheet(c: &Character) {
    println!("=== {} ===", c.name);
    println!(
        "{} {} | level {} | proficiency +{}",
        c.race, c.class, c.level, c.proficiency_bonus
    );
    println!(
        "STR {} ({:+}) DEX {} ({:+}) CON {} ({:+}) INT {} ({:+}) WIS {} ({:+}) CHA {} ({:+})",
        c.abilities.strength,
        c.strength_mod,
        c.abilities.dexterity,
        c.dexterity_mod,
        c.abilities.constitution,
        c.constitution_mod,
        c.abilities.intelligence,
        c.intelligence_mod,
        c.abilities.wisdom,
        c.wisdom_mod,
        c.abilities.charisma,
        c.charisma_mod,
    );
    println!(
        "AC {} | initiative {:+} | passive perception {}",
        c.armor_class, c.initiative, c.passive_perception
    );

    if !c.skill_proficiencies.is_empty() {
        println!("Proficient: {}", c.skill_proficiencies.join(", "));
    }

    if let Some(weapon) = &c.equipment.main_hand {
        println!("Main hand: {} ({})", weapon.name, weapon.damage);
    }
    if let Some(weapon) = &c.equipment.off_hand {
        println!("Off hand: {} ({})", weapon.name, weapon.damage);
    }
    if let Some(armor) = &c.equipment.armor {
        println!("Armor: {}", armor.name);
    }
    if let Some(shield) = &c.equipment.shield {
        println!("Shield: {}", shield.name);
    }

    if let Some(ability) = c.spellcasting_ability {
        println!(
            "Spellcasting: {} | save DC {} | attack {:+}",
            ability, c.spell_save_dc, c.spell_attack_bonus
        );
        let slots: Vec<String> = c
            .spell_slots
            .iter()
            .map(|(level, count)| {
                if *level == 0 {
                    format!("cantrips {count}")
                } else {
                    format!("L{level} x{count}")
                }
            })
            .collect();
        if !slots.is_empty() {
            println!("Slots: {}", slots.join(", "));
        }
        for spell in &c.spells {
            let mark = if spell.prepared { "*" } else { " " };
            println!("  {}{} (level {})", mark, spell.name, spell.level);
        }
    }
}
