//! Character API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::services::character_service::CreateCharacterRequest;
use crate::application::services::equipment_service::WeaponSlot;
use crate::domain::entities::{Character, Spell};
use crate::infrastructure::http::error_response;
use crate::infrastructure::state::AppState;

/// List all characters
pub async fn list_characters(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Character>>, (StatusCode, String)> {
    let characters = state
        .character_service
        .list()
        .await
        .map_err(error_response)?;
    Ok(Json(characters))
}

/// Create a character
pub async fn create_character(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCharacterRequest>,
) -> Result<(StatusCode, Json<Character>), (StatusCode, String)> {
    let character = state
        .character_service
        .create(req)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(character)))
}

/// Get a character by name
pub async fn get_character(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Character>, (StatusCode, String)> {
    let character = state
        .character_service
        .get(&name)
        .await
        .map_err(error_response)?;
    Ok(Json(character))
}

/// Delete a character
pub async fn delete_character(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .character_service
        .delete(&name)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct LevelUpRequest {
    pub level: i32,
}

/// Raise a character to a new level
pub async fn level_up(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(req): Json<LevelUpRequest>,
) -> Result<Json<Character>, (StatusCode, String)> {
    let character = state
        .character_service
        .level_up(&name, req.level)
        .await
        .map_err(error_response)?;
    Ok(Json(character))
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Armor,
    Shield,
}

#[derive(Debug, Deserialize)]
pub struct EquipRequest {
    pub kind: ItemKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slot: String,
}

/// Equip a weapon, armor, or shield by catalog name
pub async fn equip_item(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(req): Json<EquipRequest>,
) -> Result<Json<Character>, (StatusCode, String)> {
    match req.kind {
        ItemKind::Weapon => {
            let slot = WeaponSlot::parse(&req.slot).map_err(error_response)?;
            state
                .equipment_service
                .equip_weapon(&name, &req.name, slot)
                .await
                .map_err(error_response)?;
        }
        ItemKind::Armor => {
            state
                .equipment_service
                .equip_armor(&name, &req.name)
                .await
                .map_err(error_response)?;
        }
        ItemKind::Shield => {
            state
                .equipment_service
                .equip_shield(&name, &req.name)
                .await
                .map_err(error_response)?;
        }
    }
    let character = state
        .character_service
        .get(&name)
        .await
        .map_err(error_response)?;
    Ok(Json(character))
}

#[derive(Debug, Deserialize)]
pub struct UnequipRequest {
    pub kind: ItemKind,
    #[serde(default)]
    pub name: String,
}

/// Remove a weapon, armor, or shield
pub async fn unequip_item(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(req): Json<UnequipRequest>,
) -> Result<Json<Character>, (StatusCode, String)> {
    match req.kind {
        ItemKind::Weapon => {
            state
                .equipment_service
                .unequip_weapon(&name, &req.name)
                .await
                .map_err(error_response)?;
        }
        ItemKind::Armor => {
            state
                .equipment_service
                .unequip_armor(&name)
                .await
                .map_err(error_response)?;
        }
        ItemKind::Shield => {
            state
                .equipment_service
                .unequip_shield(&name)
                .await
                .map_err(error_response)?;
        }
    }
    let character = state
        .character_service
        .get(&name)
        .await
        .map_err(error_response)?;
    Ok(Json(character))
}

#[derive(Debug, Deserialize)]
pub struct LearnSpellRequest {
    pub spell: String,
}

/// Add a spell to a known caster's list
pub async fn learn_spell(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(req): Json<LearnSpellRequest>,
) -> Result<(StatusCode, Json<Spell>), (StatusCode, String)> {
    let spell = state
        .spell_service
        .learn_spell(&name, &req.spell)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(spell)))
}

#[derive(Debug, Deserialize)]
pub struct PrepareSpellRequest {
    pub spell: String,
    pub slot_level: u8,
}

/// Prepare a spell at a slot level
pub async fn prepare_spell(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(req): Json<PrepareSpellRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .spell_service
        .prepare_spell(&name, &req.spell, req.slot_level)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fill the sheet with data from the SRD API
pub async fn enrich_character(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Character>, (StatusCode, String)> {
    let character = state
        .enrichment_service
        .enrich(&name)
        .await
        .map_err(error_response)?;
    Ok(Json(character))
}
