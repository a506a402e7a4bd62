//! Client for the public SRD rules API (dnd5eapi.co)
//!
//! The API exposes an index endpoint per resource type plus one
//! detail endpoint per record, so a catalog fetch is one index call
//! fanned out into many small detail calls. Detail calls are paced by
//! an interval ticker and bounded by a semaphore; a failed detail
//! call is logged and skipped rather than failing the whole fetch.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

use crate::application::error::SheetError;
use crate::application::ports::outbound::{EquipmentCatalog, SrdPort};
use crate::domain::entities::{Armor, Shield, Spell, Weapon};
use crate::domain::value_objects::ClassId;

/// Client for the SRD rules API
pub struct SrdClient {
    client: Client,
    base_url: String,
    request_interval: Duration,
    max_concurrency: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SrdError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
}

impl SrdClient {
    pub fn new(base_url: &str, request_interval_ms: u64, max_concurrency: usize) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            request_interval: Duration::from_millis(request_interval_ms),
            max_concurrency: max_concurrency.max(1),
        }
    }

    async fn fetch_spells(
        &self,
        class: ClassId,
        slots: &BTreeMap<u8, u8>,
    ) -> Result<Vec<Spell>, SrdError> {
        let list: ListResponse =
            get_json(&self.client, &format!("{}/api/spells", self.base_url)).await?;

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut interval = tokio::time::interval(self.request_interval);
        let mut tasks = JoinSet::new();
        for resource in list.results {
            interval.tick().await;
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };
            let client = self.client.clone();
            let url = resource_url(&self.base_url, &resource.url);
            tasks.spawn(async move {
                let _permit = permit;
                let spell: ApiSpell = get_json(&client, &url).await?;
                Ok::<ApiSpell, SrdError>(spell)
            });
        }

        let mut selected = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let fetched = match joined {
                Ok(Ok(spell)) => spell,
                Ok(Err(err)) => {
                    warn!(error = %err, "Skipping spell after failed fetch");
                    continue;
                }
                Err(err) => {
                    warn!(error = %err, "Spell fetch task failed");
                    continue;
                }
            };
            let for_class = fetched
                .classes
                .iter()
                .any(|c| c.name.eq_ignore_ascii_case(class.as_str()));
            if for_class && slots.contains_key(&fetched.level) {
                selected.push(Spell {
                    name: fetched.name,
                    level: fetched.level,
                    prepared: false,
                    school: fetched.school.name,
                    range: fetched.range,
                });
            }
        }

        // Random picks per slot level, at most as many as the slot count
        let mut rng = rand::thread_rng();
        let mut spells = Vec::new();
        for (&level, &count) in slots {
            let mut of_level: Vec<Spell> = selected
                .iter()
                .filter(|s| s.level == level)
                .cloned()
                .collect();
            if of_level.len() > count as usize {
                of_level.shuffle(&mut rng);
                of_level.truncate(count as usize);
            }
            spells.extend(of_level);
        }
        Ok(spells)
    }

    async fn fetch_equipment(&self) -> Result<EquipmentCatalog, SrdError> {
        let list: ListResponse =
            get_json(&self.client, &format!("{}/api/equipment", self.base_url)).await?;

        let mut catalog = EquipmentCatalog::default();
        let mut interval = tokio::time::interval(self.request_interval);
        for resource in list.results {
            interval.tick().await;

            let url = resource_url(&self.base_url, &resource.url);
            let item: ApiEquipment = match get_json(&self.client, &url).await {
                Ok(item) => item,
                Err(err) => {
                    warn!(name = %resource.name, error = %err, "Skipping equipment after failed fetch");
                    continue;
                }
            };

            match item.equipment_category.name.as_str() {
                "Weapon" => {
                    let is_finesse = item
                        .properties
                        .iter()
                        .any(|p| p.name.eq_ignore_ascii_case("finesse"));
                    catalog.weapons.push(Weapon {
                        name: item.name,
                        category: format!("{} {}", item.weapon_category, item.weapon_range)
                            .trim()
                            .to_string(),
                        range: parse_range(&item.range),
                        two_handed: item.two_handed,
                        damage_die: item.damage.damage_dice,
                        is_finesse,
                        damage: String::new(),
                    });
                }
                "Armor" => {
                    catalog.armor = Some(Armor {
                        name: item.name,
                        armor_class: item.armor_class.base,
                        dex_bonus: item.armor_class.dex_bonus,
                        max_dex_bonus: item.armor_class.max_bonus,
                    });
                }
                "Shield" => {
                    catalog.shield = Some(Shield {
                        name: item.name,
                        armor_class: item.armor_class.base,
                    });
                }
                _ => {}
            }
        }
        Ok(catalog)
    }
}

#[async_trait]
impl SrdPort for SrdClient {
    async fn spells_for_class(
        &self,
        class: ClassId,
        slots: &BTreeMap<u8, u8>,
    ) -> Result<Vec<Spell>, SheetError> {
        self.fetch_spells(class, slots)
            .await
            .map_err(|e| SheetError::Lookup(anyhow::Error::new(e)))
    }

    async fn equipment_catalog(&self) -> Result<EquipmentCatalog, SheetError> {
        self.fetch_equipment()
            .await
            .map_err(|e| SheetError::Lookup(anyhow::Error::new(e)))
    }
}

async fn get_json<T: serde::de::DeserializeOwned>(
    client: &Client,
    url: &str,
) -> Result<T, SrdError> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(SrdError::Api(format!("{status} from {url}: {body}")));
    }
    Ok(response.json().await?)
}

/// Detail URLs come back as index paths with mixed case and spaces
fn resource_url(base: &str, path: &str) -> String {
    format!("{}{}", base, path.to_lowercase().replace(' ', "-"))
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<ApiResource>,
}

#[derive(Debug, Deserialize)]
struct ApiResource {
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct NamedRef {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiSpell {
    name: String,
    level: u8,
    #[serde(default)]
    school: NamedRef,
    #[serde(default)]
    range: String,
    #[serde(default)]
    classes: Vec<NamedRef>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiArmorClass {
    #[serde(default)]
    base: i32,
    #[serde(default)]
    dex_bonus: bool,
    #[serde(default)]
    max_bonus: i32,
}

#[derive(Debug, Default, Deserialize)]
struct ApiDamage {
    #[serde(default)]
    damage_dice: String,
}

#[derive(Debug, Deserialize)]
struct ApiEquipment {
    name: String,
    #[serde(default)]
    equipment_category: NamedRef,
    #[serde(default)]
    weapon_category: String,
    #[serde(default)]
    weapon_range: String,
    #[serde(default)]
    armor_class: ApiArmorClass,
    #[serde(default)]
    two_handed: bool,
    #[serde(default)]
    range: serde_json::Value,
    #[serde(default)]
    properties: Vec<NamedRef>,
    #[serde(default)]
    damage: ApiDamage,
}

/// The range field is either a plain string or an object with a
/// normal/long pair
fn parse_range(raw: &serde_json::Value) -> String {
    match raw {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => map
            .get("normal")
            .and_then(|n| n.as_i64())
            .filter(|n| *n > 0)
            .map(|n| n.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_urls_are_slugified() {
        assert_eq!(
            resource_url("https://www.dnd5eapi.co", "/api/spells/Magic Missile"),
            "https://www.dnd5eapi.co/api/spells/magic-missile"
        );
    }

    #[test]
    fn range_field_accepts_both_shapes() {
        assert_eq!(parse_range(&serde_json::json!("60 feet")), "60 feet");
        assert_eq!(parse_range(&serde_json::json!({"normal": 20, "long": 60})), "20");
        assert_eq!(parse_range(&serde_json::json!({"normal": 0})), "");
        assert_eq!(parse_range(&serde_json::Value::Null), "");
    }

    #[test]
    fn spell_payload_parses_with_missing_optionals() {
        let spell: ApiSpell = serde_json::from_str(
            r#"{"name": "Fire Bolt", "level": 0, "classes": [{"name": "Wizard"}]}"#,
        )
        .unwrap();
        assert_eq!(spell.name, "Fire Bolt");
        assert_eq!(spell.level, 0);
        assert_eq!(spell.classes[0].name, "Wizard");
        assert!(spell.range.is_empty());
    }

    #[test]
    fn equipment_payload_classifies_by_category() {
        let weapon: ApiEquipment = serde_json::from_str(
            r#"{
                "name": "Rapier",
                "equipment_category": {"name": "Weapon"},
                "weapon_category": "Martial",
                "weapon_range": "Melee",
                "properties": [{"name": "Finesse"}],
                "damage": {"damage_dice": "1d8"}
            }"#,
        )
        .unwrap();
        assert_eq!(weapon.equipment_category.name, "Weapon");
        assert_eq!(weapon.damage.damage_dice, "1d8");
        assert!(weapon.properties.iter().any(|p| p.name == "Finesse"));

        let armor: ApiEquipment = serde_json::from_str(
            r#"{
                "name": "Scale Mail",
                "equipment_category": {"name": "Armor"},
                "armor_class": {"base": 14, "dex_bonus": true, "max_bonus": 2}
            }"#,
        )
        .unwrap();
        assert_eq!(armor.armor_class.base, 14);
        assert!(armor.armor_class.dex_bonus);
        assert_eq!(armor.armor_class.max_bonus, 2);
    }
}
