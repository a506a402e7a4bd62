//! JSON file adapter for the character repository port
//!
//! The whole collection lives in one pretty-printed JSON document
//! keyed by character name. Writes go through a temp file and a
//! rename so a crash mid-write never corrupts the store.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::application::error::SheetError;
use crate::application::ports::outbound::CharacterRepositoryPort;
use crate::domain::entities::Character;

/// Character store backed by a single JSON file
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn write_atomic(&self, all: &BTreeMap<String, Character>) -> Result<(), SheetError> {
        let json = serde_json::to_string_pretty(all).map_err(storage)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(storage)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(storage)?;
        Ok(())
    }
}

fn storage(err: impl std::error::Error + Send + Sync + 'static) -> SheetError {
    SheetError::Storage(anyhow::Error::new(err))
}

#[async_trait]
impl CharacterRepositoryPort for JsonFileRepository {
    async fn load_all(&self) -> Result<BTreeMap<String, Character>, SheetError> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            // A store that does not exist yet is an empty collection
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(storage(err)),
        };
        serde_json::from_str(&data).map_err(storage)
    }

    async fn save(&self, character: &Character) -> Result<(), SheetError> {
        let mut all = self.load_all().await?;
        all.insert(character.name.clone(), character.clone());
        self.write_atomic(&all).await
    }

    async fn save_all(&self, all: &BTreeMap<String, Character>) -> Result<(), SheetError> {
        self.write_atomic(all).await
    }

    async fn delete(&self, name: &str) -> Result<(), SheetError> {
        let mut all = self.load_all().await?;
        if all.remove(name).is_none() {
            return Err(SheetError::not_found(format!(
                "character '{name}' not found"
            )));
        }
        self.write_atomic(&all).await
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Character>, SheetError> {
        Ok(self.load_all().await?.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ClassId;

    fn repository(dir: &tempfile::TempDir) -> JsonFileRepository {
        JsonFileRepository::new(dir.path().join("characters.json"))
    }

    #[tokio::test]
    async fn missing_store_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);
        assert!(repo.load_all().await.unwrap().is_empty());
        assert!(repo.get_by_name("Aldric").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);

        let mut c = Character::new(1, "Aldric", "human", ClassId::Wizard);
        c.abilities.intelligence = 16;
        c.spell_slots.insert(1, 2);
        repo.save(&c).await.unwrap();

        let loaded = repo.get_by_name("Aldric").await.unwrap().unwrap();
        assert_eq!(loaded.abilities.intelligence, 16);
        assert_eq!(loaded.spell_slots.get(&1), Some(&2));

        // The temp file from the atomic write is gone
        assert!(!dir.path().join("characters.json.tmp").exists());
    }

    #[tokio::test]
    async fn save_replaces_an_existing_record() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);

        let mut c = Character::new(1, "Aldric", "human", ClassId::Wizard);
        repo.save(&c).await.unwrap();
        c.level = 5;
        repo.save(&c).await.unwrap();

        let all = repo.load_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all["Aldric"].level, 5);
    }

    #[tokio::test]
    async fn delete_removes_the_record_or_fails() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);

        let c = Character::new(1, "Aldric", "human", ClassId::Wizard);
        repo.save(&c).await.unwrap();

        repo.delete("Aldric").await.unwrap();
        assert!(repo.get_by_name("Aldric").await.unwrap().is_none());

        let err = repo.delete("Aldric").await.unwrap_err();
        assert!(matches!(err, SheetError::NotFound(_)));
    }

    #[tokio::test]
    async fn corrupt_store_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("characters.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let repo = JsonFileRepository::new(path);
        let err = repo.load_all().await.unwrap_err();
        assert!(matches!(err, SheetError::Storage(_)));
    }
}
