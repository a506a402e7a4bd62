//! Application services - Use case implementations

pub mod character_service;
pub mod enrichment_service;
pub mod equipment_service;
pub mod spell_service;

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::application::error::SheetError;
    use crate::application::ports::outbound::CharacterRepositoryPort;
    use crate::domain::entities::Character;

    /// In-memory stand-in for the JSON file repository
    pub struct MemoryRepository {
        characters: Mutex<BTreeMap<String, Character>>,
    }

    impl MemoryRepository {
        pub fn new() -> Self {
            Self {
                characters: Mutex::new(BTreeMap::new()),
            }
        }

        pub fn with(characters: Vec<Character>) -> Self {
            let map = characters
                .into_iter()
                .map(|c| (c.name.clone(), c))
                .collect();
            Self {
                characters: Mutex::new(map),
            }
        }
    }

    #[async_trait]
    impl CharacterRepositoryPort for MemoryRepository {
        async fn load_all(&self) -> Result<BTreeMap<String, Character>, SheetError> {
            Ok(self.characters.lock().unwrap().clone())
        }

        async fn save(&self, character: &Character) -> Result<(), SheetError> {
            self.characters
                .lock()
                .unwrap()
                .insert(character.name.clone(), character.clone());
            Ok(())
        }

        async fn save_all(&self, all: &BTreeMap<String, Character>) -> Result<(), SheetError> {
            *self.characters.lock().unwrap() = all.clone();
            Ok(())
        }

        async fn delete(&self, name: &str) -> Result<(), SheetError> {
            match self.characters.lock().unwrap().remove(name) {
                Some(_) => Ok(()),
                None => Err(SheetError::not_found(format!(
                    "character '{name}' not found"
                ))),
            }
        }

        async fn get_by_name(&self, name: &str) -> Result<Option<Character>, SheetError> {
            Ok(self.characters.lock().unwrap().get(name).cloned())
        }
    }
}
