//! Repository port - Interface for character persistence
//!
//! The application services depend on this trait, not on the JSON
//! file adapter. The collection is read and written whole: the store
//! is one document keyed by character name, and callers follow a
//! load-mutate-save cycle per operation.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::application::error::SheetError;
use crate::domain::entities::Character;

/// Repository port for Character records, keyed by unique name
#[async_trait]
pub trait CharacterRepositoryPort: Send + Sync {
    /// Load the whole collection. A missing store is an empty
    /// collection, not an error.
    async fn load_all(&self) -> Result<BTreeMap<String, Character>, SheetError>;

    /// Insert or replace a single character
    async fn save(&self, character: &Character) -> Result<(), SheetError>;

    /// Replace the whole collection
    async fn save_all(&self, all: &BTreeMap<String, Character>) -> Result<(), SheetError>;

    /// Remove a character by name; `NotFound` if absent
    async fn delete(&self, name: &str) -> Result<(), SheetError>;

    /// Fetch a character by name
    async fn get_by_name(&self, name: &str) -> Result<Option<Character>, SheetError>;
}
