//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::ports::outbound::{CharacterRepositoryPort, SrdPort};
use crate::application::services::character_service::CharacterService;
use crate::application::services::enrichment_service::EnrichmentService;
use crate::application::services::equipment_service::EquipmentService;
use crate::application::services::spell_service::SpellService;
use crate::domain::catalog::ReferenceCatalog;
use crate::domain::rulebook::Rulebook;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::JsonFileRepository;
use crate::infrastructure::srd::SrdClient;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub character_service: CharacterService,
    pub equipment_service: EquipmentService,
    pub spell_service: SpellService,
    pub enrichment_service: EnrichmentService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let rulebook = Arc::new(Rulebook::srd());
        let catalog = Arc::new(load_catalog(&config).await?);
        let repository: Arc<dyn CharacterRepositoryPort> =
            Arc::new(JsonFileRepository::new(config.data_file.clone()));
        let srd: Arc<dyn SrdPort> = Arc::new(SrdClient::new(
            &config.srd_base_url,
            config.srd_request_interval_ms,
            config.srd_max_concurrency,
        ));

        let character_service =
            CharacterService::new(rulebook.clone(), catalog.clone(), repository.clone());
        let equipment_service =
            EquipmentService::new(rulebook.clone(), catalog.clone(), repository.clone());
        let spell_service = SpellService::new(catalog, repository.clone());
        let enrichment_service = EnrichmentService::new(rulebook, repository, srd);

        Ok(Self {
            config,
            character_service,
            equipment_service,
            spell_service,
            enrichment_service,
        })
    }
}

async fn load_catalog(config: &AppConfig) -> Result<ReferenceCatalog> {
    match &config.catalog_file {
        Some(path) => {
            let data = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read catalog file {}", path.display()))?;
            ReferenceCatalog::from_json(&data)
                .with_context(|| format!("invalid catalog file {}", path.display()))
        }
        None => Ok(ReferenceCatalog::builtin()),
    }
}
