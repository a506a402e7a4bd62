//! Outbound ports - Interfaces the application depends on

mod repository_port;
mod srd_port;

pub use repository_port::CharacterRepositoryPort;
pub use srd_port::{EquipmentCatalog, SrdPort};
