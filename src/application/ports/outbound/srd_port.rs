//! Rules-lookup port - Interface to the public SRD API
//!
//! The core treats the lookup as a blocking call that returns a
//! completed catalog or an error; any rate limiting, fan-out, or
//! timeout policy belongs to the adapter behind this trait.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::application::error::SheetError;
use crate::domain::entities::{Armor, Shield, Spell, Weapon};
use crate::domain::value_objects::ClassId;

/// A resolved equipment catalog from the rules API
#[derive(Debug, Default)]
pub struct EquipmentCatalog {
    pub weapons: Vec<Weapon>,
    pub armor: Option<Armor>,
    pub shield: Option<Shield>,
}

/// Port for the external spell/equipment lookup service
#[async_trait]
pub trait SrdPort: Send + Sync {
    /// Fetch spells available to a class, limited to levels for which
    /// the character has slots (level 0 included for cantrips), at
    /// most `count` picks per level.
    async fn spells_for_class(
        &self,
        class: ClassId,
        slots: &BTreeMap<u8, u8>,
    ) -> Result<Vec<Spell>, SheetError>;

    /// Fetch the equipment catalog: all weapons plus one armor and
    /// one shield record
    async fn equipment_catalog(&self) -> Result<EquipmentCatalog, SheetError>;
}
