//! Error taxonomy shared by all use cases
//!
//! Everything is value-returned. Mutating commands abort on the first
//! error without persisting; enrichment treats collaborator failures
//! as best-effort and logs instead.

/// Failure modes surfaced by the application services
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// A character, weapon, armor, shield, or spell was referenced
    /// but does not exist
    #[error("{0}")]
    NotFound(String),

    /// The operation would overwrite existing state: an occupied
    /// equipment slot, an already-known spell, a taken character name
    #[error("{0}")]
    Conflict(String),

    /// The input is malformed or violates a rule: wrong ability-score
    /// count, unknown class, spell level above the available slots
    #[error("{0}")]
    Validation(String),

    /// The persistence collaborator failed
    #[error("storage error: {0}")]
    Storage(#[source] anyhow::Error),

    /// The rules-lookup collaborator failed
    #[error("rules lookup failed: {0}")]
    Lookup(#[source] anyhow::Error),
}

impl SheetError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        SheetError::NotFound(what.to_string())
    }

    pub fn conflict(what: impl std::fmt::Display) -> Self {
        SheetError::Conflict(what.to_string())
    }

    pub fn validation(what: impl std::fmt::Display) -> Self {
        SheetError::Validation(what.to_string())
    }
}
