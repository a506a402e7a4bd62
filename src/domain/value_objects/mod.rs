//! Value objects - Immutable objects defined by their attributes

mod ability;
mod class;
pub mod skill;

pub use ability::Ability;
pub use class::{CasterKind, ClassId};
