//! Infrastructure layer - Adapters for persistence, HTTP, and the
//! external rules API

pub mod config;
pub mod http;
pub mod persistence;
pub mod srd;
pub mod state;
