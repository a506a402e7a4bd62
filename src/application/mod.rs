//! Application layer - Use cases and ports

pub mod error;
pub mod ports;
pub mod services;
