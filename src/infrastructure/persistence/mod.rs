//! Persistence adapters

mod character_repository;

pub use character_repository::JsonFileRepository;
