// Infrastructure layer - Configuration, logging and storage adapters
pub mod config;
pub mod file_store;
pub mod logging;
pub mod memory_store;
