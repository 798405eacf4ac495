pub mod repository;
pub mod run_config;
