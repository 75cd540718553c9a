//! `tempo-cli.toml`: schema, loading, validation and credential persistence.

pub mod loader;
pub mod schema;
pub mod store;

pub use {
    loader::{default_config_path, load_config},
    schema::TempoCliConfig,
    store::ConfigFileStore,
};
