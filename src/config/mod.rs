//! Configuration module — `.candado.toml` settings.

pub mod settings;

pub use settings::Settings;
