//! Configuration module for scaffold.
//!
//! Handles the TOML settings file, its defaults, and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, GenerationSettings, LoaderSettings, NamingSettings, RowCapSettings,
    Settings, SettingsError,
};
