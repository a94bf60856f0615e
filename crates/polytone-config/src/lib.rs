//! Settings management for the polytone synthesizer.
//!
//! # Features
//!
//! - **Settings**: generator, gain, release window and output stream
//!   parameters, loaded from and saved to TOML
//! - **Validation**: reject values the engine or driver can't use before
//!   anything is opened
//! - **Paths**: platform-specific config directory
//!
//! # Example
//!
//! ```rust,no_run
//! use polytone_config::{Settings, default_config_path, load_or_default};
//!
//! let settings = load_or_default(default_config_path()).unwrap();
//! let config = settings.synth_config().unwrap();
//!
//! let mut tweaked = Settings::default();
//! tweaked.generator = "organ".to_string();
//! tweaked.save(default_config_path()).unwrap();
//! ```

mod error;
mod settings;

/// Platform-specific configuration paths.
pub mod paths;

pub use error::ConfigError;
pub use paths::{default_config_path, load_or_default, user_config_dir};
pub use settings::{AudioSettings, Settings};
