//! Shared types, error model, and configuration for togglenote.
//!
//! This crate is the foundation depended on by all other togglenote crates.
//! It provides:
//! - [`TogglenoteError`] — the unified error type
//! - Domain types ([`BlockId`], [`Block`], [`BlockKind`], [`RichText`]) and
//!   fragment splitting ([`split_fragments`])
//! - Configuration ([`AppConfig`], [`NotionConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ClassifierConfig, DEFAULT_PORT, NotionConfig, ServerConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{Result, TogglenoteError};
pub use types::{
    Block, BlockId, BlockKind, RichText, SENTENCE_DELIMITER, TOGGLE_TYPE, split_fragments,
};
