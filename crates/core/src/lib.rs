#![warn(clippy::all, missing_docs)]

//! Core domain logic for the Board Games Codex terminal browser.
//!
//! This crate hosts the catalog data model, configuration handling,
//! catalog loading (local file or one-shot remote fetch with a cached
//! copy), and the pure filter/search pipeline used by the terminal UI.

pub mod catalog;
pub mod config;
pub mod manifest;
pub mod models;

pub use catalog::{CatalogError, CatalogSource, CatalogStore};
pub use config::AppConfig;
pub use manifest::CatalogManifest;
pub use models::Game;
