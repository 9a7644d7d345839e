//! Read-only repertoire browser for a worship team: a fixed song catalog with
//! search, date ordering, CSV export and a video player overlay, driven from a
//! Ratatui terminal UI.
//!
//! The core (`catalog`, `media`, `query`, `export`) has no terminal
//! dependencies and can be used on its own.
pub mod catalog;
pub mod config;
pub mod export;
pub mod logging;
pub mod media;
pub mod models;
pub mod query;
pub mod ui;

pub use catalog::{Catalog, CatalogError};
pub use config::AppPaths;
pub use export::{save_csv, to_csv, ExportScope, CSV_MIME};
pub use media::{embed_url, extract_video_id, is_recognized_media_url};
pub use models::{DateOrder, Song};
pub use query::{parse_last_played, query};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
