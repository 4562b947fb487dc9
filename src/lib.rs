//! # remarkable-dayone
//!
//! Exports handwritten reMarkable notebook pages into Day One as dated journal entries,
//! one entry per page with the page image attached. Runs are incremental: every page
//! that produced an entry is recorded, so running again only exports what is new.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (export orchestration, tracker, conversion, injection)
//! - [`adapters`] - External integrations (reMarkable sync tree, Day One, converters)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Settings and path resolution
//! - [`logging`] - Structured logging
//!
//! ## Export Pipeline
//!
//! For each page of the selected notebook that is not yet recorded:
//!
//! 1. `rmc` renders the `.rm` drawing to SVG, Inkscape renders the SVG to PNG
//! 2. `dayone new` creates the entry with the page date, tags and body text
//! 3. the PNG is copied to the attachment path Day One reserved for the entry
//! 4. the page id is written to the tracker before the next page starts
//!
//! A failing page is reported and left unrecorded; the run continues with the next one.
//!
//! ## Tracker
//!
//! ```rust,no_run
//! use remarkable_dayone::core::state::{ExportTracker, JsonFileStorage};
//! use remarkable_dayone::domain::PageId;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = Arc::new(JsonFileStorage::new("config.json"));
//! let mut tracker = ExportTracker::load(storage)?;
//!
//! let page = PageId::new("0b7a5a2e-6d1c-4a8e-9f52-3f3a52d1c9aa")?;
//! if !tracker.is_exported(&page) {
//!     tracker.mark_exported(&page)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
