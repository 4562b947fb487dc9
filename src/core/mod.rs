//! Core business logic
//!
//! # Modules
//!
//! - [`export`] - per-page orchestration, dry-run planning and the run summary
//! - [`state`] - export tracker and its JSON storage
//! - [`convert`] - two-stage drawing → SVG → PNG conversion
//! - [`inject`] - placing generated images where Day One expects them
//!
//! # Export Workflow
//!
//! 1. **Load tracker**: selected notebook, journal and already exported pages
//! 2. **Scan**: list the notebook's pages from the reMarkable sync tree
//! 3. **Convert**: `.rm` → SVG → PNG in a scratch directory
//! 4. **Create entry**: run the `dayone` CLI with date, tags and body
//! 5. **Inject**: copy the PNG to the attachment path Day One reserved
//! 6. **Record**: persist the page id before moving on
//!
//! # Example
//!
//! ```rust,no_run
//! use remarkable_dayone::adapters::converters::{InkscapeStage, RmcStage};
//! use remarkable_dayone::adapters::dayone::{DayOneCli, DayOneStore};
//! use remarkable_dayone::adapters::remarkable::RemarkableCatalog;
//! use remarkable_dayone::config::AppSettings;
//! use remarkable_dayone::core::convert::ConversionPipeline;
//! use remarkable_dayone::core::export::{ExportCoordinator, ExportOptions};
//! use remarkable_dayone::core::inject::AttachmentInjector;
//! use remarkable_dayone::core::state::{ExportTracker, JsonFileStorage};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = AppSettings::default();
//! let tracker = ExportTracker::load(Arc::new(JsonFileStorage::new("config.json")))?;
//! let catalog = RemarkableCatalog::open("/path/to/remarkable/desktop")?
//!     .notebook(&tracker.state().notebook_id)?;
//!
//! let pipeline = ConversionPipeline::new(
//!     Arc::new(RmcStage::new(&settings.tools.rmc_bin)),
//!     Arc::new(InkscapeStage::new(&settings.tools.inkscape_bin)),
//!     &settings.tools.unsupported_stroke_pattern,
//! )?;
//! let store = DayOneStore::open("DayOne.sqlite", "DayOnePhotos")?;
//! let options = ExportOptions::new(tracker.state().journal_id.clone(), &settings.export);
//!
//! let mut coordinator = ExportCoordinator::new(
//!     pipeline,
//!     Arc::new(DayOneCli::new(&settings.tools.dayone_bin, &settings.export.date_format)),
//!     AttachmentInjector::new(Arc::new(store)),
//!     tracker,
//!     options,
//! );
//!
//! let summary = coordinator.execute_export(&catalog).await?;
//! println!("Exported: {}", summary.exported);
//! println!("Failed: {}", summary.failed);
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod export;
pub mod inject;
pub mod state;
