//! Domain models and types.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PageId`], [`NotebookId`], [`EntryId`])
//! - **Domain models** ([`PageRecord`], [`NotebookSummary`])
//! - **Error types** ([`AppError`] for fatal failures, plus the page-scoped
//!   [`ConversionError`], [`EntryCreationError`] and [`InjectionError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! ```rust
//! use remarkable_dayone::domain::{EntryId, PageId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let page_id = PageId::new("0b7a5a2e-6d1c-4a8e-9f52-3f3a52d1c9aa")?;
//! let entry_id = EntryId::new("5F2B1C1E0E6D4B7A9B550123456789AB")?;
//!
//! // let wrong: PageId = entry_id;  // Compile error!
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod page;
pub mod result;

pub use errors::{AppError, ConversionError, EntryCreationError, InjectionError, PageErrorDetail};
pub use ids::{EntryId, NotebookId, PageId};
pub use page::{NotebookSummary, PageRecord, PageRecordBuilder};
pub use result::Result;
