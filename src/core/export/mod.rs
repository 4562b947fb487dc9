//! Export orchestration

pub mod coordinator;
pub mod entry;
pub mod plan;
pub mod summary;

pub use coordinator::{ExportCoordinator, ExportOptions, ProgressCallback};
pub use entry::{CreatedEntry, EntryCreator, NewEntry};
pub use plan::ExportPlan;
pub use summary::{ExportSummary, FailureStage, PageOutcome, PageReport};
