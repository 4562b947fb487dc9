// Export tracker: persisted selection and exported-page set

pub mod record;
pub mod storage;
pub mod tracker;

pub use record::TrackerState;
pub use storage::{JsonFileStorage, TrackerStorage};
pub use tracker::ExportTracker;
