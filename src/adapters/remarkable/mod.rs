//! reMarkable desktop sync tree adapter
//!
//! Provides the page catalog: which handwritten notebooks exist and which pages of the
//! selected notebook have drawing content.

pub mod catalog;
pub mod models;

pub use catalog::{NotebookCatalog, RemarkableCatalog};
