//! External system integrations
//!
//! - [`remarkable`] - reMarkable desktop sync tree (page catalog)
//! - [`dayone`] - Day One CLI and database
//! - [`converters`] - `rmc` and Inkscape conversion stages
//! - [`process`] - shared external command runner
//!
//! # Design Pattern
//!
//! Adapters implement the capability traits defined in [`crate::core`]
//! ([`ConversionStage`](crate::core::convert::ConversionStage),
//! [`EntryCreator`](crate::core::export::EntryCreator),
//! [`AttachmentLocator`](crate::core::inject::AttachmentLocator)) so the export
//! coordinator can run against test doubles without the real tools installed.

pub mod converters;
pub mod dayone;
pub mod process;
pub mod remarkable;
