//! Day One integration
//!
//! - [`DayOneCli`] creates entries through the `dayone` command
//! - [`DayOneStore`] reads journal names and reserved attachments from `DayOne.sqlite`

pub mod cli;
pub mod store;

pub use cli::DayOneCli;
pub use store::DayOneStore;
