//! Decoder for Chromium SNSS session-recovery files.
//!
//! ```no_run
//! use std::path::Path;
//! use snss_reader::snss::{self, SessionFileKind, SessionSource};
//!
//! # fn main() -> snss_reader::snss::Result<()> {
//! let source = SessionSource::open(
//!     Path::new("Default/Current Tabs"),
//!     SessionFileKind::CurrentTabs,
//! )?;
//! let file = source.parse()?;
//! let tabs = snss::tabs::build(file.into_records());
//! for entry in tabs.entries() {
//!     println!("{} {}", entry.tab_id, entry.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod snss;

pub use snss::{
    CommandKind, CommandRecord, CommandTable, SessionFile, SessionFileKind, SessionSource,
    SnssError, TabEntry, TabIndex,
};
