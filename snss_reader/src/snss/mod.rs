//! SNSS session-recovery file decoding.

pub mod command;
pub mod error;
pub mod factory;
pub mod pickle;
pub mod source;
pub mod stream;
pub mod tabs;

pub use command::{CommandKind, CommandRecord};
pub use error::{Result, SnssError};
pub use factory::{CommandTable, SESSION_TABLE, TABS_TABLE};
pub use pickle::{Pickle, INVALID_STRING};
pub use source::{SessionFileKind, SessionSource};
pub use stream::{parse, SessionFile, SessionHeader, SessionStreamParser, HEADER_SIZE, SNSS_MAGIC};
pub use tabs::{TabEntry, TabGroup, TabIndex};
