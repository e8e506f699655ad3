//! Type-code dispatch for the two SNSS files.
//!
//! `Current Tabs` and `Current Session` number their commands differently,
//! so the same code maps to different kinds depending on the table. The
//! table must be picked from the file being read and used for the whole
//! stream.

use tracing::{trace, warn};

use super::command::{CommandKind, CommandRecord};
use super::pickle::Pickle;

/// Dispatch table used by `Current Tabs`.
pub const TABS_TABLE: &[(u8, CommandKind)] = &[
    (1, CommandKind::UpdateTabNavigation),
    (2, CommandKind::RestoredEntry),
    (3, CommandKind::Window),
    (4, CommandKind::SelectedNavigationInTab),
    (5, CommandKind::PinnedState),
    (6, CommandKind::SetExtensionAppId),
];

/// Dispatch table used by `Current Session`.
pub const SESSION_TABLE: &[(u8, CommandKind)] = &[
    (0, CommandKind::SetTabWindow),
    (2, CommandKind::SetTabIndexInWindow),
    (3, CommandKind::TabClosed),
    (4, CommandKind::WindowClosed),
    (5, CommandKind::TabNavigationPathPrunedFromBack),
    (6, CommandKind::UpdateTabNavigation),
    (7, CommandKind::SetSelectedNavigationIndex),
    (8, CommandKind::SetSelectedTabInIndex),
    (9, CommandKind::SetWindowType),
    (11, CommandKind::TabNavigationPathPrunedFromFront),
    (12, CommandKind::SetPinnedState),
    (13, CommandKind::SetExtensionAppId),
    (14, CommandKind::SetWindowBounds3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandTable {
    Tabs,
    Session,
}

impl CommandTable {
    pub fn entries(self) -> &'static [(u8, CommandKind)] {
        match self {
            CommandTable::Tabs => TABS_TABLE,
            CommandTable::Session => SESSION_TABLE,
        }
    }

    /// Unknown codes are expected and map to [`CommandKind::Unknown`].
    pub fn lookup(self, type_code: u8) -> CommandKind {
        self.entries()
            .iter()
            .find(|(code, _)| *code == type_code)
            .map(|(_, kind)| *kind)
            .unwrap_or(CommandKind::Unknown)
    }
}

/// Build a record for `payload` as found at the start of a file.
pub fn build(type_code: u8, payload: &[u8], table: CommandTable) -> CommandRecord<'_> {
    build_at(0, type_code, payload, table)
}

/// Build a record whose frame starts at `offset` in the source file.
///
/// Kinds with a pickled payload have their cursor initialized here. A bad
/// length header is logged and leaves the cursor uninitialized, so field
/// reads on that record fail instead of decoding garbage.
pub fn build_at(
    offset: usize,
    type_code: u8,
    payload: &[u8],
    table: CommandTable,
) -> CommandRecord<'_> {
    let kind = table.lookup(type_code);
    if kind == CommandKind::Unknown {
        trace!(offset, type_code, ?table, "Unknown command type");
    }

    let mut pickle = Pickle::new(payload);
    if kind.has_pickled_payload() {
        if let Err(err) = pickle.initialize_payload() {
            warn!(offset, %kind, error = %err, "Malformed pickle header");
        }
    }

    CommandRecord::new(kind, type_code, offset, pickle)
}
