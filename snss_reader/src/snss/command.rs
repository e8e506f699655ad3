//! Decoded command-log entries.

use std::fmt;

use super::error::Result;
use super::pickle::Pickle;

/// Every record shape the two dispatch tables know about.
///
/// Only [`CommandKind::UpdateTabNavigation`] is decoded; the rest are kept
/// as opaque payloads so they still show up in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandKind {
    UpdateTabNavigation,
    RestoredEntry,
    Window,
    SelectedNavigationInTab,
    PinnedState,
    SetExtensionAppId,
    SetTabWindow,
    SetTabIndexInWindow,
    TabClosed,
    WindowClosed,
    TabNavigationPathPrunedFromBack,
    SetSelectedNavigationIndex,
    SetSelectedTabInIndex,
    SetWindowType,
    TabNavigationPathPrunedFromFront,
    SetPinnedState,
    SetWindowBounds3,
    Unknown,
}

impl CommandKind {
    pub fn name(self) -> &'static str {
        match self {
            CommandKind::UpdateTabNavigation => "UpdateTabNavigation",
            CommandKind::RestoredEntry => "RestoredEntry",
            CommandKind::Window => "Window",
            CommandKind::SelectedNavigationInTab => "SelectedNavigationInTab",
            CommandKind::PinnedState => "PinnedState",
            CommandKind::SetExtensionAppId => "SetExtensionAppID",
            CommandKind::SetTabWindow => "SetTabWindow",
            CommandKind::SetTabIndexInWindow => "SetTabIndexInWindow",
            CommandKind::TabClosed => "TabClosed",
            CommandKind::WindowClosed => "WindowClosed",
            CommandKind::TabNavigationPathPrunedFromBack => "TabNavigationPathPrunedFromBack",
            CommandKind::SetSelectedNavigationIndex => "SetSelectedNavigationIndex",
            CommandKind::SetSelectedTabInIndex => "SetSelectedTabInIndex",
            CommandKind::SetWindowType => "SetWindowType",
            CommandKind::TabNavigationPathPrunedFromFront => "TabNavigationPathPrunedFromFront",
            CommandKind::SetPinnedState => "SetPinnedState",
            CommandKind::SetWindowBounds3 => "SetWindowBounds3",
            CommandKind::Unknown => "Unknown",
        }
    }

    /// Kinds whose payload carries the pickle length header.
    pub fn has_pickled_payload(self) -> bool {
        self == CommandKind::UpdateTabNavigation
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the command log.
///
/// Field accessors decode from a fresh copy of the payload cursor on every
/// call, so they are idempotent and never observe each other's position.
#[derive(Debug, Clone)]
pub struct CommandRecord<'a> {
    kind: CommandKind,
    type_code: u8,
    offset: usize,
    payload: Pickle<'a>,
    keep: bool,
}

impl<'a> CommandRecord<'a> {
    /// `offset` is the position of the record frame in the source file.
    pub fn new(kind: CommandKind, type_code: u8, offset: usize, payload: Pickle<'a>) -> Self {
        Self {
            kind,
            type_code,
            offset,
            payload,
            keep: true,
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn type_code(&self) -> u8 {
        self.type_code
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Raw payload bytes, excluding the size and type-code prefix.
    pub fn payload(&self) -> &'a [u8] {
        self.payload.as_bytes()
    }

    pub fn is_tab(&self) -> bool {
        self.kind == CommandKind::UpdateTabNavigation
    }

    pub fn tab_id(&self) -> Result<u32> {
        if !self.is_tab() {
            return Ok(0);
        }
        self.content_cursor().read_u32()
    }

    pub fn nav_index(&self) -> Result<u32> {
        if !self.is_tab() {
            return Ok(0);
        }
        let mut cursor = self.content_cursor();
        // tab id
        cursor.skip(4)?;
        cursor.read_u32()
    }

    pub fn url(&self) -> Result<String> {
        if !self.is_tab() {
            return Ok(String::new());
        }
        let mut cursor = self.content_cursor();
        // tab id, nav index
        cursor.skip(8)?;
        cursor.read_string()
    }

    pub fn keep(&self) -> bool {
        self.keep
    }

    pub fn set_keep(&mut self, keep: bool) {
        self.keep = keep;
    }

    fn content_cursor(&self) -> Pickle<'a> {
        let mut cursor = self.payload;
        cursor.reset_position();
        cursor
    }
}

impl fmt::Display for CommandRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_tab() {
            return write!(f, "{}", self.kind);
        }
        match (self.tab_id(), self.nav_index()) {
            (Ok(tab_id), Ok(index)) => write!(f, "Tab:{tab_id}-Index:{index}"),
            _ => write!(f, "Tab:?-Index:?"),
        }
    }
}
