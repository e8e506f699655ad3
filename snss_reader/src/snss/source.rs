//! The two SNSS files a Chromium profile keeps, and read-only access to them.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use super::error::{Result, SnssError};
use super::factory::CommandTable;
use super::stream::{self, SessionFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionFileKind {
    /// `Current Tabs`, written while the browser runs.
    CurrentTabs,
    /// `Current Session`, the per-window session log.
    CurrentSession,
}

impl SessionFileKind {
    pub fn file_name(self) -> &'static str {
        match self {
            SessionFileKind::CurrentTabs => "Current Tabs",
            SessionFileKind::CurrentSession => "Current Session",
        }
    }

    /// The dispatch table this file's type codes are numbered by.
    pub fn table(self) -> CommandTable {
        match self {
            SessionFileKind::CurrentTabs => CommandTable::Tabs,
            SessionFileKind::CurrentSession => CommandTable::Session,
        }
    }

    pub fn path_in(self, profile_dir: &Path) -> PathBuf {
        profile_dir.join(self.file_name())
    }
}

impl fmt::Display for SessionFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

impl FromStr for SessionFileKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tabs" | "current-tabs" => Ok(SessionFileKind::CurrentTabs),
            "session" | "current-session" => Ok(SessionFileKind::CurrentSession),
            _ => Err(format!("Unknown session file '{}'. Use 'tabs' or 'session'", s)),
        }
    }
}

/// A session file read fully into memory.
///
/// The browser may rewrite or truncate the file while it is being
/// recovered, so nothing is read from disk after `open`. Records parsed
/// from a source borrow sub-slices of its one buffer.
pub struct SessionSource {
    path: PathBuf,
    kind: SessionFileKind,
    bytes: Vec<u8>,
}

impl SessionSource {
    pub fn open(path: &Path, kind: SessionFileKind) -> Result<Self> {
        let bytes = fs::read(path).map_err(|err| SnssError::io(path, err))?;

        debug!(path = %path.display(), %kind, len = bytes.len(), "Read session file");
        Ok(SessionSource {
            path: path.to_path_buf(),
            kind,
            bytes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> SessionFileKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Parse with the table that matches this file's kind.
    pub fn parse(&self) -> Result<SessionFile<'_>> {
        stream::parse(self.bytes(), self.kind.table())
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::snss::stream::SNSS_MAGIC;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_kind__names_and_tables__then_paired() {
        assert_eq!(SessionFileKind::CurrentTabs.file_name(), "Current Tabs");
        assert_eq!(SessionFileKind::CurrentTabs.table(), CommandTable::Tabs);
        assert_eq!(SessionFileKind::CurrentSession.file_name(), "Current Session");
        assert_eq!(SessionFileKind::CurrentSession.table(), CommandTable::Session);
        assert_eq!(
            SessionFileKind::CurrentSession.path_in(Path::new("/profile")),
            PathBuf::from("/profile/Current Session")
        );
    }

    #[test]
    fn test_file_kind__from_str__then_parsed() {
        assert_eq!(
            "tabs".parse::<SessionFileKind>().unwrap(),
            SessionFileKind::CurrentTabs
        );
        assert_eq!(
            "SESSION".parse::<SessionFileKind>().unwrap(),
            SessionFileKind::CurrentSession
        );
        assert!("history".parse::<SessionFileKind>().is_err());
    }

    #[test]
    fn test_source__open_missing__then_io_error() {
        let result = SessionSource::open(
            Path::new("/nonexistent/Current Tabs"),
            SessionFileKind::CurrentTabs,
        );
        assert!(matches!(result, Err(SnssError::Io { .. })));
    }

    #[test]
    fn test_source__empty_file__then_file_too_small() {
        let file = NamedTempFile::new().unwrap();
        let source = SessionSource::open(file.path(), SessionFileKind::CurrentTabs).unwrap();

        assert!(source.bytes().is_empty());
        assert!(matches!(
            source.parse(),
            Err(SnssError::FileTooSmall { actual: 0, .. })
        ));
    }

    #[test]
    fn test_source__header_only__then_parsed_with_kind_table() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&SNSS_MAGIC.to_le_bytes()).unwrap();
        file.write_all(&3i32.to_le_bytes()).unwrap();
        file.flush().unwrap();

        let source = SessionSource::open(file.path(), SessionFileKind::CurrentSession).unwrap();
        assert_eq!(source.kind(), SessionFileKind::CurrentSession);
        assert_eq!(source.path(), file.path());
        assert_eq!(source.bytes().len(), 8);

        let parsed = source.parse().unwrap();
        assert_eq!(parsed.version(), 3);
        assert!(parsed.records().is_empty());
    }

    #[test]
    fn test_source__file_truncated_after_open__then_parses_bytes_read_at_open() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&SNSS_MAGIC.to_le_bytes()).unwrap();
        file.write_all(&1i32.to_le_bytes()).unwrap();
        // One Window record in the tabs table, then filler records.
        for _ in 0..1024 {
            file.write_all(&[5, 0, 3, 0, 0, 0, 0]).unwrap();
        }
        file.flush().unwrap();

        let source = SessionSource::open(file.path(), SessionFileKind::CurrentTabs).unwrap();
        file.as_file().set_len(0).unwrap();

        let parsed = source.parse().unwrap();
        assert!(parsed.is_complete());
        assert_eq!(parsed.records().len(), 1024);
        assert_eq!(source.bytes().len(), 8 + 1024 * 7);
    }
}
