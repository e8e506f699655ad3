//! Outer SNSS stream: an 8-byte header followed by size-prefixed commands.
//!
//! ```text
//! i32 magic ("SNSS") | i32 version | { u16 size | u8 type_code | [u8; size - 1] }*
//! ```

use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, warn};

use super::command::CommandRecord;
use super::error::{Result, SnssError};
use super::factory::{self, CommandTable};

pub const SNSS_MAGIC: i32 = 0x53534E53;
pub const HEADER_SIZE: usize = 8;

/// Width of the `u16` size field in front of each record.
const SIZE_FIELD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHeader {
    pub magic: i32,
    pub version: i32,
}

impl SessionHeader {
    /// Validate the magic and version at the start of `data`.
    pub fn read(data: &[u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(SnssError::FileTooSmall {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }

        let magic = LittleEndian::read_i32(&data[0..4]);
        if magic != SNSS_MAGIC {
            return Err(SnssError::InvalidMagic {
                expected: SNSS_MAGIC,
                got: magic,
            });
        }

        if data.len() < HEADER_SIZE {
            return Err(SnssError::FileTooSmall {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }

        let version = LittleEndian::read_i32(&data[4..8]);
        if version == 0 {
            return Err(SnssError::InvalidVersion(version));
        }

        Ok(SessionHeader { magic, version })
    }
}

/// Iterator over the commands of one SNSS stream, in file order.
///
/// Yields at most one framing error, after which iteration ends.
pub struct SessionStreamParser<'a> {
    data: &'a [u8],
    table: CommandTable,
    header: SessionHeader,
    offset: usize,
    done: bool,
}

impl<'a> SessionStreamParser<'a> {
    pub fn new(data: &'a [u8], table: CommandTable) -> Result<Self> {
        let header = SessionHeader::read(data)?;
        Ok(Self {
            data,
            table,
            header,
            offset: HEADER_SIZE,
            done: false,
        })
    }

    pub fn header(&self) -> SessionHeader {
        self.header
    }

    pub fn table(&self) -> CommandTable {
        self.table
    }

    /// Byte offset of the next record frame.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn next_record(&mut self) -> Result<CommandRecord<'a>> {
        let offset = self.offset;
        let available = self.data.len() - offset;

        if available < SIZE_FIELD {
            return Err(SnssError::TruncatedRecord {
                offset,
                declared: SIZE_FIELD,
                available,
            });
        }

        // The size counts the type-code byte and the payload.
        let size = LittleEndian::read_u16(&self.data[offset..offset + SIZE_FIELD]) as usize;
        if size == 0 {
            return Err(SnssError::EmptyRecord { offset });
        }

        let frame_len = SIZE_FIELD + size;
        if frame_len > available {
            return Err(SnssError::TruncatedRecord {
                offset,
                declared: frame_len,
                available,
            });
        }

        let type_code = self.data[offset + SIZE_FIELD];
        let payload = &self.data[offset + SIZE_FIELD + 1..offset + frame_len];
        self.offset += frame_len;

        Ok(factory::build_at(offset, type_code, payload, self.table))
    }
}

impl<'a> Iterator for SessionStreamParser<'a> {
    type Item = Result<CommandRecord<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset >= self.data.len() {
            return None;
        }

        let result = self.next_record();
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

/// A decoded SNSS file.
///
/// A framing error part-way through the stream does not discard the
/// records before it; it is kept in [`SessionFile::error`].
#[derive(Debug)]
pub struct SessionFile<'a> {
    header: SessionHeader,
    records: Vec<CommandRecord<'a>>,
    error: Option<SnssError>,
}

impl<'a> SessionFile<'a> {
    pub fn magic(&self) -> i32 {
        self.header.magic
    }

    pub fn version(&self) -> i32 {
        self.header.version
    }

    pub fn header(&self) -> SessionHeader {
        self.header
    }

    pub fn records(&self) -> &[CommandRecord<'a>] {
        &self.records
    }

    pub fn into_records(self) -> Vec<CommandRecord<'a>> {
        self.records
    }

    pub fn error(&self) -> Option<&SnssError> {
        self.error.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Decode a whole SNSS stream with the given dispatch table.
///
/// Header errors are returned as `Err` with no records. Framing errors end
/// the parse early and are reported alongside the records read so far.
pub fn parse(data: &[u8], table: CommandTable) -> Result<SessionFile<'_>> {
    let parser = SessionStreamParser::new(data, table)?;
    let header = parser.header();

    let mut records = Vec::new();
    let mut error = None;
    for item in parser {
        match item {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(error = %err, recovered = records.len(), "Session stream ended early");
                error = Some(err);
            }
        }
    }

    debug!(
        version = header.version,
        records = records.len(),
        ?table,
        "Parsed session stream"
    );

    Ok(SessionFile {
        header,
        records,
        error,
    })
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::snss::command::CommandKind;

    fn header(version: i32) -> Vec<u8> {
        let mut data = SNSS_MAGIC.to_le_bytes().to_vec();
        data.extend_from_slice(&version.to_le_bytes());
        data
    }

    fn push_record(data: &mut Vec<u8>, type_code: u8, payload: &[u8]) {
        data.extend_from_slice(&((payload.len() + 1) as u16).to_le_bytes());
        data.push(type_code);
        data.extend_from_slice(payload);
    }

    #[test]
    fn test_parse__header_only__then_empty_and_complete() {
        let data = header(1);
        let file = parse(&data, CommandTable::Tabs).unwrap();

        assert_eq!(file.magic(), SNSS_MAGIC);
        assert_eq!(file.version(), 1);
        assert!(file.records().is_empty());
        assert!(file.is_complete());
    }

    #[test]
    fn test_parse__magic_bytes__then_spell_snss() {
        assert_eq!(&SNSS_MAGIC.to_le_bytes(), b"SNSS");
    }

    #[test]
    fn test_parse__zero_magic__then_invalid_magic() {
        let mut data = vec![0, 0, 0, 0];
        data.extend_from_slice(&1i32.to_le_bytes());
        push_record(&mut data, 1, &[0; 8]);

        let err = parse(&data, CommandTable::Tabs).unwrap_err();
        assert!(matches!(err, SnssError::InvalidMagic { got: 0, .. }));
    }

    #[test]
    fn test_parse__magic_only__then_invalid_magic_checked_first() {
        let err = parse(&[0, 0, 0, 0], CommandTable::Tabs).unwrap_err();
        assert!(matches!(err, SnssError::InvalidMagic { .. }));
    }

    #[test]
    fn test_parse__zero_version__then_invalid_version() {
        let data = header(0);
        let err = parse(&data, CommandTable::Session).unwrap_err();
        assert!(matches!(err, SnssError::InvalidVersion(0)));
    }

    #[test]
    fn test_parse__short_file__then_file_too_small() {
        let err = parse(b"SN", CommandTable::Tabs).unwrap_err();
        assert!(matches!(
            err,
            SnssError::FileTooSmall {
                expected: 8,
                actual: 2
            }
        ));

        let err = parse(b"SNSS\x01", CommandTable::Tabs).unwrap_err();
        assert!(matches!(err, SnssError::FileTooSmall { actual: 5, .. }));
    }

    #[test]
    fn test_parse__records__then_file_order_and_offsets() {
        let mut data = header(3);
        push_record(&mut data, 3, &[0xAA]);
        push_record(&mut data, 99, &[]);
        push_record(&mut data, 5, &[1, 2, 3, 4]);

        let file = parse(&data, CommandTable::Tabs).unwrap();
        let kinds: Vec<_> = file.records().iter().map(|r| r.kind()).collect();
        assert_eq!(
            kinds,
            vec![CommandKind::Window, CommandKind::Unknown, CommandKind::PinnedState]
        );

        let offsets: Vec<_> = file.records().iter().map(|r| r.offset()).collect();
        assert_eq!(offsets, vec![8, 12, 15]);
        assert_eq!(file.records()[2].payload(), &[1, 2, 3, 4]);
        assert!(file.is_complete());
    }

    #[test]
    fn test_parse__truncated_record__then_partial_records_and_error() {
        let mut data = header(1);
        push_record(&mut data, 2, &[9, 9]);
        // Declares 50 bytes, provides 3.
        data.extend_from_slice(&50u16.to_le_bytes());
        data.extend_from_slice(&[4, 0, 0]);

        let file = parse(&data, CommandTable::Tabs).unwrap();
        assert_eq!(file.records().len(), 1);
        assert_eq!(file.records()[0].kind(), CommandKind::RestoredEntry);
        assert!(matches!(
            file.error(),
            Some(SnssError::TruncatedRecord {
                offset: 13,
                declared: 52,
                available: 5
            })
        ));
        assert!(!file.is_complete());
    }

    #[test]
    fn test_parse__dangling_size_byte__then_truncated() {
        let mut data = header(1);
        data.push(0x05);

        let file = parse(&data, CommandTable::Tabs).unwrap();
        assert!(file.records().is_empty());
        assert!(matches!(
            file.error(),
            Some(SnssError::TruncatedRecord {
                declared: 2,
                available: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_parse__zero_size_record__then_empty_record_error() {
        let mut data = header(1);
        push_record(&mut data, 4, &[]);
        data.extend_from_slice(&0u16.to_le_bytes());
        push_record(&mut data, 4, &[]);

        let file = parse(&data, CommandTable::Tabs).unwrap();
        assert_eq!(file.records().len(), 1);
        assert!(matches!(
            file.error(),
            Some(SnssError::EmptyRecord { offset: 11 })
        ));
    }

    #[test]
    fn test_stream_parser__iterator__then_stops_after_error() {
        let mut data = header(1);
        push_record(&mut data, 1, &[0; 4]);
        data.extend_from_slice(&9u16.to_le_bytes());

        let mut parser = SessionStreamParser::new(&data, CommandTable::Tabs).unwrap();
        assert_eq!(parser.header().version, 1);
        assert_eq!(parser.table(), CommandTable::Tabs);
        assert!(parser.next().unwrap().is_ok());
        assert_eq!(parser.offset(), 15);
        assert!(parser.next().unwrap().is_err());
        assert!(parser.next().is_none());
    }

    #[test]
    fn test_parse__same_bytes_two_tables__then_different_kinds() {
        let mut data = header(1);
        push_record(&mut data, 1, &[0; 4]);
        push_record(&mut data, 6, &[0; 4]);

        let tabs = parse(&data, CommandTable::Tabs).unwrap();
        let session = parse(&data, CommandTable::Session).unwrap();

        assert_eq!(tabs.records()[0].kind(), CommandKind::UpdateTabNavigation);
        assert_eq!(tabs.records()[1].kind(), CommandKind::SetExtensionAppId);
        assert_eq!(session.records()[0].kind(), CommandKind::Unknown);
        assert_eq!(session.records()[1].kind(), CommandKind::UpdateTabNavigation);
    }
}
