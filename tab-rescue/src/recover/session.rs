//! Turning a decoded session file into what the commands print.

use std::collections::BTreeMap;

use snss_reader::snss::tabs;
use snss_reader::{CommandRecord, SessionFile, TabIndex};
use tracing::warn;

use super::profile::Target;

/// One line of the record dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub offset: usize,
    pub type_code: u8,
    pub kind: &'static str,
    pub payload_len: usize,
    /// `Tab:<id>-Index:<n>` for navigation records.
    pub tab: Option<String>,
}

/// Header and record statistics of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub path: String,
    pub file: String,
    pub version: i32,
    pub record_count: usize,
    pub tab_count: usize,
    pub kind_counts: Vec<(&'static str, usize)>,
    /// Why decoding stopped early, if it did.
    pub damage: Option<String>,
}

/// Build the tab index and mark the dropped tabs as not kept.
pub fn recover_tabs<'a>(records: Vec<CommandRecord<'a>>, drop: &[u32]) -> TabIndex<'a> {
    let mut index = tabs::build(records);
    for tab_id in drop {
        if !index.set_keep(*tab_id, false) {
            warn!(tab_id, "No recovered tab with this id");
        }
    }
    index
}

pub fn record_rows(file: &SessionFile<'_>) -> Vec<RecordRow> {
    file.records()
        .iter()
        .map(|record| RecordRow {
            offset: record.offset(),
            type_code: record.type_code(),
            kind: record.kind().name(),
            payload_len: record.payload().len(),
            tab: record.is_tab().then(|| record.to_string()),
        })
        .collect()
}

pub fn summarize(target: &Target, file: &SessionFile<'_>) -> Summary {
    let mut kind_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for record in file.records() {
        *kind_counts.entry(record.kind().name()).or_insert(0) += 1;
    }

    let tab_count = tabs::build(file.records().iter().cloned()).len();

    Summary {
        path: target.path.display().to_string(),
        file: target.kind.to_string(),
        version: file.version(),
        record_count: file.records().len(),
        tab_count,
        kind_counts: kind_counts.into_iter().collect(),
        damage: file.error().map(|err| err.to_string()),
    }
}
