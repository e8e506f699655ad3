//! Reduce the flat command log to one current record per tab.
//!
//! Every navigation a tab made is logged; the entry with the highest
//! navigation index is the one the tab was showing. Ties go to the entry
//! that appears first in the file.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use super::command::CommandRecord;

/// What the front end shows for one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabEntry {
    pub tab_id: u32,
    pub nav_index: u32,
    pub url: String,
    pub keep: bool,
}

/// All navigation records of one tab, highest navigation index first.
#[derive(Debug)]
pub struct TabGroup<'a> {
    tab_id: u32,
    members: Vec<(u32, CommandRecord<'a>)>,
}

impl<'a> TabGroup<'a> {
    pub fn tab_id(&self) -> u32 {
        self.tab_id
    }

    pub fn representative(&self) -> &CommandRecord<'a> {
        &self.members[0].1
    }

    pub fn representative_mut(&mut self) -> &mut CommandRecord<'a> {
        &mut self.members[0].1
    }

    /// Navigation index of the representative.
    pub fn nav_index(&self) -> u32 {
        self.members[0].0
    }

    pub fn members(&self) -> impl Iterator<Item = &CommandRecord<'a>> {
        self.members.iter().map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn entry(&self) -> TabEntry {
        let record = self.representative();
        let url = record.url().unwrap_or_else(|err| {
            warn!(tab_id = self.tab_id, error = %err, "Unreadable tab URL");
            String::new()
        });

        TabEntry {
            tab_id: self.tab_id,
            nav_index: self.nav_index(),
            url,
            keep: record.keep(),
        }
    }
}

/// Tab groups keyed by tab id, in ascending id order.
#[derive(Debug, Default)]
pub struct TabIndex<'a> {
    groups: BTreeMap<u32, TabGroup<'a>>,
}

impl<'a> TabIndex<'a> {
    /// Representative record of `tab_id`.
    pub fn get(&self, tab_id: u32) -> Option<&CommandRecord<'a>> {
        self.groups.get(&tab_id).map(TabGroup::representative)
    }

    pub fn group(&self, tab_id: u32) -> Option<&TabGroup<'a>> {
        self.groups.get(&tab_id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &TabGroup<'a>> {
        self.groups.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &CommandRecord<'a>)> {
        self.groups
            .iter()
            .map(|(tab_id, group)| (*tab_id, group.representative()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns `false` when no tab has this id.
    pub fn set_keep(&mut self, tab_id: u32, keep: bool) -> bool {
        match self.groups.get_mut(&tab_id) {
            Some(group) => {
                group.representative_mut().set_keep(keep);
                true
            }
            None => false,
        }
    }

    pub fn entries(&self) -> Vec<TabEntry> {
        self.groups.values().map(TabGroup::entry).collect()
    }

    /// URLs of the tabs still marked to keep, in tab id order.
    pub fn kept_urls(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.keep && !entry.url.is_empty())
            .map(|entry| entry.url)
            .collect()
    }
}

/// Group tab records by tab id and pick each group's representative.
///
/// Non-tab records are dropped. Records whose id or index cannot be read
/// are logged and skipped.
pub fn build<'a>(records: impl IntoIterator<Item = CommandRecord<'a>>) -> TabIndex<'a> {
    let mut grouped: BTreeMap<u32, Vec<(u32, CommandRecord<'a>)>> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in records.into_iter().filter(CommandRecord::is_tab) {
        let keys = record
            .tab_id()
            .and_then(|tab_id| record.nav_index().map(|index| (tab_id, index)));
        match keys {
            Ok((tab_id, index)) => grouped.entry(tab_id).or_default().push((index, record)),
            Err(err) => {
                warn!(offset = record.offset(), error = %err, "Skipping unreadable tab record");
                skipped += 1;
            }
        }
    }

    let groups: BTreeMap<_, _> = grouped
        .into_iter()
        .map(|(tab_id, mut members)| {
            // Stable: equal indices keep file order.
            members.sort_by_key(|(index, _)| Reverse(*index));
            (tab_id, TabGroup { tab_id, members })
        })
        .collect();

    debug!(tabs = groups.len(), skipped, "Built tab index");
    TabIndex { groups }
}
