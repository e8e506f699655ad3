//! Output formatters for recovery results
//!
//! Supports text and JSON output formats.

use serde::Serialize;
use snss_reader::TabEntry;

use super::session::{RecordRow, Summary};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format '{}'. Use 'text' or 'json'", s)),
        }
    }
}

/// Format recovered tabs
pub fn format_tabs(entries: &[TabEntry], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_tabs_text(entries),
        OutputFormat::Json => format_tabs_json(entries),
    }
}

fn format_tabs_text(entries: &[TabEntry]) -> String {
    let mut output = String::new();
    output.push_str(&format!("Tabs ({}):\n\n", entries.len()));
    for entry in entries {
        let mark = if entry.keep { "x" } else { " " };
        output.push_str(&format!(
            "[{}] {:>6}  #{:<4} {}\n",
            mark, entry.tab_id, entry.nav_index, entry.url
        ));
    }
    output
}

fn format_tabs_json(entries: &[TabEntry]) -> String {
    #[derive(Serialize)]
    struct JsonTabs<'a> {
        count: usize,
        tabs: &'a [TabEntry],
    }

    let json_tabs = JsonTabs {
        count: entries.len(),
        tabs: entries,
    };

    serde_json::to_string_pretty(&json_tabs).unwrap_or_else(|_| "{}".to_string()) + "\n"
}

/// Format the URLs to reopen
pub fn format_urls(urls: &[String], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => urls.iter().map(|url| format!("{}\n", url)).collect(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(urls).unwrap_or_else(|_| "[]".to_string()) + "\n"
        }
    }
}

/// Format the record dump
pub fn format_records(rows: &[RecordRow], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_records_text(rows),
        OutputFormat::Json => format_records_json(rows),
    }
}

fn format_records_text(rows: &[RecordRow]) -> String {
    let mut output = String::new();
    output.push_str(&format!("Records ({}):\n\n", rows.len()));
    for row in rows {
        output.push_str(&format!(
            "{:>8}  {:>3}  {:<32} {:>5} bytes",
            row.offset, row.type_code, row.kind, row.payload_len
        ));
        if let Some(ref tab) = row.tab {
            output.push_str(&format!("  {}", tab));
        }
        output.push('\n');
    }
    output
}

fn format_records_json(rows: &[RecordRow]) -> String {
    #[derive(Serialize)]
    struct JsonRecords {
        count: usize,
        records: Vec<JsonRecord>,
    }

    #[derive(Serialize)]
    struct JsonRecord {
        offset: usize,
        type_code: u8,
        kind: &'static str,
        payload_len: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        tab: Option<String>,
    }

    let json_records = JsonRecords {
        count: rows.len(),
        records: rows
            .iter()
            .map(|row| JsonRecord {
                offset: row.offset,
                type_code: row.type_code,
                kind: row.kind,
                payload_len: row.payload_len,
                tab: row.tab.clone(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&json_records).unwrap_or_else(|_| "{}".to_string()) + "\n"
}

/// Format file summary
pub fn format_summary(summary: &Summary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_summary_text(summary),
        OutputFormat::Json => format_summary_json(summary),
    }
}

fn format_summary_text(summary: &Summary) -> String {
    let mut output = String::new();

    output.push_str(&format!("File:    {} ({})\n", summary.file, summary.path));
    output.push_str(&format!("Version: {}\n", summary.version));
    output.push_str(&format!("Records: {:>6}\n", summary.record_count));
    output.push_str(&format!("Tabs:    {:>6}\n", summary.tab_count));

    if !summary.kind_counts.is_empty() {
        output.push('\n');
        for (kind, count) in &summary.kind_counts {
            output.push_str(&format!("{:<32} {:>6}\n", kind, count));
        }
    }

    if let Some(ref damage) = summary.damage {
        output.push_str(&format!("\nDamaged: {}\n", damage));
    }

    output
}

fn format_summary_json(summary: &Summary) -> String {
    #[derive(Serialize)]
    struct JsonSummary<'a> {
        path: &'a str,
        file: &'a str,
        version: i32,
        record_count: usize,
        tab_count: usize,
        kinds: Vec<JsonKindCount>,
        damage: Option<&'a str>,
    }

    #[derive(Serialize)]
    struct JsonKindCount {
        kind: &'static str,
        count: usize,
    }

    let json_summary = JsonSummary {
        path: &summary.path,
        file: &summary.file,
        version: summary.version,
        record_count: summary.record_count,
        tab_count: summary.tab_count,
        kinds: summary
            .kind_counts
            .iter()
            .map(|(kind, count)| JsonKindCount {
                kind: *kind,
                count: *count,
            })
            .collect(),
        damage: summary.damage.as_deref(),
    };

    serde_json::to_string_pretty(&json_summary).unwrap_or_else(|_| "{}".to_string()) + "\n"
}
