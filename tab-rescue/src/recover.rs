//! Recovery commands for tab-rescue
//!
//! Opens the selected session file, decodes it, and renders the result.

pub mod output;
pub mod profile;
pub mod session;

use anyhow::{Context, Result};
use snss_reader::SessionSource;
use tracing::warn;

pub use output::OutputFormat;
pub use profile::Target;

/// What to render from a decoded session file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Tabs { drop: Vec<u32> },
    Urls { drop: Vec<u32> },
    Records,
    Summary,
}

/// Decode `target` and render `request` in `format`.
///
/// A file whose header is rejected is an error. A file that ends in the
/// middle of a record is rendered from the records before the damage.
pub fn run(target: &Target, request: &Request, format: OutputFormat) -> Result<String> {
    let source = SessionSource::open(&target.path, target.kind)
        .with_context(|| format!("Failed to open {} at {:?}", target.kind, target.path))?;
    let file = source
        .parse()
        .with_context(|| format!("Failed to decode {} at {:?}", target.kind, target.path))?;

    if let Some(err) = file.error() {
        warn!(
            path = %target.path.display(),
            error = %err,
            recovered = file.records().len(),
            "Session file is damaged; using the records before the damage"
        );
    }

    let output = match request {
        Request::Tabs { drop } => {
            let tabs = session::recover_tabs(file.into_records(), drop);
            output::format_tabs(&tabs.entries(), format)
        }
        Request::Urls { drop } => {
            let tabs = session::recover_tabs(file.into_records(), drop);
            output::format_urls(&tabs.kept_urls(), format)
        }
        Request::Records => output::format_records(&session::record_rows(&file), format),
        Request::Summary => output::format_summary(&session::summarize(target, &file), format),
    };

    Ok(output)
}
