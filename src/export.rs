//! CSV export of song lists. [`to_csv`] only builds the document; writing it
//! to disk is [`save_csv`]'s job, which the TUI calls with its export
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::Song;

/// MIME type advertised for exported documents.
pub const CSV_MIME: &str = "text/csv;charset=utf-8";

/// Byte-order mark so spreadsheet tools detect UTF-8.
const BOM: char = '\u{feff}';

const HEADERS: [&str; 5] = ["id", "title", "link", "key", "tags"];

/// Separator placed between tags inside the single `tags` column.
const TAG_SEPARATOR: &str = " | ";

/// Which rows an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    /// The whole catalog.
    All,
    /// The view currently on screen.
    Filtered,
}

impl ExportScope {
    pub fn filename(self) -> &'static str {
        match self {
            ExportScope::All => "atrium_praise_todas.csv",
            ExportScope::Filtered => "atrium_praise_filtradas.csv",
        }
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn row_line(song: &Song) -> String {
    let tags = song.tags.join(TAG_SEPARATOR);
    [
        song.id.as_str(),
        song.title.as_str(),
        song.link.as_str(),
        song.key.as_str(),
        tags.as_str(),
    ]
    .iter()
    .map(|field| quote(field))
    .collect::<Vec<_>>()
    .join(",")
}

/// Render `rows` as a CSV document: BOM, quoted header, one quoted line per
/// song, lines joined with `\n` and no trailing newline.
pub fn to_csv<'a, I>(rows: I) -> String
where
    I: IntoIterator<Item = &'a Song>,
{
    let header = HEADERS
        .iter()
        .map(|field| quote(field))
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = vec![format!("{BOM}{header}")];
    lines.extend(rows.into_iter().map(row_line));
    lines.join("\n")
}

/// Write `content` to `dir/filename`, creating the directory when needed.
/// Returns the full path written.
pub fn save_csv(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;
    let path = dir.join(filename);
    fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
