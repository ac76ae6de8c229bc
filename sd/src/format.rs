//! CSV codec for style files
//!
//! Files are UTF-8 with an optional byte-order mark, comma separated, with a
//! header row naming the columns. Columns are looked up by name so extra or
//! reordered columns are fine. Writing always emits the mark and the four
//! columns of [`PromptStyle::COLUMNS`].

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use crate::error::{Result, StyleError};
use crate::style::PromptStyle;

const BOM: char = '\u{feff}';

/// Older files carry the prompt under this column instead of `prompt`
const LEGACY_PROMPT_COLUMN: &str = "text";

/// Read every style row of a file in file order
pub fn read_styles(path: &Path) -> Result<Vec<PromptStyle>> {
    let content = fs::read_to_string(path).map_err(|source| StyleError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let content = content.strip_prefix(BOM).unwrap_or(&content);
    let csv_err = |source: csv::Error| StyleError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = reader.headers().map_err(csv_err)?.clone();

    let name_col = column(&headers, "name");
    let prompt_col = column(&headers, "prompt").or_else(|| column(&headers, LEGACY_PROMPT_COLUMN));
    let negative_col = column(&headers, "negative_prompt");
    let description_col = column(&headers, "long_description");

    let mut styles = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let row = record.position().map(|p| p.line()).unwrap_or_default();
        let missing = |column: &'static str| StyleError::MissingColumn {
            path: path.to_path_buf(),
            column,
            row,
        };

        let name_col = name_col.ok_or_else(|| missing("name"))?;
        let prompt_col = prompt_col.ok_or_else(|| missing("prompt"))?;

        styles.push(PromptStyle::new(
            cell(&record, Some(name_col)),
            cell(&record, Some(prompt_col)),
            cell(&record, negative_col),
            cell(&record, description_col),
        ));
    }

    debug!(path = %path.display(), count = styles.len(), "Read styles");
    Ok(styles)
}

/// Write styles to `path`, creating or truncating it
pub fn write_styles<'a>(path: &Path, styles: impl IntoIterator<Item = &'a PromptStyle>) -> Result<()> {
    let write_err = |source: std::io::Error| StyleError::Write {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source: csv::Error| StyleError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(write_err)?;

    let mut bom = [0u8; 3];
    file.write_all(BOM.encode_utf8(&mut bom).as_bytes())
        .map_err(write_err)?;

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(file);
    writer.write_record(PromptStyle::COLUMNS).map_err(csv_err)?;

    let mut count = 0usize;
    for style in styles {
        writer.write_record(style.fields()).map_err(csv_err)?;
        count += 1;
    }
    writer.flush().map_err(write_err)?;

    debug!(path = %path.display(), count, "Wrote styles");
    Ok(())
}

/// Index of a header column; a repeated header resolves to its last occurrence
fn column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, h)| *h == name)
        .map(|(i, _)| i)
        .last()
}

/// Cell text, empty when the column is absent or the row is short
fn cell(record: &StringRecord, index: Option<usize>) -> String {
    index.and_then(|i| record.get(i)).unwrap_or_default().to_string()
}
