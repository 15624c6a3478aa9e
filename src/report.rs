// src/report.rs
// =============================================================================
// Writes the results of a run to a file.
//
// Formats:
// - csv:  header "Link,Error", one row per result
// - json: {"broken_links": [...]} (or "links" when every result is kept)
// - txt:  one link per line ("link<TAB>error" when every result is kept)
// - xlsx: a "Broken Links" sheet ("Links" when every result is kept) with a
//         bold header row
//
// Every format is first rendered into memory, then written to a temp file
// next to the destination and renamed into place. A failed run never leaves
// a half-written report behind.
// =============================================================================

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::checker::{CheckResult, Classification, ReportMode};
use crate::config::OutputFormat;
use crate::error::CheckError;

const HEADER: [&str; 2] = ["Link", "Error"];

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("xlsx: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

// One entry of the JSON array
#[derive(Serialize)]
struct JsonRow<'a> {
    line: usize,
    link: &'a str,
    error: String,
    #[serde(flatten)]
    classification: &'a Classification,
}

// Renders the results in the requested format
pub fn render(
    format: OutputFormat,
    mode: ReportMode,
    results: &[CheckResult],
) -> Result<Vec<u8>, ReportError> {
    match format {
        OutputFormat::Csv => render_csv(results),
        OutputFormat::Json => render_json(mode, results),
        OutputFormat::Txt => Ok(render_txt(mode, results)),
        OutputFormat::Xlsx => render_xlsx(mode, results),
    }
}

// Renders and saves the report
//
// Errors:
//   CheckError::Report if rendering fails
//   CheckError::OutputUnwritable if the file can't be written
pub fn write_report(
    path: &Path,
    format: OutputFormat,
    mode: ReportMode,
    results: &[CheckResult],
) -> Result<(), CheckError> {
    let bytes = render(format, mode, results)?;
    persist(path, &bytes).map_err(|source| CheckError::OutputUnwritable {
        path: path.to_path_buf(),
        source,
    })
}

fn render_csv(results: &[CheckResult]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for result in results {
        let error = result.classification.to_string();
        writer.write_record([result.link.as_str(), error.as_str()])?;
    }
    writer.into_inner().map_err(|e| ReportError::Io(e.into_error()))
}

fn render_json(mode: ReportMode, results: &[CheckResult]) -> Result<Vec<u8>, ReportError> {
    let rows: Vec<JsonRow<'_>> = results
        .iter()
        .map(|r| JsonRow {
            line: r.line,
            link: &r.link,
            error: r.classification.to_string(),
            classification: &r.classification,
        })
        .collect();

    let key = match mode {
        ReportMode::BrokenOnly => "broken_links",
        ReportMode::All => "links",
    };

    let mut document = BTreeMap::new();
    document.insert(key, rows);

    let mut bytes = serde_json::to_vec_pretty(&document)?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn render_txt(mode: ReportMode, results: &[CheckResult]) -> Vec<u8> {
    let mut out = String::new();
    for result in results {
        out.push_str(&result.link);
        // Every line is broken in BrokenOnly mode, so the reason is left out
        if mode == ReportMode::All {
            out.push('\t');
            out.push_str(&result.classification.to_string());
        }
        out.push('\n');
    }
    out.into_bytes()
}

fn sheet_name(mode: ReportMode) -> &'static str {
    match mode {
        ReportMode::BrokenOnly => "Broken Links",
        ReportMode::All => "Links",
    }
}

fn render_xlsx(mode: ReportMode, results: &[CheckResult]) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name(mode))?;
        for (col, title) in HEADER.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &bold)?;
        }
        for (idx, result) in results.iter().enumerate() {
            let row = (idx + 1) as u32;
            sheet.write_string(row, 0, result.link.as_str())?;
            sheet.write_string(row, 1, result.classification.to_string())?;
        }
        sheet.autofit();
    }

    Ok(workbook.save_to_buffer()?)
}

// Writes to a temp file in the same directory, then renames it over `path`
fn persist(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
