// Delimited-text reports (CSV/TSV exports of the WMS or Full Circle sheets)

use std::collections::BTreeMap;
use std::path::Path;

use pickrecon_recon::{GridSheet, ReconError};

/// Read a delimited file into a grid. Without an explicit delimiter it is
/// sniffed from the first lines.
pub fn import(path: &Path, delimiter: Option<u8>) -> Result<GridSheet, ReconError> {
    let bytes = std::fs::read(path)
        .map_err(|e| ReconError::Read(format!("{}: {e}", path.display())))?;
    import_bytes(&bytes, delimiter)
}

/// Full Circle exports carry a five-line banner before the data.
const SNIFF_LINES: usize = 20;

/// Decode bytes (UTF-8, falling back to Windows-1252) and parse them.
pub fn import_bytes(bytes: &[u8], delimiter: Option<u8>) -> Result<GridSheet, ReconError> {
    let content = decode_text(bytes);
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(&content));
    import_from_str(&content, delimiter)
}

pub fn import_from_str(content: &str, delimiter: u8) -> Result<GridSheet, ReconError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    // The reader drops blank lines; put them back so row numbers match the
    // file, which fixed-offset layouts depend on.
    let mut sheet = GridSheet::default();
    let mut next_line = 1u64;
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Read(e.to_string()))?;
        if let Some(pos) = record.position() {
            for _ in next_line..pos.line() {
                sheet.push_row(Vec::new());
            }
            let embedded = record.iter().map(|f| f.matches('\n').count() as u64).sum::<u64>();
            next_line = pos.line() + embedded + 1;
        }
        sheet.push_row(
            record
                .iter()
                .map(|field| if field.is_empty() { None } else { Some(field.to_string()) })
                .collect(),
        );
    }
    Ok(sheet)
}

/// Excel-produced CSVs are frequently Windows-1252 rather than UTF-8.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Pick the delimiter whose field count is most consistent across the first
/// lines. Single-field lines (report banners, blank filler) don't vote.
fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content.lines().take(SNIFF_LINES).collect();
    let mut best = b',';
    let mut best_score = 0usize;

    for delim in [b'\t', b';', b',', b'|'] {
        let mut freq: BTreeMap<usize, usize> = BTreeMap::new();
        for line in &sample {
            let count = field_count(line, delim);
            if count > 1 {
                *freq.entry(count).or_default() += 1;
            }
        }

        // Modal field count; ties go to the wider row.
        let Some((modal, lines)) = freq.into_iter().max_by_key(|&(count, lines)| (lines, count)) else {
            continue;
        };

        let score = lines * modal;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }
    best
}

fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(Result::ok)
        .map(|r| r.len())
        .unwrap_or(1)
}
