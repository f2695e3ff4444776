use super::row::{COLLECTION_COLUMN, SONG_ID_COLUMN};
use super::{MetadataIndex, RecordKey, SongRow};
use csv::{ErrorKind, ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that prevent the sheet from being parsed at all.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column \"{0}\" in header")]
    MissingColumn(&'static str),
}

/// A non-fatal issue found while reading a single record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Problem {
    MalformedRow { line: u64, message: String },
    BlankLine { line: u64 },
    MissingKey { line: u64, column: &'static str },
    /// The id can't be used as a file name inside the output directory.
    UnsafeKey {
        line: u64,
        column: &'static str,
        value: String,
    },
    DuplicateSong {
        line: u64,
        collection: String,
        song: String,
    },
}

impl Problem {
    pub fn line(&self) -> u64 {
        match self {
            Problem::MalformedRow { line, .. }
            | Problem::BlankLine { line }
            | Problem::MissingKey { line, .. }
            | Problem::UnsafeKey { line, .. }
            | Problem::DuplicateSong { line, .. } => *line,
        }
    }

    /// Whether the record was left out of the index.
    pub fn is_skipped_row(&self) -> bool {
        !matches!(self, Problem::DuplicateSong { .. })
    }
}

#[derive(Debug, Default)]
pub struct ParsedMetadata {
    pub index: MetadataIndex,
    pub problems: Vec<Problem>,
    pub rows_read: usize,
}

impl ParsedMetadata {
    pub fn skipped_rows(&self) -> usize {
        self.problems.iter().filter(|p| p.is_skipped_row()).count()
    }
}

pub fn parse_metadata_csv<P: AsRef<Path>>(path: P) -> Result<ParsedMetadata, ParseError> {
    let file = File::open(path.as_ref())?;
    parse_metadata_reader(file)
}

/// Reads a header row followed by records and groups them by collection and
/// song id. Problems with single records are collected and the remaining
/// records are still read.
///
/// Records shorter than the header get empty values for the missing cells,
/// records longer than the header are rejected.
pub fn parse_metadata_reader<R: Read>(reader: R) -> Result<ParsedMetadata, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    for required in [COLLECTION_COLUMN, SONG_ID_COLUMN] {
        if !headers.iter().any(|h| h == required) {
            return Err(ParseError::MissingColumn(required));
        }
    }

    // With CRLF endings a record's line feed is only consumed by the next
    // read, which then starts one line early.
    let header_lines = 1 + newlines_in(&headers);
    let line_offset = u64::from(reader.position().line() == header_lines);

    let mut parsed = ParsedMetadata::default();
    let mut record = StringRecord::new();
    loop {
        let start_line = reader.position().line() + line_offset;
        match reader.read_record(&mut record) {
            Ok(false) => {
                let consumed = reader.position().line() + line_offset - start_line;
                let trailing = consumed.saturating_sub(line_offset);
                report_blank_lines(start_line, trailing, &mut parsed);
                break;
            }
            Ok(true) => {
                // The reader skips empty lines on its own, they show up as
                // lines consumed beyond the record's own line breaks. A blank
                // line right before an unterminated last record goes unseen.
                let consumed = reader.position().line() + line_offset - start_line;
                let blank = consumed.saturating_sub(newlines_in(&record) + 1);
                report_blank_lines(start_line, blank, &mut parsed);

                parsed.rows_read += 1;
                handle_record(&headers, &record, start_line + blank, &mut parsed);
            }
            Err(err) => {
                // A failing stream would fail again on every read.
                if matches!(err.kind(), ErrorKind::Io(_)) {
                    return Err(err.into());
                }
                warn!("Skipping malformed row at line {}: {}", start_line, err);
                parsed.problems.push(Problem::MalformedRow {
                    line: start_line,
                    message: err.to_string(),
                });
            }
        }
    }

    info!("Parsed {} rows", parsed.rows_read);
    Ok(parsed)
}

fn newlines_in(record: &StringRecord) -> u64 {
    record.as_slice().matches('\n').count() as u64
}

fn report_blank_lines(first_line: u64, count: u64, parsed: &mut ParsedMetadata) {
    for line in first_line..first_line + count {
        warn!("Skipping blank line {}", line);
        parsed.problems.push(Problem::BlankLine { line });
    }
}

fn handle_record(
    headers: &StringRecord,
    record: &StringRecord,
    line: u64,
    parsed: &mut ParsedMetadata,
) {
    if record.len() > headers.len() {
        let message = format!(
            "expected {} fields, found {}",
            headers.len(),
            record.len()
        );
        warn!("Skipping malformed row at line {}: {}", line, message);
        parsed.problems.push(Problem::MalformedRow { line, message });
        return;
    }

    let cells = record.iter().chain(std::iter::repeat(""));
    let row = match SongRow::from_columns(headers.iter().zip(cells)) {
        Ok(row) => row,
        Err(column) => {
            warn!("Skipping row at line {}: empty \"{}\"", line, column);
            parsed.problems.push(Problem::MissingKey { line, column });
            return;
        }
    };

    for (column, value) in [
        (COLLECTION_COLUMN, &row.collection),
        (SONG_ID_COLUMN, &row.song_id),
    ] {
        if !RecordKey::from(value.as_str()).is_path_component() {
            warn!(
                "Skipping row at line {}: \"{}\" is not usable as a file name",
                line, value
            );
            parsed.problems.push(Problem::UnsafeKey {
                line,
                column,
                value: value.clone(),
            });
            return;
        }
    }

    if parsed.index.contains_collection(&row.collection) {
        debug!("Setting existing {}", row.collection);
    } else {
        debug!("Setting new {}", row.collection);
    }

    let collection = row.collection.clone();
    let song = row.song_id.clone();
    if parsed.index.insert(row).is_some() {
        info!(
            "Row at line {} replaces collection {} song {}",
            line, collection, song
        );
        parsed.problems.push(Problem::DuplicateSong {
            line,
            collection,
            song,
        });
    }
}
