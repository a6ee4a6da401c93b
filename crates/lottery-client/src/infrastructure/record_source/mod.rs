//! CSV record source: reads an agency's bets lazily from disk.
//!
//! The file has no header and five columns per line:
//!
//! ```text
//! first_name,last_name,document,birthdate,number
//! Santiago Lionel,Lorca,30904465,1999-03-17,7574
//! ```
//!
//! The agency id is not part of the file; it is attached to every bet from
//! configuration.  Fields are trimmed.  Only one line is held in memory at a
//! time, so arbitrarily large files stream through the batch builder.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use lottery_core::Bet;
use thiserror::Error;

/// Number of columns in a bet line.
pub const FIELD_COUNT: usize = 5;

/// Errors produced while reading the bets file.
#[derive(Debug, Error)]
pub enum RecordSourceError {
    /// The file could not be opened.
    #[error("failed to open bets file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed (I/O error or invalid UTF-8).
    #[error("failed to read bets file: {0}")]
    Csv(#[from] csv::Error),

    /// A line does not have exactly five columns.
    #[error("line {line}: expected 5 fields, found {found}")]
    FieldCount { line: u64, found: usize },

    /// A numeric column could not be parsed.
    #[error("line {line}: invalid {field} {value:?}")]
    InvalidField {
        line: u64,
        field: &'static str,
        value: String,
    },
}

/// Iterator over the bets in a headerless CSV file.
pub struct CsvBetSource<R: Read> {
    agency: u8,
    records: csv::StringRecordsIntoIter<R>,
}

impl CsvBetSource<File> {
    /// Opens the bets file at `path` for `agency`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordSourceError::Open`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>, agency: u8) -> Result<Self, RecordSourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RecordSourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(file, agency))
    }
}

impl<R: Read> CsvBetSource<R> {
    /// Reads bets for `agency` from any byte source.
    pub fn from_reader(reader: R, agency: u8) -> Self {
        let records = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader)
            .into_records();
        Self { agency, records }
    }

    fn parse(&self, record: &csv::StringRecord) -> Result<Bet, RecordSourceError> {
        let line = record.position().map_or(0, |p| p.line());
        if record.len() != FIELD_COUNT {
            return Err(RecordSourceError::FieldCount {
                line,
                found: record.len(),
            });
        }
        let field = |i: usize| record.get(i).unwrap_or_default();

        let document = field(2)
            .parse::<u32>()
            .map_err(|_| RecordSourceError::InvalidField {
                line,
                field: "document",
                value: field(2).to_string(),
            })?;
        let number = field(4)
            .parse::<u16>()
            .map_err(|_| RecordSourceError::InvalidField {
                line,
                field: "number",
                value: field(4).to_string(),
            })?;

        Ok(Bet {
            agency: self.agency,
            first_name: field(0).to_string(),
            last_name: field(1).to_string(),
            document,
            birthdate: field(3).to_string(),
            number,
        })
    }
}

impl<R: Read> Iterator for CsvBetSource<R> {
    type Item = Result<Bet, RecordSourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };
        Some(self.parse(&record))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
