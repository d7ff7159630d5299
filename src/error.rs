use std::path::PathBuf;

use thiserror::Error;

use crate::models::RecordKind;

/// Errors that abort report generation
/// Parse failures and unknown products are absorbed by the reader and index
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("reference file '{}' could not be read: {source}", .path.display())]
    MissingReferenceFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("sales file for seller {document_id} ('{}') could not be read: {source}", .path.display())]
    MissingSalesFile {
        document_id: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("total overflowed while accumulating {what}")]
    Overflow { what: String },

    #[error("aggregation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("failed to finalize report '{}': {source}", .path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A line that cannot be mapped onto its record kind
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{kind} record{} has {found} fields, expected at least {expected}", at_line(*.line))]
    MissingField {
        kind: RecordKind,
        expected: usize,
        found: usize,
        line: Option<u64>,
    },

    #[error("{kind} record{} has non-numeric {field} '{value}'", at_line(*.line))]
    InvalidNumber {
        kind: RecordKind,
        field: &'static str,
        value: String,
        line: Option<u64>,
    },
}

impl ParseError {
    /// Attach the 1-based line number the record was read from
    pub fn at(self, line_no: u64) -> Self {
        match self {
            ParseError::MissingField {
                kind,
                expected,
                found,
                ..
            } => ParseError::MissingField {
                kind,
                expected,
                found,
                line: Some(line_no),
            },
            ParseError::InvalidNumber {
                kind, field, value, ..
            } => ParseError::InvalidNumber {
                kind,
                field,
                value,
                line: Some(line_no),
            },
        }
    }
}

fn at_line(line: Option<u64>) -> String {
    line.map(|n| format!(" on line {}", n)).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, ReportError>;
