use std::io::Read;

use csv::{ByteRecord, StringRecord};
use tracing::warn;

use crate::error::{ParseError, Result};
use crate::models::{Product, RecordKind, SaleLine, SalesHeader, Seller};

/// Separator between fields on every input and output line
pub const FIELD_SEPARATOR: u8 = b';';

/// A record that can be built from the positional fields of one line
///
/// Fields beyond the kind's arity are ignored.
pub trait FromFields: Sized {
    const KIND: RecordKind;

    fn from_fields(fields: &[&str]) -> std::result::Result<Self, ParseError>;
}

impl FromFields for Seller {
    const KIND: RecordKind = RecordKind::Seller;

    fn from_fields(fields: &[&str]) -> std::result::Result<Self, ParseError> {
        check_arity(Self::KIND, fields)?;
        Ok(Seller::new(fields[0], fields[1], fields[2], fields[3]))
    }
}

impl FromFields for Product {
    const KIND: RecordKind = RecordKind::Product;

    fn from_fields(fields: &[&str]) -> std::result::Result<Self, ParseError> {
        check_arity(Self::KIND, fields)?;
        let unit_price = parse_number(Self::KIND, "unit_price", fields[2])?;
        Ok(Product::new(fields[0], fields[1], unit_price))
    }
}

impl FromFields for SalesHeader {
    const KIND: RecordKind = RecordKind::SalesHeader;

    fn from_fields(fields: &[&str]) -> std::result::Result<Self, ParseError> {
        check_arity(Self::KIND, fields)?;
        Ok(SalesHeader {
            document_type: fields[0].to_string(),
            document_id: fields[1].to_string(),
        })
    }
}

impl FromFields for SaleLine {
    const KIND: RecordKind = RecordKind::SaleLine;

    fn from_fields(fields: &[&str]) -> std::result::Result<Self, ParseError> {
        check_arity(Self::KIND, fields)?;
        let quantity = parse_number(Self::KIND, "quantity", fields[1])?;
        Ok(SaleLine::new(fields[0], quantity))
    }
}

/// Parse a single raw line into a record of kind `T`
pub fn parse_line<T: FromFields>(line: &str) -> std::result::Result<T, ParseError> {
    let fields: Vec<&str> = line
        .split(FIELD_SEPARATOR as char)
        .map(str::trim)
        .collect();
    T::from_fields(&fields)
}

/// Parse a CSV record, tagging errors with the line it came from
pub fn parse_record<T: FromFields>(record: &StringRecord) -> std::result::Result<T, ParseError> {
    let fields: Vec<&str> = record.iter().collect();
    T::from_fields(&fields).map_err(|e| match record.position() {
        Some(pos) => e.at(pos.line()),
        None => e,
    })
}

/// Read every record of kind `T` from a reference file
///
/// Malformed lines, including lines that are not valid UTF-8, are logged and
/// skipped. Only I/O failures abort the read.
pub fn read_records<T: FromFields, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut csv_reader = reader_builder().from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.byte_records() {
        let Some(record) = decode(result?) else {
            continue;
        };
        match parse_record::<T>(&record) {
            Ok(parsed) => records.push(parsed),
            Err(e) => warn!(error = %e, "skipping malformed line"),
        }
    }

    Ok(records)
}

/// Read a seller's sales file: the header record followed by sale lines
///
/// The first record is always consumed as the header, even when it does not
/// parse; `None` is returned in that case and for an empty file.
pub fn read_sales<R: Read>(reader: R) -> Result<(Option<SalesHeader>, Vec<SaleLine>)> {
    let mut csv_reader = reader_builder().from_reader(reader);
    let mut records = csv_reader.byte_records();

    let header = match records.next() {
        Some(result) => match decode(result?).map(|r| parse_record::<SalesHeader>(&r)) {
            Some(Ok(header)) => Some(header),
            Some(Err(e)) => {
                warn!(error = %e, "unreadable sales header");
                None
            }
            // Undecodable header, already logged
            None => None,
        },
        None => None,
    };

    let mut lines = Vec::new();
    for result in records {
        let Some(record) = decode(result?) else {
            continue;
        };
        match parse_record::<SaleLine>(&record) {
            Ok(line) => lines.push(line),
            Err(e) => warn!(error = %e, "skipping malformed sale line"),
        }
    }

    Ok((header, lines))
}

/// Decode a raw record as UTF-8, logging and dropping it when that fails
fn decode(record: ByteRecord) -> Option<StringRecord> {
    let line = record.position().map(|pos| pos.line());
    match StringRecord::from_byte_record(record) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(line = ?line, error = %e, "skipping line that is not valid UTF-8");
            None
        }
    }
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(FIELD_SEPARATOR)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All);
    builder
}

fn check_arity(kind: RecordKind, fields: &[&str]) -> std::result::Result<(), ParseError> {
    if fields.len() < kind.arity() {
        return Err(ParseError::MissingField {
            kind,
            expected: kind.arity(),
            found: fields.len(),
            line: None,
        });
    }
    Ok(())
}

fn parse_number(
    kind: RecordKind,
    field: &'static str,
    value: &str,
) -> std::result::Result<u64, ParseError> {
    value.parse::<u64>().map_err(|_| ParseError::InvalidNumber {
        kind,
        field,
        value: value.to_string(),
        line: None,
    })
}
