use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::config::SellerGrouping;
use crate::engine::SalesTotals;
use crate::error::{ReportError, Result};
use crate::index::ReferenceIndex;
use crate::parser::FIELD_SEPARATOR;
use crate::ranker::{rank, RankedRow};

/// What a report run wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub path: PathBuf,
    pub rows: usize,
}

#[derive(Serialize)]
struct SellerRevenueRow<'a> {
    full_name: &'a str,
    total_revenue: u64,
}

#[derive(Serialize)]
struct ProductQuantityRow<'a> {
    product_name: &'a str,
    unit_price: u64,
    total_quantity: u64,
}

/// Resolve per-seller revenue to report names
///
/// With [`SellerGrouping::FullName`] sellers sharing a full name collapse
/// into one row at the position of the first of them.
pub fn seller_revenue_rows(
    totals: &SalesTotals,
    index: &ReferenceIndex,
    grouping: SellerGrouping,
) -> Result<Vec<(String, u64)>> {
    let mut rows: Vec<(String, u64)> = Vec::with_capacity(totals.revenue_by_seller.len());
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for (document_id, revenue) in &totals.revenue_by_seller {
        let name = match index.seller(document_id) {
            Some(seller) => seller.full_name(),
            None => {
                warn!(seller = %document_id, "Revenue recorded for unindexed seller");
                document_id.clone()
            }
        };

        // Merge into the first row with this name, otherwise start a new one
        let existing = by_name.get(&name).copied();
        match (grouping, existing) {
            (SellerGrouping::FullName, Some(pos)) => {
                rows[pos].1 = rows[pos].1.checked_add(*revenue).ok_or_else(|| {
                    ReportError::Overflow {
                        what: format!("revenue of {}", name),
                    }
                })?;
            }
            _ => {
                by_name.insert(name.clone(), rows.len());
                rows.push((name, *revenue));
            }
        }
    }

    Ok(rows)
}

/// Write `full_name;total_revenue` lines
pub fn write_seller_report<W: Write>(rows: &[RankedRow<String>], writer: W) -> Result<()> {
    let mut csv_writer = writer_builder().from_writer(writer);

    for row in rows {
        csv_writer.serialize(SellerRevenueRow {
            full_name: &row.key,
            total_revenue: row.total,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write `product_name;unit_price;total_quantity` lines for rows keyed by product id
pub fn write_product_report<W: Write>(
    rows: &[RankedRow<String>],
    index: &ReferenceIndex,
    writer: W,
) -> Result<()> {
    let mut csv_writer = writer_builder().from_writer(writer);

    for row in rows {
        csv_writer.serialize(ProductQuantityRow {
            product_name: index.lookup_name(&row.key),
            unit_price: index.lookup_price(&row.key),
            total_quantity: row.total,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Rank seller revenue and write it to `path`
pub fn persist_seller_report(
    totals: &SalesTotals,
    index: &ReferenceIndex,
    grouping: SellerGrouping,
    path: &Path,
) -> Result<ReportSummary> {
    let rows = rank(seller_revenue_rows(totals, index, grouping)?);
    write_atomically(path, |file| write_seller_report(&rows, file))?;

    info!(path = %path.display(), rows = rows.len(), "Wrote seller revenue report");
    Ok(ReportSummary {
        path: path.to_path_buf(),
        rows: rows.len(),
    })
}

/// Rank product quantities and write them to `path`
pub fn persist_product_report(
    totals: &SalesTotals,
    index: &ReferenceIndex,
    path: &Path,
) -> Result<ReportSummary> {
    let rows = rank(totals.quantity_by_product.iter().cloned());
    write_atomically(path, |file| write_product_report(&rows, index, file))?;

    info!(path = %path.display(), rows = rows.len(), "Wrote product quantity report");
    Ok(ReportSummary {
        path: path.to_path_buf(),
        rows: rows.len(),
    })
}

/// Write into a temporary file next to `path` and rename it into place
///
/// If `write` fails the temporary file is removed and `path` is untouched.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;

    tmp.persist(path).map_err(|e| ReportError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

pub(crate) fn writer_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(FIELD_SEPARATOR)
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'));
    builder
}
