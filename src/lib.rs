pub mod concurrent_engine;
pub mod config;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod index;
pub mod models;
pub mod parser;
pub mod ranker;
pub mod report;

use std::fs::File;
use std::path::Path;

use tracing::{info, warn};

use config::ReportConfig;
use engine::{SalesAggregator, SalesTotals};
use error::{ReportError, Result};
use index::ReferenceIndex;
use models::{Product, SaleLine, Seller};
use report::ReportSummary;

/// Summaries of both reports written by [`generate_reports`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reports {
    pub sellers: ReportSummary,
    pub products: ReportSummary,
}

/// Generate the seller revenue report at `config.seller_report`
pub fn generate_seller_revenue_report(config: &ReportConfig) -> Result<ReportSummary> {
    let index = load_reference_index(config)?;
    let totals = aggregate_sales(&index, config)?;
    report::persist_seller_report(
        &totals,
        &index,
        config.seller_grouping,
        &config.seller_report,
    )
}

/// Generate the product quantity report at `config.product_report`
pub fn generate_product_quantity_report(config: &ReportConfig) -> Result<ReportSummary> {
    let index = load_reference_index(config)?;
    let totals = aggregate_sales(&index, config)?;
    report::persist_product_report(&totals, &index, &config.product_report)
}

/// Generate both reports from a single pass over the input files
///
/// Nothing is written unless aggregation succeeds for every seller.
pub fn generate_reports(config: &ReportConfig) -> Result<Reports> {
    let index = load_reference_index(config)?;
    let totals = aggregate_sales(&index, config)?;
    write_reports(&totals, &index, config)
}

/// Write both reports from already aggregated totals
pub fn write_reports(
    totals: &SalesTotals,
    index: &ReferenceIndex,
    config: &ReportConfig,
) -> Result<Reports> {
    let sellers = report::persist_seller_report(
        totals,
        index,
        config.seller_grouping,
        &config.seller_report,
    )?;
    let products = report::persist_product_report(totals, index, &config.product_report)?;
    Ok(Reports { sellers, products })
}

/// Read the seller and product tables
pub fn load_reference_index(config: &ReportConfig) -> Result<ReferenceIndex> {
    let sellers: Vec<Seller> = read_reference(&config.seller_file)?;
    let products: Vec<Product> = read_reference(&config.product_file)?;

    let index = ReferenceIndex::from_records(sellers, products);
    info!(
        sellers = index.sellers().len(),
        products = index.products().len(),
        "Loaded reference tables"
    );
    Ok(index)
}

/// Aggregate every indexed seller's sales file, in seller table order
pub fn aggregate_sales(index: &ReferenceIndex, config: &ReportConfig) -> Result<SalesTotals> {
    let mut aggregator = SalesAggregator::new(index);

    for seller in index.sellers().iter() {
        let lines = read_seller_sales(config, seller)?;
        aggregator.record_sales(&seller.document_id, &lines)?;
    }

    Ok(aggregator.finish())
}

/// Read the sale lines of one seller, skipping the header line
pub fn read_seller_sales(config: &ReportConfig, seller: &Seller) -> Result<Vec<SaleLine>> {
    let path = config.sales_file(&seller.document_id);
    let missing = |source: std::io::Error| ReportError::MissingSalesFile {
        document_id: seller.document_id.clone(),
        path: path.clone(),
        source,
    };

    let file = File::open(&path).map_err(missing)?;
    let (header, lines) = parser::read_sales(file).map_err(|e| io_failure(e, missing))?;

    if let Some(header) = header {
        if header.document_id != seller.document_id {
            warn!(
                seller = %seller.document_id,
                header = %header.document_id,
                path = %path.display(),
                "Sales file header names a different seller"
            );
        }
    }

    Ok(lines)
}

fn read_reference<T: parser::FromFields>(path: &Path) -> Result<Vec<T>> {
    let missing = |source: std::io::Error| ReportError::MissingReferenceFile {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(missing)?;
    parser::read_records(file).map_err(|e| io_failure(e, missing))
}

/// Turn an I/O failure while reading a file into the file-level error
fn io_failure<F>(err: ReportError, missing: F) -> ReportError
where
    F: FnOnce(std::io::Error) -> ReportError,
{
    match err {
        ReportError::Csv(csv_err) => {
            if let csv::ErrorKind::Io(io_err) = csv_err.kind() {
                return missing(std::io::Error::new(io_err.kind(), io_err.to_string()));
            }
            ReportError::Csv(csv_err)
        }
        ReportError::Io(io_err) => missing(io_err),
        other => other,
    }
}
