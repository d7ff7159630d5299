use std::sync::Arc;

use futures::future::try_join_all;
use tokio::task;
use tracing::debug;

use crate::config::ReportConfig;
use crate::engine::{SalesAggregator, SalesTotals};
use crate::error::Result;
use crate::index::ReferenceIndex;
use crate::models::Seller;
use crate::{read_seller_sales, write_reports, Reports};

/// Aggregates sellers' sales files in parallel
///
/// Each seller is read and summed on its own blocking task into a partial
/// [`SalesTotals`]. No accumulator is shared between tasks: partials are
/// merged after all tasks join, in seller table order, so the result is
/// identical to [`crate::aggregate_sales`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use sales_reports::concurrent_engine::ParallelAggregator;
/// use sales_reports::config::ReportConfig;
///
/// #[tokio::main]
/// async fn main() {
///     let config = ReportConfig::in_dir("files");
///     let index = sales_reports::load_reference_index(&config).unwrap();
///
///     let aggregator = ParallelAggregator::new(Arc::new(index), Arc::new(config));
///     let totals = aggregator.aggregate().await.unwrap();
///     println!("{} sellers", totals.revenue_by_seller.len());
/// }
/// ```
pub struct ParallelAggregator {
    index: Arc<ReferenceIndex>,
    config: Arc<ReportConfig>,
}

impl ParallelAggregator {
    pub fn new(index: Arc<ReferenceIndex>, config: Arc<ReportConfig>) -> Self {
        Self { index, config }
    }

    /// Aggregate every indexed seller
    ///
    /// Fails with the first task error; no partial totals are returned.
    pub async fn aggregate(&self) -> Result<SalesTotals> {
        let tasks = self
            .index
            .sellers()
            .iter()
            .map(|seller| self.aggregate_seller(seller.clone()));

        let partials = try_join_all(tasks).await?;

        // Start from the zero-filled product table so unsold products survive the merge
        let mut totals = SalesAggregator::new(&self.index).finish();
        for partial in partials {
            totals.merge(partial)?;
        }

        debug!(sellers = totals.revenue_by_seller.len(), "Merged partial totals");
        Ok(totals)
    }

    /// Aggregate a single seller on a blocking task
    pub async fn aggregate_seller(&self, seller: Seller) -> Result<SalesTotals> {
        let handle = self.clone_handle();

        task::spawn_blocking(move || -> Result<SalesTotals> {
            let lines = read_seller_sales(&handle.config, &seller)?;
            let mut aggregator = SalesAggregator::new(&handle.index);
            aggregator.record_sales(&seller.document_id, &lines)?;
            Ok(aggregator.finish())
        })
        .await?
    }

    /// Clone handle for sharing across tasks
    pub fn clone_handle(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
            config: Arc::clone(&self.config),
        }
    }
}

/// Generate both reports, aggregating sellers in parallel
///
/// Drives the aggregation on a current-thread runtime; file reads run on
/// tokio's blocking pool.
pub fn generate_reports_parallel(config: &ReportConfig) -> Result<Reports> {
    let index = Arc::new(crate::load_reference_index(config)?);
    let aggregator = ParallelAggregator::new(Arc::clone(&index), Arc::new(config.clone()));

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let totals = runtime.block_on(aggregator.aggregate())?;

    write_reports(&totals, &index, config)
}
