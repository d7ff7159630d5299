mod common;

use std::sync::Arc;

use common::DataDir;
use sales_reports::concurrent_engine::{generate_reports_parallel, ParallelAggregator};
use sales_reports::error::ReportError;
use sales_reports::{aggregate_sales, generate_reports, load_reference_index};

fn many_sellers(count: usize) -> DataDir {
    let data = DataDir::new();

    let sellers: Vec<String> = (0..count)
        .map(|i| format!("CC;{};Seller{};Number{}", 1000 + i, i, i))
        .collect();
    let seller_refs: Vec<&str> = sellers.iter().map(String::as_str).collect();
    data.write_sellers(&seller_refs);
    data.write_products(&["1;Laptop;1000", "2;Mouse;10", "3;Camera;500"]);

    for i in 0..count {
        let laptops = format!("1;{}", i % 3);
        let mice = format!("2;{}", i);
        data.write_sales(&(1000 + i).to_string(), &[laptops.as_str(), mice.as_str()]);
    }
    data
}

/// Parallel aggregation must produce exactly the sequential totals
#[tokio::test]
async fn test_parallel_matches_sequential() {
    let data = many_sellers(50);
    let index = Arc::new(load_reference_index(&data.config).unwrap());

    let sequential = aggregate_sales(&index, &data.config).unwrap();

    let aggregator = ParallelAggregator::new(Arc::clone(&index), Arc::new(data.config.clone()));
    let parallel = aggregator.aggregate().await.unwrap();

    assert_eq!(parallel, sequential);
}

#[tokio::test]
async fn test_parallel_keeps_unsold_products() {
    let data = many_sellers(5);
    let index = Arc::new(load_reference_index(&data.config).unwrap());

    let aggregator = ParallelAggregator::new(index, Arc::new(data.config.clone()));
    let totals = aggregator.aggregate().await.unwrap();

    assert_eq!(totals.quantity_of("3"), Some(0));
    assert_eq!(totals.quantity_of("2"), Some(10)); // 0 + 1 + 2 + 3 + 4
    assert_eq!(totals.quantity_by_product.len(), 3);
}

#[tokio::test]
async fn test_parallel_missing_file_fails_whole_run() {
    let data = many_sellers(10);
    std::fs::remove_file(data.config.sales_file("1004")).unwrap();
    let index = Arc::new(load_reference_index(&data.config).unwrap());

    let aggregator = ParallelAggregator::new(index, Arc::new(data.config.clone()));
    let err = aggregator.aggregate().await.unwrap_err();

    assert!(matches!(
        err,
        ReportError::MissingSalesFile { ref document_id, .. } if document_id == "1004"
    ));
}

#[tokio::test]
async fn test_shared_handles_across_tasks() {
    let data = many_sellers(8);
    let index = Arc::new(load_reference_index(&data.config).unwrap());
    let aggregator = ParallelAggregator::new(Arc::clone(&index), Arc::new(data.config.clone()));

    let mut handles = vec![];
    for seller in index.sellers().iter().cloned() {
        let aggregator = aggregator.clone_handle();
        handles.push(tokio::spawn(async move {
            aggregator.aggregate_seller(seller).await.unwrap()
        }));
    }

    let mut revenue = 0;
    for h in handles {
        let partial = h.await.unwrap();
        revenue += partial.revenue_by_seller[0].1;
    }

    let expected: u64 = aggregate_sales(&index, &data.config)
        .unwrap()
        .revenue_by_seller
        .iter()
        .map(|(_, r)| r)
        .sum();
    assert_eq!(revenue, expected);
}

/// Both entry points write byte-identical reports
#[test]
fn test_parallel_reports_match_sequential() {
    let data = many_sellers(20);

    generate_reports(&data.config).unwrap();
    let sellers = data.seller_report();
    let products = data.product_report();

    let reports = generate_reports_parallel(&data.config).unwrap();
    assert_eq!(reports.sellers.rows, 20);
    assert_eq!(data.seller_report(), sellers);
    assert_eq!(data.product_report(), products);
}
