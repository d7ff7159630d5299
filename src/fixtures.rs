use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rand::Rng;
use tracing::{debug, info};

use crate::config::ReportConfig;
use crate::error::Result;
use crate::models::{Product, SaleLine, Seller};
use crate::report::{write_atomically, writer_builder};

pub const FIRST_NAMES: [&str; 6] = ["Juan", "Maria", "Carlos", "Ana", "Luis", "Isabel"];

pub const LAST_NAMES: [&str; 6] = ["Perez", "Gomez", "Rodriguez", "Martinez", "Fernandez", "Lopez"];

pub const PRODUCT_NAMES: [&str; 10] = [
    "Laptop",
    "Smartphone",
    "Tablet",
    "Headphones",
    "Monitor",
    "Speaker",
    "Keyboard",
    "Camera",
    "Printer",
    "Mouse",
];

pub const DOCUMENT_TYPE: &str = "CC";

/// Upper bound of the random seller count, before clamping to the name list
pub const MAX_SELLERS: usize = 10;

/// Synthetic sellers, products and per-seller sales
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub sellers: Vec<Seller>,
    pub products: Vec<Product>,
    /// Sale lines per seller, in seller order
    pub sales: Vec<Vec<SaleLine>>,
}

/// Build a random dataset
///
/// Sellers take first names in list order, so at most [`FIRST_NAMES`]`.len()`
/// sellers are produced. Every product appears once in every seller's sales
/// with a quantity in `0..=9`.
pub fn generate_dataset<R: Rng>(rng: &mut R, seller_count: usize) -> Dataset {
    let seller_count = seller_count.min(FIRST_NAMES.len());

    let mut used_ids = HashSet::new();
    let sellers: Vec<Seller> = FIRST_NAMES[..seller_count]
        .iter()
        .map(|first_name| {
            let document_id = loop {
                let candidate: u32 = rng.gen_range(10_000..100_000);
                if used_ids.insert(candidate) {
                    break candidate;
                }
            };
            let last_name = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
            Seller::new(DOCUMENT_TYPE, document_id.to_string(), *first_name, last_name)
        })
        .collect();

    let products: Vec<Product> = PRODUCT_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let price = rng.gen_range(2_000_000..2_900_000);
            Product::new((i + 1).to_string(), *name, price)
        })
        .collect();

    let sales: Vec<Vec<SaleLine>> = sellers
        .iter()
        .map(|_| {
            products
                .iter()
                .map(|product| SaleLine::new(product.product_id.clone(), rng.gen_range(0..10)))
                .collect()
        })
        .collect();

    Dataset {
        sellers,
        products,
        sales,
    }
}

/// Replace the data directory's contents with a fresh random dataset
///
/// Draws between 1 and [`MAX_SELLERS`] sellers; draws beyond the name list
/// are clamped by [`generate_dataset`].
pub fn generate_info_files<R: Rng>(config: &ReportConfig, rng: &mut R) -> Result<Dataset> {
    let seller_count = rng.gen_range(1..=MAX_SELLERS);
    let dataset = generate_dataset(rng, seller_count);

    prepare_data_dir(&config.sales_dir)?;
    write_dataset(config, &dataset)?;

    info!(
        sellers = dataset.sellers.len(),
        products = dataset.products.len(),
        dir = %config.sales_dir.display(),
        "Generated info files"
    );
    Ok(dataset)
}

/// Create `dir` if needed and delete the regular files inside it
pub fn prepare_data_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            debug!(path = %entry.path().display(), "Removing old data file");
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// Write the seller table, product table and one sales file per seller
pub fn write_dataset(config: &ReportConfig, dataset: &Dataset) -> Result<()> {
    for path in [&config.seller_file, &config.product_file] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
    }
    fs::create_dir_all(&config.sales_dir)?;

    write_atomically(&config.seller_file, |file| {
        let mut csv_writer = writer_builder().from_writer(file);
        for seller in &dataset.sellers {
            csv_writer.serialize((
                &seller.document_type,
                &seller.document_id,
                &seller.first_name,
                &seller.last_name,
            ))?;
        }
        csv_writer.flush()?;
        Ok(())
    })?;

    write_atomically(&config.product_file, |file| {
        let mut csv_writer = writer_builder().from_writer(file);
        for product in &dataset.products {
            csv_writer.serialize((&product.product_id, &product.name, product.unit_price))?;
        }
        csv_writer.flush()?;
        Ok(())
    })?;

    for (seller, lines) in dataset.sellers.iter().zip(&dataset.sales) {
        write_atomically(&config.sales_file(&seller.document_id), |file| {
            let mut csv_writer = writer_builder().from_writer(file);
            csv_writer.serialize((&seller.document_type, &seller.document_id))?;
            for line in lines {
                csv_writer.serialize((&line.product_id, line.quantity))?;
            }
            csv_writer.flush()?;
            Ok(())
        })?;
    }

    Ok(())
}
