use std::path::{Path, PathBuf};

/// Directory the data and report files live in unless told otherwise
pub const DEFAULT_DATA_DIR: &str = "files";

pub const SELLER_FILE_NAME: &str = "salesmen_info.csv";
pub const PRODUCT_FILE_NAME: &str = "products.csv";
pub const SALES_FILE_PREFIX: &str = "sales_";
pub const SALES_FILE_EXTENSION: &str = "csv";
pub const SELLER_REPORT_FILE_NAME: &str = "vendor_sales.csv";
pub const PRODUCT_REPORT_FILE_NAME: &str = "product_sales.csv";

/// How seller revenue rows are grouped in the report
///
/// Totals are always accumulated per document id. `FullName` merges sellers
/// that share a full name into one row, `DocumentId` keeps one row per seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SellerGrouping {
    #[default]
    FullName,
    DocumentId,
}

/// Locations of every file the reports read or write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub seller_file: PathBuf,
    pub product_file: PathBuf,
    pub sales_dir: PathBuf,
    pub sales_file_prefix: String,
    pub seller_report: PathBuf,
    pub product_report: PathBuf,
    pub seller_grouping: SellerGrouping,
}

impl ReportConfig {
    /// Standard file names, all inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            seller_file: dir.join(SELLER_FILE_NAME),
            product_file: dir.join(PRODUCT_FILE_NAME),
            sales_dir: dir.to_path_buf(),
            sales_file_prefix: SALES_FILE_PREFIX.to_string(),
            seller_report: dir.join(SELLER_REPORT_FILE_NAME),
            product_report: dir.join(PRODUCT_REPORT_FILE_NAME),
            seller_grouping: SellerGrouping::default(),
        }
    }

    pub fn with_grouping(mut self, grouping: SellerGrouping) -> Self {
        self.seller_grouping = grouping;
        self
    }

    /// Path of the sales file owned by `document_id`
    pub fn sales_file(&self, document_id: &str) -> PathBuf {
        self.sales_dir.join(format!(
            "{}{}.{}",
            self.sales_file_prefix, document_id, SALES_FILE_EXTENSION
        ))
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_layout() {
        let config = ReportConfig::default();
        assert_eq!(config.seller_file, Path::new("files/salesmen_info.csv"));
        assert_eq!(config.product_file, Path::new("files/products.csv"));
        assert_eq!(config.sales_file("12345"), Path::new("files/sales_12345.csv"));
        assert_eq!(config.seller_report, Path::new("files/vendor_sales.csv"));
        assert_eq!(config.product_report, Path::new("files/product_sales.csv"));
        assert_eq!(config.seller_grouping, SellerGrouping::FullName);
    }
}
