pub mod product;
pub mod sale;
pub mod seller;

use std::fmt;

pub use product::Product;
pub use sale::{SaleLine, SalesHeader};
pub use seller::Seller;

/// Kind of line found in the input files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Seller,
    Product,
    SalesHeader,
    SaleLine,
}

impl RecordKind {
    /// Minimum number of `;`-separated fields a line of this kind carries
    pub fn arity(self) -> usize {
        match self {
            RecordKind::Seller => 4,
            RecordKind::Product => 3,
            RecordKind::SalesHeader | RecordKind::SaleLine => 2,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Seller => "seller",
            RecordKind::Product => "product",
            RecordKind::SalesHeader => "sales header",
            RecordKind::SaleLine => "sale line",
        };
        f.write_str(name)
    }
}
