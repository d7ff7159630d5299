use std::collections::HashMap;

use tracing::warn;

use crate::models::{Product, Seller};

/// Name reported for a product id missing from the product table
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Price used for a product id missing from the product table
pub const UNKNOWN_PRICE: u64 = 0;

/// A reference record with a unique identity
pub trait Keyed {
    /// Label used in log events
    const TABLE: &'static str;

    fn key(&self) -> &str;
}

impl Keyed for Seller {
    const TABLE: &'static str = "seller";

    fn key(&self) -> &str {
        &self.document_id
    }
}

impl Keyed for Product {
    const TABLE: &'static str = "product";

    fn key(&self) -> &str {
        &self.product_id
    }
}

/// Lookup table that remembers the order keys were first seen in
///
/// A repeated key overwrites the earlier record in place (last write wins)
/// without moving it, so iteration keeps reference-file order.
#[derive(Debug, Clone)]
pub struct KeyedTable<T> {
    entries: Vec<T>,
    positions: HashMap<String, usize>,
}

impl<T: Keyed> KeyedTable<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Insert a record, returning the one it replaced
    pub fn insert(&mut self, record: T) -> Option<T> {
        let existing = self.positions.get(record.key()).copied();
        match existing {
            Some(pos) => Some(std::mem::replace(&mut self.entries[pos], record)),
            None => {
                self.positions
                    .insert(record.key().to_string(), self.entries.len());
                self.entries.push(record);
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.positions.get(key).map(|&pos| &self.entries[pos])
    }

    /// Position of `key` in first-seen order
    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Records in first-seen order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Keyed> Default for KeyedTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed> FromIterator<T> for KeyedTable<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut table = Self::new();
        for record in iter {
            let key = record.key().to_string();
            if table.insert(record).is_some() {
                warn!(table = T::TABLE, key = %key, "duplicate key, keeping the last record");
            }
        }
        table
    }
}

pub type SellerIndex = KeyedTable<Seller>;
pub type ProductIndex = KeyedTable<Product>;

/// Build the document_id -> seller table
pub fn build_seller_index(sellers: impl IntoIterator<Item = Seller>) -> SellerIndex {
    sellers.into_iter().collect()
}

/// Build the product_id -> product table
pub fn build_product_index(products: impl IntoIterator<Item = Product>) -> ProductIndex {
    products.into_iter().collect()
}

/// Seller and product tables, built once per report run
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    sellers: SellerIndex,
    products: ProductIndex,
}

impl ReferenceIndex {
    pub fn new(sellers: SellerIndex, products: ProductIndex) -> Self {
        Self { sellers, products }
    }

    pub fn from_records(
        sellers: impl IntoIterator<Item = Seller>,
        products: impl IntoIterator<Item = Product>,
    ) -> Self {
        Self::new(build_seller_index(sellers), build_product_index(products))
    }

    pub fn sellers(&self) -> &SellerIndex {
        &self.sellers
    }

    pub fn products(&self) -> &ProductIndex {
        &self.products
    }

    pub fn seller(&self, document_id: &str) -> Option<&Seller> {
        self.sellers.get(document_id)
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.get(product_id)
    }

    /// Unit price of a product, or [`UNKNOWN_PRICE`] when the id is not indexed
    pub fn lookup_price(&self, product_id: &str) -> u64 {
        self.product(product_id)
            .map(|p| p.unit_price)
            .unwrap_or(UNKNOWN_PRICE)
    }

    /// Name of a product, or [`UNKNOWN_PRODUCT`] when the id is not indexed
    pub fn lookup_name(&self, product_id: &str) -> &str {
        self.product(product_id)
            .map(|p| p.name.as_str())
            .unwrap_or(UNKNOWN_PRODUCT)
    }
}
