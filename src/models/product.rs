/// Product reference record: `product_id;name;unit_price`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub unit_price: u64,
}

impl Product {
    pub fn new(product_id: impl Into<String>, name: impl Into<String>, unit_price: u64) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
        }
    }
}
