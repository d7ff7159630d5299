/// First line of every sales file: `document_type;document_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesHeader {
    pub document_type: String,
    pub document_id: String,
}

/// One `product_id;quantity` line of a seller's sales file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: u64,
}

impl SaleLine {
    pub fn new(product_id: impl Into<String>, quantity: u64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}
