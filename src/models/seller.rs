/// Seller reference record: `document_type;document_id;first_name;last_name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seller {
    pub document_type: String,
    pub document_id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Seller {
    pub fn new(
        document_type: impl Into<String>,
        document_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            document_type: document_type.into(),
            document_id: document_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Name used in the revenue report
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
