use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{ReportError, Result};
use crate::index::ReferenceIndex;
use crate::models::SaleLine;

/// Accumulated totals of one aggregation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesTotals {
    /// Revenue per seller document id, in the order sellers were recorded
    pub revenue_by_seller: Vec<(String, u64)>,
    /// Quantity per product id, in product table order
    pub quantity_by_product: Vec<(String, u64)>,
}

impl SalesTotals {
    pub fn revenue_of(&self, document_id: &str) -> Option<u64> {
        lookup(&self.revenue_by_seller, document_id)
    }

    pub fn quantity_of(&self, product_id: &str) -> Option<u64> {
        lookup(&self.quantity_by_product, product_id)
    }

    /// Fold another partial result into this one
    ///
    /// Totals for keys present in both are summed; new keys are appended in
    /// the order `other` holds them.
    pub fn merge(&mut self, other: SalesTotals) -> Result<()> {
        merge_into(&mut self.revenue_by_seller, other.revenue_by_seller, "seller revenue")?;
        merge_into(
            &mut self.quantity_by_product,
            other.quantity_by_product,
            "product quantity",
        )?;
        Ok(())
    }
}

fn lookup(totals: &[(String, u64)], key: &str) -> Option<u64> {
    totals.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
}

fn merge_into(
    target: &mut Vec<(String, u64)>,
    source: Vec<(String, u64)>,
    what: &str,
) -> Result<()> {
    let mut positions: HashMap<String, usize> = target
        .iter()
        .enumerate()
        .map(|(pos, (key, _))| (key.clone(), pos))
        .collect();

    // Known keys add in place, new keys append after the existing ones
    for (key, amount) in source {
        match positions.get(&key) {
            Some(&pos) => {
                target[pos].1 = checked_add(target[pos].1, amount, what, &key)?;
            }
            None => {
                positions.insert(key.clone(), target.len());
                target.push((key, amount));
            }
        }
    }
    Ok(())
}

/// Accumulates revenue per seller and quantity per product
///
/// Every product in the index starts with a zero quantity, so products
/// nobody sold still show up in the totals. Sale lines naming a product the
/// index does not know contribute nothing to either total.
pub struct SalesAggregator<'a> {
    index: &'a ReferenceIndex,
    /// Revenue per seller document id
    revenue: Vec<(String, u64)>,
    /// Map of document id to its slot in `revenue`
    seller_positions: HashMap<String, usize>,
    /// Quantity per product, aligned with the index's product order
    quantities: Vec<u64>,
}

impl<'a> SalesAggregator<'a> {
    pub fn new(index: &'a ReferenceIndex) -> Self {
        Self {
            index,
            revenue: Vec::new(),
            seller_positions: HashMap::new(),
            quantities: vec![0; index.products().len()],
        }
    }

    /// Add one seller's sale lines to the running totals
    ///
    /// Returns the revenue these lines contributed. Recording the same
    /// seller twice adds to its existing total.
    pub fn record_sales<'l>(
        &mut self,
        document_id: &str,
        lines: impl IntoIterator<Item = &'l SaleLine>,
    ) -> Result<u64> {
        let mut seller_revenue: u64 = 0;

        for line in lines {
            // Unknown products price at zero
            let price = self.index.lookup_price(&line.product_id);
            let line_revenue = line.quantity.checked_mul(price).ok_or_else(|| {
                ReportError::Overflow {
                    what: format!("revenue of seller {}", document_id),
                }
            })?;
            seller_revenue =
                checked_add(seller_revenue, line_revenue, "revenue of seller", document_id)?;

            // Quantities only count for indexed products
            match self.index.products().position(&line.product_id) {
                Some(pos) => {
                    self.quantities[pos] = checked_add(
                        self.quantities[pos],
                        line.quantity,
                        "quantity of product",
                        &line.product_id,
                    )?;
                }
                None => {
                    warn!(
                        seller = %document_id,
                        product = %line.product_id,
                        quantity = line.quantity,
                        "Ignoring sale of unknown product"
                    );
                }
            }
        }

        // First sighting of a seller claims the next slot
        let slot = match self.seller_positions.get(document_id) {
            Some(&pos) => pos,
            None => {
                self.seller_positions
                    .insert(document_id.to_string(), self.revenue.len());
                self.revenue.push((document_id.to_string(), 0));
                self.revenue.len() - 1
            }
        };
        self.revenue[slot].1 = checked_add(
            self.revenue[slot].1,
            seller_revenue,
            "revenue of seller",
            document_id,
        )?;

        debug!(seller = %document_id, revenue = seller_revenue, "Recorded seller sales");
        Ok(seller_revenue)
    }

    /// Consume the aggregator and return the totals
    pub fn finish(self) -> SalesTotals {
        let quantity_by_product = self
            .index
            .products()
            .iter()
            .zip(self.quantities)
            .map(|(product, quantity)| (product.product_id.clone(), quantity))
            .collect();

        SalesTotals {
            revenue_by_seller: self.revenue,
            quantity_by_product,
        }
    }
}

fn checked_add(total: u64, amount: u64, what: &str, key: &str) -> Result<u64> {
    total.checked_add(amount).ok_or_else(|| ReportError::Overflow {
        what: format!("{} {}", what, key),
    })
}
