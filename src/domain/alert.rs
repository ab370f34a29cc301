use chrono::{DateTime, Utc};

use super::Product;

/// A low-stock alert as delivered to alert stream subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct StockAlert {
    /// Product state right after the fulfillment that crossed the threshold.
    pub product: Product,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl StockAlert {
    pub fn product_id(&self) -> &str {
        self.product.id()
    }

    pub fn product_name(&self) -> &str {
        self.product.name()
    }

    pub fn quantity(&self) -> u32 {
        self.product.quantity()
    }

    pub fn reorder_threshold(&self) -> u32 {
        self.product.reorder_threshold()
    }
}
