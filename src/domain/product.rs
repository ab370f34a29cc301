use std::fmt;

use crate::error::{require_positive, InventoryError, InventoryResult};

/// A stocked item inside a single warehouse.
///
/// Only `quantity` changes after construction, and only through
/// [`Product::increase`] and [`Product::decrease`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: String,
    name: String,
    quantity: u32,
    reorder_threshold: u32,
}

impl Product {
    /// Creates a product from already validated inputs.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        quantity: u32,
        reorder_threshold: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            reorder_threshold,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn reorder_threshold(&self) -> u32 {
        self.reorder_threshold
    }

    /// True when the quantity is at or below the reorder threshold.
    pub fn is_below_threshold(&self) -> bool {
        self.quantity <= self.reorder_threshold
    }

    /// Human readable stock status, as shown next to each product.
    pub fn status(&self) -> String {
        if self.is_below_threshold() {
            format!("LOW STOCK - {} left (Threshold: {})", self.quantity, self.reorder_threshold)
        } else {
            "In Stock".to_string()
        }
    }

    /// Adds `amount` units.
    ///
    /// # Errors
    /// `InvalidArgument` when `amount` is zero or the result would overflow.
    pub fn increase(&mut self, amount: u32) -> InventoryResult<()> {
        require_positive("amount", amount)?;
        self.quantity = self.quantity.checked_add(amount).ok_or_else(|| {
            InventoryError::InvalidArgument(format!(
                "amount {} would overflow quantity {}",
                amount, self.quantity
            ))
        })?;
        Ok(())
    }

    /// Removes `amount` units.
    ///
    /// # Errors
    /// `InvalidArgument` when `amount` is zero, `InsufficientStock` when it
    /// exceeds the current quantity. The quantity is untouched on failure.
    pub fn decrease(&mut self, amount: u32) -> InventoryResult<()> {
        require_positive("amount", amount)?;
        if amount > self.quantity {
            return Err(InventoryError::InsufficientStock {
                requested: amount,
                available: self.quantity,
            });
        }
        self.quantity -= amount;
        Ok(())
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
