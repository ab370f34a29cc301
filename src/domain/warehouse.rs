use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info, instrument};

use super::Product;
use crate::error::{require_positive, InventoryError, InventoryResult};
use crate::observer::{ObserverRegistry, StockObserver};

type ProductSlot = Arc<Mutex<Product>>;

/// A named stock location holding products keyed by id.
///
/// Every method takes `&self`: the product map is behind a read/write lock and
/// each product behind its own mutex, so a `Warehouse` can be shared across
/// threads without any outside locking.
pub struct Warehouse {
    id: String,
    name: String,
    products: RwLock<HashMap<String, ProductSlot>>,
    observers: ObserverRegistry,
}

impl Warehouse {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            products: RwLock::new(HashMap::new()),
            observers: ObserverRegistry::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, product), fields(warehouse_id = %self.id, product_id = %product.id()))]
    pub fn add_product(&self, product: Product) -> InventoryResult<()> {
        let mut products = self.products.write().unwrap_or_else(PoisonError::into_inner);
        if products.contains_key(product.id()) {
            return Err(InventoryError::DuplicateKey(format!(
                "Product with ID {} already exists",
                product.id()
            )));
        }
        debug!("Product added");
        products.insert(product.id().to_string(), Arc::new(Mutex::new(product)));
        Ok(())
    }

    /// Returns a copy of the product as it is right now.
    pub fn get_product(&self, product_id: &str) -> InventoryResult<Product> {
        let slot = self.slot(product_id)?;
        let product = slot.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(product.clone())
    }

    #[instrument(skip(self), fields(warehouse_id = %self.id))]
    pub fn remove_product(&self, product_id: &str) -> InventoryResult<Product> {
        let mut products = self.products.write().unwrap_or_else(PoisonError::into_inner);
        let slot = products.remove(product_id).ok_or_else(|| not_found(product_id))?;
        debug!("Product removed");
        let product = slot.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(product.clone())
    }

    /// Adds received units to a product and returns its new state.
    #[instrument(skip(self), fields(warehouse_id = %self.id))]
    pub fn receive_shipment(&self, product_id: &str, quantity: u32) -> InventoryResult<Product> {
        require_positive("quantity", quantity)?;
        let slot = self.slot(product_id)?;
        let mut product = slot.lock().unwrap_or_else(PoisonError::into_inner);
        product.increase(quantity)?;
        debug!(quantity = product.quantity(), "Shipment received");
        Ok(product.clone())
    }

    /// Removes ordered units from a product and returns its new state.
    ///
    /// Observers are notified once, when this call moves the quantity from
    /// above the reorder threshold to at-or-below it. Calls that start out
    /// already at-or-below the threshold notify nobody.
    #[instrument(skip(self), fields(warehouse_id = %self.id))]
    pub fn fulfill_order(&self, product_id: &str, quantity: u32) -> InventoryResult<Product> {
        require_positive("quantity", quantity)?;
        let slot = self.slot(product_id)?;

        let (updated, crossed) = {
            let mut product = slot.lock().unwrap_or_else(PoisonError::into_inner);
            let previous_quantity = product.quantity();
            product.decrease(quantity)?;
            let crossed =
                previous_quantity > product.reorder_threshold() && product.is_below_threshold();
            (product.clone(), crossed)
        };
        debug!(quantity = updated.quantity(), "Order fulfilled");

        if crossed {
            info!(
                quantity = updated.quantity(),
                threshold = updated.reorder_threshold(),
                "Reorder threshold crossed"
            );
            self.observers.notify(&updated);
        }
        Ok(updated)
    }

    pub fn register_observer(&self, observer: Arc<dyn StockObserver>) -> bool {
        self.observers.register(observer)
    }

    pub fn unregister_observer(&self, observer: &Arc<dyn StockObserver>) -> bool {
        self.observers.unregister(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Copies of every product, sorted by id.
    pub fn products(&self) -> Vec<Product> {
        let slots: Vec<ProductSlot> = self
            .products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        let mut products: Vec<Product> = slots
            .iter()
            .map(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
            .collect();
        products.sort_by(|a, b| a.id().cmp(b.id()));
        products
    }

    pub fn snapshot(&self) -> WarehouseSnapshot {
        WarehouseSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            products: self.products(),
        }
    }

    fn slot(&self, product_id: &str) -> InventoryResult<ProductSlot> {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(product_id)
            .cloned()
            .ok_or_else(|| not_found(product_id))
    }
}

impl fmt::Debug for Warehouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Warehouse")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("products", &self.product_count())
            .field("observers", &self.observer_count())
            .finish()
    }
}

fn not_found(product_id: &str) -> InventoryError {
    InventoryError::NotFound(format!("Product with ID {} not found", product_id))
}

/// Read-only copy of a warehouse handed out to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseSnapshot {
    pub id: String,
    pub name: String,
    pub products: Vec<Product>,
}

impl WarehouseSnapshot {
    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id() == product_id)
    }

    /// Products whose id or name contains `query`, ignoring case.
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<Product> {
        let needle = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.id().to_lowercase().contains(&needle)
                    || p.name().to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}

impl fmt::Display for WarehouseSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
