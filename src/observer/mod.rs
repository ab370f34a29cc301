//! Low-stock notification: the observer capability and the registry that
//! fans a threshold crossing out to every registered observer.

mod alert_service;

pub use alert_service::*;

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::Product;

/// Failure reported by an observer. Logged, never propagated.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Observer failed: {0}")]
pub struct ObserverError(pub String);

/// Something that wants to know when a product drops to its reorder threshold.
pub trait StockObserver: Send + Sync {
    fn on_stock_below_threshold(&self, product: &Product) -> Result<(), ObserverError>;
}

/// Ordered, duplicate-free set of shared observers.
///
/// Notification copies the list under the read lock and calls observers
/// with no lock held, so an observer may register or unregister observers
/// on the same registry. Observers are identified by the `Arc` allocation
/// they live in.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: RwLock<Vec<Arc<dyn StockObserver>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the observer was already registered.
    pub fn register(&self, observer: Arc<dyn StockObserver>) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        if observers.iter().any(|existing| same_observer(existing, &observer)) {
            return false;
        }
        observers.push(observer);
        true
    }

    /// Returns `false` if the observer was not registered.
    pub fn unregister(&self, observer: &Arc<dyn StockObserver>) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|existing| !same_observer(existing, observer));
        observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls every observer in registration order and returns how many
    /// succeeded. An error or panic in one observer is logged and skipped.
    pub fn notify(&self, product: &Product) -> usize {
        let observers = self.observers.read().unwrap_or_else(PoisonError::into_inner).clone();
        let mut delivered = 0;
        for observer in observers.iter() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                observer.on_stock_below_threshold(product)
            }));
            match outcome {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => warn!(product_id = %product.id(), error = %e, "Error notifying observer"),
                Err(_) => warn!(product_id = %product.id(), "Observer panicked during notification"),
            }
        }
        debug!(product_id = %product.id(), delivered, total = observers.len(), "Observers notified");
        delivered
    }
}

fn same_observer(a: &Arc<dyn StockObserver>, b: &Arc<dyn StockObserver>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every product it is told about.
    #[derive(Default)]
    pub struct RecordingObserver {
        pub seen: Mutex<Vec<Product>>,
    }

    impl RecordingObserver {
        pub fn count(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl StockObserver for RecordingObserver {
        fn on_stock_below_threshold(&self, product: &Product) -> Result<(), ObserverError> {
            self.seen.lock().unwrap().push(product.clone());
            Ok(())
        }
    }

    pub struct FailingObserver;

    impl StockObserver for FailingObserver {
        fn on_stock_below_threshold(&self, _product: &Product) -> Result<(), ObserverError> {
            Err(ObserverError("mailbox full".to_string()))
        }
    }

    pub struct PanickingObserver;

    impl StockObserver for PanickingObserver {
        fn on_stock_below_threshold(&self, _product: &Product) -> Result<(), ObserverError> {
            panic!("observer blew up");
        }
    }
}
