use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::{ObserverError, StockObserver};
use crate::domain::{Product, StockAlert};

/// Turns threshold crossings into [`StockAlert`]s on a broadcast stream.
///
/// One instance is shared by every warehouse of an inventory system.
pub struct AlertService {
    sender: broadcast::Sender<StockAlert>,
}

impl AlertService {
    /// `capacity` is how many alerts a slow subscriber may fall behind by
    /// before it starts missing them.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StockAlert> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn format_message(product: &Product) -> String {
        format!(
            "Low stock for {} (ID: {}) - only {} left! Threshold: {}",
            product.name(),
            product.id(),
            product.quantity(),
            product.reorder_threshold()
        )
    }
}

impl StockObserver for AlertService {
    fn on_stock_below_threshold(&self, product: &Product) -> Result<(), ObserverError> {
        let message = Self::format_message(product);
        warn!(product_id = %product.id(), quantity = product.quantity(), "{}", message);

        let alert = StockAlert {
            product: product.clone(),
            message,
            raised_at: Utc::now(),
        };
        // No subscribers is fine; the alert has already been logged.
        match self.sender.send(alert) {
            Ok(receivers) => debug!(receivers, "Stock alert published"),
            Err(_) => debug!("Stock alert published with no subscribers"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_alert_reaches_every_subscriber() {
        let service = AlertService::new(8);
        let mut first = service.subscribe();
        let mut second = service.subscribe();

        let product = Product::new("p1", "Bolt", 4, 5);
        service.on_stock_below_threshold(&product).unwrap();

        let alert = first.recv().await.unwrap();
        assert_eq!(alert.message, "Low stock for Bolt (ID: p1) - only 4 left! Threshold: 5");
        assert_eq!(alert.product, product);
        assert_eq!(second.recv().await.unwrap().product_id(), "p1");
    }

    #[test]
    fn test_no_subscribers_is_not_an_error() {
        let service = AlertService::new(8);
        assert_eq!(service.subscriber_count(), 0);
        assert!(service.on_stock_below_threshold(&Product::new("p1", "Bolt", 0, 5)).is_ok());
    }
}
