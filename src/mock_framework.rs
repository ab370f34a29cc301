//! # Mock Framework
//!
//! Utilities for testing code that talks to an [`InventoryClient`] without a
//! running [`WarehouseManager`](crate::inventory_actor::WarehouseManager).
//!
//! Use [`create_mock_client`] to get a client and the receiving end of its
//! request channel. Then use helpers like [`expect_fulfill_order`] to assert
//! what was sent and answer it however the test needs.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::clients::InventoryClient;
use crate::domain::{Product, WarehouseSnapshot};
use crate::messages::{InventoryRequest, Reply};
use crate::observer::AlertService;

/// Creates a client whose requests land in the returned receiver.
pub fn create_mock_client(buffer_size: usize) -> (InventoryClient, mpsc::Receiver<InventoryRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (InventoryClient::new(sender, Arc::new(AlertService::new(8))), receiver)
}

/// Helper to verify that the next message is a GetWarehouse request
pub async fn expect_get_warehouse(
    receiver: &mut mpsc::Receiver<InventoryRequest>,
) -> Option<(String, Reply<WarehouseSnapshot>)> {
    match receiver.recv().await {
        Some(InventoryRequest::GetWarehouse { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an AddProduct request
pub async fn expect_add_product(
    receiver: &mut mpsc::Receiver<InventoryRequest>,
) -> Option<(String, Product, Reply<()>)> {
    match receiver.recv().await {
        Some(InventoryRequest::AddProduct { warehouse_id, product, respond_to }) => {
            Some((warehouse_id, product, respond_to))
        }
        _ => None,
    }
}

/// Helper to verify that the next message is a FulfillOrder request
pub async fn expect_fulfill_order(
    receiver: &mut mpsc::Receiver<InventoryRequest>,
) -> Option<(String, String, u32, Reply<Product>)> {
    match receiver.recv().await {
        Some(InventoryRequest::FulfillOrder { warehouse_id, product_id, quantity, respond_to }) => {
            Some((warehouse_id, product_id, quantity, respond_to))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InventoryError;

    #[tokio::test]
    async fn test_mock_client_forwards_fulfillment() {
        let (client, mut receiver) = create_mock_client(10);

        let task = tokio::spawn(async move {
            client.fulfill_order("w1".to_string(), "p1".to_string(), 3).await
        });

        let (warehouse_id, product_id, quantity, responder) =
            expect_fulfill_order(&mut receiver).await.expect("Expected FulfillOrder request");
        assert_eq!(warehouse_id, "w1");
        assert_eq!(product_id, "p1");
        assert_eq!(quantity, 3);
        responder.send(Ok(Product::new("p1", "Bolt", 7, 5))).unwrap();

        let product = task.await.unwrap().unwrap();
        assert_eq!(product.quantity(), 7);
    }

    #[tokio::test]
    async fn test_domain_errors_pass_through() {
        let (client, mut receiver) = create_mock_client(10);

        let task = tokio::spawn(async move {
            client.add_product("w1".to_string(), Product::new("p1", "Bolt", 1, 1)).await
        });

        let (_, product, responder) = expect_add_product(&mut receiver).await.expect("Expected AddProduct request");
        assert_eq!(product.id(), "p1");
        responder.send(Err(InventoryError::DuplicateKey("p1".to_string()))).unwrap();

        assert_eq!(task.await.unwrap(), Err(InventoryError::DuplicateKey("p1".to_string())));
    }

    #[tokio::test]
    async fn test_dropped_reply_is_a_communication_error() {
        let (client, mut receiver) = create_mock_client(10);

        let task = tokio::spawn(async move { client.get_warehouse("w1".to_string()).await });

        let (id, responder) = expect_get_warehouse(&mut receiver).await.expect("Expected GetWarehouse request");
        assert_eq!(id, "w1");
        drop(responder);

        assert_eq!(
            task.await.unwrap(),
            Err(InventoryError::ActorCommunicationError("Actor dropped".to_string()))
        );
    }

    #[tokio::test]
    async fn test_closed_manager_is_a_communication_error() {
        let (client, receiver) = create_mock_client(10);
        drop(receiver);

        assert_eq!(
            client.get_all_warehouses().await,
            Err(InventoryError::ActorCommunicationError("Actor closed".to_string()))
        );
    }
}
