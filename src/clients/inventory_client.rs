use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, instrument};

use crate::domain::{Product, StockAlert, WarehouseSnapshot};
use crate::error::{InventoryError, InventoryResult};
use crate::messages::{InventoryRequest, ObserverHandle};
use crate::observer::{AlertService, StockObserver};

/// Cloneable handle to the warehouse manager.
///
/// Every method submits a request and resolves once the manager has answered.
/// Mutating methods resolve only after the data file has been rewritten.
#[derive(Clone)]
pub struct InventoryClient {
    sender: mpsc::Sender<InventoryRequest>,
    alerts: Arc<AlertService>,
}

impl InventoryClient {
    pub fn new(sender: mpsc::Sender<InventoryRequest>, alerts: Arc<AlertService>) -> Self {
        Self { sender, alerts }
    }

    /// Receives every low-stock alert raised from now on, across all
    /// warehouses.
    pub fn subscribe_alerts(&self) -> broadcast::Receiver<StockAlert> {
        self.alerts.subscribe()
    }

    /// Attaches an extra observer to one warehouse. Returns `false` if it was
    /// already attached.
    #[instrument(skip(self, observer))]
    pub async fn register_observer(
        &self,
        warehouse_id: String,
        observer: Arc<dyn StockObserver>,
    ) -> Result<bool, InventoryError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        let request = InventoryRequest::RegisterObserver {
            warehouse_id,
            observer: ObserverHandle(observer),
            respond_to,
        };
        self.request(request, response).await
    }

    /// Detaches an observer. Returns `false` if it was not attached.
    #[instrument(skip(self, observer))]
    pub async fn unregister_observer(
        &self,
        warehouse_id: String,
        observer: Arc<dyn StockObserver>,
    ) -> Result<bool, InventoryError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        let request = InventoryRequest::UnregisterObserver {
            warehouse_id,
            observer: ObserverHandle(observer),
            respond_to,
        };
        self.request(request, response).await
    }

    /// Asks the manager to stop once the requests queued before this one are
    /// handled.
    pub async fn shutdown(&self) -> Result<(), InventoryError> {
        self.sender.send(InventoryRequest::Shutdown).await.map_err(|_| manager_closed())
    }

    /// Sends one request and waits for the manager's answer.
    async fn request<T>(
        &self,
        request: InventoryRequest,
        response: oneshot::Receiver<InventoryResult<T>>,
    ) -> InventoryResult<T> {
        self.sender.send(request).await.map_err(|_| manager_closed())?;
        response
            .await
            .map_err(|_| InventoryError::ActorCommunicationError("Actor dropped".to_string()))?
    }
}

fn manager_closed() -> InventoryError {
    InventoryError::ActorCommunicationError("Actor closed".to_string())
}

client_method!(
    /// Creates an empty warehouse and saves it.
    fn create_warehouse(id: String, name: String) -> WarehouseSnapshot => CreateWarehouse
);
client_method!(fn get_warehouse(id: String) -> WarehouseSnapshot => GetWarehouse);
client_method!(
    /// Every warehouse, sorted by id.
    fn get_all_warehouses() -> Vec<WarehouseSnapshot> => GetAllWarehouses
);
client_method!(fn remove_warehouse(warehouse_id: String) -> () => RemoveWarehouse);
client_method!(fn add_product(warehouse_id: String, product: Product) -> () => AddProduct);
client_method!(fn get_product(warehouse_id: String, product_id: String) -> Product => GetProduct);
client_method!(fn remove_product(warehouse_id: String, product_id: String) -> () => RemoveProduct);
client_method!(
    /// Case-insensitive match on product id or name. An empty query matches
    /// everything.
    fn search_products(warehouse_id: String, query: String) -> Vec<Product> => SearchProducts
);
client_method!(
    fn receive_shipment(warehouse_id: String, product_id: String, quantity: u32) -> Product => ReceiveShipment
);
client_method!(
    /// Ships stock out. Low-stock alerts raised by this order have been
    /// published by the time it resolves.
    fn fulfill_order(warehouse_id: String, product_id: String, quantity: u32) -> Product => FulfillOrder
);
