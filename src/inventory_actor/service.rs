use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::clients::InventoryClient;
use crate::domain::{Product, Warehouse, WarehouseSnapshot};
use crate::error::{require_non_empty, InventoryError, InventoryResult};
use crate::messages::{InventoryRequest, ObserverHandle, Reply};
use crate::observer::{AlertService, StockObserver};
use crate::persistence::{codec, DataFile};

/// Owns every warehouse and the data file.
///
/// Runs as a single task: requests are handled one at a time, and each
/// mutating request is answered only after the whole inventory has been
/// written back to disk. That also keeps file writes strictly sequential.
pub struct WarehouseManager {
    receiver: mpsc::Receiver<InventoryRequest>,
    warehouses: BTreeMap<String, Warehouse>,
    alert_service: Arc<AlertService>,
    data_file: DataFile,
}

impl WarehouseManager {
    /// Loads the data file and returns the manager with a client connected
    /// to it. The manager does nothing until [`WarehouseManager::run`] is
    /// spawned.
    #[instrument(name = "warehouse_manager_load", skip_all, fields(path = %data_file.path().display()))]
    pub async fn load(
        buffer_size: usize,
        data_file: DataFile,
        alert_service: Arc<AlertService>,
    ) -> (Self, InventoryClient) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let mut manager = Self {
            receiver,
            warehouses: BTreeMap::new(),
            alert_service,
            data_file,
        };

        for snapshot in manager.data_file.load().await {
            let warehouse = manager.new_warehouse(&snapshot.id, &snapshot.name);
            for product in snapshot.products {
                if let Err(e) = warehouse.add_product(product) {
                    warn!(warehouse_id = %snapshot.id, error = %e, "Skipping stored product");
                }
            }
            manager.warehouses.insert(snapshot.id, warehouse);
        }
        info!(warehouses = manager.warehouses.len(), "Inventory loaded");

        let client = InventoryClient::new(sender, manager.alert_service.clone());
        (manager, client)
    }

    #[instrument(name = "warehouse_manager", skip(self))]
    pub async fn run(mut self) {
        info!("WarehouseManager starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                InventoryRequest::CreateWarehouse { id, name, respond_to } => {
                    self.handle_create_warehouse(id, name, respond_to).await;
                }
                InventoryRequest::GetWarehouse { id, respond_to } => {
                    let _ = respond_to.send(self.warehouse(&id).map(Warehouse::snapshot));
                }
                InventoryRequest::GetAllWarehouses { respond_to } => {
                    let all = self.warehouses.values().map(Warehouse::snapshot).collect();
                    let _ = respond_to.send(Ok(all));
                }
                InventoryRequest::RemoveWarehouse { warehouse_id, respond_to } => {
                    self.handle_remove_warehouse(warehouse_id, respond_to).await;
                }
                InventoryRequest::AddProduct { warehouse_id, product, respond_to } => {
                    self.handle_add_product(warehouse_id, product, respond_to).await;
                }
                InventoryRequest::GetProduct { warehouse_id, product_id, respond_to } => {
                    let result = self
                        .warehouse(&warehouse_id)
                        .and_then(|w| w.get_product(&product_id));
                    let _ = respond_to.send(result);
                }
                InventoryRequest::RemoveProduct { warehouse_id, product_id, respond_to } => {
                    self.handle_remove_product(warehouse_id, product_id, respond_to).await;
                }
                InventoryRequest::SearchProducts { warehouse_id, query, respond_to } => {
                    let result = self
                        .warehouse(&warehouse_id)
                        .map(|w| w.snapshot().search(&query));
                    let _ = respond_to.send(result);
                }
                InventoryRequest::ReceiveShipment { warehouse_id, product_id, quantity, respond_to } => {
                    self.handle_receive_shipment(warehouse_id, product_id, quantity, respond_to).await;
                }
                InventoryRequest::FulfillOrder { warehouse_id, product_id, quantity, respond_to } => {
                    self.handle_fulfill_order(warehouse_id, product_id, quantity, respond_to).await;
                }
                InventoryRequest::RegisterObserver { warehouse_id, observer, respond_to } => {
                    self.handle_register_observer(warehouse_id, observer, respond_to);
                }
                InventoryRequest::UnregisterObserver { warehouse_id, observer, respond_to } => {
                    let result = self
                        .warehouse(&warehouse_id)
                        .map(|w| w.unregister_observer(&observer.0));
                    let _ = respond_to.send(result);
                }
                InventoryRequest::Shutdown => {
                    info!("WarehouseManager shutting down");
                    break;
                }
            }
        }
        info!("WarehouseManager stopped");
    }

    #[instrument(fields(warehouse_id = %id), skip(self, name, respond_to))]
    async fn handle_create_warehouse(&mut self, id: String, name: String, respond_to: Reply<WarehouseSnapshot>) {
        debug!("Processing create_warehouse request");
        let result = self.create_warehouse(id, name);
        let result = self.persist_after(result).await;
        if result.is_ok() {
            info!("Warehouse created");
        }
        let _ = respond_to.send(result);
    }

    #[instrument(fields(warehouse_id = %warehouse_id), skip(self, respond_to))]
    async fn handle_remove_warehouse(&mut self, warehouse_id: String, respond_to: Reply<()>) {
        debug!("Processing remove_warehouse request");
        let result = require_non_empty("Warehouse ID", &warehouse_id).and_then(|_| {
            self.warehouses
                .remove(&warehouse_id)
                .map(|_| ())
                .ok_or_else(|| warehouse_not_found(&warehouse_id))
        });
        let result = self.persist_after(result).await;
        if result.is_ok() {
            info!("Warehouse removed");
        }
        let _ = respond_to.send(result);
    }

    #[instrument(fields(warehouse_id = %warehouse_id, product_id = %product.id()), skip(self, product, respond_to))]
    async fn handle_add_product(&mut self, warehouse_id: String, product: Product, respond_to: Reply<()>) {
        debug!("Processing add_product request");
        let result = validate_product(&product)
            .and_then(|_| self.warehouse(&warehouse_id))
            .and_then(|w| w.add_product(product));
        let result = self.persist_after(result).await;
        let _ = respond_to.send(result);
    }

    #[instrument(fields(warehouse_id = %warehouse_id, product_id = %product_id), skip(self, respond_to))]
    async fn handle_remove_product(&mut self, warehouse_id: String, product_id: String, respond_to: Reply<()>) {
        debug!("Processing remove_product request");
        let result = require_non_empty("Product ID", &product_id)
            .and_then(|_| self.warehouse(&warehouse_id))
            .and_then(|w| w.remove_product(&product_id))
            .map(|_| ());
        let result = self.persist_after(result).await;
        let _ = respond_to.send(result);
    }

    #[instrument(fields(warehouse_id = %warehouse_id, product_id = %product_id), skip(self, respond_to))]
    async fn handle_receive_shipment(
        &mut self,
        warehouse_id: String,
        product_id: String,
        quantity: u32,
        respond_to: Reply<Product>,
    ) {
        debug!("Processing receive_shipment request");
        let result = require_non_empty("Product ID", &product_id)
            .and_then(|_| self.warehouse(&warehouse_id))
            .and_then(|w| w.receive_shipment(&product_id, quantity));
        let result = self.persist_after(result).await;
        let _ = respond_to.send(result);
    }

    #[instrument(fields(warehouse_id = %warehouse_id, product_id = %product_id), skip(self, respond_to))]
    async fn handle_fulfill_order(
        &mut self,
        warehouse_id: String,
        product_id: String,
        quantity: u32,
        respond_to: Reply<Product>,
    ) {
        debug!("Processing fulfill_order request");
        let result = require_non_empty("Product ID", &product_id)
            .and_then(|_| self.warehouse(&warehouse_id))
            .and_then(|w| w.fulfill_order(&product_id, quantity));
        let result = self.persist_after(result).await;
        let _ = respond_to.send(result);
    }

    #[instrument(fields(warehouse_id = %warehouse_id), skip(self, observer, respond_to))]
    fn handle_register_observer(&self, warehouse_id: String, observer: ObserverHandle, respond_to: Reply<bool>) {
        let result = self.warehouse(&warehouse_id).map(|w| w.register_observer(observer.0));
        if let Ok(added) = &result {
            debug!(added, "Observer registration processed");
        }
        let _ = respond_to.send(result);
    }

    fn create_warehouse(&mut self, id: String, name: String) -> InventoryResult<WarehouseSnapshot> {
        require_non_empty("Warehouse ID", &id)?;
        require_non_empty("Warehouse name", &name)?;
        codec::check_storable("Warehouse ID", &id)?;
        codec::check_storable("Warehouse name", &name)?;
        if self.warehouses.contains_key(&id) {
            return Err(InventoryError::DuplicateKey(format!("Warehouse with ID {} already exists", id)));
        }
        let warehouse = self.new_warehouse(&id, &name);
        let snapshot = warehouse.snapshot();
        self.warehouses.insert(id, warehouse);
        Ok(snapshot)
    }

    /// A fresh warehouse watched by the shared alert service.
    fn new_warehouse(&self, id: &str, name: &str) -> Warehouse {
        let warehouse = Warehouse::new(id, name);
        let alerts: Arc<dyn StockObserver> = self.alert_service.clone();
        warehouse.register_observer(alerts);
        warehouse
    }

    fn warehouse(&self, id: &str) -> InventoryResult<&Warehouse> {
        require_non_empty("Warehouse ID", id)?;
        self.warehouses.get(id).ok_or_else(|| warehouse_not_found(id))
    }

    /// Writes the inventory back to disk when `result` is a success.
    ///
    /// A failed write does not undo the change already made in memory; the
    /// caller gets `PersistenceFailure` instead of the success value.
    async fn persist_after<T>(&self, result: InventoryResult<T>) -> InventoryResult<T> {
        let value = result?;
        let snapshots: Vec<WarehouseSnapshot> = self.warehouses.values().map(Warehouse::snapshot).collect();
        if let Err(e) = self.data_file.save(&snapshots).await {
            error!(error = %e, "Change applied in memory but not saved");
            return Err(e);
        }
        Ok(value)
    }
}

fn validate_product(product: &Product) -> InventoryResult<()> {
    require_non_empty("Product ID", product.id())?;
    require_non_empty("Product name", product.name())?;
    codec::check_storable("Product ID", product.id())?;
    codec::check_storable("Product name", product.name())
}

fn warehouse_not_found(id: &str) -> InventoryError {
    InventoryError::NotFound(format!("Warehouse with ID {} not found", id))
}
