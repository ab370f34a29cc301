use std::fmt;
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::domain::{Product, WarehouseSnapshot};
use crate::error::InventoryError;
use crate::observer::StockObserver;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Reply channel for inventory requests.
pub type Reply<T> = ServiceResponse<T, InventoryError>;

/// Typed messages for the inventory service. Each variant carries its
/// arguments and a oneshot channel for the reply.
#[derive(Debug)]
pub enum InventoryRequest {
    CreateWarehouse {
        id: String,
        name: String,
        respond_to: Reply<WarehouseSnapshot>,
    },
    GetWarehouse {
        id: String,
        respond_to: Reply<WarehouseSnapshot>,
    },
    GetAllWarehouses {
        respond_to: Reply<Vec<WarehouseSnapshot>>,
    },
    RemoveWarehouse {
        warehouse_id: String,
        respond_to: Reply<()>,
    },
    AddProduct {
        warehouse_id: String,
        product: Product,
        respond_to: Reply<()>,
    },
    GetProduct {
        warehouse_id: String,
        product_id: String,
        respond_to: Reply<Product>,
    },
    RemoveProduct {
        warehouse_id: String,
        product_id: String,
        respond_to: Reply<()>,
    },
    SearchProducts {
        warehouse_id: String,
        query: String,
        respond_to: Reply<Vec<Product>>,
    },
    ReceiveShipment {
        warehouse_id: String,
        product_id: String,
        quantity: u32,
        respond_to: Reply<Product>,
    },
    FulfillOrder {
        warehouse_id: String,
        product_id: String,
        quantity: u32,
        respond_to: Reply<Product>,
    },
    RegisterObserver {
        warehouse_id: String,
        observer: ObserverHandle,
        respond_to: Reply<bool>,
    },
    UnregisterObserver {
        warehouse_id: String,
        observer: ObserverHandle,
        respond_to: Reply<bool>,
    },
    Shutdown,
}

/// Shared observer as carried inside a request.
#[derive(Clone)]
pub struct ObserverHandle(pub Arc<dyn StockObserver>);

impl fmt::Debug for ObserverHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ObserverHandle(..)")
    }
}
