//! # Warehouse Inventory
//!
//! Per-warehouse stock tracking with shipment receipt, order fulfillment and
//! low-stock alerts, persisted to a flat text file after every change.
//!
//! ## Layout
//!
//! - **Domain** - [`Product`] and [`Warehouse`], usable on their own from any
//!   number of threads
//! - **Observers** - [`StockObserver`] capability and the [`AlertService`]
//!   that turns threshold crossings into [`StockAlert`]s
//! - **Manager** - [`WarehouseManager`], a task that owns every warehouse and
//!   rewrites the data file after each mutation
//! - **Client** - [`InventoryClient`], the cloneable handle callers use
//! - **System** - [`InventorySystem`] wires it all together and shuts it down
//!
//! ## Example Usage
//!
//! ```no_run
//! use warehouse_inventory::{InventoryConfig, InventorySystem, Product};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let system = InventorySystem::start(InventoryConfig::default()).await;
//! let mut alerts = system.subscribe_alerts();
//!
//! let client = system.client();
//! client.create_warehouse("W1".into(), "Main".into()).await?;
//! client.add_product("W1".into(), Product::new("P1", "Hex Bolt", 10, 5)).await?;
//! client.fulfill_order("W1".into(), "P1".into(), 6).await?;
//!
//! let alert = alerts.recv().await?;
//! println!("{}", alert.message);
//!
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod app_system;
pub mod clients;
pub mod domain;
pub mod error;
pub mod inventory_actor;
pub mod messages;
pub mod observer;
pub mod persistence;

#[cfg(test)]
mod mock_framework;

pub use app_system::{setup_tracing, InventoryConfig, InventorySystem};
pub use clients::InventoryClient;
pub use domain::{Product, StockAlert, Warehouse, WarehouseSnapshot};
pub use error::{InventoryError, InventoryResult};
pub use inventory_actor::WarehouseManager;
pub use observer::{AlertService, ObserverError, StockObserver};
