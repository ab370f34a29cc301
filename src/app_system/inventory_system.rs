use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info};

use super::InventoryConfig;
use crate::clients::InventoryClient;
use crate::domain::StockAlert;
use crate::inventory_actor::WarehouseManager;
use crate::observer::AlertService;
use crate::persistence::DataFile;

/// The running inventory engine.
///
/// Responsible for loading stored data, starting the manager task, handing out
/// client handles, and shutting everything down.
pub struct InventorySystem {
    pub client: InventoryClient,
    handle: tokio::task::JoinHandle<()>,
}

impl InventorySystem {
    /// Loads the data file named in `config` and starts serving requests.
    pub async fn start(config: InventoryConfig) -> Self {
        info!(path = %config.data_file.display(), "Starting inventory system");

        let alert_service = Arc::new(AlertService::new(config.alert_buffer));
        let data_file = DataFile::new(config.data_file);

        let (manager, client) = WarehouseManager::load(config.request_buffer, data_file, alert_service).await;
        let handle = tokio::spawn(manager.run());

        Self { client, handle }
    }

    pub fn client(&self) -> InventoryClient {
        self.client.clone()
    }

    pub fn subscribe_alerts(&self) -> broadcast::Receiver<StockAlert> {
        self.client.subscribe_alerts()
    }

    /// Stops the manager after the requests already queued, then waits for it.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down inventory system...");

        // The manager may already be gone; waiting on the handle tells us how it ended.
        if let Err(e) = self.client.shutdown().await {
            info!(error = %e, "Manager already stopped");
        }

        if let Err(e) = self.handle.await {
            error!("Manager task failed: {:?}", e);
            return Err(format!("Manager task failed: {:?}", e));
        }

        info!("Inventory system shutdown complete.");
        Ok(())
    }
}
