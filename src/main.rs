use tracing::{error, info, warn, Instrument};
use warehouse_inventory::{setup_tracing, InventoryConfig, InventorySystem, Product};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = InventoryConfig::from_env().map_err(|e| e.to_string())?;
    info!(path = %config.data_file.display(), "Starting warehouse inventory demo");

    let system = InventorySystem::start(config).await;
    let client = system.client();

    // Print alerts as they arrive, the way a UI would show them.
    let mut alerts = system.subscribe_alerts();
    let alert_printer = tokio::spawn(async move {
        while let Ok(alert) = alerts.recv().await {
            println!("[{}] {}", alert.raised_at.format("%Y-%m-%d %H:%M:%S"), alert.message);
        }
    });

    let span = tracing::info_span!("demo_setup");
    async {
        if client.get_warehouse("DEMO".to_string()).await.is_err() {
            info!("Creating demo warehouse");
            client
                .create_warehouse("DEMO".to_string(), "Demo Warehouse".to_string())
                .await
                .map_err(|e| e.to_string())?;
        }
        if client.get_product("DEMO".to_string(), "BOLT-10".to_string()).await.is_err() {
            let product = Product::new("BOLT-10", "Hex Bolt M10", 12, 5);
            client
                .add_product("DEMO".to_string(), product)
                .await
                .map_err(|e| e.to_string())?;
        }
        Ok::<(), String>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("demo_orders");
    async {
        match client.receive_shipment("DEMO".to_string(), "BOLT-10".to_string(), 3).await {
            Ok(product) => info!(quantity = product.quantity(), "Shipment received"),
            Err(e) => error!(error = %e, "Shipment failed"),
        }
        // Keep shipping orders until stock runs low, which raises an alert.
        loop {
            match client.fulfill_order("DEMO".to_string(), "BOLT-10".to_string(), 4).await {
                Ok(product) if product.is_below_threshold() => {
                    info!(quantity = product.quantity(), "Stock is low");
                    break;
                }
                Ok(product) => info!(quantity = product.quantity(), "Order fulfilled"),
                Err(e) => {
                    warn!(error = %e, "Order could not be fulfilled");
                    break;
                }
            }
        }
    }
    .instrument(span)
    .await;

    match client.get_all_warehouses().await {
        Ok(warehouses) => {
            for warehouse in warehouses {
                println!("{}", warehouse);
                for product in &warehouse.products {
                    println!("  {:<12} {:<20} {:>6}  {}", product.id(), product.name(), product.quantity(), product.status());
                }
            }
        }
        Err(e) => error!(error = %e, "Could not list warehouses"),
    }

    // Shutdown system gracefully
    drop(client);
    system.shutdown().await?;
    // The alert stream closes once the manager and every client are gone.
    let _ = alert_printer.await;

    info!("Demo completed successfully");
    Ok(())
}
