// =============================================================================
// Client method macro
// =============================================================================

/// Generates an `InventoryClient` method for one request variant. Request
/// fields are named after the method params; the reply travels back through
/// `InventoryClient::request`, which every request shares.
macro_rules! client_method {
    ($(#[$meta:meta])* fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty => $variant:ident) => {
        impl InventoryClient {
            $(#[$meta])*
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> InventoryResult<$return_type> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.request(InventoryRequest::$variant { $($param,)* respond_to }, response).await
            }
        }
    };
}

mod inventory_client;

pub use inventory_client::*;
