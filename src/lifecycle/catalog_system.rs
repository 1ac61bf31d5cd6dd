use crate::clients::ProductClient;
use crate::config::Config;
use crate::dispatcher;
use crate::framework::{BusError, EventBus};
use crate::store::{DocumentStore, StoreActor};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The runtime orchestrator for the catalog service.
///
/// `CatalogSystem` is responsible for:
/// - **Lifecycle Management**: Starting and stopping the store and the dispatcher
/// - **Wiring**: Registering the dispatcher at the configured service address
/// - **Producer Access**: Handing out a [`ProductClient`] bound to that address
///
/// # Example
///
/// ```ignore
/// let system = CatalogSystem::start(&config)?;
///
/// let response = system.product_client.list().await;
///
/// // Stop the dispatcher first, then the store
/// system.shutdown().await?;
/// ```
pub struct CatalogSystem {
    /// The bus shared by producer and dispatcher
    pub bus: EventBus,

    /// Producer bound to the service address
    pub product_client: ProductClient,

    address: String,

    /// Task handles in shutdown order (dispatcher first)
    handles: Vec<JoinHandle<()>>,
}

impl CatalogSystem {
    /// Starts the service backed by the in-memory store.
    pub fn start(config: &Config) -> Result<Self, BusError> {
        let (store_actor, store) = StoreActor::new(config.store_buffer);
        let store_handle = tokio::spawn(store_actor.run());

        let mut system = Self::start_with_store(config, store)?;
        system.handles.push(store_handle);
        Ok(system)
    }

    /// Starts the dispatcher over the given store.
    ///
    /// The caller owns whatever task drives `store`; only the dispatcher
    /// task is tracked here.
    pub fn start_with_store<S: DocumentStore>(config: &Config, store: S) -> Result<Self, BusError> {
        let bus = EventBus::new();
        let handle = dispatcher::spawn(
            &bus,
            &config.service_address,
            config.dispatch_buffer,
            store,
        )?;
        info!(address = %config.service_address, "Dispatcher registered");

        let product_client = ProductClient::new(
            bus.clone(),
            config.service_address.as_str(),
            config.request_timeout,
        );

        Ok(Self {
            bus,
            product_client,
            address: config.service_address.clone(),
            handles: vec![handle],
        })
    }

    /// Gracefully shuts down the service.
    ///
    /// This method:
    /// 1. Unregisters the service address, which closes the dispatcher's inbox
    /// 2. Waits for the dispatcher to answer every in-flight request
    /// 3. Waits for the store, which stops once the dispatcher released it
    ///
    /// # Returns
    ///
    /// - `Ok(())` if every task shut down cleanly
    /// - `Err(String)` if any task failed or panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        self.bus.unregister(&self.address);
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Task failed: {:?}", e);
                return Err(format!("Task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::time::Duration;

    fn config() -> Config {
        Config {
            port: 0,
            auth_token: "123".into(),
            service_address: "catalog.system-test".into(),
            request_timeout: Duration::from_secs(1),
            store_buffer: 8,
            dispatch_buffer: 4,
        }
    }

    #[tokio::test]
    async fn test_start_serves_requests_and_shuts_down() {
        let system = CatalogSystem::start(&config()).unwrap();

        let response = system.product_client.list().await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, json!({ "error": "No items found" }));

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_client_outliving_shutdown_gets_no_consumer() {
        let system = CatalogSystem::start(&config()).unwrap();
        let client = system.product_client.clone();

        system.shutdown().await.unwrap();

        let response = client.list().await;
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
