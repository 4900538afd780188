//! Gateway state
//!
//! Application state for the gateway server.

use crate::broadcast::ChannelSubscriptions;
use moim_common::AppConfig;
use moim_service::ServiceContext;
use std::sync::Arc;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Service context with repositories and services
    service_context: Arc<ServiceContext>,
    /// Reference-counted Redis channel subscriptions
    subscriptions: Arc<ChannelSubscriptions>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(
        service_context: ServiceContext,
        subscriptions: Arc<ChannelSubscriptions>,
        config: AppConfig,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            subscriptions,
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the channel subscription table
    pub fn subscriptions(&self) -> &ChannelSubscriptions {
        &self.subscriptions
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .finish()
    }
}
