use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{AppError, Result};
use crate::modules::gateways::models::DriverDescriptor;
use crate::modules::gateways::services::GatewayDriver;

/// Registry of gateway drivers
///
/// Maps driver name to its trait object and callback endpoint slug to the
/// owning driver. Built once at startup; the set of drivers is closed.
#[derive(Default)]
pub struct DriverRegistry {
    by_name: HashMap<&'static str, Arc<dyn GatewayDriver>>,
    by_endpoint: HashMap<&'static str, Arc<dyn GatewayDriver>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a driver under its descriptor name and endpoint slug
    pub fn register(&mut self, driver: Arc<dyn GatewayDriver>) -> Result<()> {
        let descriptor = driver.descriptor();

        if self.by_name.contains_key(descriptor.driver) {
            return Err(AppError::Configuration(format!(
                "Duplicate driver name: {}",
                descriptor.driver
            )));
        }
        if self.by_endpoint.contains_key(descriptor.endpoint) {
            return Err(AppError::Configuration(format!(
                "Duplicate driver endpoint: {}",
                descriptor.endpoint
            )));
        }

        self.by_name.insert(descriptor.driver, driver.clone());
        self.by_endpoint.insert(descriptor.endpoint, driver);
        Ok(())
    }

    /// Gets a driver by name
    pub fn get(&self, name: &str) -> Result<Arc<dyn GatewayDriver>> {
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Gateway driver '{}'", name)))
    }

    /// Gets a driver by its callback endpoint slug
    pub fn by_endpoint(&self, endpoint: &str) -> Result<Arc<dyn GatewayDriver>> {
        self.by_endpoint
            .get(endpoint)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Gateway endpoint '{}'", endpoint)))
    }

    /// Lists all registered driver descriptors
    pub fn descriptors(&self) -> Vec<DriverDescriptor> {
        let mut descriptors: Vec<DriverDescriptor> =
            self.by_name.values().map(|d| d.descriptor()).collect();
        descriptors.sort_by_key(|d| d.driver);
        descriptors
    }
}
