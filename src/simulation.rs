//! In-memory host platform for development and the demo binary.
//!
//! Stands in for the real Zigbee stack: capability writes and datapoint
//! commands are logged instead of transmitted, and attribute reads answer
//! with canned values.

use crate::error::Result;
use crate::host::{
    AttributeValue, Capability, CapabilitySink, CapabilityValue, ClusterClient, DatapointTransport,
    ReportingConfig,
};
use async_trait::async_trait;
use log::info;
use std::collections::HashMap;

/// Capability sink that logs every update under a device label.
pub struct LoggingSink {
    label: String,
}

impl LoggingSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

#[async_trait]
impl CapabilitySink for LoggingSink {
    async fn set_capability_value(
        &self,
        capability: Capability,
        value: CapabilityValue,
    ) -> Result<()> {
        info!("[Sim] {} {} = {:?}", self.label, capability, value);
        Ok(())
    }
}

/// Datapoint transport that logs outbound commands.
#[derive(Default)]
pub struct LoggingTransport;

#[async_trait]
impl DatapointTransport for LoggingTransport {
    async fn write_bool(&self, datapoint_id: u8, value: bool) -> Result<()> {
        info!("[Sim] datapoint {} <- bool {}", datapoint_id, value);
        Ok(())
    }

    async fn write_u32(&self, datapoint_id: u8, value: u32) -> Result<()> {
        info!("[Sim] datapoint {} <- u32 {}", datapoint_id, value);
        Ok(())
    }
}

/// Cluster client answering reads with canned attribute values.
pub struct SimulatedClusterClient {
    battery_raw: u64,
}

impl SimulatedClusterClient {
    pub fn new(battery_raw: u64) -> Self {
        Self { battery_raw }
    }
}

#[async_trait]
impl ClusterClient for SimulatedClusterClient {
    async fn read_attributes(
        &self,
        endpoint: u8,
        cluster: &str,
        attributes: &[&str],
    ) -> Result<HashMap<String, AttributeValue>> {
        info!(
            "[Sim] read endpoint {} cluster {} attributes {:?}",
            endpoint, cluster, attributes
        );
        let mut attrs = HashMap::new();
        if attributes.contains(&"batteryPercentageRemaining") {
            attrs.insert(
                "batteryPercentageRemaining".to_string(),
                AttributeValue::Unsigned(self.battery_raw),
            );
        }
        Ok(attrs)
    }

    async fn configure_reporting(
        &self,
        endpoint: u8,
        cluster: &str,
        config: ReportingConfig,
    ) -> Result<()> {
        info!(
            "[Sim] configure reporting endpoint {} cluster {} attribute {} ({}/{}/{})",
            endpoint,
            cluster,
            config.attribute,
            config.min_interval,
            config.max_interval,
            config.min_change
        );
        Ok(())
    }

    async fn write_attribute(
        &self,
        endpoint: u8,
        cluster: &str,
        attribute: &str,
        value: AttributeValue,
    ) -> Result<()> {
        info!(
            "[Sim] write endpoint {} cluster {} attribute {} = {:?}",
            endpoint, cluster, attribute, value
        );
        Ok(())
    }
}
