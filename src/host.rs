//! Host-platform surface.
//!
//! The surrounding platform (Zigbee transport, cluster attribute encoding,
//! capability registry) is an external collaborator. This module models the
//! slice of it the adapters talk to: a capability-value sink, a cluster
//! attribute client, and the Tuya datapoint write path.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use strum::Display;

/// Capability names understood by the user-facing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    AlarmMotion,
    MeasureBattery,
    Onoff,
    Dim,
}

/// Value written to a capability.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityValue {
    Bool(bool),
    Number(f64),
}

/// Sink for capability updates, one per logical (sub-)device.
///
/// The platform persists capability values and forwards them to the
/// user-facing layer; both are opaque to this crate.
#[async_trait]
pub trait CapabilitySink: Send + Sync {
    async fn set_capability_value(
        &self,
        capability: Capability,
        value: CapabilityValue,
    ) -> Result<()>;
}

/// Value carried by a cluster attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Unsigned(u64),
    Number(f64),
    Text(String),
}

impl AttributeValue {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Unsigned(v) => Some(*v as f64),
            AttributeValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

/// Reporting configuration for one cluster attribute.
#[derive(Debug, Clone)]
pub struct ReportingConfig {
    pub attribute: String,
    pub min_interval: u16,
    pub max_interval: u16,
    pub min_change: u32,
}

/// Asynchronous cluster attribute access provided by the platform.
///
/// All calls go over the wireless link and may fail; callers decide whether a
/// failure is fatal (in this crate it never is).
#[async_trait]
pub trait ClusterClient: Send + Sync {
    async fn read_attributes(
        &self,
        endpoint: u8,
        cluster: &str,
        attributes: &[&str],
    ) -> Result<HashMap<String, AttributeValue>>;

    async fn configure_reporting(
        &self,
        endpoint: u8,
        cluster: &str,
        config: ReportingConfig,
    ) -> Result<()>;

    async fn write_attribute(
        &self,
        endpoint: u8,
        cluster: &str,
        attribute: &str,
        value: AttributeValue,
    ) -> Result<()>;
}

/// Outbound Tuya datapoint write path.
///
/// Datapoint values ride in a vendor-specific cluster command; the platform
/// owns the framing, this trait only exposes the two value shapes the
/// adapters emit.
#[async_trait]
pub trait DatapointTransport: Send + Sync {
    /// Write a boolean datapoint.
    async fn write_bool(&self, datapoint_id: u8, value: bool) -> Result<()>;

    /// Write a 32-bit value datapoint.
    async fn write_u32(&self, datapoint_id: u8, value: u32) -> Result<()>;
}

/// Inbound datapoint report from the device. Consumed exactly once.
#[derive(Debug, Clone)]
pub struct DatapointReport {
    pub id: u8,
    pub payload: Vec<u8>,
}

/// IAS zone status change pushed by a motion sensor.
#[derive(Debug, Clone, Copy)]
pub struct ZoneStatusNotification {
    /// Alarm1 bit of the zone status: the raw motion signal.
    pub alarm1: bool,
    pub zone_id: u8,
    pub delay: u16,
}

/// Identity of a physical device as reported during interview.
#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    pub model_id: String,
    pub product_id: String,
    /// Sub-device role tag for multi-gang units (e.g. "secondGang").
    pub sub_device: Option<String>,
    /// True the first time the device is activated after pairing.
    pub first_activation: bool,
}

impl DeviceIdentity {
    /// Whether this variant re-fires its motion bit rapidly during continuous
    /// occupancy and needs the debounce state machine. Resolved once at
    /// activation; other variants forward the raw boolean.
    pub fn flicker_prone(&self) -> bool {
        self.product_id == "TS0202"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_names() {
        assert_eq!(Capability::AlarmMotion.to_string(), "alarm_motion");
        assert_eq!(Capability::MeasureBattery.to_string(), "measure_battery");
        assert_eq!(Capability::Onoff.to_string(), "onoff");
        assert_eq!(Capability::Dim.to_string(), "dim");
    }

    #[test]
    fn test_flicker_prone_variants() {
        let identity = DeviceIdentity {
            model_id: "TS0202".to_string(),
            product_id: "TS0202".to_string(),
            sub_device: None,
            first_activation: true,
        };
        assert!(identity.flicker_prone());

        let identity = DeviceIdentity {
            model_id: "RH3040".to_string(),
            product_id: "RH3040".to_string(),
            sub_device: None,
            first_activation: true,
        };
        assert!(!identity.flicker_prone());
    }

    #[test]
    fn test_attribute_value_as_f64() {
        assert_eq!(AttributeValue::Unsigned(200).as_f64(), Some(200.0));
        assert_eq!(AttributeValue::Number(1.5).as_f64(), Some(1.5));
        assert_eq!(AttributeValue::Bool(true).as_f64(), None);
        assert_eq!(AttributeValue::Text("x".into()).as_f64(), None);
    }
}
