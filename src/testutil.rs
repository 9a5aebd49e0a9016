//! Shared test doubles for the host-platform traits.

use crate::error::{BridgeError, Result};
use crate::host::{
    AttributeValue, Capability, CapabilitySink, CapabilityValue, ClusterClient, DatapointTransport,
    ReportingConfig,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Capability sink that records every write.
#[derive(Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<(Capability, CapabilityValue)>>,
    fail: bool,
}

impl RecordingSink {
    /// A sink whose writes all fail (still records them).
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<(Capability, CapabilityValue)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl CapabilitySink for RecordingSink {
    async fn set_capability_value(
        &self,
        capability: Capability,
        value: CapabilityValue,
    ) -> Result<()> {
        self.calls.lock().push((capability, value));
        if self.fail {
            Err(BridgeError::CapabilityWrite("sink offline".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Datapoint transport that records every write.
#[derive(Default)]
pub struct RecordingTransport {
    bool_writes: Mutex<Vec<(u8, bool)>>,
    u32_writes: Mutex<Vec<(u8, u32)>>,
    fail: bool,
}

impl RecordingTransport {
    /// A transport whose writes all fail.
    pub fn failing() -> Self {
        Self {
            bool_writes: Mutex::new(Vec::new()),
            u32_writes: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn bool_writes(&self) -> Vec<(u8, bool)> {
        self.bool_writes.lock().clone()
    }

    pub fn u32_writes(&self) -> Vec<(u8, u32)> {
        self.u32_writes.lock().clone()
    }
}

#[async_trait]
impl DatapointTransport for RecordingTransport {
    async fn write_bool(&self, datapoint_id: u8, value: bool) -> Result<()> {
        if self.fail {
            return Err(BridgeError::DatapointWrite("radio unreachable".to_string()));
        }
        self.bool_writes.lock().push((datapoint_id, value));
        Ok(())
    }

    async fn write_u32(&self, datapoint_id: u8, value: u32) -> Result<()> {
        if self.fail {
            return Err(BridgeError::DatapointWrite("radio unreachable".to_string()));
        }
        self.u32_writes.lock().push((datapoint_id, value));
        Ok(())
    }
}

/// Cluster client stub with a fixed battery reading and call counters.
#[derive(Default)]
pub struct StubClusterClient {
    battery: Option<u64>,
    fail_reads: bool,
    reads: AtomicUsize,
    configures: AtomicUsize,
    writes: AtomicUsize,
}

impl StubClusterClient {
    /// Stub reporting the given raw battery value (half-percent units).
    pub fn with_battery(raw: u64) -> Self {
        Self {
            battery: Some(raw),
            ..Self::default()
        }
    }

    /// Stub whose attribute reads fail.
    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn configure_count(&self) -> usize {
        self.configures.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClusterClient for StubClusterClient {
    async fn read_attributes(
        &self,
        _endpoint: u8,
        _cluster: &str,
        attributes: &[&str],
    ) -> Result<HashMap<String, AttributeValue>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(BridgeError::AttributeRead("device asleep".to_string()));
        }
        let mut attrs = HashMap::new();
        if let Some(raw) = self.battery
            && attributes.contains(&"batteryPercentageRemaining")
        {
            attrs.insert(
                "batteryPercentageRemaining".to_string(),
                AttributeValue::Unsigned(raw),
            );
        }
        Ok(attrs)
    }

    async fn configure_reporting(
        &self,
        _endpoint: u8,
        _cluster: &str,
        _config: ReportingConfig,
    ) -> Result<()> {
        self.configures.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn write_attribute(
        &self,
        _endpoint: u8,
        _cluster: &str,
        _attribute: &str,
        _value: AttributeValue,
    ) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
