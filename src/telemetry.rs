//! Throttled battery telemetry refresh.
//!
//! Battery level changes slowly and the devices are sleepy, so the adapters
//! refresh it opportunistically: immediately at first activation and on any
//! inbound traffic (the device is provably awake), but never more often than
//! the configured interval.

use crate::error::Result;
use crate::host::{Capability, CapabilitySink, CapabilityValue, ClusterClient};
use log::{debug, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

const POWER_CONFIGURATION_CLUSTER: &str = "powerConfiguration";
const BATTERY_ATTRIBUTE: &str = "batteryPercentageRemaining";

/// Throttled, idempotent battery refresh shared by all device families.
///
/// The throttle stamps only successful reads: a failed attempt may retry on
/// the very next opportunistic trigger instead of waiting out the full
/// interval, trading interval discipline for fresher data.
pub struct BatterySync {
    cluster: Arc<dyn ClusterClient>,
    sink: Arc<dyn CapabilitySink>,
    min_interval: Duration,
    last_read: Mutex<Option<Instant>>,
}

impl BatterySync {
    pub fn new(
        cluster: Arc<dyn ClusterClient>,
        sink: Arc<dyn CapabilitySink>,
        min_interval: Duration,
    ) -> Self {
        Self {
            cluster,
            sink,
            min_interval,
            last_read: Mutex::new(None),
        }
    }

    /// Refresh the battery capability if the throttle allows it.
    ///
    /// No-op when called again within the minimum interval of the last
    /// successful read. All failures are logged and swallowed.
    pub async fn sync(&self) {
        if self.throttled() {
            return;
        }

        match self.read_percentage().await {
            Ok(Some(raw)) => {
                *self.last_read.lock() = Some(Instant::now());
                // The cluster reports half-percent units.
                let percent = raw / 2.0;
                debug!("Battery at {}%", percent);
                if let Err(e) = self
                    .sink
                    .set_capability_value(Capability::MeasureBattery, CapabilityValue::Number(percent))
                    .await
                {
                    warn!("Failed to set measure_battery: {}", e);
                }
            }
            Ok(None) => {
                debug!("Battery attribute missing from read response");
            }
            Err(e) => {
                warn!("Battery read failed: {}", e);
            }
        }
    }

    fn throttled(&self) -> bool {
        self.last_read
            .lock()
            .is_some_and(|last| last.elapsed() < self.min_interval)
    }

    async fn read_percentage(&self) -> Result<Option<f64>> {
        let attrs = self
            .cluster
            .read_attributes(1, POWER_CONFIGURATION_CLUSTER, &[BATTERY_ATTRIBUTE])
            .await?;
        Ok(attrs.get(BATTERY_ATTRIBUTE).and_then(|v| v.as_f64()))
    }
}
