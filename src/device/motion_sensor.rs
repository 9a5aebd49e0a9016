//! Motion sensor adapter.
//!
//! Consumes IAS zone status notifications, runs them through the presence
//! strategy picked for the variant, and keeps the battery capability fresh.

use crate::config::Config;
use crate::host::{
    AttributeValue, CapabilitySink, ClusterClient, DeviceIdentity, ZoneStatusNotification,
};
use crate::presence::MotionHandler;
use crate::telemetry::BatterySync;
use log::{debug, info, warn};
use std::sync::Arc;

const IAS_ZONE_CLUSTER: &str = "iasZone";

/// Adapter for one physical motion sensor.
pub struct MotionSensorDevice {
    identity: DeviceIdentity,
    cluster: Arc<dyn ClusterClient>,
    motion: MotionHandler,
    battery: BatterySync,
}

impl MotionSensorDevice {
    pub fn new(
        identity: DeviceIdentity,
        cluster: Arc<dyn ClusterClient>,
        sink: Arc<dyn CapabilitySink>,
        config: &Config,
    ) -> Self {
        let motion = MotionHandler::for_identity(&identity, &config.presence, sink.clone());
        let battery = BatterySync::new(
            cluster.clone(),
            sink,
            config.telemetry.battery_refresh(),
        );
        Self {
            identity,
            cluster,
            motion,
            battery,
        }
    }

    /// One-time activation work.
    ///
    /// Points the sensor's IAS CIE address at the coordinator (required on
    /// every node init for zone notifications to flow) and, on first
    /// activation, refreshes the battery right away.
    pub async fn initialize(&self, coordinator_ieee: &str) {
        info!(
            "Initializing motion sensor {} (debounced: {})",
            self.identity.model_id,
            self.identity.flicker_prone()
        );

        if let Err(e) = self
            .cluster
            .write_attribute(
                1,
                IAS_ZONE_CLUSTER,
                "iasCIEAddress",
                AttributeValue::Text(coordinator_ieee.to_string()),
            )
            .await
        {
            warn!("Failed to write IAS CIE address: {}", e);
        }

        if self.identity.first_activation {
            self.battery.sync().await;
        }
    }

    /// Entry point for inbound zone status changes.
    ///
    /// The battery refresh piggybacks on every notification: a sleepy sensor
    /// that just reported motion is awake and reachable.
    pub async fn handle_zone_status(&self, notification: ZoneStatusNotification) {
        debug!(
            "Zone status change: alarm1={} zone_id={} delay={}",
            notification.alarm1, notification.zone_id, notification.delay
        );

        self.motion.handle_motion(notification.alarm1).await;
        self.battery.sync().await;
    }

    /// Tear down on device removal. Cancels any armed debounce timers so no
    /// capability write can land after the instance is gone.
    pub fn shutdown(&self) {
        self.motion.shutdown();
        info!("Motion sensor {} removed", self.identity.model_id);
    }
}
