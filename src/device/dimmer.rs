//! Multi-gang Tuya dimmer adapter.
//!
//! One physical unit exposes its gangs as sub-devices; all of them share the
//! datapoint stream of endpoint 1. The adapter configures per-gang attribute
//! reporting at activation and delegates routing to
//! [`MultiChannelDatapointRouter`].

use crate::channels::MultiChannelDatapointRouter;
use crate::host::{
    CapabilitySink, ClusterClient, DatapointReport, DatapointTransport, DeviceIdentity,
    ReportingConfig,
};
use crate::telemetry::BatterySync;
use log::{info, warn};
use std::sync::Arc;

const BASIC_CLUSTER: &str = "basic";
const ON_OFF_CLUSTER: &str = "onOff";
const LEVEL_CONTROL_CLUSTER: &str = "levelControl";

/// Adapter for one physical multi-gang dimmer unit.
pub struct MultiGangDimmerDevice {
    identity: DeviceIdentity,
    cluster: Arc<dyn ClusterClient>,
    router: MultiChannelDatapointRouter,
    battery: Option<BatterySync>,
}

impl MultiGangDimmerDevice {
    /// Build the adapter from the declared gang sinks (one per sub-device,
    /// in gang order). The channel set is immutable from here on.
    pub fn new(
        identity: DeviceIdentity,
        cluster: Arc<dyn ClusterClient>,
        transport: Arc<dyn DatapointTransport>,
        gang_sinks: Vec<Arc<dyn CapabilitySink>>,
    ) -> Self {
        let mut router = MultiChannelDatapointRouter::new(transport);
        for sink in gang_sinks {
            router = router.with_channel(sink);
        }
        Self {
            identity,
            cluster,
            router,
            battery: None,
        }
    }

    /// Attach a battery telemetry refresh (battery-backed wall units).
    pub fn with_battery(mut self, battery: BatterySync) -> Self {
        self.battery = Some(battery);
        self
    }

    /// One-time activation work: read identifying attributes and configure
    /// reporting for every gang endpoint. Every step is best-effort; a unit
    /// that refuses a configure must still be controllable.
    pub async fn initialize(&self) {
        info!(
            "Initializing {} gang dimmer {}",
            self.router.channel_count(),
            self.identity.model_id
        );

        for endpoint in 1..=self.router.channel_count() {
            if let Err(e) = self
                .cluster
                .read_attributes(
                    endpoint,
                    BASIC_CLUSTER,
                    &["manufacturerName", "zclVersion", "appVersion", "modelId", "powerSource"],
                )
                .await
            {
                warn!("Gang {}: failed to read basic attributes: {}", endpoint, e);
            }

            for cluster_name in [ON_OFF_CLUSTER, LEVEL_CONTROL_CLUSTER] {
                let attribute = if cluster_name == ON_OFF_CLUSTER {
                    "onOff"
                } else {
                    "currentLevel"
                };
                if let Err(e) = self
                    .cluster
                    .configure_reporting(
                        endpoint,
                        cluster_name,
                        ReportingConfig {
                            attribute: attribute.to_string(),
                            min_interval: 0,
                            max_interval: 600,
                            min_change: 1,
                        },
                    )
                    .await
                {
                    warn!(
                        "Gang {}: failed to configure {} reporting: {}",
                        endpoint, cluster_name, e
                    );
                }
            }
        }

        if let Some(battery) = &self.battery
            && self.identity.first_activation
        {
            battery.sync().await;
        }
    }

    /// Entry point for inbound datapoint reports.
    pub async fn handle_datapoint(&self, report: &DatapointReport) {
        self.router.handle_report(report).await;
        // Traffic means the unit is awake; refresh telemetry opportunistically.
        if let Some(battery) = &self.battery {
            battery.sync().await;
        }
    }

    /// Capability-listener entry point for a gang's `onoff`.
    pub async fn set_onoff(&self, gang: u8, value: bool) {
        self.router.set_onoff(gang, value).await;
    }

    /// Capability-listener entry point for a gang's `dim`.
    pub async fn set_dim(&self, gang: u8, value: f64) {
        self.router.set_dim(gang, value).await;
    }

    pub fn router(&self) -> &MultiChannelDatapointRouter {
        &self.router
    }

    pub fn shutdown(&self) {
        info!("{} gang dimmer removed", self.router.channel_count());
    }
}
