use log::info;
use std::sync::Arc;
use tokio::time::{Duration, sleep};
use tuya_capability_bridge::config::Config;
use tuya_capability_bridge::device::{MotionSensorDevice, MultiGangDimmerDevice};
use tuya_capability_bridge::host::{
    CapabilitySink, DatapointReport, DeviceIdentity, ZoneStatusNotification,
};
use tuya_capability_bridge::simulation::{LoggingSink, LoggingTransport, SimulatedClusterClient};
use tuya_capability_bridge::telemetry::BatterySync;

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

/// Runs both adapters against the simulated host with a short scripted
/// event sequence, then tears them down.
#[tokio::main]
async fn main() {
    init_logger();
    info!("Starting Tuya capability bridge demo");

    let config = Config::from_env();
    info!(
        "Presence timing: hold {}s, release grace {}s",
        config.presence.hold_window_secs, config.presence.release_grace_secs
    );

    // Motion sensor (debounced TS0202 variant) against the simulated host.
    let motion_cluster = Arc::new(SimulatedClusterClient::new(187));
    let motion_sink = Arc::new(LoggingSink::new("motion-sensor"));
    let motion = MotionSensorDevice::new(
        DeviceIdentity {
            model_id: "TS0202".to_string(),
            product_id: "TS0202".to_string(),
            sub_device: None,
            first_activation: true,
        },
        motion_cluster,
        motion_sink,
        &config,
    );
    motion.initialize("00:12:4b:00:aa:bb:cc:dd").await;

    // 2-gang dimmer with one sub-device sink per gang.
    let dimmer_cluster = Arc::new(SimulatedClusterClient::new(200));
    let gang_sinks: Vec<Arc<dyn CapabilitySink>> = vec![
        Arc::new(LoggingSink::new("dimmer-gang-1")),
        Arc::new(LoggingSink::new("dimmer-gang-2")),
    ];
    let dimmer = MultiGangDimmerDevice::new(
        DeviceIdentity {
            model_id: "TS110F".to_string(),
            product_id: "TS110F".to_string(),
            sub_device: None,
            first_activation: true,
        },
        dimmer_cluster.clone(),
        Arc::new(LoggingTransport),
        gang_sinks,
    )
    .with_battery(BatterySync::new(
        dimmer_cluster,
        Arc::new(LoggingSink::new("dimmer")),
        config.telemetry.battery_refresh(),
    ));
    dimmer.initialize().await;

    // Scripted motion pulses: one presence assert, one release after grace.
    info!("Simulating a motion pulse train");
    for _ in 0..3 {
        motion
            .handle_zone_status(ZoneStatusNotification {
                alarm1: true,
                zone_id: 255,
                delay: 0,
            })
            .await;
        motion
            .handle_zone_status(ZoneStatusNotification {
                alarm1: false,
                zone_id: 255,
                delay: 0,
            })
            .await;
        sleep(Duration::from_secs(2)).await;
    }
    info!(
        "Waiting {}s for the presence release",
        config.presence.release_grace_secs
    );
    sleep(config.presence.release_grace() + Duration::from_secs(1)).await;

    // Scripted dimmer traffic: inbound reports and user-driven actuation.
    info!("Simulating dimmer traffic");
    dimmer
        .handle_datapoint(&DatapointReport {
            id: 1,
            payload: vec![1],
        })
        .await;
    dimmer
        .handle_datapoint(&DatapointReport {
            id: 4,
            payload: 750u32.to_be_bytes().to_vec(),
        })
        .await;
    dimmer.set_onoff(2, true).await;
    dimmer.set_dim(1, 0.42).await;

    motion.shutdown();
    dimmer.shutdown();
    info!("Demo finished");
}
