//! Presence detection from raw motion pulses.
//!
//! Motion sensors push their zone alarm bit through here. Flicker-prone
//! variants go through the [`PresenceDebouncer`] state machine; everything
//! else forwards the raw boolean straight to the capability sink.

pub mod debouncer;

pub use debouncer::PresenceDebouncer;

use crate::config::PresenceConfig;
use crate::host::{Capability, CapabilitySink, CapabilityValue, DeviceIdentity};
use log::warn;
use std::sync::Arc;

/// Motion handling strategy, resolved once at device activation.
pub enum MotionHandler {
    /// Debounce state machine for variants that flicker during continuous
    /// occupancy.
    Debounced(PresenceDebouncer),
    /// Direct forwarding of the raw motion bit.
    PassThrough(Arc<dyn CapabilitySink>),
}

impl MotionHandler {
    /// Pick the strategy for a device based on its identity.
    pub fn for_identity(
        identity: &DeviceIdentity,
        config: &PresenceConfig,
        sink: Arc<dyn CapabilitySink>,
    ) -> Self {
        if identity.flicker_prone() {
            MotionHandler::Debounced(PresenceDebouncer::new(config, sink))
        } else {
            MotionHandler::PassThrough(sink)
        }
    }

    /// Feed one raw motion sample through the selected strategy.
    pub async fn handle_motion(&self, detected: bool) {
        match self {
            MotionHandler::Debounced(debouncer) => debouncer.handle_motion(detected).await,
            MotionHandler::PassThrough(sink) => {
                if let Err(e) = sink
                    .set_capability_value(Capability::AlarmMotion, CapabilityValue::Bool(detected))
                    .await
                {
                    warn!("Failed to set alarm_motion: {}", e);
                }
            }
        }
    }

    /// Cancel any live timers. Called on device removal; emits nothing.
    pub fn shutdown(&self) {
        if let MotionHandler::Debounced(debouncer) = self {
            debouncer.shutdown();
        }
    }
}
