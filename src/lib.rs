//! Tuya capability bridge library.
//!
//! Adapters that translate low-level Zigbee/Tuya protocol events into a
//! normalized smart-home capability model and back: a debounced presence
//! state machine for flicker-prone motion sensors, a datapoint router for
//! multi-gang dimmer units, and a throttled battery telemetry refresh shared
//! by both families.

pub mod channels;
pub mod config;
pub mod device;
pub mod error;
pub mod host;
pub mod presence;
pub mod simulation;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testutil;

pub use channels::MultiChannelDatapointRouter;
pub use config::Config;
pub use device::{MotionSensorDevice, MultiGangDimmerDevice};
pub use error::{BridgeError, Result};
pub use presence::{MotionHandler, PresenceDebouncer};
pub use telemetry::BatterySync;
