//! Device adapters wiring the cores to the host platform.
//!
//! One adapter per supported device family: motion sensors (IAS zone based)
//! and multi-gang Tuya dimmer units (datapoint based).

pub mod dimmer;
pub mod motion_sensor;

pub use dimmer::MultiGangDimmerDevice;
pub use motion_sensor::MotionSensorDevice;
