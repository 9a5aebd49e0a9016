//! Debounced presence state machine.
//!
//! The TS0202 re-fires its motion bit every few seconds during continuous
//! occupancy and drops it briefly between pulses. Forwarding that raw signal
//! would toggle the presence capability several times a minute while someone
//! stands still in the room. This state machine emits exactly one `true` when
//! presence begins and exactly one `false` once the signal has stayed low for
//! a grace period.

use crate::config::PresenceConfig;
use crate::host::{Capability, CapabilitySink, CapabilityValue};
use log::{debug, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Nobody detected; the capability value is `false`.
    Idle,
    /// Presence asserted; repeated raw pulses are suppressed.
    Confirmed,
}

struct Inner {
    phase: Phase,
    /// Advisory window opened by the latest pulse. Re-armed (cancel and
    /// replace) on every `true` input; clears its own handle on expiry and
    /// forces no transition.
    hold_timer: Option<JoinHandle<()>>,
    /// Grace timer armed when the raw signal drops. Firing is what moves
    /// `Confirmed` back to `Idle`.
    release_timer: Option<JoinHandle<()>>,
}

struct Shared {
    sink: Arc<dyn CapabilitySink>,
    hold_window: Duration,
    release_grace: Duration,
    inner: Mutex<Inner>,
}

/// Hysteretic presence detector for flicker-prone motion sensors.
///
/// All state lives behind one mutex shared with the timer tasks; arming a
/// timer always aborts the previous handle of the same role, so at most one
/// deferred transition is pending per role at any instant.
pub struct PresenceDebouncer {
    shared: Arc<Shared>,
}

impl PresenceDebouncer {
    pub fn new(config: &PresenceConfig, sink: Arc<dyn CapabilitySink>) -> Self {
        Self {
            shared: Arc::new(Shared {
                sink,
                hold_window: config.hold_window(),
                release_grace: config.release_grace(),
                inner: Mutex::new(Inner {
                    phase: Phase::Idle,
                    hold_timer: None,
                    release_timer: None,
                }),
            }),
        }
    }

    /// Feed one raw motion sample into the state machine.
    ///
    /// Emits the capability update (if any) before returning, so emissions
    /// stay ordered with respect to the event stream.
    pub async fn handle_motion(&self, detected: bool) {
        if detected {
            self.on_motion_detected().await;
        } else {
            self.on_motion_dropped();
        }
    }

    async fn on_motion_detected(&self) {
        let first_pulse = {
            let mut inner = self.shared.inner.lock();

            // A pending release is obsolete the moment a new pulse arrives.
            if let Some(timer) = inner.release_timer.take() {
                timer.abort();
            }

            let first_pulse = inner.phase == Phase::Idle;
            inner.phase = Phase::Confirmed;

            // Re-arm the hold window. Cancel-and-replace so a stale timer can
            // never clear a newer window's handle.
            if let Some(timer) = inner.hold_timer.take() {
                timer.abort();
            }
            let shared = self.shared.clone();
            inner.hold_timer = Some(tokio::spawn(async move {
                tokio::time::sleep(shared.hold_window).await;
                shared.inner.lock().hold_timer = None;
                debug!("Presence hold window expired");
            }));

            first_pulse
        };

        if first_pulse {
            if let Err(e) = self
                .shared
                .sink
                .set_capability_value(Capability::AlarmMotion, CapabilityValue::Bool(true))
                .await
            {
                warn!("Failed to set alarm_motion=true: {}", e);
            }
        }
    }

    fn on_motion_dropped(&self) {
        let mut inner = self.shared.inner.lock();

        // One grace timer is enough; further false inputs while it is pending
        // must not push the release out.
        if inner.release_timer.is_some() {
            return;
        }

        let shared = self.shared.clone();
        inner.release_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(shared.release_grace).await;
            {
                let mut inner = shared.inner.lock();
                inner.phase = Phase::Idle;
                inner.release_timer = None;
            }
            debug!("No motion within grace period, releasing presence");
            if let Err(e) = shared
                .sink
                .set_capability_value(Capability::AlarmMotion, CapabilityValue::Bool(false))
                .await
            {
                warn!("Failed to set alarm_motion=false: {}", e);
            }
        }));
    }

    /// Whether presence is currently asserted.
    pub fn is_confirmed(&self) -> bool {
        self.shared.inner.lock().phase == Phase::Confirmed
    }

    /// Cancel both timers without emitting. Called on device removal; a
    /// dangling timer firing after removal would write into a dead device.
    pub fn shutdown(&self) {
        let mut inner = self.shared.inner.lock();
        if let Some(timer) = inner.hold_timer.take() {
            timer.abort();
        }
        if let Some(timer) = inner.release_timer.take() {
            timer.abort();
        }
    }
}

impl Drop for PresenceDebouncer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
