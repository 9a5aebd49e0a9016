//! Bidirectional datapoint ↔ capability routing for multi-gang units.

use super::{DatapointRole, level_datapoint, onoff_datapoint, resolve_datapoint};
use crate::host::{
    Capability, CapabilitySink, CapabilityValue, DatapointReport, DatapointTransport,
};
use log::{debug, warn};
use parking_lot::RwLock;
use std::sync::Arc;

/// Last-known state of one gang.
#[derive(Debug, Clone, Copy, Default)]
struct ChannelCache {
    power: bool,
    /// Normalized dim level in `[0.0, 1.0]`.
    level: f64,
}

/// One logical actuation unit on the physical device.
struct Channel {
    index: u8,
    /// Capability sink of the sub-device representing this gang.
    sink: Arc<dyn CapabilitySink>,
    cache: RwLock<ChannelCache>,
}

/// Demultiplexes the inbound datapoint stream of one physical unit into
/// per-channel capability updates, and encodes capability-driven actuation
/// back into datapoint writes.
///
/// The channel set is fixed at construction; a unit does not grow gangs at
/// runtime. Unknown datapoint ids are a normal occurrence (auxiliary,
/// non-actuation datapoints on some firmwares) and are dropped silently at
/// debug level.
pub struct MultiChannelDatapointRouter {
    channels: Vec<Channel>,
    transport: Arc<dyn DatapointTransport>,
}

impl MultiChannelDatapointRouter {
    pub fn new(transport: Arc<dyn DatapointTransport>) -> Self {
        Self {
            channels: Vec::new(),
            transport,
        }
    }

    /// Append the next channel (indices are assigned 1-based in order).
    pub fn with_channel(mut self, sink: Arc<dyn CapabilitySink>) -> Self {
        let index = self.channels.len() as u8 + 1;
        self.channels.push(Channel {
            index,
            sink,
            cache: RwLock::new(ChannelCache::default()),
        });
        self
    }

    pub fn channel_count(&self) -> u8 {
        self.channels.len() as u8
    }

    fn channel(&self, index: u8) -> Option<&Channel> {
        // Indices are dense and 1-based by construction.
        self.channels.get(index.checked_sub(1)? as usize)
    }

    /// Route one inbound datapoint report to its channel.
    ///
    /// Malformed payloads and ids with no matching channel are logged and
    /// dropped; they must never surface as errors.
    pub async fn handle_report(&self, report: &DatapointReport) {
        let Some((index, role)) = resolve_datapoint(report.id) else {
            debug!("Unhandled datapoint id {}", report.id);
            return;
        };
        let Some(channel) = self.channel(index) else {
            debug!(
                "Datapoint {} maps to channel {} which this unit does not have",
                report.id, index
            );
            return;
        };

        match role {
            DatapointRole::OnOff => {
                let Some(&byte) = report.payload.first() else {
                    debug!("Empty payload for on/off datapoint {}", report.id);
                    return;
                };
                let power = byte == 1;
                channel.cache.write().power = power;
                if let Err(e) = channel
                    .sink
                    .set_capability_value(Capability::Onoff, CapabilityValue::Bool(power))
                    .await
                {
                    warn!("Channel {}: failed to set onoff: {}", index, e);
                }
            }
            DatapointRole::Level => {
                let Ok(bytes) = <[u8; 4]>::try_from(report.payload.as_slice()) else {
                    debug!(
                        "Unexpected payload length {} for level datapoint {}",
                        report.payload.len(),
                        report.id
                    );
                    return;
                };
                let raw = u32::from_be_bytes(bytes);
                if raw > 1000 {
                    debug!("Level {} out of range on datapoint {}", raw, report.id);
                }
                let level = (raw as f64 / 1000.0).clamp(0.0, 1.0);
                channel.cache.write().level = level;
                if let Err(e) = channel
                    .sink
                    .set_capability_value(Capability::Dim, CapabilityValue::Number(level))
                    .await
                {
                    warn!("Channel {}: failed to set dim: {}", index, e);
                }
            }
        }
    }

    /// Encode an on/off capability request for a channel.
    ///
    /// Fire-and-forget: the cached value is updated regardless of transport
    /// outcome and a failed write is only logged (the platform's own
    /// retry/ack policy applies, if any).
    pub async fn set_onoff(&self, index: u8, value: bool) {
        let Some(channel) = self.channel(index) else {
            warn!("onoff request for unknown channel {}", index);
            return;
        };
        channel.cache.write().power = value;
        if let Err(e) = self
            .transport
            .write_bool(onoff_datapoint(channel.index), value)
            .await
        {
            warn!("Channel {}: failed to write onoff: {}", index, e);
        }
    }

    /// Encode a dim capability request (fraction in `[0.0, 1.0]`) for a
    /// channel. Scaled to parts-per-thousand as the wire protocol expects.
    pub async fn set_dim(&self, index: u8, value: f64) {
        let Some(channel) = self.channel(index) else {
            warn!("dim request for unknown channel {}", index);
            return;
        };
        let value = value.clamp(0.0, 1.0);
        let scaled = (value * 1000.0).floor() as u32;
        channel.cache.write().level = value;
        if let Err(e) = self
            .transport
            .write_u32(level_datapoint(channel.index), scaled)
            .await
        {
            warn!("Channel {}: failed to write dim level: {}", index, e);
        }
    }

    /// Last-known power state for a channel.
    pub fn power(&self, index: u8) -> Option<bool> {
        Some(self.channel(index)?.cache.read().power)
    }

    /// Last-known dim level for a channel.
    pub fn level(&self, index: u8) -> Option<f64> {
        Some(self.channel(index)?.cache.read().level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{RecordingSink, RecordingTransport};

    fn two_gang() -> (
        MultiChannelDatapointRouter,
        Vec<Arc<RecordingSink>>,
        Arc<RecordingTransport>,
    ) {
        let transport = Arc::new(RecordingTransport::default());
        let sinks = vec![
            Arc::new(RecordingSink::default()),
            Arc::new(RecordingSink::default()),
        ];
        let router = MultiChannelDatapointRouter::new(transport.clone())
            .with_channel(sinks[0].clone())
            .with_channel(sinks[1].clone());
        (router, sinks, transport)
    }

    #[tokio::test]
    async fn test_two_gang_report_scenario() {
        let (router, sinks, _) = two_gang();

        router
            .handle_report(&DatapointReport {
                id: 1,
                payload: vec![1],
            })
            .await;
        router
            .handle_report(&DatapointReport {
                id: 4,
                payload: 1000u32.to_be_bytes().to_vec(),
            })
            .await;

        assert_eq!(
            sinks[0].calls(),
            vec![(Capability::Onoff, CapabilityValue::Bool(true))]
        );
        assert_eq!(
            sinks[1].calls(),
            vec![(Capability::Dim, CapabilityValue::Number(1.0))]
        );
        assert_eq!(router.power(1), Some(true));
        assert_eq!(router.level(2), Some(1.0));
    }

    #[tokio::test]
    async fn test_unknown_datapoint_is_a_noop() {
        let (router, sinks, _) = two_gang();

        router
            .handle_report(&DatapointReport {
                id: 99,
                payload: vec![1],
            })
            .await;
        router
            .handle_report(&DatapointReport {
                id: 0,
                payload: vec![1],
            })
            .await;

        assert!(sinks[0].calls().is_empty());
        assert!(sinks[1].calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_payloads_are_dropped() {
        let (router, sinks, _) = two_gang();

        // Empty on/off payload, truncated level payload.
        router
            .handle_report(&DatapointReport {
                id: 1,
                payload: vec![],
            })
            .await;
        router
            .handle_report(&DatapointReport {
                id: 2,
                payload: vec![0x01, 0x90],
            })
            .await;

        assert!(sinks[0].calls().is_empty());
    }

    #[tokio::test]
    async fn test_onoff_encode_decode_round_trip() {
        let (router, sinks, transport) = two_gang();

        for index in 1..=2u8 {
            router.set_onoff(index, true).await;
        }
        // Feed the written commands back in as reports.
        for (id, value) in transport.bool_writes() {
            router
                .handle_report(&DatapointReport {
                    id,
                    payload: vec![u8::from(value)],
                })
                .await;
        }

        for (i, sink) in sinks.iter().enumerate() {
            assert_eq!(
                sink.calls(),
                vec![(Capability::Onoff, CapabilityValue::Bool(true))],
                "channel {}",
                i + 1
            );
        }
    }

    #[tokio::test]
    async fn test_dim_encode_decode_round_trip() {
        let (router, sinks, transport) = two_gang();

        router.set_dim(1, 0.42).await;
        assert_eq!(transport.u32_writes(), vec![(2, 420)]);

        let (id, raw) = transport.u32_writes()[0];
        router
            .handle_report(&DatapointReport {
                id,
                payload: raw.to_be_bytes().to_vec(),
            })
            .await;

        assert_eq!(
            sinks[0].calls(),
            vec![(Capability::Dim, CapabilityValue::Number(0.42))]
        );
    }

    #[tokio::test]
    async fn test_dim_scaling_clamps_and_floors() {
        let (router, _, transport) = two_gang();

        router.set_dim(1, 1.7).await;
        router.set_dim(2, -0.3).await;
        router.set_dim(1, 0.0015).await;

        assert_eq!(transport.u32_writes(), vec![(2, 1000), (4, 0), (2, 1)]);
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_cached_value() {
        let transport = Arc::new(RecordingTransport::failing());
        let sink = Arc::new(RecordingSink::default());
        let router = MultiChannelDatapointRouter::new(transport).with_channel(sink);

        router.set_onoff(1, true).await;
        router.set_dim(1, 0.5).await;

        // No rollback and no panic; the cache reflects the requested state.
        assert_eq!(router.power(1), Some(true));
        assert_eq!(router.level(1), Some(0.5));
    }

    #[tokio::test]
    async fn test_request_for_missing_channel_is_skipped() {
        let (router, _, transport) = two_gang();

        router.set_onoff(3, true).await;
        router.set_dim(0, 0.5).await;

        assert!(transport.bool_writes().is_empty());
        assert!(transport.u32_writes().is_empty());
    }
}
