//! Multi-gang channel model and datapoint-id mapping.
//!
//! One physical Tuya unit multiplexes several logical switches/dimmers over a
//! single numbered-datapoint protocol. The id layout is fixed: channel
//! `index` (1-based) owns datapoint `2*index - 1` for on/off and `2*index`
//! for the dim level, so a 2-gang unit uses {1, 3} for on/off and {2, 4} for
//! level. The mapping is a pure function of the index in both directions; no
//! lookup table is persisted anywhere.

pub mod router;

pub use router::MultiChannelDatapointRouter;

/// What a datapoint id carries for its channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatapointRole {
    OnOff,
    Level,
}

/// On/off datapoint id for a 1-based channel index.
pub fn onoff_datapoint(index: u8) -> u8 {
    2 * index - 1
}

/// Dim-level datapoint id for a 1-based channel index.
pub fn level_datapoint(index: u8) -> u8 {
    2 * index
}

/// Inverse mapping: which channel and role a datapoint id belongs to.
///
/// Returns `None` only for id 0, which no channel can produce. Ids beyond the
/// unit's channel count resolve arithmetically; the router rejects those when
/// it finds no matching channel.
pub fn resolve_datapoint(id: u8) -> Option<(u8, DatapointRole)> {
    if id == 0 {
        return None;
    }
    if id % 2 == 1 {
        Some((id / 2 + 1, DatapointRole::OnOff))
    } else {
        Some((id / 2, DatapointRole::Level))
    }
}
