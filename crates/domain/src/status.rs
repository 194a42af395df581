//! System status: aggregate device counts.

use serde::{Deserialize, Serialize};

/// Summary returned by `GET /api/system/status`.
///
/// Fetched independently of the device list, so the counts may briefly
/// disagree with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemStatus {
    pub total_devices: u32,
    pub online_devices: u32,
    pub offline_devices: u32,
}
