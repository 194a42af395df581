//! View models: pure functions from the snapshot to render instructions.
//!
//! Nothing here touches IO or a rendering surface, so the reconciliation
//! logic in [`crate::dashboard`] can be tested by inspecting these values.
//! Every render fully replaces its region; missing data yields an explicit
//! empty state instead of an empty container.

use std::collections::HashMap;

use url::form_urlencoded;

use swissairdry_domain::command::FanSpeed;
use swissairdry_domain::device::Device;
use swissairdry_domain::id::DeviceId;
use swissairdry_domain::reading::Reading;
use swissairdry_domain::status::SystemStatus;
use swissairdry_domain::time::{Timestamp, format_clock, format_local};

use crate::notifications::Notification;

pub const NO_DEVICES: &str = "No devices found";
pub const NO_READINGS: &str = "No readings available";
const UNKNOWN: &str = "Unknown";
const NEVER: &str = "Never";
const MISSING_CELL: &str = "-";

/// Optimistic values applied on top of server state until reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlOverride {
    pub power: Option<bool>,
    pub fan_speed: Option<FanSpeed>,
}

/// Power toggle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerControl {
    pub on: bool,
}

impl PowerControl {
    #[must_use]
    pub fn label(self) -> &'static str {
        if self.on { "On" } else { "Off" }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        if self.on { "green" } else { "red" }
    }

    /// State requested when the toggle is pressed.
    #[must_use]
    pub fn next_state(self) -> bool {
        !self.on
    }
}

fn online_label(online: bool) -> &'static str {
    if online { "Online" } else { "Offline" }
}

fn online_class(online: bool) -> &'static str {
    if online { "online" } else { "offline" }
}

/// One entry in the device list.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceCard {
    pub device_id: String,
    pub name: String,
    pub device_type: String,
    pub firmware: String,
    pub online: bool,
    pub power: PowerControl,
    pub detail_href: String,
}

impl DeviceCard {
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        online_label(self.online)
    }

    #[must_use]
    pub fn status_class(&self) -> &'static str {
        online_class(self.online)
    }

    /// Form target for a control action, e.g. `power`.
    #[must_use]
    pub fn action_href(&self, action: &str) -> String {
        action_href(&self.device_id, action)
    }
}

/// The device list region.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceListView {
    Empty { message: &'static str },
    Items(Vec<DeviceCard>),
}

impl DeviceListView {
    #[must_use]
    pub fn cards(&self) -> &[DeviceCard] {
        match self {
            Self::Empty { .. } => &[],
            Self::Items(cards) => cards,
        }
    }

    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        match self {
            Self::Empty { message } => Some(*message),
            Self::Items(_) => None,
        }
    }
}

/// Label/value pair in the detail metadata grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRow {
    pub label: &'static str,
    pub value: String,
}

/// A fan-speed preset button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanPreset {
    pub speed: u8,
    pub label: String,
    pub active: bool,
}

/// The device detail panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceDetailView {
    pub device_id: String,
    pub name: String,
    pub online: bool,
    pub metadata: Vec<MetadataRow>,
    pub power: PowerControl,
    pub fan_speed: FanSpeed,
    pub fan_presets: Vec<FanPreset>,
}

impl DeviceDetailView {
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        online_label(self.online)
    }

    #[must_use]
    pub fn status_class(&self) -> &'static str {
        online_class(self.online)
    }

    #[must_use]
    pub fn action_href(&self, action: &str) -> String {
        action_href(&self.device_id, action)
    }

    /// Text of the fan-speed display, e.g. `50%`.
    #[must_use]
    pub fn fan_display(&self) -> String {
        self.fan_speed.to_string()
    }
}

/// One row of the readings table, every cell pre-formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingRow {
    pub time: String,
    pub temperature: String,
    pub humidity: String,
    pub pressure: String,
    pub fan_speed: String,
    pub power: String,
}

/// Which y-axis a series is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Primary,
    Secondary,
}

/// A chart series; `None` points are gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub axis: Axis,
    pub points: Vec<Option<f64>>,
}

/// Time-series chart, chronological left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub labels: Vec<String>,
    pub temperature: Series,
    pub humidity: Series,
}

/// The readings region.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadingsView {
    Empty {
        message: &'static str,
    },
    Table {
        rows: Vec<ReadingRow>,
        chart: Option<ChartView>,
    },
}

impl ReadingsView {
    #[must_use]
    pub fn rows(&self) -> &[ReadingRow] {
        match self {
            Self::Empty { .. } => &[],
            Self::Table { rows, .. } => rows,
        }
    }

    #[must_use]
    pub fn chart(&self) -> Option<&ChartView> {
        match self {
            Self::Empty { .. } => None,
            Self::Table { chart, .. } => chart.as_ref(),
        }
    }

    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        match self {
            Self::Empty { message } => Some(*message),
            Self::Table { .. } => None,
        }
    }
}

/// The system status summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub total: u32,
    pub online: u32,
    pub offline: u32,
    pub updated_at: String,
}

/// Everything a rendering surface needs for one frame.
///
/// `None` regions have not been loaded yet.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    pub device_list: Option<DeviceListView>,
    pub status: Option<StatusView>,
    pub detail: Option<DeviceDetailView>,
    pub readings: Option<ReadingsView>,
    pub notifications: Vec<Notification>,
}

/// Render the device list.
#[must_use]
pub fn device_list(
    devices: &[Device],
    overrides: &HashMap<DeviceId, ControlOverride>,
) -> DeviceListView {
    if devices.is_empty() {
        return DeviceListView::Empty {
            message: NO_DEVICES,
        };
    }

    let cards = devices
        .iter()
        .map(|device| DeviceCard {
            device_id: device.device_id.to_string(),
            name: device.name.clone(),
            device_type: device.device_type.clone(),
            firmware: or_placeholder(device.firmware_version.as_deref(), UNKNOWN),
            online: device.is_online,
            power: power_control(device, overrides.get(&device.device_id)),
            detail_href: detail_href(&device.device_id),
        })
        .collect();

    DeviceListView::Items(cards)
}

/// Render the detail panel of the selected device.
///
/// `confirmed_fan` is the last fan speed the server acknowledged or reported.
#[must_use]
pub fn device_detail(
    device: &Device,
    control: Option<&ControlOverride>,
    confirmed_fan: Option<FanSpeed>,
) -> DeviceDetailView {
    let fan_speed = control
        .and_then(|c| c.fan_speed)
        .or(confirmed_fan)
        .unwrap_or_default();

    let metadata = vec![
        MetadataRow {
            label: "Device ID",
            value: device.device_id.to_string(),
        },
        MetadataRow {
            label: "Type",
            value: device.device_type.clone(),
        },
        MetadataRow {
            label: "Firmware",
            value: or_placeholder(device.firmware_version.as_deref(), UNKNOWN),
        },
        MetadataRow {
            label: "IP Address",
            value: or_placeholder(device.ip_address.as_deref(), UNKNOWN),
        },
        MetadataRow {
            label: "MAC Address",
            value: or_placeholder(device.mac_address.as_deref(), UNKNOWN),
        },
        MetadataRow {
            label: "Last Seen",
            value: device
                .last_seen
                .as_ref()
                .map_or_else(|| NEVER.to_string(), format_local),
        },
    ];

    let fan_presets = FanSpeed::PRESETS
        .iter()
        .map(|preset| FanPreset {
            speed: preset.percent(),
            label: if preset.percent() == 0 {
                "Off".to_string()
            } else {
                preset.to_string()
            },
            active: *preset == fan_speed,
        })
        .collect();

    DeviceDetailView {
        device_id: device.device_id.to_string(),
        name: device.name.clone(),
        online: device.is_online,
        metadata,
        power: power_control(device, control),
        fan_speed,
        fan_presets,
    }
}

/// Render the readings table and, when there is climate data, the chart.
///
/// `readings` arrive newest first; the table keeps that order while the
/// chart is reversed so it reads chronologically.
#[must_use]
pub fn readings(readings: &[Reading]) -> ReadingsView {
    if readings.is_empty() {
        return ReadingsView::Empty {
            message: NO_READINGS,
        };
    }

    let rows = readings
        .iter()
        .map(|r| ReadingRow {
            time: format_local(&r.timestamp),
            temperature: with_unit(r.temperature, "°C"),
            humidity: with_unit(r.humidity, "%"),
            pressure: with_unit(r.pressure, " hPa"),
            fan_speed: with_unit(r.fan_speed, "%"),
            power: with_unit(r.power_consumption, " W"),
        })
        .collect();

    let chart = readings
        .iter()
        .any(Reading::has_climate_data)
        .then(|| build_chart(readings));

    ReadingsView::Table { rows, chart }
}

fn build_chart(readings: &[Reading]) -> ChartView {
    let chronological: Vec<&Reading> = readings.iter().rev().collect();
    ChartView {
        labels: chronological
            .iter()
            .map(|r| format_local(&r.timestamp))
            .collect(),
        temperature: Series {
            label: "Temperature (°C)",
            axis: Axis::Primary,
            points: chronological.iter().map(|r| r.temperature).collect(),
        },
        humidity: Series {
            label: "Humidity (%)",
            axis: Axis::Secondary,
            points: chronological.iter().map(|r| r.humidity).collect(),
        },
    }
}

/// Render the status summary stamped with the time it was rendered.
#[must_use]
pub fn system_status(status: &SystemStatus, rendered_at: &Timestamp) -> StatusView {
    StatusView {
        total: status.total_devices,
        online: status.online_devices,
        offline: status.offline_devices,
        updated_at: format_clock(rendered_at),
    }
}

fn power_control(device: &Device, control: Option<&ControlOverride>) -> PowerControl {
    PowerControl {
        on: control
            .and_then(|c| c.power)
            .unwrap_or(device.is_online),
    }
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| MISSING_CELL.to_string(), |v| format!("{v}{unit}"))
}

/// Link that opens the detail view of `id` on the devices page.
#[must_use]
pub fn detail_href(id: &DeviceId) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("device", id.as_str())
        .finish();
    format!("/devices?{query}")
}

/// `/devices/<encoded id>/<action>`.
#[must_use]
pub fn action_href(device_id: &str, action: &str) -> String {
    format!("/devices/{}/{action}", encode_path_segment(device_id))
}

/// Percent-encode one path segment.
///
/// The form encoder escapes a literal `+`, so every `+` it emits stands for
/// a space, which a path must carry as `%20`.
fn encode_path_segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
