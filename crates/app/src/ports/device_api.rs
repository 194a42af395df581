//! Device API port: the external telemetry REST API.

use std::future::Future;

use swissairdry_domain::command::{CommandAck, FanSpeed};
use swissairdry_domain::device::Device;
use swissairdry_domain::error::SwissAirDryError;
use swissairdry_domain::id::DeviceId;
use swissairdry_domain::reading::Reading;
use swissairdry_domain::status::SystemStatus;

/// Client for the remote device API.
///
/// Implementations must map transport failures and every non-2xx status to
/// [`SwissAirDryError::Api`] without inspecting the response body.
pub trait DeviceApi {
    /// `GET /api/devices`
    fn list_devices(&self) -> impl Future<Output = Result<Vec<Device>, SwissAirDryError>> + Send;

    /// `GET /api/system/status`
    fn system_status(&self) -> impl Future<Output = Result<SystemStatus, SwissAirDryError>> + Send;

    /// `GET /api/devices/{id}`
    fn get_device(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Device, SwissAirDryError>> + Send;

    /// `GET /api/devices/{id}/readings?limit=N`, newest first.
    fn device_readings(
        &self,
        id: &DeviceId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Reading>, SwissAirDryError>> + Send;

    /// `POST /api/devices/{id}/control/power?state={bool}`
    fn set_power(
        &self,
        id: &DeviceId,
        on: bool,
    ) -> impl Future<Output = Result<CommandAck, SwissAirDryError>> + Send;

    /// `POST /api/devices/{id}/control/fan?speed={0-100}`
    fn set_fan_speed(
        &self,
        id: &DeviceId,
        speed: FanSpeed,
    ) -> impl Future<Output = Result<CommandAck, SwissAirDryError>> + Send;

    /// `POST /api/devices/{id}/trigger-update`
    fn trigger_update(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<CommandAck, SwissAirDryError>> + Send;
}
