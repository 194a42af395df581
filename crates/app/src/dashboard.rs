//! Dashboard sync client: keeps a snapshot of the remote API and turns it
//! into render instructions.
//!
//! A single [`Dashboard`] owns all client-side state. It is refreshed on a
//! fixed period and on demand; requests against the same resource may
//! overlap, and a [`SequenceGuard`] per resource makes sure a late response
//! never overwrites a newer one. Control commands are applied optimistically
//! and reconciled with a re-fetch once the backend had time to settle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use swissairdry_domain::command::{Command, CommandAck, FanSpeed};
use swissairdry_domain::device::Device;
use swissairdry_domain::error::SwissAirDryError;
use swissairdry_domain::id::DeviceId;
use swissairdry_domain::reading::Reading;
use swissairdry_domain::status::SystemStatus;
use swissairdry_domain::time::{self, Timestamp};

use crate::notifications::{Notification, NotificationCenter, NotificationId, NotificationKind};
use crate::ports::{Confirmation, DeviceApi};
use crate::sequence::{SequenceGuard, Ticket};
use crate::view::{self, ControlOverride, Screen};

/// Question asked before an OTA update is requested.
pub const OTA_PROMPT: &str = "Are you sure you want to trigger an OTA update for this device?";

/// Timing and layout knobs.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Period of the background refresh of devices and status.
    pub refresh_interval: Duration,
    /// Delay between an accepted command and the reconciling re-fetch.
    pub settle_delay: Duration,
    /// Number of readings requested for the detail view.
    pub readings_limit: usize,
    /// Whether the status summary is part of the rendered page.
    pub show_system_status: bool,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(30),
            settle_delay: Duration::from_millis(2_000),
            readings_limit: 20,
            show_system_status: true,
        }
    }
}

#[derive(Debug, Default)]
struct DashboardState {
    /// `None` until the first successful load.
    devices: Option<Vec<Device>>,
    status: Option<(SystemStatus, Timestamp)>,
    selected: Option<Device>,
    /// Readings tagged with the device they were fetched for.
    readings: Option<(DeviceId, Vec<Reading>)>,
    overrides: HashMap<DeviceId, ControlOverride>,
    /// Command that wrote each optimistic value.
    pending: HashMap<DeviceId, PendingControl>,
    /// Power state acknowledged by the API, held until its reconcile ran.
    confirmed_power: HashMap<DeviceId, (bool, Ticket)>,
    /// The API has no fan field on devices, so the last acknowledged or
    /// reported speed stands in for server state.
    confirmed_fan: HashMap<DeviceId, FanSpeed>,
    commands_seq: SequenceGuard,
    devices_seq: SequenceGuard,
    status_seq: SequenceGuard,
    detail_seq: SequenceGuard,
    readings_seq: SequenceGuard,
    notifications: NotificationCenter,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct PendingControl {
    power: Option<Ticket>,
    fan_speed: Option<Ticket>,
}

impl DashboardState {
    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) -> NotificationId {
        self.notifications.push(kind, message, Instant::now())
    }

    /// Show the outcome of `command` before the API answers.
    fn apply_optimistic(&mut self, id: &DeviceId, command: Command) -> Ticket {
        let ticket = self.commands_seq.issue();
        let control = self.overrides.entry(id.clone()).or_default();
        let pending = self.pending.entry(id.clone()).or_default();
        match command {
            Command::Power(on) => {
                control.power = Some(on);
                pending.power = Some(ticket);
            }
            Command::FanSpeed(speed) => {
                control.fan_speed = Some(speed);
                pending.fan_speed = Some(ticket);
            }
            Command::TriggerUpdate => {}
        }
        ticket
    }

    /// Undo a failed command unless a newer one took over the control.
    fn revert(&mut self, id: &DeviceId, command: Command, ticket: Ticket) {
        let (Some(control), Some(pending)) = (self.overrides.get_mut(id), self.pending.get_mut(id))
        else {
            return;
        };
        match command {
            Command::Power(_) if pending.power == Some(ticket) => {
                let confirmed = self.confirmed_power.get(id).copied();
                control.power = confirmed.map(|(on, _)| on);
                pending.power = confirmed.map(|(_, acked)| acked);
            }
            Command::FanSpeed(_) if pending.fan_speed == Some(ticket) => {
                control.fan_speed = None;
                pending.fan_speed = None;
            }
            _ => return,
        }
        self.prune(id);
    }

    /// Drop what the command behind `ticket` wrote, now that server state
    /// has been re-read.
    fn settle(&mut self, id: &DeviceId, ticket: Ticket) {
        if let (Some(control), Some(pending)) = (self.overrides.get_mut(id), self.pending.get_mut(id))
        {
            if pending.power == Some(ticket) {
                control.power = None;
                pending.power = None;
            }
            if pending.fan_speed == Some(ticket) {
                control.fan_speed = None;
                pending.fan_speed = None;
            }
        }
        if self
            .confirmed_power
            .get(id)
            .is_some_and(|(_, acked)| *acked == ticket)
        {
            self.confirmed_power.remove(id);
        }
        self.prune(id);
    }

    fn prune(&mut self, id: &DeviceId) {
        if self
            .overrides
            .get(id)
            .is_some_and(|control| *control == ControlOverride::default())
        {
            self.overrides.remove(id);
        }
        if self
            .pending
            .get(id)
            .is_some_and(|pending| *pending == PendingControl::default())
        {
            self.pending.remove(id);
        }
    }
}

/// The dashboard controller.
///
/// `Clone` is implemented manually so `A` itself does not need to be
/// `Clone`; clones share the same state.
pub struct Dashboard<A> {
    api: Arc<A>,
    state: Arc<Mutex<DashboardState>>,
    options: Arc<DashboardOptions>,
}

impl<A> Clone for Dashboard<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
            options: Arc::clone(&self.options),
        }
    }
}

impl<A> Dashboard<A> {
    /// Create a dashboard backed by the given API client.
    pub fn new(api: A, options: DashboardOptions) -> Self {
        Self::from_arc(Arc::new(api), options)
    }

    /// Create a dashboard from a pre-wrapped API client.
    ///
    /// Use this when the client is shared with other components.
    pub fn from_arc(api: Arc<A>, options: DashboardOptions) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(DashboardState::default())),
            options: Arc::new(options),
        }
    }

    #[must_use]
    pub fn options(&self) -> &DashboardOptions {
        &self.options
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Render instructions for the current snapshot.
    ///
    /// Every call rebuilds each region from scratch.
    #[must_use]
    pub fn screen(&self) -> Screen {
        let mut guard = self.lock();
        let state = &mut *guard;

        let notifications = state.notifications.active(Instant::now());

        let device_list = state
            .devices
            .as_deref()
            .map(|devices| view::device_list(devices, &state.overrides));

        let status = if self.options.show_system_status {
            state
                .status
                .as_ref()
                .map(|(status, at)| view::system_status(status, at))
        } else {
            None
        };

        let detail = state.selected.as_ref().map(|device| {
            view::device_detail(
                device,
                state.overrides.get(&device.device_id),
                state.confirmed_fan.get(&device.device_id).copied(),
            )
        });

        let readings = match (&state.selected, &state.readings) {
            (Some(selected), Some((owner, readings))) if selected.device_id == *owner => {
                Some(view::readings(readings))
            }
            _ => None,
        };

        Screen {
            device_list,
            status,
            detail,
            readings,
            notifications,
        }
    }

    /// Snapshot of the device list, `None` before the first successful load.
    #[must_use]
    pub fn devices(&self) -> Option<Vec<Device>> {
        self.lock().devices.clone()
    }

    #[must_use]
    pub fn selected_device(&self) -> Option<Device> {
        self.lock().selected.clone()
    }

    /// Active notifications, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().notifications.active(Instant::now())
    }

    /// Push a notification raised outside the dashboard operations.
    pub fn notify(&self, kind: NotificationKind, message: impl Into<String>) -> NotificationId {
        self.lock().notify(kind, message)
    }

    /// Remove a notification before it expires.
    pub fn dismiss_notification(&self, id: NotificationId) -> bool {
        self.lock().notifications.dismiss(id)
    }

    fn report_failure(&self, context: &str, err: &SwissAirDryError) {
        tracing::warn!(error = %err, "{context}");
        self.lock()
            .notify(NotificationKind::Error, format!("{context}: {err}"));
    }
}

impl<A> Dashboard<A>
where
    A: DeviceApi + Send + Sync + 'static,
{
    /// Fetch the device list and replace the snapshot.
    ///
    /// On failure the previous list is kept and an error is notified.
    #[tracing::instrument(skip(self))]
    pub async fn load_devices(&self) {
        self.fetch_devices().await;
    }

    async fn fetch_devices(&self) -> bool {
        let ticket = self.lock().devices_seq.issue();
        match self.api.list_devices().await {
            Ok(devices) => {
                let mut state = self.lock();
                if !state.devices_seq.try_apply(ticket) {
                    tracing::debug!(ticket = ticket.value(), "discarding stale device list");
                    return false;
                }
                tracing::debug!(count = devices.len(), "device list refreshed");
                state.devices = Some(devices);
                true
            }
            Err(err) => {
                self.report_failure("Failed to load devices", &err);
                false
            }
        }
    }

    /// Fetch the aggregate counts, unless the status panel is disabled.
    #[tracing::instrument(skip(self))]
    pub async fn load_system_status(&self) {
        if !self.options.show_system_status {
            return;
        }
        let ticket = self.lock().status_seq.issue();
        match self.api.system_status().await {
            Ok(status) => {
                let mut state = self.lock();
                if state.status_seq.try_apply(ticket) {
                    state.status = Some((status, time::now()));
                } else {
                    tracing::debug!(ticket = ticket.value(), "discarding stale system status");
                }
            }
            Err(err) => self.report_failure("Failed to load system status", &err),
        }
    }

    /// Fetch one device, select it, then load its readings.
    ///
    /// On failure the previous selection is kept.
    #[tracing::instrument(skip(self, id), fields(device_id = %id))]
    pub async fn load_device_detail(&self, id: &DeviceId) {
        self.fetch_device_detail(id).await;
    }

    async fn fetch_device_detail(&self, id: &DeviceId) -> bool {
        let ticket = self.lock().detail_seq.issue();
        let device = match self.api.get_device(id).await {
            Ok(device) => device,
            Err(err) => {
                self.report_failure("Failed to load device details", &err);
                return false;
            }
        };

        let applied = {
            let mut state = self.lock();
            let applied = state.detail_seq.try_apply(ticket);
            if applied {
                state.selected = Some(device);
            }
            applied
        };
        if !applied {
            tracing::debug!(ticket = ticket.value(), "discarding stale device detail");
            return false;
        }

        self.load_device_readings(id, self.options.readings_limit)
            .await;
        true
    }

    /// Fetch the most recent `limit` readings of a device.
    #[tracing::instrument(skip(self, id), fields(device_id = %id))]
    pub async fn load_device_readings(&self, id: &DeviceId, limit: usize) {
        let ticket = self.lock().readings_seq.issue();
        match self.api.device_readings(id, limit).await {
            Ok(readings) => {
                let mut state = self.lock();
                if !state.readings_seq.try_apply(ticket) {
                    tracing::debug!(ticket = ticket.value(), "discarding stale readings");
                    return;
                }
                // Readings are newest first, so this is the latest reported speed.
                // An acknowledged fan command wins until it has been reconciled.
                let awaiting_fan = state
                    .pending
                    .get(id)
                    .is_some_and(|pending| pending.fan_speed.is_some());
                let reported = readings.iter().find_map(|r| r.fan_speed);
                if let Some(reported) = reported.filter(|_| !awaiting_fan) {
                    state
                        .confirmed_fan
                        .insert(id.clone(), FanSpeed::from_reported(reported));
                }
                state.readings = Some((id.clone(), readings));
            }
            Err(err) => self.report_failure("Failed to load device readings", &err),
        }
    }

    /// Switch a device on or off, showing the new state immediately.
    #[tracing::instrument(skip(self, id), fields(device_id = %id))]
    pub async fn toggle_device_power(&self, id: &DeviceId, desired: bool) {
        let command = Command::Power(desired);
        let ticket = self.lock().apply_optimistic(id, command);
        let result = self.api.set_power(id, desired).await;
        self.finish_command(id, command, ticket, result);
    }

    /// Change the fan speed, showing the new value immediately.
    #[tracing::instrument(skip(self, id), fields(device_id = %id, speed = speed.percent()))]
    pub async fn set_fan_speed(&self, id: &DeviceId, speed: FanSpeed) {
        let command = Command::FanSpeed(speed);
        let ticket = self.lock().apply_optimistic(id, command);
        let result = self.api.set_fan_speed(id, speed).await;
        self.finish_command(id, command, ticket, result);
    }

    /// Request a firmware update once the operator confirmed it.
    ///
    /// Updates take longer than the refresh horizon, so no re-fetch follows.
    #[tracing::instrument(skip(self, id, confirmation), fields(device_id = %id))]
    pub async fn trigger_ota_update<C>(&self, id: &DeviceId, confirmation: &C)
    where
        C: Confirmation + Sync,
    {
        if !confirmation.confirm(OTA_PROMPT).await {
            tracing::info!("OTA update declined");
            return;
        }
        let ticket = self.lock().commands_seq.issue();
        let result = self.api.trigger_update(id).await;
        self.finish_command(id, Command::TriggerUpdate, ticket, result);
    }

    fn finish_command(
        &self,
        id: &DeviceId,
        command: Command,
        ticket: Ticket,
        result: Result<CommandAck, SwissAirDryError>,
    ) {
        match result {
            Ok(ack) => {
                tracing::info!(device_id = %id, message = %ack.message, "command accepted");
                {
                    let mut state = self.lock();
                    match command {
                        Command::Power(on) => {
                            state.confirmed_power.insert(id.clone(), (on, ticket));
                        }
                        Command::FanSpeed(speed) => {
                            state.confirmed_fan.insert(id.clone(), speed);
                        }
                        Command::TriggerUpdate => {}
                    }
                    state.notify(NotificationKind::Success, ack.message);
                }
                if !matches!(command, Command::TriggerUpdate) {
                    self.schedule_reconcile(id.clone(), ticket);
                }
            }
            Err(err) => {
                self.lock().revert(id, command, ticket);
                self.report_failure(&format!("Failed to {}", command.describe()), &err);
            }
        }
    }

    fn schedule_reconcile(&self, id: DeviceId, ticket: Ticket) {
        let this = self.clone();
        let delay = self.options.settle_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.reconcile(&id, ticket).await;
        });
    }

    /// Re-fetch server state after a command and drop the optimistic values
    /// that command wrote once the re-fetch has been applied.
    #[tracing::instrument(skip(self, id, ticket), fields(device_id = %id, ticket = ticket.value()))]
    async fn reconcile(&self, id: &DeviceId, ticket: Ticket) {
        let mut refreshed = self.fetch_devices().await;
        let selected = self
            .lock()
            .selected
            .as_ref()
            .is_some_and(|device| device.device_id == *id);
        if selected {
            refreshed &= self.fetch_device_detail(id).await;
        }
        if refreshed {
            self.lock().settle(id, ticket);
        }
    }

    /// One refresh tick: devices and status, concurrently.
    pub async fn refresh(&self) {
        tokio::join!(self.load_devices(), self.load_system_status());
    }

    /// Refresh requested by the operator.
    pub async fn manual_refresh(&self) {
        self.refresh().await;
        self.lock()
            .notify(NotificationKind::Success, "Data refreshed");
    }

    /// Page entry: open the detail view named by the `device` query parameter.
    pub async fn open_from_query(&self, device: Option<&str>) {
        let Some(raw) = device else {
            return;
        };
        match DeviceId::new(raw) {
            Ok(id) => self.load_device_detail(&id).await,
            Err(err) => tracing::debug!(error = %err, "ignoring device query parameter"),
        }
    }

    /// Start the periodic refresh.
    ///
    /// The first tick fires immediately. Ticks never wait for the previous
    /// one; overlapping responses are ordered by the sequence guards. Abort
    /// the returned handle to stop.
    pub fn spawn_refresh_loop(&self) -> JoinHandle<()> {
        let this = self.clone();
        let period = self.options.refresh_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let tick = this.clone();
                tokio::spawn(async move { tick.refresh().await });
            }
        })
    }
}
