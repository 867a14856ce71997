// SPDX-License-Identifier: GPL-3.0-only

//! Backend for outputs and input devices provided by a shift "tab" session.
//!
//! The session owns the displays: it announces monitors, hands out frame
//! targets to render into and forwards the input of the remote seat. The
//! backend mirrors that state into outputs and devices and is driven by a
//! periodic wake source the host inserts into its event loop.

use crate::{
    backend::{BackendError, BackendEvent, Capabilities, DispatchError, EventSink},
    config,
    input::{translate, Capability, Devices},
};
use calloop::{generic::Generic, Interest, LoopHandle, Mode, PostAction, RegistrationToken};
use indexmap::IndexMap;
use smithay::backend::allocator::Format;
use std::os::fd::{AsFd, BorrowedFd};
use tab_backend_config::TabConfig;
use tracing::{debug, error, info, trace, warn};

pub mod client;
mod formats;
pub mod output;
pub mod swapchain;
mod wake;

#[cfg(test)]
pub(crate) mod test_client;

use self::{
    client::{MonitorInfo, RawInputEvent, SessionClient, SessionConnector, SessionEvent},
    output::{OutputId, TabOutput},
    swapchain::TabBuffer,
    wake::WakeSource,
};

pub use self::formats::fallback_formats;

/// Devices that saw input during the current dispatch cycle.
#[derive(Debug, Default)]
struct FrameBatch {
    pointer: bool,
    touch: bool,
}

pub struct TabBackend<K: SessionConnector, S: EventSink> {
    connector: K,
    client: Option<K::Client>,
    sink: S,
    config: TabConfig,
    wake: WakeSource,
    // keyed by monitor id, in announcement order
    outputs: IndexMap<String, TabOutput>,
    next_output_id: u64,
    devices: Devices,
    hardware_formats: Vec<Format>,
}

impl<K: SessionConnector, S: EventSink> TabBackend<K, S> {
    pub fn new(connector: K, sink: S, config: TabConfig) -> Result<Self, BackendError> {
        let wake = WakeSource::new(config.wake_interval()).map_err(BackendError::WakeSource)?;
        Ok(TabBackend {
            connector,
            client: None,
            sink,
            config,
            wake,
            outputs: IndexMap::new(),
            next_output_id: 0,
            devices: Devices::default(),
            hardware_formats: Vec::new(),
        })
    }

    /// Connect to the session and create an output for every known monitor.
    ///
    /// A failed connection leaves the backend idle, the host may carry on
    /// without it.
    pub fn start(&mut self) -> Result<(), BackendError> {
        if self.client.is_none() {
            let token = config::session_token(&self.config);
            let client = self
                .connector
                .connect(token.as_deref())
                .inspect_err(|err| warn!(?err, "Tab client failed to connect"))?;
            info!("Tab client connected successfully");
            self.client = Some(client);
        }

        let monitors = match self.client.as_ref() {
            Some(client) => client
                .monitor_ids()
                .into_iter()
                // outputs from an earlier start keep their handles
                .filter(|id| !self.outputs.contains_key(id))
                .filter_map(|id| {
                    let info = client.monitor_info(&id);
                    if info.is_none() {
                        warn!(monitor = %id, "Monitor vanished during enumeration");
                    }
                    info
                })
                .collect::<Vec<_>>(),
            None => Vec::new(),
        };
        for monitor in &monitors {
            self.create_output(monitor);
        }

        self.sink.emit(BackendEvent::PollSourcesChanged);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// The wake source to poll, only present while connected.
    pub fn poll_fd(&self) -> Option<BorrowedFd<'_>> {
        self.client.as_ref().map(|_| self.wake.as_fd())
    }

    /// Insert the wake source into a calloop event loop, dispatching the
    /// backend found through `backend` whenever it fires.
    pub fn insert_wake_source<'l, D, F>(
        &self,
        handle: &LoopHandle<'l, D>,
        mut backend: F,
    ) -> Result<RegistrationToken, BackendError>
    where
        F: FnMut(&mut D) -> &mut Self + 'l,
        Self: 'l,
    {
        let fd = self.wake.try_clone_fd().map_err(BackendError::WakeSource)?;
        handle
            .insert_source(
                Generic::new(fd, Interest::READ, Mode::Level),
                move |_, _, data| match backend(data).dispatch_events() {
                    Ok(()) => Ok(PostAction::Continue),
                    Err(err) => {
                        error!(?err, "Tab backend stopped dispatching");
                        Ok(PostAction::Remove)
                    }
                },
            )
            .map_err(|err| BackendError::Register(err.error))
    }

    /// Run one dispatch cycle. Called whenever the wake source is readable.
    pub fn dispatch_events(&mut self) -> Result<(), DispatchError> {
        self.wake.drain().map_err(DispatchError::WakeSource)?;

        let Some(client) = self.client.as_mut() else {
            return Ok(());
        };
        client.poll_events();

        let mut batch = FrameBatch::default();
        while let Some(event) = self.client.as_mut().and_then(|client| client.next_event()) {
            self.handle_event(event, &mut batch);
        }

        if batch.pointer {
            self.devices.frame(Capability::Pointer, &mut self.sink);
        }
        if batch.touch {
            self.devices.frame(Capability::Touch, &mut self.sink);
        }

        if let Some(client) = self.client.as_mut() {
            for output in self.outputs.values_mut() {
                if output.swapchain.next(client).is_some() {
                    output.needs_frame = true;
                    self.sink.emit(BackendEvent::OutputFrame(output.id()));
                }
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: SessionEvent, batch: &mut FrameBatch) {
        match event {
            SessionEvent::FrameDone(monitor_id) => match self.outputs.get_mut(&monitor_id) {
                Some(output) => {
                    output.needs_frame = false;
                    self.sink.emit(BackendEvent::OutputPresent {
                        output: output.id(),
                        presented: true,
                    });
                }
                None => trace!(monitor = %monitor_id, "Frame done for unknown monitor"),
            },
            SessionEvent::MonitorAdded(monitor) => {
                trace!(monitor = %monitor.id, "Monitor added");
                self.create_output(&monitor);
            }
            SessionEvent::MonitorRemoved(monitor_id) => {
                trace!(monitor = %monitor_id, "Monitor removed");
                self.remove_monitor(&monitor_id);
            }
            SessionEvent::Input(raw) => self.handle_input(&raw, batch),
            SessionEvent::Unknown(kind) => debug!(kind, "Got an unhandled event"),
        }
    }

    fn handle_input(&mut self, raw: &RawInputEvent, batch: &mut FrameBatch) {
        let Some(event) = translate::translate(raw) else {
            debug!(?raw, "Got an unhandled input event");
            return;
        };
        if self.config.trace_input {
            trace!(?event, "Input");
        }
        match event.capability() {
            Capability::Pointer => batch.pointer = true,
            Capability::Touch => batch.touch = true,
            _ => {}
        }
        self.devices.route(event, &mut self.sink);
    }

    fn create_output(&mut self, monitor: &MonitorInfo) -> Option<OutputId> {
        if self.outputs.contains_key(&monitor.id) {
            warn!(monitor = %monitor.id, "Monitor announced twice, recreating its output");
            self.remove_monitor(&monitor.id);
        }
        let client = self.client.as_mut()?;

        let id = OutputId(self.next_output_id);
        self.next_output_id += 1;
        let swapchain = swapchain::TabSwapchain::new(monitor, client, self.config.swapchain_length);
        let output = TabOutput::new(id, monitor, swapchain, self.config.refresh_mhz);
        debug!(
            monitor = %monitor.id,
            name = %monitor.name,
            size = ?output.physical_size(),
            "New output"
        );
        self.outputs.insert(monitor.id.clone(), output);
        self.sink.emit(BackendEvent::NewOutput(id));
        Some(id)
    }

    fn remove_monitor(&mut self, monitor_id: &str) {
        if let Some(output) = self.outputs.shift_remove(monitor_id) {
            self.sink.emit(BackendEvent::OutputDestroyed(output.id()));
        }
    }

    pub fn outputs(&self) -> impl Iterator<Item = &TabOutput> {
        self.outputs.values()
    }

    pub fn output(&self, id: OutputId) -> Option<&TabOutput> {
        self.outputs.values().find(|output| output.id() == id)
    }

    pub fn output_mut(&mut self, id: OutputId) -> Option<&mut TabOutput> {
        self.outputs.values_mut().find(|output| output.id() == id)
    }

    pub fn output_by_monitor(&self, monitor_id: &str) -> Option<&TabOutput> {
        self.outputs.get(monitor_id)
    }

    /// Apply the pending state of an output and present its current frame
    /// target. Returns `false` for unknown outputs.
    pub fn commit(&mut self, id: OutputId) -> bool {
        let Some(output) = self.outputs.values_mut().find(|output| output.id() == id) else {
            return false;
        };
        self.sink.emit(BackendEvent::OutputCommit(id));
        output.apply_pending();
        if let Some(client) = self.client.as_mut() {
            client.swap_buffers(output.monitor_id());
        }
        true
    }

    pub fn test(&self, id: OutputId) -> bool {
        self.output(id).is_some_and(TabOutput::test)
    }

    pub fn schedule_frame(&mut self, id: OutputId) {
        if let Some(output) = self.output_mut(id) {
            output.schedule_frame();
        }
    }

    /// Acquire the next frame target of an output.
    pub fn next_buffer(&mut self, id: OutputId) -> Option<&TabBuffer> {
        let client = self.client.as_mut()?;
        let output = self.outputs.values_mut().find(|output| output.id() == id)?;
        output.swapchain.next(client)
    }

    /// Destroy an output. Destroying it again is a no-op.
    pub fn destroy_output(&mut self, id: OutputId) -> bool {
        let Some(index) = self.outputs.values().position(|output| output.id() == id) else {
            return false;
        };
        if let Some((_, output)) = self.outputs.shift_remove_index(index) {
            self.sink.emit(BackendEvent::OutputDestroyed(output.id()));
        }
        true
    }

    pub fn devices(&self) -> &Devices {
        &self.devices
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Hardware cursors are not supported.
    pub fn set_cursor(&mut self, _buffer: Option<&TabBuffer>) -> bool {
        false
    }

    pub fn cursor_formats(&self) -> Vec<Format> {
        Vec::new()
    }

    /// Formats supplied by a hardware backend of the host, if any.
    pub fn set_hardware_formats(&mut self, formats: Vec<Format>) {
        self.hardware_formats = formats;
    }

    pub fn render_formats(&self) -> Vec<Format> {
        if self.hardware_formats.is_empty() {
            fallback_formats()
        } else {
            self.hardware_formats.clone()
        }
    }

    pub fn drm_fd(&self) -> Option<BorrowedFd<'_>> {
        self.client.as_ref()?.drm_fd()
    }

    pub fn drm_render_node_fd(&self) -> Option<BorrowedFd<'_>> {
        self.client.as_ref()?.render_node_fd()
    }

    /// Destroy all outputs and disconnect from the session.
    pub fn shutdown(&mut self) {
        for (_, output) in self.outputs.drain(..) {
            self.sink.emit(BackendEvent::OutputDestroyed(output.id()));
        }
        if self.client.take().is_some() {
            info!("Tab client disconnected");
        }
    }
}

impl<K: SessionConnector, S: EventSink> Drop for TabBackend<K, S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
