// SPDX-License-Identifier: GPL-3.0-only

//! Boundary to the shift session client.
//!
//! Everything the backend needs from the session goes through
//! [`SessionClient`]. Dropping the client disconnects it, strings and frame
//! descriptors handed out by the client are owned by the caller.

use smithay::backend::allocator::Fourcc;
use std::os::fd::{BorrowedFd, OwnedFd};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorInfo {
    pub id: String,
    pub name: String,
    pub width: i32,
    pub height: i32,
}

/// One exported plane of a frame target.
#[derive(Debug)]
pub struct DmabufPlane {
    pub fd: OwnedFd,
    pub fourcc: Fourcc,
    pub stride: u32,
    pub offset: u32,
}

/// A frame target produced by the session for one monitor.
#[derive(Debug)]
pub struct FrameTarget {
    pub width: i32,
    pub height: i32,
    pub dmabuf: DmabufPlane,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabKeyState {
    Released,
    Pressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabButtonState {
    Released,
    Pressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabTipState {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabProximityState {
    Out,
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabSwitchType {
    Lid,
    TabletMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabSwitchState {
    Off,
    On,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchContact {
    pub id: i32,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TabletAxes {
    pub x: f64,
    pub y: f64,
    pub pressure: f64,
    pub distance: f64,
    pub tilt_x: f64,
    pub tilt_y: f64,
    pub rotation: f64,
}

/// Input record as delivered by the session, timestamps in microseconds.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInputEvent {
    Key {
        time_usec: u64,
        key: u32,
        state: TabKeyState,
    },
    PointerButton {
        time_usec: u64,
        button: u32,
        state: TabButtonState,
    },
    PointerMotion {
        time_usec: u64,
        dx: f64,
        dy: f64,
        unaccel_dx: f64,
        unaccel_dy: f64,
    },
    TouchDown {
        time_usec: u64,
        contact: TouchContact,
    },
    TouchUp {
        time_usec: u64,
        contact_id: i32,
    },
    TouchMotion {
        time_usec: u64,
        contact: TouchContact,
    },
    TabletToolAxis {
        time_usec: u64,
        axes: TabletAxes,
    },
    TabletToolProximity {
        time_usec: u64,
        state: TabProximityState,
    },
    TabletToolTip {
        time_usec: u64,
        state: TabTipState,
    },
    TabletToolButton {
        time_usec: u64,
        button: u32,
        state: TabButtonState,
    },
    SwitchToggle {
        time_usec: u64,
        switch_type: TabSwitchType,
        state: TabSwitchState,
    },
    /// An input kind this backend does not know about.
    Unknown { kind: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    MonitorAdded(MonitorInfo),
    MonitorRemoved(String),
    FrameDone(String),
    Input(RawInputEvent),
    /// An event kind this backend does not know about.
    Unknown(u32),
}

pub trait SessionClient {
    /// Ids of all monitors currently known to the session.
    fn monitor_ids(&self) -> Vec<String>;
    fn monitor_info(&self, monitor_id: &str) -> Option<MonitorInfo>;
    /// Pump pending protocol traffic into the internal event queue.
    fn poll_events(&mut self);
    /// Pop the next queued event, `None` once the queue is exhausted.
    fn next_event(&mut self) -> Option<SessionEvent>;
    /// Acquire the next frame target, `None` if the session has none available.
    fn acquire_frame(&mut self, monitor_id: &str) -> Option<FrameTarget>;
    fn swap_buffers(&mut self, monitor_id: &str);
    fn drm_fd(&self) -> Option<BorrowedFd<'_>>;
    fn render_node_fd(&self) -> Option<BorrowedFd<'_>> {
        self.drm_fd()
    }
}

/// Creates session clients from a credential.
pub trait SessionConnector {
    type Client: SessionClient;

    fn connect(&mut self, token: Option<&str>) -> Result<Self::Client, ConnectError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("no session token available")]
    MissingToken,
    #[error("session client could not be created: {0}")]
    Client(String),
    #[error("session socket unavailable")]
    Io(#[from] std::io::Error),
}
