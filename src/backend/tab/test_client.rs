// SPDX-License-Identifier: GPL-3.0-only

//! Scripted session client for tests.

use super::client::{
    ConnectError, DmabufPlane, FrameTarget, MonitorInfo, SessionClient, SessionConnector,
    SessionEvent,
};
use smithay::backend::allocator::Fourcc;
use std::{
    cell::RefCell,
    collections::{HashSet, VecDeque},
    fs::File,
    os::fd::{BorrowedFd, OwnedFd},
    rc::Rc,
};

/// What the fake session knows and everything the backend asked of it.
#[derive(Debug, Default)]
pub struct Script {
    pub monitors: Vec<MonitorInfo>,
    pub events: VecDeque<SessionEvent>,
    pub unavailable: HashSet<String>,
    pub tokens: Vec<Option<String>>,
    pub refuse: bool,
    pub polls: usize,
    pub acquires: Vec<String>,
    pub swaps: Vec<String>,
    pub connected: bool,
}

pub type Shared = Rc<RefCell<Script>>;

impl Script {
    pub fn shared(monitors: Vec<MonitorInfo>) -> Shared {
        Rc::new(RefCell::new(Script {
            monitors,
            ..Default::default()
        }))
    }
}

pub fn monitor(id: &str, name: &str, width: i32, height: i32) -> MonitorInfo {
    MonitorInfo {
        id: id.into(),
        name: name.into(),
        width,
        height,
    }
}

pub struct FakeClient {
    script: Shared,
}

impl FakeClient {
    pub fn new(script: &Shared) -> FakeClient {
        script.borrow_mut().connected = true;
        FakeClient {
            script: script.clone(),
        }
    }
}

impl Drop for FakeClient {
    fn drop(&mut self) {
        self.script.borrow_mut().connected = false;
    }
}

impl SessionClient for FakeClient {
    fn monitor_ids(&self) -> Vec<String> {
        let script = self.script.borrow();
        script.monitors.iter().map(|m| m.id.clone()).collect()
    }

    fn monitor_info(&self, monitor_id: &str) -> Option<MonitorInfo> {
        let script = self.script.borrow();
        script.monitors.iter().find(|m| m.id == monitor_id).cloned()
    }

    fn poll_events(&mut self) {
        self.script.borrow_mut().polls += 1;
    }

    fn next_event(&mut self) -> Option<SessionEvent> {
        self.script.borrow_mut().events.pop_front()
    }

    fn acquire_frame(&mut self, monitor_id: &str) -> Option<FrameTarget> {
        let mut script = self.script.borrow_mut();
        script.acquires.push(monitor_id.to_string());
        if script.unavailable.contains(monitor_id) {
            return None;
        }
        let (width, height) = script
            .monitors
            .iter()
            .find(|m| m.id == monitor_id)
            .map(|m| (m.width, m.height))
            .unwrap_or((64, 64));
        let fd = OwnedFd::from(File::open("/dev/null").unwrap());
        Some(FrameTarget {
            width,
            height,
            dmabuf: DmabufPlane {
                fd,
                fourcc: Fourcc::Argb8888,
                stride: width as u32 * 4,
                offset: 0,
            },
        })
    }

    fn swap_buffers(&mut self, monitor_id: &str) {
        self.script.borrow_mut().swaps.push(monitor_id.to_string());
    }

    fn drm_fd(&self) -> Option<BorrowedFd<'_>> {
        None
    }
}

pub struct FakeConnector {
    pub script: Shared,
}

impl SessionConnector for FakeConnector {
    type Client = FakeClient;

    fn connect(&mut self, token: Option<&str>) -> Result<FakeClient, ConnectError> {
        let refuse = {
            let mut script = self.script.borrow_mut();
            script.tokens.push(token.map(str::to_string));
            script.refuse
        };
        if refuse {
            return Err(ConnectError::Client("connection refused".into()));
        }
        Ok(FakeClient::new(&self.script))
    }
}
