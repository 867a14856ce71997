// SPDX-License-Identifier: GPL-3.0-only

use super::client::{FrameTarget, MonitorInfo, SessionClient};
use smithay::{
    backend::allocator::{
        dmabuf::{Dmabuf, DmabufFlags},
        Fourcc, Modifier,
    },
    utils::{Buffer as BufferCoords, Physical, Size},
};
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapchainOptions {
    pub length: usize,
    pub size: Size<i32, Physical>,
    pub format: Fourcc,
    pub scanout: bool,
    pub cursor: bool,
    pub multigpu: bool,
}

#[derive(Debug)]
pub struct Plane {
    fd: OwnedFd,
    stride: u32,
    offset: u32,
}

impl Plane {
    pub fn fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}

/// One frame target acquired from the session.
///
/// The buffer owns the exported file descriptor. Its contents are whatever the
/// session left in it, so it has to be treated as having an age of 0.
#[derive(Debug)]
pub struct TabBuffer {
    size: Size<i32, BufferCoords>,
    format: Fourcc,
    plane: Plane,
}

impl TabBuffer {
    fn from_target(target: FrameTarget) -> TabBuffer {
        TabBuffer {
            size: (target.width, target.height).into(),
            format: target.dmabuf.fourcc,
            plane: Plane {
                fd: target.dmabuf.fd,
                stride: target.dmabuf.stride,
                offset: target.dmabuf.offset,
            },
        }
    }

    pub fn size(&self) -> Size<i32, BufferCoords> {
        self.size
    }

    pub fn format(&self) -> Fourcc {
        self.format
    }

    /// The session never tells us the layout, so the modifier is implicit.
    pub fn modifier(&self) -> Modifier {
        Modifier::Invalid
    }

    pub fn planes(&self) -> &[Plane] {
        std::slice::from_ref(&self.plane)
    }

    pub fn is_valid(&self) -> bool {
        true
    }

    /// Hand the buffer over to a renderer as a dmabuf.
    pub fn into_dmabuf(self) -> Option<Dmabuf> {
        let mut builder =
            Dmabuf::builder(self.size, self.format, Modifier::Invalid, DmabufFlags::empty());
        if !builder.add_plane(self.plane.fd, 0, self.plane.offset, self.plane.stride) {
            return None;
        }
        builder.build()
    }
}

/// Frame source of one output.
///
/// Buffers are produced by the session, so the chain cannot be reconfigured
/// and only the most recently acquired buffer is kept around.
#[derive(Debug)]
pub struct TabSwapchain {
    monitor_id: String,
    options: SwapchainOptions,
    current: Option<TabBuffer>,
}

impl TabSwapchain {
    pub(super) fn new<C: SessionClient>(
        monitor: &MonitorInfo,
        client: &mut C,
        length: usize,
    ) -> TabSwapchain {
        // the session decides the format, peek at it with a first acquisition
        let current = client
            .acquire_frame(&monitor.id)
            .map(TabBuffer::from_target);
        let format = match &current {
            Some(buffer) => buffer.format(),
            None => {
                debug!(monitor = %monitor.id, "No initial frame target, assuming XRGB8888");
                Fourcc::Xrgb8888
            }
        };

        TabSwapchain {
            monitor_id: monitor.id.clone(),
            options: SwapchainOptions {
                length,
                size: (monitor.width, monitor.height).into(),
                format,
                scanout: false,
                cursor: false,
                multigpu: false,
            },
            current,
        }
    }

    pub fn monitor_id(&self) -> &str {
        &self.monitor_id
    }

    pub fn options(&self) -> &SwapchainOptions {
        &self.options
    }

    /// Acquire the next frame target of the bound monitor.
    ///
    /// `None` means the session has no target available right now. That is
    /// backpressure, not an error: skip this frame and retry later.
    pub fn next<C: SessionClient>(&mut self, client: &mut C) -> Option<&TabBuffer> {
        let target = client.acquire_frame(&self.monitor_id)?;
        self.current = Some(TabBuffer::from_target(target));
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&TabBuffer> {
        self.current.as_ref()
    }

    pub fn take_current(&mut self) -> Option<TabBuffer> {
        self.current.take()
    }

    /// Geometry and format are dictated by the session, so any options are
    /// accepted and ignored.
    pub fn reconfigure(&mut self, _options: &SwapchainOptions) -> bool {
        true
    }

    /// No previous buffers are retained, rolling back leaves everything as is.
    pub fn rollback(&mut self) {}
}

#[cfg(test)]
mod test {
    use super::super::test_client::{monitor, FakeClient, Script};
    use super::*;
    use std::os::fd::AsRawFd;

    #[test]
    fn options_follow_the_monitor() {
        let script = Script::shared(vec![monitor("m1", "DP-1", 1920, 1080)]);
        let mut client = FakeClient::new(&script);
        let swapchain = TabSwapchain::new(&monitor("m1", "DP-1", 1920, 1080), &mut client, 2);

        let options = swapchain.options();
        assert_eq!(options.length, 2);
        assert_eq!(options.size, (1920, 1080).into());
        assert_eq!(options.format, Fourcc::Argb8888);
        assert!(!options.scanout && !options.cursor && !options.multigpu);
        assert_eq!(swapchain.monitor_id(), "m1");
        assert_eq!(script.borrow().acquires, ["m1"]);
    }

    #[test]
    fn unavailable_initial_frame_falls_back_to_xrgb() {
        let script = Script::shared(vec![monitor("m1", "DP-1", 800, 600)]);
        script.borrow_mut().unavailable.insert("m1".into());
        let mut client = FakeClient::new(&script);
        let swapchain = TabSwapchain::new(&monitor("m1", "DP-1", 800, 600), &mut client, 3);

        assert_eq!(swapchain.options().format, Fourcc::Xrgb8888);
        assert_eq!(swapchain.options().length, 3);
        assert!(swapchain.current().is_none());
    }

    #[test]
    fn next_keeps_last_buffer_on_backpressure() {
        let script = Script::shared(vec![monitor("m1", "DP-1", 640, 480)]);
        let mut client = FakeClient::new(&script);
        let mut swapchain = TabSwapchain::new(&monitor("m1", "DP-1", 640, 480), &mut client, 2);

        let buffer = swapchain.next(&mut client).unwrap();
        assert_eq!(buffer.size(), (640, 480).into());
        assert_eq!(buffer.modifier(), Modifier::Invalid);
        assert_eq!(buffer.planes().len(), 1);
        assert_eq!(buffer.planes()[0].stride(), 640 * 4);
        assert!(buffer.is_valid());

        script.borrow_mut().unavailable.insert("m1".into());
        assert!(swapchain.next(&mut client).is_none());
        assert!(swapchain.current().is_some());
    }

    #[test]
    fn reconfigure_and_rollback_change_nothing() {
        let script = Script::shared(vec![monitor("m1", "DP-1", 640, 480)]);
        let mut client = FakeClient::new(&script);
        let mut swapchain = TabSwapchain::new(&monitor("m1", "DP-1", 640, 480), &mut client, 2);
        let before = swapchain.options().clone();

        let mut requested = before.clone();
        requested.size = (3840, 2160).into();
        requested.length = 4;
        requested.scanout = true;
        assert!(swapchain.reconfigure(&requested));
        assert_eq!(swapchain.options(), &before);

        let fd = swapchain.current().map(|buffer| buffer.planes()[0].fd().as_raw_fd());
        swapchain.rollback();
        assert_eq!(
            swapchain.current().map(|buffer| buffer.planes()[0].fd().as_raw_fd()),
            fd
        );
        assert!(swapchain.take_current().is_some());
        swapchain.rollback();
        assert!(swapchain.current().is_none());
    }
}
