// SPDX-License-Identifier: GPL-3.0-only

use rustix::{
    io::Errno,
    time::{
        timerfd_create, timerfd_settime, Itimerspec, TimerfdClockId, TimerfdFlags,
        TimerfdTimerFlags, Timespec,
    },
};
use std::{
    io,
    os::fd::{AsFd, BorrowedFd, OwnedFd},
    time::Duration,
};

/// Periodic, pollable timer driving the dispatch loop.
#[derive(Debug)]
pub struct WakeSource {
    fd: OwnedFd,
}

impl WakeSource {
    pub fn new(interval: Duration) -> io::Result<WakeSource> {
        let fd = timerfd_create(
            TimerfdClockId::Monotonic,
            TimerfdFlags::NONBLOCK | TimerfdFlags::CLOEXEC,
        )?;
        let period = Timespec {
            tv_sec: interval.as_secs() as _,
            tv_nsec: interval.subsec_nanos() as _,
        };
        timerfd_settime(
            &fd,
            TimerfdTimerFlags::empty(),
            &Itimerspec {
                it_interval: period,
                it_value: period,
            },
        )?;
        Ok(WakeSource { fd })
    }

    /// Acknowledge all pending expirations, returning how many there were.
    pub fn drain(&self) -> io::Result<u64> {
        let mut buf = [0u8; 8];
        match rustix::io::read(&self.fd, &mut buf) {
            Ok(8) => Ok(u64::from_ne_bytes(buf)),
            Ok(len) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("short timerfd read of {} bytes", len),
            )),
            Err(Errno::AGAIN) | Err(Errno::INTR) => Ok(0),
            Err(err) => Err(err.into()),
        }
    }

    pub fn try_clone_fd(&self) -> io::Result<OwnedFd> {
        self.fd.try_clone()
    }
}

impl AsFd for WakeSource {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}
