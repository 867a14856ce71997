// SPDX-License-Identifier: GPL-3.0-only

use crate::input::{InputDevice, InputEvent};
use bitflags::bitflags;
use calloop::channel::Sender;
use tracing::warn;

pub mod tab;

use self::tab::{client::ConnectError, output::OutputId};

/// Notifications the backend hands to the host compositor.
#[derive(Debug)]
pub enum BackendEvent {
    /// The set of pollable sources changed, the host should re-query them.
    PollSourcesChanged,
    /// A new output was discovered.
    NewOutput(OutputId),
    /// An output went away. Its id never resolves again.
    OutputDestroyed(OutputId),
    /// An output committed its pending state.
    OutputCommit(OutputId),
    /// The session presented the last submitted frame of an output.
    OutputPresent { output: OutputId, presented: bool },
    /// A frame target is available, the output wants to be rendered.
    OutputFrame(OutputId),
    /// An input device was discovered. Always emitted before its first event.
    NewDevice(InputDevice),
    Input(InputEvent),
}

/// Receiver of [`BackendEvent`]s, supplied by the host at construction.
pub trait EventSink {
    fn emit(&mut self, event: BackendEvent);
}

/// Collects events for hosts that drain them after every dispatch.
impl EventSink for Vec<BackendEvent> {
    fn emit(&mut self, event: BackendEvent) {
        self.push(event);
    }
}

impl EventSink for Sender<BackendEvent> {
    fn emit(&mut self, event: BackendEvent) {
        if let Err(err) = self.send(event) {
            warn!(event = ?err.0, "Backend event receiver is gone, dropping event");
        }
    }
}

/// Forwards events to a closure.
pub struct FnSink<F>(pub F);

impl<F: FnMut(BackendEvent)> EventSink for FnSink<F> {
    fn emit(&mut self, event: BackendEvent) {
        (self.0)(event)
    }
}

bitflags! {
    /// Optional output features of a backend. The tab session offers none.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u32 {}
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to set up the wake source")]
    WakeSource(#[source] std::io::Error),
    #[error("failed to insert the wake source into the event loop")]
    Register(#[source] calloop::Error),
    #[error(transparent)]
    Connect(#[from] ConnectError),
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("failed to read the wake source")]
    WakeSource(#[source] std::io::Error),
}
