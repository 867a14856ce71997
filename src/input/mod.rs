// SPDX-License-Identifier: GPL-3.0-only

use crate::backend::{BackendEvent, EventSink};
use smithay::{
    backend::input::Switch,
    utils::{Logical, Point},
};

pub mod translate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Keyboard,
    Pointer,
    Touch,
    Tablet,
    Switch,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Keyboard,
        Capability::Pointer,
        Capability::Touch,
        Capability::Tablet,
        Capability::Switch,
    ];

    pub fn device_name(self) -> &'static str {
        match self {
            Capability::Keyboard => "tab-keyboard",
            Capability::Pointer => "tab-pointer",
            Capability::Touch => "tab-touch",
            Capability::Tablet => "tab-tablet",
            Capability::Switch => "tab-switch",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A virtual input device. Its identity is its capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputDevice {
    capability: Capability,
}

impl InputDevice {
    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn name(&self) -> &'static str {
        self.capability.device_name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub time_ms: u32,
    pub key: u32,
    pub pressed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub time_ms: u32,
    pub button: u32,
    pub pressed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionEvent {
    pub time_ms: u32,
    pub delta: Point<f64, Logical>,
    pub unaccel: Point<f64, Logical>,
}

/// Touch positions are normalized to the output, `0.0..=1.0` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub time_ms: u32,
    pub touch_id: i32,
    pub position: (f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchUpEvent {
    pub time_ms: u32,
    pub touch_id: i32,
}

/// Tablet tool descriptor.
///
/// The session does not identify tools, so a descriptor is synthesized for
/// every tablet event and carries no identity across events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabletTool;

impl TabletTool {
    pub fn name(&self) -> &'static str {
        "tab-tablet-tool"
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabletAxisEvent {
    pub tool: TabletTool,
    pub time_ms: u32,
    pub absolute: (f64, f64),
    pub tilt: (f64, f64),
    pub pressure: f64,
    pub distance: f64,
    pub rotation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabletProximityEvent {
    pub tool: TabletTool,
    pub time_ms: u32,
    pub in_proximity: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabletTipEvent {
    pub tool: TabletTool,
    pub time_ms: u32,
    pub down: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabletButtonEvent {
    pub tool: TabletTool,
    pub time_ms: u32,
    pub button: u32,
    pub pressed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchToggleEvent {
    pub time_ms: u32,
    pub switch: Switch,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(KeyEvent),
    PointerButton(ButtonEvent),
    PointerMotion(MotionEvent),
    /// End of a batch of pointer events.
    PointerFrame,
    TouchDown(TouchEvent),
    TouchUp(TouchUpEvent),
    TouchMotion(TouchEvent),
    /// End of a batch of touch events.
    TouchFrame,
    TabletAxis(TabletAxisEvent),
    TabletProximity(TabletProximityEvent),
    TabletTip(TabletTipEvent),
    TabletButton(TabletButtonEvent),
    SwitchToggle(SwitchToggleEvent),
}

impl InputEvent {
    pub fn capability(&self) -> Capability {
        match self {
            InputEvent::Key(_) => Capability::Keyboard,
            InputEvent::PointerButton(_)
            | InputEvent::PointerMotion(_)
            | InputEvent::PointerFrame => Capability::Pointer,
            InputEvent::TouchDown(_)
            | InputEvent::TouchUp(_)
            | InputEvent::TouchMotion(_)
            | InputEvent::TouchFrame => Capability::Touch,
            InputEvent::TabletAxis(_)
            | InputEvent::TabletProximity(_)
            | InputEvent::TabletTip(_)
            | InputEvent::TabletButton(_) => Capability::Tablet,
            InputEvent::SwitchToggle(_) => Capability::Switch,
        }
    }
}

/// Lazily populated table of the backend's input devices, one slot per capability.
#[derive(Debug, Default)]
pub struct Devices {
    table: [Option<InputDevice>; Capability::ALL.len()],
}

impl Devices {
    pub fn get(&self, capability: Capability) -> Option<&InputDevice> {
        self.table[capability.index()].as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputDevice> {
        self.table.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forward `event` to its device, announcing the device first if this is
    /// the first event of its capability.
    pub fn route(&mut self, event: InputEvent, sink: &mut impl EventSink) {
        let capability = event.capability();
        let slot = &mut self.table[capability.index()];
        if slot.is_none() {
            let device = InputDevice { capability };
            *slot = Some(device);
            sink.emit(BackendEvent::NewDevice(device));
        }
        sink.emit(BackendEvent::Input(event));
    }

    /// Emit a frame event on the device of `capability`, if it exists.
    pub fn frame(&self, capability: Capability, sink: &mut impl EventSink) {
        let event = match capability {
            Capability::Pointer => InputEvent::PointerFrame,
            Capability::Touch => InputEvent::TouchFrame,
            _ => return,
        };
        if self.get(capability).is_some() {
            sink.emit(BackendEvent::Input(event));
        }
    }
}
