// SPDX-License-Identifier: GPL-3.0-only

//! Mapping of raw session input records to [`InputEvent`]s.

use super::{
    ButtonEvent, InputEvent, KeyEvent, MotionEvent, SwitchToggleEvent, TabletAxisEvent,
    TabletButtonEvent, TabletProximityEvent, TabletTipEvent, TabletTool, TouchEvent, TouchUpEvent,
};
use crate::backend::tab::client::{
    RawInputEvent, TabButtonState, TabKeyState, TabProximityState, TabSwitchState, TabSwitchType,
    TabTipState, TouchContact,
};
use smithay::backend::input::Switch;

/// Session timestamps are in microseconds, the compositor works in milliseconds.
pub fn time_ms(time_usec: u64) -> u32 {
    (time_usec / 1000) as u32
}

/// Translate one raw record. Unknown input kinds yield `None`.
pub fn translate(raw: &RawInputEvent) -> Option<InputEvent> {
    let event = match *raw {
        RawInputEvent::Key {
            time_usec,
            key,
            state,
        } => InputEvent::Key(KeyEvent {
            time_ms: time_ms(time_usec),
            key,
            pressed: state == TabKeyState::Pressed,
        }),
        RawInputEvent::PointerButton {
            time_usec,
            button,
            state,
        } => InputEvent::PointerButton(ButtonEvent {
            time_ms: time_ms(time_usec),
            button,
            pressed: state == TabButtonState::Pressed,
        }),
        RawInputEvent::PointerMotion {
            time_usec,
            dx,
            dy,
            unaccel_dx,
            unaccel_dy,
        } => InputEvent::PointerMotion(MotionEvent {
            time_ms: time_ms(time_usec),
            delta: (dx, dy).into(),
            unaccel: (unaccel_dx, unaccel_dy).into(),
        }),
        RawInputEvent::TouchDown { time_usec, contact } => {
            InputEvent::TouchDown(touch(time_usec, contact))
        }
        RawInputEvent::TouchUp {
            time_usec,
            contact_id,
        } => InputEvent::TouchUp(TouchUpEvent {
            time_ms: time_ms(time_usec),
            touch_id: contact_id,
        }),
        RawInputEvent::TouchMotion { time_usec, contact } => {
            InputEvent::TouchMotion(touch(time_usec, contact))
        }
        RawInputEvent::TabletToolAxis { time_usec, axes } => {
            InputEvent::TabletAxis(TabletAxisEvent {
                tool: TabletTool,
                time_ms: time_ms(time_usec),
                absolute: (axes.x, axes.y),
                tilt: (axes.tilt_x, axes.tilt_y),
                pressure: axes.pressure,
                distance: axes.distance,
                rotation: axes.rotation,
            })
        }
        RawInputEvent::TabletToolProximity { time_usec, state } => {
            InputEvent::TabletProximity(TabletProximityEvent {
                tool: TabletTool,
                time_ms: time_ms(time_usec),
                in_proximity: state == TabProximityState::In,
            })
        }
        RawInputEvent::TabletToolTip { time_usec, state } => {
            InputEvent::TabletTip(TabletTipEvent {
                tool: TabletTool,
                time_ms: time_ms(time_usec),
                down: state == TabTipState::Down,
            })
        }
        RawInputEvent::TabletToolButton {
            time_usec,
            button,
            state,
        } => InputEvent::TabletButton(TabletButtonEvent {
            tool: TabletTool,
            time_ms: time_ms(time_usec),
            button,
            pressed: state == TabButtonState::Pressed,
        }),
        RawInputEvent::SwitchToggle {
            time_usec,
            switch_type,
            state,
        } => InputEvent::SwitchToggle(SwitchToggleEvent {
            time_ms: time_ms(time_usec),
            switch: match switch_type {
                TabSwitchType::Lid => Switch::Lid,
                TabSwitchType::TabletMode => Switch::TabletMode,
            },
            enabled: state == TabSwitchState::On,
        }),
        RawInputEvent::Unknown { .. } => return None,
    };
    Some(event)
}

fn touch(time_usec: u64, contact: TouchContact) -> TouchEvent {
    TouchEvent {
        time_ms: time_ms(time_usec),
        touch_id: contact.id,
        position: (contact.x, contact.y),
    }
}
