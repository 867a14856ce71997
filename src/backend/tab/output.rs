// SPDX-License-Identifier: GPL-3.0-only

use super::{client::MonitorInfo, swapchain::TabSwapchain};
use bitflags::bitflags;
use smithay::{
    output::Mode,
    utils::{Physical, Rectangle, Size},
};

/// Stable handle of an output.
///
/// Ids are never reused, so a handle to a destroyed output resolves to nothing
/// instead of aliasing a newer output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputId(pub(super) u64);

bitflags! {
    /// Fields of the pending state touched since the last commit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Committed: u32 {
        const ENABLED = 1 << 0;
        const BUFFER = 1 << 1;
        const DAMAGE = 1 << 2;
    }
}

#[derive(Debug)]
pub struct OutputState {
    enabled: bool,
    pending_enabled: bool,
    damage: Vec<Rectangle<i32, Physical>>,
    committed: Committed,
}

impl Default for OutputState {
    fn default() -> Self {
        OutputState {
            enabled: true,
            pending_enabled: true,
            damage: Vec::new(),
            committed: Committed::empty(),
        }
    }
}

impl OutputState {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn committed(&self) -> Committed {
        self.committed
    }

    pub fn damage(&self) -> &[Rectangle<i32, Physical>] {
        &self.damage
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.pending_enabled = enabled;
        self.committed |= Committed::ENABLED;
    }

    /// Mark the current frame target as rendered to.
    pub fn attach_buffer(&mut self) {
        self.committed |= Committed::BUFFER;
    }

    pub fn add_damage(&mut self, damage: Rectangle<i32, Physical>) {
        self.damage.push(damage);
        self.committed |= Committed::DAMAGE;
    }

    fn on_commit(&mut self) {
        if self.committed.contains(Committed::ENABLED) {
            self.enabled = self.pending_enabled;
        }
        self.damage.clear();
        self.committed = Committed::empty();
    }
}

/// A monitor of the session, exposed as an output of the host.
#[derive(Debug)]
pub struct TabOutput {
    id: OutputId,
    monitor_id: String,
    name: String,
    physical_size: Size<i32, Physical>,
    mode: Mode,
    pub(super) needs_frame: bool,
    state: OutputState,
    pub(super) swapchain: TabSwapchain,
}

impl TabOutput {
    pub(super) fn new(
        id: OutputId,
        monitor: &MonitorInfo,
        swapchain: TabSwapchain,
        refresh_mhz: i32,
    ) -> TabOutput {
        let size = Size::from((monitor.width, monitor.height));
        TabOutput {
            id,
            monitor_id: monitor.id.clone(),
            name: monitor.name.clone(),
            physical_size: size,
            mode: Mode {
                size,
                refresh: refresh_mhz,
            },
            needs_frame: false,
            state: OutputState::default(),
            swapchain,
        }
    }

    pub fn id(&self) -> OutputId {
        self.id
    }

    pub fn monitor_id(&self) -> &str {
        &self.monitor_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn physical_size(&self) -> Size<i32, Physical> {
        self.physical_size
    }

    /// The single, preferred mode of this output.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn needs_frame(&self) -> bool {
        self.needs_frame
    }

    pub fn schedule_frame(&mut self) {
        self.needs_frame = true;
    }

    pub fn state(&self) -> &OutputState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut OutputState {
        &mut self.state
    }

    pub fn swapchain(&self) -> &TabSwapchain {
        &self.swapchain
    }

    pub fn swapchain_mut(&mut self) -> &mut TabSwapchain {
        &mut self.swapchain
    }

    /// There are no mode or format constraints to validate against.
    pub fn test(&self) -> bool {
        true
    }

    pub(super) fn apply_pending(&mut self) {
        self.state.on_commit();
        self.needs_frame = false;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn commit_applies_pending_state() {
        let mut state = OutputState::default();
        state.set_enabled(false);
        state.attach_buffer();
        state.add_damage(Rectangle::from_size((10, 10).into()));
        assert!(state.enabled());
        assert_eq!(state.committed(), Committed::all());
        assert_eq!(state.damage().len(), 1);

        state.on_commit();
        assert!(!state.enabled());
        assert!(state.committed().is_empty());
        assert!(state.damage().is_empty());

        // untouched fields keep their value
        state.attach_buffer();
        state.on_commit();
        assert!(!state.enabled());
    }
}
