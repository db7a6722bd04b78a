//! Mode controller: streaming, full-resolution init, field of view,
//! orientation and the capture-mode transitions built on top of them.
//!
//! Every operation fans out over a [`CameraSelector`], stops at the first
//! bus error and does not roll back what was already written.

use crate::engine::{BusWriter, Target};
use crate::error::{Error, Result};
use crate::nightmode::NightModeScheduler;
use crate::regs::{RegisterBatch, RegisterWrite};
use crate::sensors::{Interface, SensorProfile};
use crate::slots::{CameraSelector, ModeProfile, Orientation, SensorVariant, SlotIndex, Slots};
use std::thread;
use std::time::Duration;

/// Settle delays after capture-mode switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTimings {
    pub still_settle: Duration,
    pub draft_settle: Duration,
}

impl Default for ModeTimings {
    fn default() -> Self {
        Self {
            still_settle: Duration::from_millis(800),
            draft_settle: Duration::from_millis(500),
        }
    }
}

/// Mutable per-device sensor state.
#[derive(Debug, Clone)]
pub struct SensorState {
    pub slots: Slots,
    /// Last successfully selected FOV.
    pub current_fov: Option<u16>,
}

impl SensorState {
    pub fn new(slots: Slots) -> Self {
        Self {
            slots,
            current_fov: None,
        }
    }

    fn targets(&self, selector: CameraSelector) -> Vec<Target> {
        self.slots.selected(selector).map(Target::from).collect()
    }
}

pub struct ModeController {
    writer: BusWriter,
    profile: &'static SensorProfile,
    interface: Interface,
    edge_enhancement: bool,
    timings: ModeTimings,
    nightmode: NightModeScheduler,
}

impl ModeController {
    pub fn new(
        writer: BusWriter,
        profile: &'static SensorProfile,
        interface: Interface,
        edge_enhancement: bool,
        timings: ModeTimings,
        nightmode: NightModeScheduler,
    ) -> Self {
        Self {
            writer,
            profile,
            interface,
            edge_enhancement,
            timings,
            nightmode,
        }
    }

    pub fn writer(&self) -> &BusWriter {
        &self.writer
    }

    pub fn profile(&self) -> &'static SensorProfile {
        self.profile
    }

    pub fn nightmode(&self) -> &NightModeScheduler {
        &self.nightmode
    }

    /// Sensor bring-up followed by the default field of view.
    pub fn apply_full_init(&self, state: &mut SensorState, selector: CameraSelector) -> Result<()> {
        self.bring_up(state, selector)?;
        if let Some(fov) = self.profile.default_fov {
            self.select_fov(state, selector, i64::from(fov))?;
        }
        Ok(())
    }

    /// Parallel boards with an interface setup table get that table and
    /// mirror on; everything else gets the full-resolution sequence.
    fn bring_up(&self, state: &mut SensorState, selector: CameraSelector) -> Result<()> {
        match (self.interface, self.profile.parallel_setup) {
            (Interface::Parallel, Some(setup)) => self.setup_parallel(state, selector, setup),
            _ => self.configure_full_resolution(state, selector),
        }
    }

    fn setup_parallel(
        &self,
        state: &mut SensorState,
        selector: CameraSelector,
        setup: &RegisterBatch,
    ) -> Result<()> {
        tracing::info!(?selector, writes = setup.len(), "configuring parallel interface");
        self.writer.write_batch(&state.slots, selector, setup)?;
        let Some(mirror) = self.profile.mirror else {
            return Ok(());
        };
        let writer = &self.writer;
        state.slots.try_for_each(selector, |slot| {
            writer.write_to(Target::from(&*slot), &[mirror.on])?;
            slot.orientation.mirror = !slot.mounted.mirror;
            Ok::<_, Error>(())
        })
    }

    /// Stream off, base init, variant tuning, edge enhancement, default
    /// orientation (MIPI only), stream on.
    pub fn configure_full_resolution(
        &self,
        state: &mut SensorState,
        selector: CameraSelector,
    ) -> Result<()> {
        tracing::info!(?selector, interface = ?self.interface, "configuring full resolution");

        self.set_streaming(&mut state.slots, selector, false)?;

        for (step, init) in self.profile.init_steps(self.interface).iter().enumerate() {
            match &init.poll {
                Some(poll) => self.writer.write_batch_polled(&state.slots, selector, init.batch, poll)?,
                None => {
                    if !init.settle_before.is_zero() && state.slots.selected(selector).next().is_some() {
                        thread::sleep(init.settle_before);
                    }
                    self.writer.write_batch(&state.slots, selector, init.batch)?
                }
            }
            tracing::debug!(step, writes = init.batch.len(), "init step written");
        }

        if let Some(tuning) = self.profile.high_k_tuning {
            for slot in state.slots.selected(selector) {
                if slot.variant == SensorVariant::HighK {
                    tracing::info!(slot = %slot.index, "applying high-K tuning");
                    self.writer.write_to(slot.into(), tuning)?;
                }
            }
        }

        if self.edge_enhancement {
            if let Some(edge) = self.profile.edge_enhancement {
                self.writer
                    .write_batch(&state.slots, selector, std::slice::from_ref(&edge))?;
            }
        }

        let has_orientation = self.profile.flip.is_some() && self.profile.mirror.is_some();
        if self.interface == Interface::Mipi && has_orientation {
            self.set_orientation(state, selector, Orientation::default())?;
        }

        self.set_streaming(&mut state.slots, selector, true)?;
        state.slots.try_for_each(selector, |slot| {
            slot.mode = Some(ModeProfile::FullResolution);
            Ok::<_, Error>(())
        })?;
        Ok(())
    }

    /// Switch to a field-of-view crop. Unknown ids are rejected before
    /// anything is written.
    pub fn select_fov(&self, state: &mut SensorState, selector: CameraSelector, fov: i64) -> Result<()> {
        let Some(profile) = self.profile.fov(fov) else {
            tracing::warn!(fov, supported = ?self.profile.fov_ids(), "unsupported field of view");
            return Err(Error::NotSupported(format!("field of view {fov}")));
        };
        tracing::info!(fov = profile.fov, ?selector, "changing field of view");

        self.set_streaming(&mut state.slots, selector, false)?;
        self.writer.write_batch(&state.slots, selector, profile.batch)?;
        self.set_streaming(&mut state.slots, selector, true)?;

        state.slots.try_for_each(selector, |slot| {
            slot.mode = Some(ModeProfile::Fov(profile.fov));
            Ok::<_, Error>(())
        })?;
        state.current_fov = Some(profile.fov);
        self.nightmode.schedule(state.targets(selector));
        Ok(())
    }

    /// Set both axes. The register values account for how each sensor is
    /// mounted.
    pub fn set_orientation(
        &self,
        state: &mut SensorState,
        selector: CameraSelector,
        requested: Orientation,
    ) -> Result<()> {
        self.update_orientation(state, selector, |_| requested)
    }

    pub fn set_mirror(&self, state: &mut SensorState, selector: CameraSelector, on: bool) -> Result<()> {
        self.update_orientation(state, selector, |o| Orientation { mirror: on, ..o })
    }

    pub fn set_flip(&self, state: &mut SensorState, selector: CameraSelector, on: bool) -> Result<()> {
        self.update_orientation(state, selector, |o| Orientation { flip: on, ..o })
    }

    fn update_orientation(
        &self,
        state: &mut SensorState,
        selector: CameraSelector,
        change: impl Fn(Orientation) -> Orientation,
    ) -> Result<()> {
        let (Some(flip), Some(mirror)) = (self.profile.flip, self.profile.mirror) else {
            return Err(Error::NotSupported(format!("{} has no flip/mirror control", self.profile.family)));
        };
        let writer = &self.writer;
        state.slots.try_for_each(selector, |slot| {
            let requested = change(slot.orientation);
            let effective = requested.effective(slot.mounted);
            writer.write_to(
                Target::from(&*slot),
                &[flip.select(effective.flip), mirror.select(effective.mirror)],
            )?;
            slot.orientation = requested;
            Ok::<_, Error>(())
        })
    }

    /// Full-resolution still capture.
    pub fn set_still_mode(&self, state: &mut SensorState, selector: CameraSelector) -> Result<()> {
        self.configure_full_resolution(state, selector)?;
        thread::sleep(self.timings.still_settle);
        self.nightmode.schedule(state.targets(selector));
        Ok(())
    }

    /// Back to the preview crop last selected.
    pub fn set_draft_mode(&self, state: &mut SensorState, selector: CameraSelector) -> Result<()> {
        let fov = self.restore_fov(state)?;
        self.select_fov(state, selector, i64::from(fov))?;
        thread::sleep(self.timings.draft_settle);
        Ok(())
    }

    /// Bring sensors back after power-up: bring-up, then the last FOV.
    pub fn restore(&self, state: &mut SensorState, selector: CameraSelector) -> Result<()> {
        self.bring_up(state, selector)?;
        if self.profile.fovs.is_empty() {
            return Ok(());
        }
        let fov = self.restore_fov(state)?;
        self.select_fov(state, selector, i64::from(fov))
    }

    fn restore_fov(&self, state: &SensorState) -> Result<u16> {
        state
            .current_fov
            .or(self.profile.default_fov)
            .ok_or_else(|| Error::NotSupported(format!("{} has no FOV profiles", self.profile.family)))
    }

    /// Stream on/off. Families without a stream register only track the flag.
    pub fn set_streaming(&self, slots: &mut Slots, selector: CameraSelector, on: bool) -> Result<()> {
        if let Some(stream) = self.profile.stream {
            self.writer
                .write_batch(slots, selector, &[stream.select(on)])?;
        }
        slots.try_for_each(selector, |slot| {
            slot.streaming = on;
            Ok::<_, Error>(())
        })
    }

    /// Enter or leave standby on one slot. Writes only when the flag changes.
    pub fn set_standby(&self, slots: &mut Slots, index: SlotIndex, active: bool) -> Result<()> {
        let Some(slot) = slots.get_mut(index) else {
            return Err(Error::NotSupported(format!("{index} is not fitted")));
        };
        if slot.active == active {
            return Ok(());
        }
        if let Some(standby) = self.profile.standby {
            self.writer.write_to(Target::from(&*slot), standby.select(active))?;
        }
        slot.active = active;
        tracing::info!(slot = %index, active, "camera active state changed");
        Ok(())
    }

    /// Put every inactive slot back into standby after a full init, which
    /// wakes all sensors.
    pub fn enforce_standby(&self, slots: &Slots) -> Result<()> {
        let Some(standby) = self.profile.standby else {
            return Ok(());
        };
        for slot in slots.selected(slots.all()).filter(|s| !s.active) {
            self.writer.write_to(slot.into(), standby.enter)?;
        }
        Ok(())
    }

    pub fn set_test_pattern(&self, slots: &Slots, selector: CameraSelector, on: bool) -> Result<()> {
        let toggle = self.control(self.profile.test_pattern, "test pattern")?;
        self.writer.write_batch(slots, selector, &[toggle.select(on)])?;
        Ok(())
    }

    pub fn set_autofocus(&self, slots: &Slots, selector: CameraSelector, on: bool) -> Result<()> {
        let toggle = self.control(self.profile.autofocus, "autofocus")?;
        self.writer.write_batch(slots, selector, &[toggle.select(on)])?;
        Ok(())
    }

    /// Manual exposure burst.
    pub fn set_exposure(&self, slots: &Slots, selector: CameraSelector, exposure: u32) -> Result<()> {
        let Some(layout) = self.profile.exposure else {
            return Err(Error::NotSupported(format!("{} has no exposure control", self.profile.family)));
        };
        let writes: [RegisterWrite; 3] = layout.writes(exposure);
        self.writer.write_batch(slots, selector, &writes)?;
        Ok(())
    }

    /// Trigger a single still frame on the first active slot. A no-op on
    /// families that capture stills from the stream.
    pub fn grab_still(&self, slots: &Slots) -> Result<()> {
        let Some(batch) = self.profile.grab_still else {
            return Ok(());
        };
        let slot = [SlotIndex::First, SlotIndex::Second]
            .into_iter()
            .filter_map(|i| slots.get(i))
            .find(|s| s.active)
            .or_else(|| slots.get(SlotIndex::Second));
        match slot {
            Some(slot) => Ok(self.writer.write_to(slot.into(), batch)?),
            None => Ok(()),
        }
    }

    fn control<T>(&self, control: Option<T>, what: &str) -> Result<T> {
        control.ok_or_else(|| Error::NotSupported(format!("{} has no {what}", self.profile.family)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BusError;
    use crate::regs::RegisterAddress;
    use crate::sensors::SensorFamily;
    use crate::testing::{fast_policy, MockBus};

    const NIGHT_DELAY: Duration = Duration::from_millis(10);
    const WAIT: Duration = Duration::from_secs(5);

    fn controller(bus: &MockBus, family: SensorFamily) -> ModeController {
        controller_on(bus, family, Interface::Mipi)
    }

    fn controller_on(bus: &MockBus, family: SensorFamily, interface: Interface) -> ModeController {
        let writer = BusWriter::new(bus.shared(), fast_policy());
        let profile = family.profile();
        let nightmode = match profile.night_mode {
            Some(toggle) => NightModeScheduler::spawn(writer.clone(), toggle, NIGHT_DELAY).unwrap(),
            None => NightModeScheduler::disabled(),
        };
        let timings = ModeTimings {
            still_settle: Duration::ZERO,
            draft_settle: Duration::ZERO,
        };
        ModeController::new(writer, profile, interface, true, timings, nightmode)
    }

    fn state(addresses: &[u8]) -> SensorState {
        SensorState::new(Slots::from_addresses(addresses, Orientation::default()))
    }

    #[test]
    fn test_full_init_skips_absent_second_slot() {
        let bus = MockBus::new();
        let mc = controller(&bus, SensorFamily::Ov5640);
        let mut st = state(&[0x3c, 0]);

        mc.apply_full_init(&mut st, CameraSelector::Both).unwrap();

        assert!(bus.records().iter().all(|r| r.addr == 0x3c));
        assert_eq!(st.current_fov, Some(54));
        assert_eq!(
            st.slots.get(SlotIndex::First).unwrap().mode,
            Some(ModeProfile::Fov(54))
        );
        assert!(mc.nightmode().wait_idle(WAIT));
        assert_eq!(mc.nightmode().runs(), 1);
    }

    #[test]
    fn test_parallel_init_leaves_mirror_on() {
        let bus = MockBus::new();
        let mc = controller_on(&bus, SensorFamily::Ov5640, Interface::Parallel);
        let mut st = state(&[0x3c, 0x3d]);

        mc.apply_full_init(&mut st, CameraSelector::Both).unwrap();

        assert_eq!(bus.writes_to_reg(0x3821), vec![(0x3c, 0x01), (0x3d, 0x01)]);
        assert!(bus.writes_to_reg(0x3820).iter().all(|&(_, v)| v == 0x47));
        let first = st.slots.get(SlotIndex::First).unwrap();
        assert!(first.orientation.mirror);
        assert!(!first.orientation.flip);
        assert_eq!(st.current_fov, Some(54));
    }

    #[test]
    fn test_parallel_restore_skips_full_resolution() {
        let bus = MockBus::new();
        let mc = controller_on(&bus, SensorFamily::Ov5640, Interface::Parallel);
        let mut st = state(&[0x3c]);
        mc.apply_full_init(&mut st, CameraSelector::Both).unwrap();
        bus.clear();

        mc.restore(&mut st, CameraSelector::Both).unwrap();

        // MIPI clock period, only written by the full-resolution init
        assert!(bus.writes_to_reg(0x4837).is_empty());
        assert_eq!(bus.writes_to_reg(0x3821), vec![(0x3c, 0x01)]);
    }

    #[test]
    fn test_back_to_back_fov_changes_toggle_once() {
        let bus = MockBus::new();
        let mc = controller(&bus, SensorFamily::Ov5640);
        let mut st = state(&[0x3c]);

        mc.select_fov(&mut st, CameraSelector::Both, 54).unwrap();
        mc.select_fov(&mut st, CameraSelector::Both, 39).unwrap();

        assert!(mc.nightmode().wait_idle(WAIT));
        assert_eq!(mc.nightmode().runs(), 1);
        assert_eq!(st.current_fov, Some(39));
    }

    #[test]
    fn test_unknown_fov_writes_nothing() {
        let bus = MockBus::new();
        let mc = controller(&bus, SensorFamily::Ov5640);
        let mut st = state(&[0x3c, 0x3d]);
        mc.select_fov(&mut st, CameraSelector::Both, 54).unwrap();
        bus.clear();

        for fov in [0, 40, 55, -54, 1 << 40] {
            let err = mc.select_fov(&mut st, CameraSelector::Both, fov).unwrap_err();
            assert!(matches!(err, Error::NotSupported(_)));
        }

        assert_eq!(bus.transfer_count(), 0);
        assert_eq!(st.current_fov, Some(54));
        assert!(st.slots.selected(CameraSelector::Both).all(|s| s.streaming));
    }

    #[test]
    fn test_fov_batch_is_framed_by_stream_toggle() {
        let bus = MockBus::new();
        let mc = controller(&bus, SensorFamily::Ov5640);
        let mut st = state(&[0x3c]);

        mc.select_fov(&mut st, CameraSelector::First, 28).unwrap();

        let writes = bus.wide_writes();
        assert_eq!(writes.first().unwrap().1, RegisterWrite::wide(0x4202, 0x0f));
        assert_eq!(writes.last().unwrap().1, RegisterWrite::wide(0x4202, 0x00));
        assert_eq!(writes.len(), 75 + 2);
    }

    #[test]
    fn test_orientation_is_idempotent() {
        let bus = MockBus::new();
        let mc = controller(&bus, SensorFamily::Ov5640);
        let mut st = state(&[0x3c]);

        mc.set_orientation(&mut st, CameraSelector::Both, Orientation::default()).unwrap();
        let first = bus.wide_writes();
        let after_first = st.slots.get(SlotIndex::First).unwrap().orientation;
        bus.clear();
        mc.set_orientation(&mut st, CameraSelector::Both, Orientation::default()).unwrap();

        assert_eq!(bus.wide_writes(), first);
        assert_eq!(
            first.iter().map(|(_, w)| *w).collect::<Vec<_>>(),
            vec![RegisterWrite::wide(0x3820, 0x40), RegisterWrite::wide(0x3821, 0x07)]
        );
        assert_eq!(st.slots.get(SlotIndex::First).unwrap().orientation, after_first);
    }

    #[test]
    fn test_orientation_compensates_mounting() {
        let bus = MockBus::new();
        let mc = controller(&bus, SensorFamily::Ov5640);
        let mut st = SensorState::new(Slots::from_addresses(&[0x3c], Orientation::UPSIDE_DOWN));

        mc.set_orientation(&mut st, CameraSelector::First, Orientation::default()).unwrap();
        assert_eq!(bus.writes_to_reg(0x3820), vec![(0x3c, 0x46)]);
        assert_eq!(bus.writes_to_reg(0x3821), vec![(0x3c, 0x01)]);

        bus.clear();
        mc.set_mirror(&mut st, CameraSelector::First, true).unwrap();
        assert_eq!(bus.writes_to_reg(0x3820), vec![(0x3c, 0x46)]);
        assert_eq!(bus.writes_to_reg(0x3821), vec![(0x3c, 0x07)]);
        assert!(st.slots.get(SlotIndex::First).unwrap().orientation.mirror);
    }

    #[test]
    fn test_high_k_tuning_only_on_high_k_slot() {
        let bus = MockBus::new();
        let mc = controller(&bus, SensorFamily::Ov5640);
        let mut st = state(&[0x3c, 0x3d]);
        st.slots.get_mut(SlotIndex::First).unwrap().variant = SensorVariant::HighK;
        st.slots.get_mut(SlotIndex::Second).unwrap().variant = SensorVariant::Standard;

        mc.configure_full_resolution(&mut st, CameraSelector::Both).unwrap();

        let tuning = SensorFamily::Ov5640.profile().high_k_tuning.unwrap();
        let marker = match tuning[0].addr {
            RegisterAddress::Wide(a) => a,
            RegisterAddress::Narrow(_) => unreachable!(),
        };
        let writes = bus.writes_to_reg(marker);
        let to = |addr: u8| writes.iter().filter(|(a, _)| *a == addr).count();
        assert_eq!(to(0x3c), to(0x3d) + 1);
    }

    #[test]
    fn test_full_resolution_sequence() {
        let bus = MockBus::new();
        let mc = controller(&bus, SensorFamily::Ov5640);
        let mut st = state(&[0x3c]);

        mc.configure_full_resolution(&mut st, CameraSelector::First).unwrap();

        let writes: Vec<RegisterWrite> = bus.wide_writes().into_iter().map(|(_, w)| w).collect();
        let n = writes.len();
        assert_eq!(writes[0], RegisterWrite::wide(0x4202, 0x0f));
        assert_eq!(writes[n - 4], RegisterWrite::wide(0x5302, 0x24));
        assert_eq!(writes[n - 3], RegisterWrite::wide(0x3820, 0x40));
        assert_eq!(writes[n - 2], RegisterWrite::wide(0x3821, 0x07));
        assert_eq!(writes[n - 1], RegisterWrite::wide(0x4202, 0x00));
        // stream off + MIPI init + edge + flip + mirror + stream on
        assert_eq!(n, 1 + 252 + 1 + 2 + 1);
        let slot = st.slots.get(SlotIndex::First).unwrap();
        assert_eq!(slot.mode, Some(ModeProfile::FullResolution));
        assert!(slot.streaming);
    }

    #[test]
    fn test_bus_failure_propagates() {
        let bus = MockBus::new();
        bus.fail_always();
        let mc = controller(&bus, SensorFamily::Ov5640);
        let mut st = state(&[0x3c]);

        let err = mc.apply_full_init(&mut st, CameraSelector::Both).unwrap_err();

        assert!(matches!(err, Error::Bus(BusError::TooManyFailures { index: 0, .. })));
        assert_eq!(st.slots.get(SlotIndex::First).unwrap().mode, None);
        assert_eq!(mc.nightmode().runs(), 0);
        assert!(!mc.nightmode().is_pending());
    }

    #[test]
    fn test_still_then_draft_restores_fov() {
        let bus = MockBus::new();
        let mc = controller(&bus, SensorFamily::Ov5640);
        let mut st = state(&[0x3c]);
        mc.select_fov(&mut st, CameraSelector::First, 39).unwrap();

        mc.set_still_mode(&mut st, CameraSelector::First).unwrap();
        assert_eq!(
            st.slots.get(SlotIndex::First).unwrap().mode,
            Some(ModeProfile::FullResolution)
        );

        mc.set_draft_mode(&mut st, CameraSelector::First).unwrap();
        assert_eq!(st.slots.get(SlotIndex::First).unwrap().mode, Some(ModeProfile::Fov(39)));
    }

    #[test]
    fn test_exposure_burst() {
        let bus = MockBus::new();
        let mc = controller(&bus, SensorFamily::Ov5640);
        let st = state(&[0x3c, 0x3d]);

        mc.set_exposure(&st.slots, CameraSelector::Both, 0x2000).unwrap();

        let regs: Vec<(u8, RegisterWrite)> = bus.wide_writes();
        assert_eq!(regs.len(), 6);
        assert_eq!(regs[1], (0x3c, RegisterWrite::wide(0x3501, 0x20)));
        assert_eq!(regs[4], (0x3d, RegisterWrite::wide(0x3501, 0x20)));
    }

    #[test]
    fn test_ov7740_standby_writes_on_change_only() {
        let bus = MockBus::new();
        let mc = controller(&bus, SensorFamily::Ov7740);
        let mut st = state(&[0x21]);

        mc.set_standby(&mut st.slots, SlotIndex::First, true).unwrap();
        assert_eq!(bus.transfer_count(), 0);

        mc.set_standby(&mut st.slots, SlotIndex::First, false).unwrap();
        assert_eq!(bus.narrow_writes(), vec![(0x21, RegisterWrite::narrow(0x0e, 0xe8))]);
        assert!(!st.slots.get(SlotIndex::First).unwrap().active);

        assert!(matches!(
            mc.set_standby(&mut st.slots, SlotIndex::Second, true),
            Err(Error::NotSupported(_))
        ));
    }

    #[test]
    fn test_ov7740_has_no_orientation() {
        let bus = MockBus::new();
        let mc = controller(&bus, SensorFamily::Ov7740);
        let mut st = state(&[0x21]);
        assert!(matches!(
            mc.set_flip(&mut st, CameraSelector::Both, true),
            Err(Error::NotSupported(_))
        ));
        assert!(matches!(
            mc.set_test_pattern(&st.slots, CameraSelector::Both, true),
            Err(Error::NotSupported(_))
        ));
    }

    #[test]
    fn test_ov7740_init_is_narrow_and_unframed() {
        let bus = MockBus::new();
        let mc = controller(&bus, SensorFamily::Ov7740);
        let mut st = state(&[0x21]);

        mc.apply_full_init(&mut st, CameraSelector::Both).unwrap();

        assert_eq!(bus.narrow_writes().len(), 166);
        assert!(bus.wide_writes().is_empty());
        assert_eq!(st.current_fov, None);
    }

    #[test]
    fn test_mt9p111_grab_targets_first_active_slot() {
        let bus = MockBus::new();
        let mc = controller(&bus, SensorFamily::Mt9p111);
        let mut st = state(&[0x3c, 0x3d]);
        mc.set_standby(&mut st.slots, SlotIndex::First, false).unwrap();
        bus.clear();

        mc.grab_still(&st.slots).unwrap();

        assert!(bus.records().iter().all(|r| r.addr == 0x3d));
        assert_eq!(bus.writes_to_reg(0x8404), vec![(0x3d, 0x02)]);
    }

    #[test]
    fn test_grab_still_noop_without_table() {
        let bus = MockBus::new();
        let mc = controller(&bus, SensorFamily::Ov5640);
        let st = state(&[0x3c]);
        mc.grab_still(&st.slots).unwrap();
        assert_eq!(bus.transfer_count(), 0);
    }
}
