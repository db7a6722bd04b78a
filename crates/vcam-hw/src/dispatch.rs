//! Control-request dispatcher.
//!
//! A request is a command code plus a fixed-size little-endian payload.
//! Every request runs under the device lock and always yields a status code;
//! errors never escape as anything else.

use crate::boards::BoardFile;
use crate::bus::{LinuxI2c, SharedBus};
use crate::engine::{BusWriter, RetryPolicy};
use crate::error::{Error, Result};
use crate::mode::{ModeController, ModeTimings, SensorState};
use crate::nightmode::{NightModeScheduler, DEFAULT_DELAY};
use crate::otp;
use crate::platform::{sequence_power, NoTorch, NullPower, PowerControl, SysfsLedTorch, TorchControl};
use crate::sensors::{Interface, SensorFamily};
use crate::slots::{CameraSelector, CameraSlot, SlotIndex, Slots};
use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Exposure written when the torch is switched on, to keep the image from
/// saturating.
const TORCH_EXPOSURE: u32 = 0x2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Command {
    Init = 1,
    GetTest = 2,
    SetTest = 3,
    GetActive = 4,
    SetActive = 5,
    SetSecondActive = 6,
    GetFlash = 7,
    SetFlash = 8,
    SetCamMode = 9,
    SetFov = 10,
    GetFov = 11,
    MirrorOn = 12,
    MirrorOff = 13,
    FlipOn = 14,
    FlipOff = 15,
    GetCamModel = 16,
    Suspend = 17,
    Resume = 18,
    GrabStill = 19,
}

impl Command {
    pub const ALL: [Command; 19] = [
        Self::Init,
        Self::GetTest,
        Self::SetTest,
        Self::GetActive,
        Self::SetActive,
        Self::SetSecondActive,
        Self::GetFlash,
        Self::SetFlash,
        Self::SetCamMode,
        Self::SetFov,
        Self::GetFov,
        Self::MirrorOn,
        Self::MirrorOff,
        Self::FlipOn,
        Self::FlipOff,
        Self::GetCamModel,
        Self::Suspend,
        Self::Resume,
        Self::GrabStill,
    ];

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

/// Status codes returned for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u32)]
pub enum Status {
    Success = 0,
    NotSupported = 50,
    InvalidParameter = 87,
    BusFailure = 1117,
}

impl Status {
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl From<&Error> for Status {
    fn from(e: &Error) -> Self {
        match e {
            Error::InvalidParameter(_) => Status::InvalidParameter,
            Error::NotSupported(_) => Status::NotSupported,
            Error::Bus(_)
            | Error::VariantDetect { .. }
            | Error::Open(_)
            | Error::Platform(_)
            | Error::Spawn(_) => Status::BusFailure,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?} ({})", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub output: Vec<u8>,
}

impl Response {
    fn ok(output: Vec<u8>) -> Self {
        Self {
            status: Status::Success,
            output,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Still,
    Draft,
    Undefined,
    Reset,
}

impl CaptureMode {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Still),
            1 => Some(Self::Draft),
            2 => Some(Self::Undefined),
            3 => Some(Self::Reset),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlashState {
    pub flash_on: bool,
    pub torch_on: bool,
}

/// Device-level settings that do not come from the board profile.
#[derive(Debug, Clone, Copy)]
pub struct DeviceConfig {
    pub retry: RetryPolicy,
    pub nightmode_enabled: bool,
    pub nightmode_delay: Duration,
    pub timings: ModeTimings,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            nightmode_enabled: true,
            nightmode_delay: DEFAULT_DELAY,
            timings: ModeTimings::default(),
        }
    }
}

struct DeviceState {
    sensor: SensorState,
    test_mode: bool,
    /// Variant detection has run (it runs once per device lifetime).
    detected: bool,
    initialized: bool,
    powered: bool,
    torch: Box<dyn TorchControl>,
    power: Box<dyn PowerControl>,
}

/// Snapshot for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceStatus {
    pub board: String,
    pub family: SensorFamily,
    pub interface: Interface,
    pub model_code: u32,
    pub initialized: bool,
    pub powered: bool,
    pub test_mode: bool,
    pub current_fov: Option<u16>,
    pub supported_fovs: Vec<u16>,
    pub slots: Vec<CameraSlot>,
    pub nightmode_enabled: bool,
    pub nightmode_pending: bool,
    pub nightmode_runs: u64,
}

/// One camera device: board, sensor profile, mode controller and the lock
/// that serializes every request.
pub struct ControlDevice {
    board: BoardFile,
    mode: ModeController,
    state: Mutex<DeviceState>,
}

impl ControlDevice {
    pub fn new(
        bus: SharedBus,
        board: BoardFile,
        config: DeviceConfig,
        torch: Box<dyn TorchControl>,
        power: Box<dyn PowerControl>,
    ) -> Result<Self> {
        let family = board.sensor.family;
        let profile = family.profile();
        let policy = RetryPolicy {
            budget: profile.retry_budget.unwrap_or(config.retry.budget),
            ..config.retry
        };
        let writer = BusWriter::new(bus, policy);

        let nightmode = match profile.night_mode {
            Some(toggle) if config.nightmode_enabled => {
                NightModeScheduler::spawn(writer.clone(), toggle, config.nightmode_delay)
                    .map_err(Error::Spawn)?
            }
            _ => NightModeScheduler::disabled(),
        };

        let mut slots = Slots::from_addresses(&board.sensor.addresses, board.sensor.mounted.into());
        if let Some(second) = slots.get_mut(SlotIndex::Second) {
            second.active = profile.second_slot_active;
        }
        let mode = ModeController::new(
            writer,
            profile,
            board.sensor.interface,
            board.sensor.edge_enhancement,
            config.timings,
            nightmode,
        );
        tracing::info!(
            board = %board.board.name,
            %family,
            addresses = ?board.sensor.addresses,
            budget = policy.budget,
            "camera device created"
        );

        Ok(Self {
            board,
            mode,
            state: Mutex::new(DeviceState {
                sensor: SensorState::new(slots),
                test_mode: false,
                detected: false,
                initialized: false,
                powered: true,
                torch,
                power,
            }),
        })
    }

    /// Open the board's bus adapter and torch LED.
    pub fn open(board: BoardFile, config: DeviceConfig) -> Result<Self> {
        let bus = LinuxI2c::open(board.sensor.adapter)?;
        let torch: Box<dyn TorchControl> = match &board.torch {
            Some(t) => Box::new(SysfsLedTorch::new(&t.led)),
            None => Box::new(NoTorch),
        };
        Self::new(SharedBus::new(bus), board, config, torch, Box::new(NullPower))
    }

    pub fn board(&self) -> &BoardFile {
        &self.board
    }

    pub fn family(&self) -> SensorFamily {
        self.board.sensor.family
    }

    fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn all(state: &DeviceState) -> CameraSelector {
        state.sensor.slots.all()
    }

    /// Decode and run one request.
    pub fn dispatch(&self, code: u32, input: &[u8]) -> Response {
        let Some(command) = Command::from_code(code) else {
            tracing::warn!(code, "unsupported control code");
            return Response {
                status: Status::NotSupported,
                output: Vec::new(),
            };
        };

        match self.run(command, input) {
            Ok(output) => Response::ok(output),
            Err(e) => {
                let status = Status::from(&e);
                tracing::error!(?command, %status, error = %e, "control request failed");
                Response {
                    status,
                    output: Vec::new(),
                }
            }
        }
    }

    fn run(&self, command: Command, input: &[u8]) -> Result<Vec<u8>> {
        use Command::*;
        match command {
            Init => empty(input).and_then(|()| self.init()).map(|()| Vec::new()),
            GetTest => empty(input).map(|()| encode_bool(self.get_test())),
            SetTest => self.set_test(decode_bool(input)?).map(|()| Vec::new()),
            GetActive => empty(input).map(|()| encode_bool(self.get_active())),
            SetActive => self
                .set_active(SlotIndex::First, decode_bool(input)?)
                .map(|()| Vec::new()),
            SetSecondActive => self
                .set_active(SlotIndex::Second, decode_bool(input)?)
                .map(|()| Vec::new()),
            GetFlash => {
                empty(input)?;
                let flash = self.get_flash();
                Ok([encode_bool(flash.flash_on), encode_bool(flash.torch_on)].concat())
            }
            SetFlash => {
                let [flash_on, torch_on] = decode_words::<2>(input)?;
                self.set_flash(FlashState {
                    flash_on: flash_on != 0,
                    torch_on: torch_on != 0,
                })
                .map(|()| Vec::new())
            }
            SetCamMode => {
                let [code] = decode_words::<1>(input)?;
                let mode = CaptureMode::from_code(code)
                    .ok_or_else(|| Error::InvalidParameter(format!("capture mode {code}")))?;
                self.set_cam_mode(mode).map(|()| Vec::new())
            }
            SetFov => {
                let [raw] = decode_words::<1>(input)?;
                self.set_fov(raw as i32).map(|()| Vec::new())
            }
            GetFov => {
                empty(input)?;
                self.get_fov().map(|fov| fov.to_le_bytes().to_vec())
            }
            MirrorOn | MirrorOff => {
                empty(input)?;
                self.set_mirror(command == MirrorOn).map(|()| Vec::new())
            }
            FlipOn | FlipOff => {
                empty(input)?;
                self.set_flip(command == FlipOn).map(|()| Vec::new())
            }
            GetCamModel => empty(input).map(|()| self.family().model_code().to_le_bytes().to_vec()),
            Suspend => empty(input).and_then(|()| self.suspend()).map(|()| Vec::new()),
            Resume => empty(input).and_then(|()| self.resume()).map(|()| Vec::new()),
            GrabStill => empty(input).and_then(|()| self.grab_still()).map(|()| Vec::new()),
        }
    }

    /// Detect sensor variants (first call only), then run the full init.
    pub fn init(&self) -> Result<()> {
        let mut state = self.lock();
        let all = Self::all(&state);
        if !state.detected {
            state.detected = true;
            if let Err(e) = otp::detect(self.mode.writer(), self.mode.profile(), &mut state.sensor.slots, all) {
                tracing::warn!(error = %e, "variant detection failed; continuing with init");
            }
        }
        self.mode.apply_full_init(&mut state.sensor, all)?;
        self.mode.enforce_standby(&state.sensor.slots)?;
        state.initialized = true;
        Ok(())
    }

    pub fn get_test(&self) -> bool {
        self.lock().test_mode
    }

    pub fn set_test(&self, on: bool) -> Result<()> {
        self.lock().test_mode = on;
        Ok(())
    }

    /// Any fitted camera out of standby.
    pub fn get_active(&self) -> bool {
        let state = self.lock();
        let all = Self::all(&state);
        let active = state.sensor.slots.selected(all).any(|s| s.active);
        active
    }

    pub fn set_active(&self, index: SlotIndex, active: bool) -> Result<()> {
        if index == SlotIndex::Second && !self.board.is_dual() {
            return Err(Error::NotSupported(format!(
                "board {} has a single camera",
                self.board.board.name
            )));
        }
        let mut state = self.lock();
        self.mode.set_standby(&mut state.sensor.slots, index, active)
    }

    /// Torch state as reported by the board. A missing LED reads as off.
    pub fn get_flash(&self) -> FlashState {
        let state = self.lock();
        let torch_on = state.torch.torch_state().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "torch state unavailable");
            false
        });
        FlashState {
            flash_on: false,
            torch_on,
        }
    }

    /// Drive the torch; switching it on also shortens the exposure.
    pub fn set_flash(&self, flash: FlashState) -> Result<()> {
        let mut state = self.lock();
        if let Err(e) = state.torch.set_torch_state(flash.torch_on) {
            tracing::warn!(error = %e, "torch unavailable");
        }
        if flash.torch_on && self.mode.profile().exposure.is_some() {
            let all = Self::all(&state);
            self.mode.set_exposure(&state.sensor.slots, all, TORCH_EXPOSURE)?;
        }
        Ok(())
    }

    pub fn set_cam_mode(&self, mode: CaptureMode) -> Result<()> {
        if self.mode.profile().fovs.is_empty() {
            return Err(Error::NotSupported(format!("{} has no capture modes", self.family())));
        }
        let mut state = self.lock();
        let all = Self::all(&state);
        match mode {
            CaptureMode::Still => self.mode.set_still_mode(&mut state.sensor, all),
            CaptureMode::Draft => self.mode.set_draft_mode(&mut state.sensor, all),
            CaptureMode::Undefined | CaptureMode::Reset => {
                Err(Error::InvalidParameter(format!("capture mode {mode:?}")))
            }
        }
    }

    pub fn set_fov(&self, fov: i32) -> Result<()> {
        let mut state = self.lock();
        let all = Self::all(&state);
        self.mode.select_fov(&mut state.sensor, all, i64::from(fov))
    }

    /// Current field of view; before the first change this is the default.
    pub fn get_fov(&self) -> Result<i32> {
        let state = self.lock();
        state
            .sensor
            .current_fov
            .or(self.mode.profile().default_fov)
            .map(i32::from)
            .ok_or_else(|| Error::NotSupported(format!("{} has no FOV profiles", self.family())))
    }

    pub fn set_mirror(&self, on: bool) -> Result<()> {
        let mut state = self.lock();
        let all = Self::all(&state);
        self.mode.set_mirror(&mut state.sensor, all, on)
    }

    pub fn set_flip(&self, on: bool) -> Result<()> {
        let mut state = self.lock();
        let all = Self::all(&state);
        self.mode.set_flip(&mut state.sensor, all, on)
    }

    pub fn set_test_pattern(&self, on: bool) -> Result<()> {
        let state = self.lock();
        self.mode
            .set_test_pattern(&state.sensor.slots, CameraSelector::First, on)
    }

    pub fn set_autofocus(&self, on: bool) -> Result<()> {
        let state = self.lock();
        let all = Self::all(&state);
        self.mode.set_autofocus(&state.sensor.slots, all, on)
    }

    pub fn suspend(&self) -> Result<()> {
        let mut state = self.lock();
        let all = Self::all(&state);
        sequence_power(state.power.as_mut(), false)?;
        state.powered = false;
        state.sensor.slots.try_for_each(all, |slot| {
            slot.streaming = false;
            Ok::<_, Error>(())
        })
    }

    /// Power up and bring the sensors back to their last mode.
    pub fn resume(&self) -> Result<()> {
        let mut state = self.lock();
        let all = Self::all(&state);
        sequence_power(state.power.as_mut(), true)?;
        state.powered = true;
        if state.initialized {
            self.mode.restore(&mut state.sensor, all)?;
            self.mode.enforce_standby(&state.sensor.slots)?;
        }
        Ok(())
    }

    pub fn grab_still(&self) -> Result<()> {
        let state = self.lock();
        self.mode.grab_still(&state.sensor.slots)
    }

    pub fn status(&self) -> DeviceStatus {
        let state = self.lock();
        let all = Self::all(&state);
        let profile = self.mode.profile();
        let nightmode = self.mode.nightmode();
        DeviceStatus {
            board: self.board.board.name.clone(),
            family: profile.family,
            interface: self.board.sensor.interface,
            model_code: profile.family.model_code(),
            initialized: state.initialized,
            powered: state.powered,
            test_mode: state.test_mode,
            current_fov: state.sensor.current_fov,
            supported_fovs: profile.fov_ids(),
            slots: state.sensor.slots.selected(all).cloned().collect(),
            nightmode_enabled: nightmode.is_enabled(),
            nightmode_pending: nightmode.is_pending(),
            nightmode_runs: nightmode.runs(),
        }
    }

    /// Night-mode scheduler, for diagnostics and tests.
    pub fn nightmode(&self) -> &NightModeScheduler {
        self.mode.nightmode()
    }
}

fn empty(input: &[u8]) -> Result<()> {
    if input.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "expected no payload, got {} bytes",
            input.len()
        )))
    }
}

fn decode_words<const N: usize>(input: &[u8]) -> Result<[u32; N]> {
    if input.len() != N * 4 {
        return Err(Error::InvalidParameter(format!(
            "expected {} bytes, got {}",
            N * 4,
            input.len()
        )));
    }
    let mut words = [0u32; N];
    for (word, chunk) in words.iter_mut().zip(input.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Ok(words)
}

fn decode_bool(input: &[u8]) -> Result<bool> {
    let [v] = decode_words::<1>(input)?;
    Ok(v != 0)
}

fn encode_bool(v: bool) -> Vec<u8> {
    u32::from(v).to_le_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boards::lookup_board;
    use crate::platform::PlatformError;
    use crate::regs::RegisterAddress;
    use crate::testing::{fast_policy, MockBus};
    use std::sync::{Arc, Mutex as StdMutex};

    const WAIT: Duration = Duration::from_secs(5);

    #[derive(Clone, Default)]
    struct FakeTorch(Arc<StdMutex<bool>>);

    impl TorchControl for FakeTorch {
        fn torch_state(&self) -> Result<bool, PlatformError> {
            Ok(*self.0.lock().unwrap())
        }
        fn set_torch_state(&mut self, on: bool) -> Result<(), PlatformError> {
            *self.0.lock().unwrap() = on;
            Ok(())
        }
    }

    fn config() -> DeviceConfig {
        DeviceConfig {
            retry: fast_policy(),
            nightmode_enabled: true,
            nightmode_delay: Duration::from_millis(10),
            timings: ModeTimings {
                still_settle: Duration::ZERO,
                draft_settle: Duration::ZERO,
            },
        }
    }

    fn device_with(bus: &MockBus, board: &str, torch: Box<dyn TorchControl>) -> ControlDevice {
        let board = lookup_board(board).unwrap().clone();
        ControlDevice::new(bus.shared(), board, config(), torch, Box::new(NullPower)).unwrap()
    }

    fn device(bus: &MockBus, board: &str) -> ControlDevice {
        device_with(bus, board, Box::new(NoTorch))
    }

    fn word(v: u32) -> Vec<u8> {
        v.to_le_bytes().to_vec()
    }

    fn otp_reads(bus: &MockBus) -> usize {
        bus.records()
            .iter()
            .filter(|r| matches!(&r.op, crate::testing::Op::Write(b) if b.as_slice() == [0x3d, 0x05]))
            .count()
    }

    #[test]
    fn test_command_codes_round_trip() {
        for c in Command::ALL {
            assert_eq!(Command::from_code(c.code()), Some(c));
        }
        assert_eq!(Command::GrabStill.code(), 19);
        assert_eq!(Command::from_code(0), None);
        assert_eq!(Command::from_code(20), None);
    }

    #[test]
    fn test_unknown_code_is_not_supported() {
        let bus = MockBus::new();
        let dev = device(&bus, "eoco");
        assert_eq!(dev.dispatch(99, &[]).status, Status::NotSupported);
        assert_eq!(bus.transfer_count(), 0);
    }

    #[test]
    fn test_wrong_payload_size() {
        let bus = MockBus::new();
        let dev = device(&bus, "eoco");
        assert_eq!(dev.dispatch(Command::SetFov.code(), &[54, 0]).status, Status::InvalidParameter);
        assert_eq!(dev.dispatch(Command::GetFov.code(), &[0]).status, Status::InvalidParameter);
        assert_eq!(dev.dispatch(Command::SetFlash.code(), &word(1)).status, Status::InvalidParameter);
        assert_eq!(dev.dispatch(Command::Init.code(), &word(1)).status, Status::InvalidParameter);
        assert_eq!(bus.transfer_count(), 0);
    }

    #[test]
    fn test_init_detects_once_and_selects_default_fov() {
        let bus = MockBus::new();
        bus.load_block(0x3c, RegisterAddress::Wide(0x3d05), b"OV5640-A71A-K_45039C15");
        let dev = device(&bus, "eoco");

        assert_eq!(dev.dispatch(Command::Init.code(), &[]).status, Status::Success);
        assert_eq!(otp_reads(&bus), 1);
        let status = dev.status();
        assert!(status.initialized);
        assert_eq!(status.slots[0].variant, crate::slots::SensorVariant::HighK);

        let resp = dev.dispatch(Command::GetFov.code(), &[]);
        assert_eq!(resp, Response::ok(word(54)));

        assert_eq!(dev.dispatch(Command::Init.code(), &[]).status, Status::Success);
        assert_eq!(otp_reads(&bus), 1);
        assert!(dev.nightmode().wait_idle(WAIT));
    }

    #[test]
    fn test_get_fov_defaults_before_init() {
        let bus = MockBus::new();
        let dev = device(&bus, "eoco");
        assert_eq!(dev.dispatch(Command::GetFov.code(), &[]), Response::ok(word(54)));
    }

    #[test]
    fn test_set_fov() {
        let bus = MockBus::new();
        let dev = device(&bus, "eoco");
        assert_eq!(dev.dispatch(Command::SetFov.code(), &word(40)).status, Status::NotSupported);
        assert_eq!(dev.dispatch(Command::SetFov.code(), &(-39i32).to_le_bytes()).status, Status::NotSupported);
        assert_eq!(bus.transfer_count(), 0);

        assert_eq!(dev.dispatch(Command::SetFov.code(), &word(39)).status, Status::Success);
        assert_eq!(dev.dispatch(Command::GetFov.code(), &[]), Response::ok(word(39)));
        assert!(dev.nightmode().wait_idle(WAIT));
        assert_eq!(dev.status().nightmode_runs, 1);
    }

    #[test]
    fn test_cam_mode_validation() {
        let bus = MockBus::new();
        let dev = device(&bus, "eoco");
        for mode in [2, 3, 7] {
            assert_eq!(
                dev.dispatch(Command::SetCamMode.code(), &word(mode)).status,
                Status::InvalidParameter
            );
        }
        assert_eq!(bus.transfer_count(), 0);
        assert_eq!(dev.dispatch(Command::SetCamMode.code(), &word(0)).status, Status::Success);
        assert_eq!(dev.dispatch(Command::SetCamMode.code(), &word(1)).status, Status::Success);
        assert!(dev.nightmode().wait_idle(WAIT));
    }

    #[test]
    fn test_second_active_needs_dual_board() {
        let bus = MockBus::new();
        let single = device(&bus, "eoco");
        assert_eq!(
            single.dispatch(Command::SetSecondActive.code(), &word(1)).status,
            Status::NotSupported
        );
        let dual = device(&bus, "roco");
        assert_eq!(dual.dispatch(Command::SetSecondActive.code(), &word(0)).status, Status::Success);
        assert_eq!(dual.dispatch(Command::GetActive.code(), &[]), Response::ok(word(1)));
        assert_eq!(dual.dispatch(Command::SetActive.code(), &word(0)).status, Status::Success);
        assert_eq!(dual.dispatch(Command::GetActive.code(), &[]), Response::ok(word(0)));
    }

    #[test]
    fn test_dual_ov5640_second_starts_in_standby() {
        let bus = MockBus::new();
        let dev = device(&bus, "roco");
        let status = dev.status();
        assert!(status.slots[0].active);
        assert!(!status.slots[1].active);
        assert_eq!(dev.dispatch(Command::GetActive.code(), &[]), Response::ok(word(1)));
        assert_eq!(dev.dispatch(Command::SetSecondActive.code(), &word(1)).status, Status::Success);
        assert!(dev.status().slots[1].active);
    }

    #[test]
    fn test_parallel_init_ends_with_mirror_on() {
        let bus = MockBus::new();
        let dev = device(&bus, "roco");
        assert_eq!(dev.dispatch(Command::Init.code(), &[]).status, Status::Success);
        assert_eq!(bus.writes_to_reg(0x3821), vec![(0x3c, 0x01), (0x3d, 0x01)]);

        bus.clear();
        assert_eq!(dev.dispatch(Command::Suspend.code(), &[]).status, Status::Success);
        assert_eq!(dev.dispatch(Command::Resume.code(), &[]).status, Status::Success);
        assert_eq!(bus.writes_to_reg(0x3821).last(), Some(&(0x3d, 0x01)));
        assert!(dev.nightmode().wait_idle(WAIT));
    }

    #[test]
    fn test_cam_model() {
        let bus = MockBus::new();
        assert_eq!(device(&bus, "eoco").dispatch(16, &[]), Response::ok(word(3)));
        assert_eq!(device(&bus, "pico").dispatch(16, &[]), Response::ok(word(2)));
        assert_eq!(device(&bus, "neco").dispatch(16, &[]), Response::ok(word(1)));
    }

    #[test]
    fn test_bus_failure_status() {
        let bus = MockBus::new();
        bus.fail_always();
        let dev = device(&bus, "eoco");
        assert_eq!(dev.dispatch(Command::MirrorOn.code(), &[]).status, Status::BusFailure);
        assert_eq!(dev.dispatch(Command::Init.code(), &[]).status, Status::BusFailure);
        assert!(!dev.status().initialized);
    }

    #[test]
    fn test_flash_drives_torch_and_exposure() {
        let bus = MockBus::new();
        let torch = FakeTorch::default();
        let dev = device_with(&bus, "eoco", Box::new(torch.clone()));

        let payload = [word(0), word(1)].concat();
        assert_eq!(dev.dispatch(Command::SetFlash.code(), &payload).status, Status::Success);
        assert!(*torch.0.lock().unwrap());
        assert_eq!(bus.writes_to_reg(0x3501), vec![(0x3c, 0x20)]);

        let resp = dev.dispatch(Command::GetFlash.code(), &[]);
        assert_eq!(resp, Response::ok([word(0), word(1)].concat()));

        bus.clear();
        let payload = [word(0), word(0)].concat();
        assert_eq!(dev.dispatch(Command::SetFlash.code(), &payload).status, Status::Success);
        assert_eq!(bus.transfer_count(), 0);
    }

    #[test]
    fn test_missing_torch_still_succeeds() {
        let bus = MockBus::new();
        let dev = device_with(&bus, "eoco", Box::new(SysfsLedTorch::at("/nonexistent/vcam/torch")));
        let payload = [word(0), word(1)].concat();
        assert_eq!(dev.dispatch(Command::SetFlash.code(), &payload).status, Status::Success);
        assert_eq!(
            dev.dispatch(Command::GetFlash.code(), &[]),
            Response::ok([word(0), word(0)].concat())
        );
    }

    #[test]
    fn test_test_flag() {
        let bus = MockBus::new();
        let dev = device(&bus, "neco");
        assert_eq!(dev.dispatch(Command::GetTest.code(), &[]), Response::ok(word(0)));
        assert_eq!(dev.dispatch(Command::SetTest.code(), &word(5)).status, Status::Success);
        assert_eq!(dev.dispatch(Command::GetTest.code(), &[]), Response::ok(word(1)));
    }

    #[test]
    fn test_ov7740_init_reenters_standby() {
        let bus = MockBus::new();
        let dev = device(&bus, "neco");
        assert_eq!(dev.dispatch(Command::SetActive.code(), &word(0)).status, Status::Success);
        bus.clear();

        assert_eq!(dev.dispatch(Command::Init.code(), &[]).status, Status::Success);
        let writes = bus.narrow_writes();
        assert_eq!(writes.len(), 167);
        assert_eq!(writes.last().unwrap().1.value, 0xe8);
        assert_eq!(dev.dispatch(Command::SetCamMode.code(), &word(0)).status, Status::NotSupported);
        assert_eq!(dev.dispatch(Command::GetFov.code(), &[]).status, Status::NotSupported);
    }

    #[test]
    fn test_suspend_resume_restores_fov() {
        let bus = MockBus::new();
        let dev = device(&bus, "eoco");
        assert_eq!(dev.dispatch(Command::Init.code(), &[]).status, Status::Success);
        assert_eq!(dev.dispatch(Command::SetFov.code(), &word(28)).status, Status::Success);

        assert_eq!(dev.dispatch(Command::Suspend.code(), &[]).status, Status::Success);
        assert!(!dev.status().powered);
        assert!(dev.status().slots.iter().all(|s| !s.streaming));

        bus.clear();
        assert_eq!(dev.dispatch(Command::Resume.code(), &[]).status, Status::Success);
        let status = dev.status();
        assert!(status.powered);
        assert_eq!(status.current_fov, Some(28));
        assert!(status.slots.iter().all(|s| s.streaming));
        // restore did not re-read OTP
        assert_eq!(otp_reads(&bus), 0);
        assert!(dev.nightmode().wait_idle(WAIT));
    }

    #[test]
    fn test_status_serializes() {
        let bus = MockBus::new();
        let dev = device(&bus, "roco");
        let json = serde_json::to_value(dev.status()).unwrap();
        assert_eq!(json["board"], "roco");
        assert_eq!(json["family"], "ov5640");
        assert_eq!(json["slots"].as_array().unwrap().len(), 2);
        assert_eq!(json["supported_fovs"], serde_json::json!([54, 39, 28]));
    }
}
