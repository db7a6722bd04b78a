//! Camera slots and multi-camera fan-out.
//!
//! A device has up to two sensors sharing one bus. Absent sensors are
//! `None`, so "skip if not present" is enforced by the type rather than by
//! checking for a zero address at every call site.

use serde::Serialize;
use std::fmt;

/// Physical slot position on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SlotIndex {
    First,
    Second,
}

impl SlotIndex {
    fn position(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("cam1"),
            Self::Second => f.write_str("cam2"),
        }
    }
}

/// Which slot(s) an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraSelector {
    First,
    Second,
    Both,
}

impl CameraSelector {
    /// Slot indices covered by this selector, ascending.
    pub fn indices(self) -> &'static [SlotIndex] {
        match self {
            Self::First => &[SlotIndex::First],
            Self::Second => &[SlotIndex::Second],
            Self::Both => &[SlotIndex::First, SlotIndex::Second],
        }
    }
}

impl From<SlotIndex> for CameraSelector {
    fn from(index: SlotIndex) -> Self {
        match index {
            SlotIndex::First => Self::First,
            SlotIndex::Second => Self::Second,
        }
    }
}

/// Factory-programmed sensor variant, read from OTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SensorVariant {
    Unknown,
    Standard,
    HighK,
}

/// Flip/mirror pair. Used both for what the caller asked for and for how
/// the sensor is physically mounted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Orientation {
    pub flip: bool,
    pub mirror: bool,
}

impl Orientation {
    /// Upside-down mount: both axes inverted.
    pub const UPSIDE_DOWN: Self = Self {
        flip: true,
        mirror: true,
    };

    /// Register-level orientation for a requested one on this mount.
    pub fn effective(self, mounted: Orientation) -> Orientation {
        Orientation {
            flip: self.flip ^ mounted.flip,
            mirror: self.mirror ^ mounted.mirror,
        }
    }
}

/// Mode profile currently programmed into a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModeProfile {
    /// Full-resolution still configuration.
    FullResolution,
    /// 1280x960 crop for the given horizontal FOV in degrees.
    Fov(u16),
}

/// One physical sensor instance.
#[derive(Debug, Clone, Serialize)]
pub struct CameraSlot {
    pub index: SlotIndex,
    /// 7-bit bus address.
    pub bus_address: u8,
    pub streaming: bool,
    /// Orientation last requested by the caller.
    pub orientation: Orientation,
    pub mounted: Orientation,
    pub mode: Option<ModeProfile>,
    pub variant: SensorVariant,
    /// OTP has been read (or attempted) for this slot.
    pub otp_read: bool,
    /// Not in standby.
    pub active: bool,
}

impl CameraSlot {
    pub fn new(index: SlotIndex, bus_address: u8, mounted: Orientation) -> Self {
        Self {
            index,
            bus_address,
            streaming: false,
            orientation: Orientation::default(),
            mounted,
            mode: None,
            variant: SensorVariant::Unknown,
            otp_read: false,
            active: true,
        }
    }
}

/// The (up to) two slots of a device.
#[derive(Debug, Clone, Default)]
pub struct Slots([Option<CameraSlot>; 2]);

impl Slots {
    pub fn new(first: Option<CameraSlot>, second: Option<CameraSlot>) -> Self {
        Self([first, second])
    }

    /// Build slots from board addresses; a missing or zero address means the
    /// slot is not populated.
    pub fn from_addresses(addresses: &[u8], mounted: Orientation) -> Self {
        let slot = |index: SlotIndex| {
            addresses
                .get(index.position())
                .copied()
                .filter(|&addr| addr != 0)
                .map(|addr| CameraSlot::new(index, addr, mounted))
        };
        Self([slot(SlotIndex::First), slot(SlotIndex::Second)])
    }

    pub fn get(&self, index: SlotIndex) -> Option<&CameraSlot> {
        self.0[index.position()].as_ref()
    }

    pub fn get_mut(&mut self, index: SlotIndex) -> Option<&mut CameraSlot> {
        self.0[index.position()].as_mut()
    }

    pub fn is_present(&self, index: SlotIndex) -> bool {
        self.get(index).is_some()
    }

    /// Present slots covered by `selector`, ascending.
    pub fn selected(&self, selector: CameraSelector) -> impl Iterator<Item = &CameraSlot> + '_ {
        selector.indices().iter().filter_map(move |&i| self.get(i))
    }

    /// Selector covering every present slot.
    pub fn all(&self) -> CameraSelector {
        if self.is_present(SlotIndex::Second) && !self.is_present(SlotIndex::First) {
            CameraSelector::Second
        } else if self.is_present(SlotIndex::Second) {
            CameraSelector::Both
        } else {
            CameraSelector::First
        }
    }

    /// Apply `f` to each present selected slot, stopping at the first error.
    pub fn try_for_each<E>(
        &mut self,
        selector: CameraSelector,
        mut f: impl FnMut(&mut CameraSlot) -> Result<(), E>,
    ) -> Result<(), E> {
        for &index in selector.indices() {
            if let Some(slot) = self.get_mut(index) {
                f(slot)?;
            }
        }
        Ok(())
    }

    /// Apply `f` to every present selected slot even if some fail.
    ///
    /// Returns the last error encountered, so a fault on one sensor never
    /// keeps the other from being handled.
    pub fn for_each_keep_last_error<E>(
        &mut self,
        selector: CameraSelector,
        mut f: impl FnMut(&mut CameraSlot) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut last = Ok(());
        for &index in selector.indices() {
            if let Some(slot) = self.get_mut(index) {
                if let Err(e) = f(slot) {
                    last = Err(e);
                }
            }
        }
        last
    }
}
