//! Per-family sensor profiles: register tables and control registers.
//!
//! Everything here is a compile-time constant. A profile describes what a
//! family can do; an `Option` field that is `None` means the family has no
//! such control.

pub mod mt9p111;
pub mod ov5640;
pub mod ov7740;

use crate::engine::Poll;
use crate::regs::{RegisterAddress, RegisterBatch, RegisterWrite, Toggle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorFamily {
    Ov7740,
    Mt9p111,
    Ov5640,
}

impl SensorFamily {
    pub const ALL: [SensorFamily; 3] = [Self::Ov7740, Self::Mt9p111, Self::Ov5640];

    /// Camera model code reported by `GetCamModel`.
    pub fn model_code(self) -> u32 {
        match self {
            Self::Ov7740 => 1,
            Self::Mt9p111 => 2,
            Self::Ov5640 => 3,
        }
    }

    pub fn profile(self) -> &'static SensorProfile {
        match self {
            Self::Ov7740 => &ov7740::PROFILE,
            Self::Mt9p111 => &mt9p111::PROFILE,
            Self::Ov5640 => &ov5640::PROFILE,
        }
    }
}

impl fmt::Display for SensorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ov7740 => "OV7740",
            Self::Mt9p111 => "MT9P111",
            Self::Ov5640 => "OV5640",
        })
    }
}

/// Link between sensor and host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
    /// MIPI CSI-2 serial link.
    #[default]
    Mipi,
    /// 8/10-bit parallel (DVP) bus.
    Parallel,
}

/// One step of a base init sequence.
#[derive(Debug, Clone, Copy)]
pub struct InitStep {
    pub batch: &'static RegisterBatch,
    /// Wait for this status before writing (per slot).
    pub poll: Option<Poll>,
    /// Fixed delay before the first slot when there is no poll.
    pub settle_before: Duration,
}

impl InitStep {
    pub const fn plain(batch: &'static RegisterBatch) -> Self {
        Self {
            batch,
            poll: None,
            settle_before: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FovProfile {
    /// Horizontal field of view in degrees.
    pub fov: u16,
    pub batch: &'static RegisterBatch,
}

#[derive(Debug, Clone, Copy)]
pub struct Standby {
    pub enter: &'static RegisterBatch,
    pub exit: &'static RegisterBatch,
}

impl Standby {
    pub fn select(&self, active: bool) -> &'static RegisterBatch {
        if active {
            self.exit
        } else {
            self.enter
        }
    }
}

/// Three consecutive registers holding a 20-bit exposure value; the low
/// nibble of the last register is fractional and always written as zero.
#[derive(Debug, Clone, Copy)]
pub struct ExposureLayout {
    pub base: u16,
}

impl ExposureLayout {
    pub fn writes(&self, exposure: u32) -> [RegisterWrite; 3] {
        [
            RegisterWrite::wide(self.base, ((exposure >> 16) & 0x0f) as u8),
            RegisterWrite::wide(self.base + 1, ((exposure >> 8) & 0xff) as u8),
            RegisterWrite::wide(self.base + 2, (exposure & 0xf0) as u8),
        ]
    }
}

/// Where and how to read the factory OTP block.
#[derive(Debug, Clone, Copy)]
pub struct OtpLayout {
    pub system_reset: RegisterAddress,
    pub clock_enable: RegisterAddress,
    /// Bit gating the OTP block in both `system_reset` and `clock_enable`.
    pub block_bit: u8,
    pub program_ctrl: RegisterAddress,
    pub read_ctrl: RegisterAddress,
    pub start: RegisterAddress,
    pub len: usize,
    pub model_id: RegisterAddress,
    pub high_k_model_id: u8,
    pub high_k_prefix: &'static [u8],
    pub unlock_settle: Duration,
    pub read_settle: Duration,
}

impl OtpLayout {
    /// Offset of the model id byte inside the OTP window.
    pub fn model_id_offset(&self) -> Option<usize> {
        match (self.start, self.model_id) {
            (RegisterAddress::Wide(s), RegisterAddress::Wide(m)) if m >= s => Some((m - s) as usize),
            (RegisterAddress::Narrow(s), RegisterAddress::Narrow(m)) if m >= s => {
                Some((m - s) as usize)
            }
            _ => None,
        }
    }
}

/// Everything the mode controller needs to drive one sensor family.
#[derive(Debug)]
pub struct SensorProfile {
    pub family: SensorFamily,
    pub mipi_init: &'static [InitStep],
    pub parallel_init: &'static [InitStep],
    /// Interface bring-up for parallel boards, written at init and resume
    /// instead of the full-resolution sequence and followed by mirror on.
    pub parallel_setup: Option<&'static RegisterBatch>,
    pub high_k_tuning: Option<&'static RegisterBatch>,
    pub edge_enhancement: Option<RegisterWrite>,
    pub stream: Option<Toggle>,
    pub flip: Option<Toggle>,
    pub mirror: Option<Toggle>,
    pub night_mode: Option<Toggle>,
    pub test_pattern: Option<Toggle>,
    pub autofocus: Option<Toggle>,
    pub exposure: Option<ExposureLayout>,
    pub standby: Option<Standby>,
    pub fovs: &'static [FovProfile],
    pub default_fov: Option<u16>,
    pub otp: Option<&'static OtpLayout>,
    pub grab_still: Option<&'static RegisterBatch>,
    /// Overrides the configured retry budget for this family.
    pub retry_budget: Option<u32>,
    /// Whether slot 2 starts out of standby.
    pub second_slot_active: bool,
}

impl SensorProfile {
    pub fn init_steps(&self, interface: Interface) -> &'static [InitStep] {
        match interface {
            Interface::Mipi => self.mipi_init,
            Interface::Parallel => self.parallel_init,
        }
    }

    pub fn fov(&self, fov: i64) -> Option<&'static FovProfile> {
        self.fovs.iter().find(|p| i64::from(p.fov) == fov)
    }

    pub fn fov_ids(&self) -> Vec<u16> {
        self.fovs.iter().map(|p| p.fov).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_codes() {
        assert_eq!(SensorFamily::Ov7740.model_code(), 1);
        assert_eq!(SensorFamily::Mt9p111.model_code(), 2);
        assert_eq!(SensorFamily::Ov5640.model_code(), 3);
    }

    #[test]
    fn test_profiles_match_family() {
        for family in SensorFamily::ALL {
            assert_eq!(family.profile().family, family);
        }
    }

    #[test]
    fn test_ov5640_fov_lookup() {
        let profile = SensorFamily::Ov5640.profile();
        assert_eq!(profile.fov_ids(), vec![54, 39, 28]);
        assert!(profile.fov(39).is_some());
        assert!(profile.fov(40).is_none());
        assert!(profile.fov(-54).is_none());
        assert_eq!(profile.default_fov, Some(54));
    }

    #[test]
    fn test_exposure_burst() {
        let writes = ExposureLayout { base: 0x3500 }.writes(0x2000);
        assert_eq!(
            writes,
            [
                RegisterWrite::wide(0x3500, 0x00),
                RegisterWrite::wide(0x3501, 0x20),
                RegisterWrite::wide(0x3502, 0x00),
            ]
        );
        let writes = ExposureLayout { base: 0x3500 }.writes(0x0f_ab_cd);
        assert_eq!(writes[0].value, 0x0f);
        assert_eq!(writes[1].value, 0xab);
        assert_eq!(writes[2].value, 0xc0);
    }

    #[test]
    fn test_otp_model_id_offset() {
        let otp = SensorFamily::Ov5640.profile().otp.unwrap();
        assert_eq!(otp.model_id_offset(), Some(1));
    }

    #[test]
    fn test_standby_select() {
        let standby = SensorFamily::Ov7740.profile().standby.unwrap();
        assert_eq!(standby.select(false)[0].value, 0xe8);
        assert_eq!(standby.select(true)[0].value, 0xe0);
    }

    #[test]
    fn test_family_serde_names() {
        let family: SensorFamily = serde_json::from_str("\"mt9p111\"").unwrap();
        assert_eq!(family, SensorFamily::Mt9p111);
        assert_eq!(family.to_string(), "MT9P111");
    }
}
