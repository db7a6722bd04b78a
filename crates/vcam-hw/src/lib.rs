//! vcam-hw: sensor register programming and mode engine.
//!
//! Drives OV5640, MT9P111 and OV7740 image sensors over I2C: retrying
//! register batches, OTP variant detection, field-of-view and capture-mode
//! switching, deferred night-mode toggling and a numeric control-request
//! dispatcher on top.

pub mod boards;
pub mod bus;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod mode;
pub mod nightmode;
pub mod otp;
pub mod platform;
pub mod regs;
pub mod sensors;
pub mod slots;

#[cfg(test)]
mod testing;

pub use boards::{list_boards, lookup_board, resolve_board, BoardError, BoardFile};
pub use bus::{I2cTransfer, LinuxI2c, SharedBus, TransferError};
pub use dispatch::{
    CaptureMode, Command, ControlDevice, DeviceConfig, DeviceStatus, FlashState, Response, Status,
};
pub use engine::{BusError, BusWriter, RetryPolicy};
pub use error::{Error, Result};
pub use mode::ModeTimings;
pub use sensors::{Interface, SensorFamily};
pub use slots::{CameraSelector, SlotIndex};
