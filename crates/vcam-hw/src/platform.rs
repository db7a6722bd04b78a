//! Board collaborators: torch LED and sensor power rails.
//!
//! The sensor code never touches these directly; the device owns one
//! implementation of each, chosen from the board profile.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("LED {0} not found")]
    LedNotFound(String),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unexpected content in {path}: {content:?}")]
    Parse { path: PathBuf, content: String },
}

/// Torch (video light) control.
pub trait TorchControl: Send {
    fn torch_state(&self) -> Result<bool, PlatformError>;
    fn set_torch_state(&mut self, on: bool) -> Result<(), PlatformError>;
}

/// Sensor power, reset and clock lines.
pub trait PowerControl: Send {
    fn set_power(&mut self, on: bool) -> Result<(), PlatformError>;
    fn set_reset(&mut self, asserted: bool) -> Result<(), PlatformError>;
    fn set_clock_enable(&mut self, on: bool) -> Result<(), PlatformError>;
}

/// Power the sensor up or down in the order the sensors require: supply
/// and clock before releasing power-down and reset, the reverse going down.
pub fn sequence_power(power: &mut dyn PowerControl, on: bool) -> Result<(), PlatformError> {
    if on {
        power.set_power(true)?;
        thread::sleep(Duration::from_millis(1));
        power.set_clock_enable(true)?;
        thread::sleep(Duration::from_millis(1));
        power.set_reset(false)?;
    } else {
        power.set_reset(true)?;
        thread::sleep(Duration::from_millis(10));
        power.set_clock_enable(false)?;
        thread::sleep(Duration::from_millis(10));
        power.set_power(false)?;
    }
    tracing::info!(on, "sensor power sequenced");
    Ok(())
}

/// LED class device under `/sys/class/leds/<name>`.
pub struct SysfsLedTorch {
    dir: PathBuf,
}

impl SysfsLedTorch {
    pub fn new(name: &str) -> Self {
        Self::at(Path::new("/sys/class/leds").join(name))
    }

    /// Use an explicit LED directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_u32(&self, file: &str) -> Result<u32, PlatformError> {
        if !self.dir.is_dir() {
            return Err(PlatformError::LedNotFound(self.dir.display().to_string()));
        }
        let path = self.dir.join(file);
        let content = std::fs::read_to_string(&path).map_err(|source| PlatformError::Io {
            path: path.clone(),
            source,
        })?;
        content
            .trim()
            .parse()
            .map_err(|_| PlatformError::Parse { path, content })
    }
}

impl TorchControl for SysfsLedTorch {
    fn torch_state(&self) -> Result<bool, PlatformError> {
        Ok(self.read_u32("brightness")? != 0)
    }

    fn set_torch_state(&mut self, on: bool) -> Result<(), PlatformError> {
        let brightness = if on { self.read_u32("max_brightness")? } else { 0 };
        let path = self.dir.join("brightness");
        std::fs::write(&path, brightness.to_string())
            .map_err(|source| PlatformError::Io { path, source })?;
        tracing::debug!(led = %self.dir.display(), brightness, "torch set");
        Ok(())
    }
}

/// Board without a torch: always off, setting it is a no-op.
pub struct NoTorch;

impl TorchControl for NoTorch {
    fn torch_state(&self) -> Result<bool, PlatformError> {
        Ok(false)
    }

    fn set_torch_state(&mut self, on: bool) -> Result<(), PlatformError> {
        tracing::debug!(on, "no torch on this board");
        Ok(())
    }
}

/// Power lines owned by the kernel driver; requests are only logged.
pub struct NullPower;

impl PowerControl for NullPower {
    fn set_power(&mut self, on: bool) -> Result<(), PlatformError> {
        tracing::debug!(on, "power request (no-op)");
        Ok(())
    }

    fn set_reset(&mut self, asserted: bool) -> Result<(), PlatformError> {
        tracing::debug!(asserted, "reset request (no-op)");
        Ok(())
    }

    fn set_clock_enable(&mut self, on: bool) -> Result<(), PlatformError> {
        tracing::debug!(on, "clock request (no-op)");
        Ok(())
    }
}
