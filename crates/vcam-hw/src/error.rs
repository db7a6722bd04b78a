use crate::bus::TransferError;
use crate::engine::BusError;
use crate::platform::PlatformError;
use crate::slots::SlotIndex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("not supported: {0}")]
    NotSupported(String),
    #[error(transparent)]
    Bus(#[from] BusError),
    #[error("{slot}: variant detection failed: {source}")]
    VariantDetect { slot: SlotIndex, source: BusError },
    #[error("failed to open bus: {0}")]
    Open(#[from] TransferError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("failed to start night-mode worker: {0}")]
    Spawn(#[source] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
