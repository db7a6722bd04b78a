//! Bus write engine: batches of register writes with a shared retry budget
//! and optional readiness polling.

use crate::bus::{Message, SharedBus, TransferError};
use crate::regs::{RegisterAddress, RegisterBatch, RegisterWrite};
use crate::slots::{CameraSelector, CameraSlot, SlotIndex, Slots};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Historical default: 50 failed attempts per batch before giving up.
pub const DEFAULT_RETRY_BUDGET: u32 = 50;
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(15);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(15);

#[derive(Debug, Error)]
pub enum BusError {
    #[error("{slot}: write #{index} ({write}) failed, retry budget of {budget} spent: {source}")]
    TooManyFailures {
        slot: SlotIndex,
        index: usize,
        write: RegisterWrite,
        budget: u32,
        source: TransferError,
    },
    #[error("{slot}: read of {addr} failed, retry budget of {budget} spent: {source}")]
    ReadFailed {
        slot: SlotIndex,
        addr: RegisterAddress,
        budget: u32,
        source: TransferError,
    },
}

/// Readiness poll did not see the expected status in time. Advisory only.
#[derive(Debug, Error)]
#[error("{slot}: status {register} never reached 0x{expected:04x} within {timeout:?} (last {last:?})")]
pub struct PollTimeout {
    pub slot: SlotIndex,
    pub register: RegisterAddress,
    pub expected: u16,
    pub last: Option<u16>,
    pub timeout: Duration,
}

/// Retry settings shared by every engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Failed transfers allowed per call, across the whole batch.
    pub budget: u32,
    /// Fixed sleep before retrying the same write.
    pub backoff: Duration,
    /// Sleep between status reads while polling.
    pub poll_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            budget: DEFAULT_RETRY_BUDGET,
            backoff: DEFAULT_BACKOFF,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Wait for a 16-bit status register to reach a value before a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poll {
    pub register: RegisterAddress,
    pub expected: u16,
    pub timeout: Duration,
}

/// Address snapshot of a slot, enough to reach it on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub index: SlotIndex,
    pub addr: u8,
}

impl From<&CameraSlot> for Target {
    fn from(slot: &CameraSlot) -> Self {
        Self {
            index: slot.index,
            addr: slot.bus_address,
        }
    }
}

impl From<&mut CameraSlot> for Target {
    fn from(slot: &mut CameraSlot) -> Self {
        Target::from(&*slot)
    }
}

struct Budget {
    remaining: u32,
}

/// Sends register batches to camera slots.
#[derive(Clone)]
pub struct BusWriter {
    bus: SharedBus,
    policy: RetryPolicy,
}

impl BusWriter {
    pub fn new(bus: SharedBus, policy: RetryPolicy) -> Self {
        Self { bus, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Write `batch` to every present slot in `selector`, slot 1 first.
    ///
    /// Absent slots are skipped, so a selector with no present slot is a
    /// successful no-op.
    pub fn write_batch(
        &self,
        slots: &Slots,
        selector: CameraSelector,
        batch: &RegisterBatch,
    ) -> Result<(), BusError> {
        let mut budget = self.budget();
        for slot in slots.selected(selector) {
            self.send(slot.into(), batch, &mut budget)?;
        }
        Ok(())
    }

    /// Like [`write_batch`](Self::write_batch), but poll each slot's status
    /// register first. A poll timeout is logged and the batch is sent anyway.
    pub fn write_batch_polled(
        &self,
        slots: &Slots,
        selector: CameraSelector,
        batch: &RegisterBatch,
        poll: &Poll,
    ) -> Result<(), BusError> {
        let mut budget = self.budget();
        for slot in slots.selected(selector) {
            let target = Target::from(slot);
            if let Err(timeout) = self.poll(target, poll) {
                tracing::warn!(error = %timeout, "readiness poll timed out; writing anyway");
            }
            self.send(target, batch, &mut budget)?;
        }
        Ok(())
    }

    /// Write `batch` to a single slot.
    pub fn write_to(&self, target: Target, batch: &RegisterBatch) -> Result<(), BusError> {
        let mut budget = self.budget();
        self.send(target, batch, &mut budget)
    }

    pub fn write_reg(&self, target: Target, write: RegisterWrite) -> Result<(), BusError> {
        self.write_to(target, std::slice::from_ref(&write))
    }

    pub fn read_reg(&self, target: Target, addr: RegisterAddress) -> Result<u8, BusError> {
        let mut buf = [0u8; 1];
        self.read_into(target, addr, &mut buf)?;
        Ok(buf[0])
    }

    /// Read-mask-write: bits in `mask` take their value from `value`.
    pub fn modify_reg(
        &self,
        target: Target,
        addr: RegisterAddress,
        mask: u8,
        value: u8,
    ) -> Result<(), BusError> {
        let current = self.read_reg(target, addr)?;
        let value = (current & !mask) | (value & mask);
        self.write_reg(target, RegisterWrite { addr, value })
    }

    /// Read a big-endian 16-bit status register.
    pub fn read_status(&self, target: Target, addr: RegisterAddress) -> Result<u16, BusError> {
        let mut buf = [0u8; 2];
        self.read_into(target, addr, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Poll `poll.register` until it reads `poll.expected` or the timeout
    /// passes. Failed reads are retried under one budget for the whole
    /// poll; once it is spent a failed read just counts as "not ready yet".
    pub fn poll(&self, target: Target, poll: &Poll) -> Result<u16, PollTimeout> {
        let start = Instant::now();
        let mut budget = self.budget();
        let mut last = None;
        loop {
            thread::sleep(self.policy.poll_interval);

            let mut buf = [0u8; 2];
            let read = self.with_retry(&mut budget, || {
                self.read_once(target.addr, poll.register, &mut buf)
            });
            match read {
                Ok(()) => {
                    let status = u16::from_be_bytes(buf);
                    last = Some(status);
                    if status == poll.expected {
                        tracing::debug!(
                            slot = %target.index,
                            status = format_args!("0x{status:04x}"),
                            elapsed_ms = start.elapsed().as_millis() as u64,
                            "sensor ready"
                        );
                        return Ok(status);
                    }
                }
                Err(e) => tracing::trace!(slot = %target.index, error = %e, "status read failed"),
            }

            if start.elapsed() >= poll.timeout {
                return Err(PollTimeout {
                    slot: target.index,
                    register: poll.register,
                    expected: poll.expected,
                    last,
                    timeout: poll.timeout,
                });
            }
        }
    }

    fn budget(&self) -> Budget {
        Budget {
            remaining: self.policy.budget.max(1),
        }
    }

    fn send(
        &self,
        target: Target,
        batch: &RegisterBatch,
        budget: &mut Budget,
    ) -> Result<(), BusError> {
        for (index, write) in batch.iter().enumerate() {
            let frame = write.frame();
            self.with_retry(budget, || self.bus.transfer(target.addr, Message::Write(&frame)))
                .map_err(|source| {
                    tracing::error!(
                        slot = %target.index,
                        index,
                        len = batch.len(),
                        reg = %write.addr,
                        value = format_args!("0x{:02x}", write.value),
                        "giving up on register write"
                    );
                    BusError::TooManyFailures {
                        slot: target.index,
                        index,
                        write: *write,
                        budget: self.policy.budget,
                        source,
                    }
                })?;
        }
        Ok(())
    }

    fn read_into(
        &self,
        target: Target,
        addr: RegisterAddress,
        buf: &mut [u8],
    ) -> Result<(), BusError> {
        let mut budget = self.budget();
        self.with_retry(&mut budget, || self.read_once(target.addr, addr, buf))
            .map_err(|source| BusError::ReadFailed {
                slot: target.index,
                addr,
                budget: self.policy.budget,
                source,
            })
    }

    /// Set the register pointer, then read `buf.len()` bytes.
    fn read_once(
        &self,
        dev: u8,
        addr: RegisterAddress,
        buf: &mut [u8],
    ) -> Result<(), TransferError> {
        let pointer = addr.to_bytes();
        self.bus.transfer(dev, Message::Write(&pointer))?;
        self.bus.transfer(dev, Message::Read(buf))
    }

    /// Run `attempt` until it succeeds or `budget` is spent. Every failure
    /// costs one unit of budget; the last failure is returned.
    fn with_retry<T>(
        &self,
        budget: &mut Budget,
        mut attempt: impl FnMut() -> Result<T, TransferError>,
    ) -> Result<T, TransferError> {
        loop {
            match attempt() {
                Ok(v) => return Ok(v),
                Err(e) => {
                    budget.remaining = budget.remaining.saturating_sub(1);
                    if budget.remaining == 0 {
                        return Err(e);
                    }
                    tracing::debug!(error = %e, remaining = budget.remaining, "transfer failed; retrying");
                    thread::sleep(self.policy.backoff);
                }
            }
        }
    }
}
