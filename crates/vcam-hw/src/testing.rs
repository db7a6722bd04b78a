//! Recording bus used by the unit tests.

use crate::bus::{I2cTransfer, Message, SharedBus, TransferError};
use crate::engine::RetryPolicy;
use crate::regs::{RegisterAddress, RegisterWrite};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Op {
    Write(Vec<u8>),
    Read(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Record {
    pub addr: u8,
    pub op: Op,
    pub ok: bool,
}

#[derive(Default)]
struct State {
    log: Vec<Record>,
    fail_always: bool,
    fail_addrs: Vec<u8>,
    script: VecDeque<bool>,
    pointer: HashMap<u8, Vec<u8>>,
    memory: HashMap<(u8, Vec<u8>), Vec<u8>>,
}

/// In-memory bus. Clones share state, so a test can keep one handle while
/// the engine owns another.
#[derive(Clone, Default)]
pub(crate) struct MockBus {
    state: Arc<Mutex<State>>,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(&self) -> SharedBus {
        SharedBus::new(self.clone())
    }

    pub fn fail_always(&self) {
        self.state.lock().unwrap().fail_always = true;
    }

    pub fn fail_address(&self, addr: u8) {
        self.state.lock().unwrap().fail_addrs.push(addr);
    }

    /// Outcomes for the next transfers (`true` = succeeds); afterwards
    /// every transfer succeeds.
    pub fn script(&self, outcomes: &[bool]) {
        self.state.lock().unwrap().script = outcomes.iter().copied().collect();
    }

    /// Bytes returned when `reg` is read on device `addr`.
    pub fn set_memory(&self, addr: u8, reg: RegisterAddress, bytes: &[u8]) {
        self.state
            .lock()
            .unwrap()
            .memory
            .insert((addr, reg.to_bytes()), bytes.to_vec());
    }

    /// Load consecutive single-byte registers starting at `start`.
    pub fn load_block(&self, addr: u8, start: RegisterAddress, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            self.set_memory(addr, start.offset(i as u16), &[*b]);
        }
    }

    pub fn records(&self) -> Vec<Record> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn transfer_count(&self) -> usize {
        self.state.lock().unwrap().log.len()
    }

    pub fn clear(&self) {
        self.state.lock().unwrap().log.clear();
    }

    /// Successful 3-byte writes decoded as 16-bit-address register writes.
    pub fn wide_writes(&self) -> Vec<(u8, RegisterWrite)> {
        self.records()
            .into_iter()
            .filter(|r| r.ok)
            .filter_map(|r| match r.op {
                Op::Write(b) if b.len() == 3 => Some((
                    r.addr,
                    RegisterWrite::wide(u16::from_be_bytes([b[0], b[1]]), b[2]),
                )),
                _ => None,
            })
            .collect()
    }

    /// Successful 2-byte writes decoded as 8-bit-address register writes.
    pub fn narrow_writes(&self) -> Vec<(u8, RegisterWrite)> {
        self.records()
            .into_iter()
            .filter(|r| r.ok)
            .filter_map(|r| match r.op {
                Op::Write(b) if b.len() == 2 => Some((r.addr, RegisterWrite::narrow(b[0], b[1]))),
                _ => None,
            })
            .collect()
    }

    /// Wide writes that touched `reg`, in order.
    pub fn writes_to_reg(&self, reg: u16) -> Vec<(u8, u8)> {
        self.wide_writes()
            .into_iter()
            .filter(|(_, w)| w.addr == RegisterAddress::Wide(reg))
            .map(|(addr, w)| (addr, w.value))
            .collect()
    }
}

impl I2cTransfer for MockBus {
    fn transfer(&mut self, addr: u8, msg: Message<'_>) -> Result<(), TransferError> {
        let mut state = self.state.lock().unwrap();
        let ok = match state.script.pop_front() {
            Some(outcome) => outcome,
            None => !state.fail_always && !state.fail_addrs.contains(&addr),
        };

        let op = match msg {
            Message::Write(bytes) => {
                if ok {
                    state.pointer.insert(addr, bytes.to_vec());
                }
                Op::Write(bytes.to_vec())
            }
            Message::Read(buf) => {
                if ok {
                    let pointer = state.pointer.get(&addr).cloned().unwrap_or_default();
                    let stored = state.memory.get(&(addr, pointer)).cloned().unwrap_or_default();
                    for (i, b) in buf.iter_mut().enumerate() {
                        *b = stored.get(i).copied().unwrap_or(0);
                    }
                }
                Op::Read(buf.len())
            }
        };
        state.log.push(Record { addr, op, ok });

        if ok {
            Ok(())
        } else {
            Err(TransferError::Nack(addr))
        }
    }
}

/// Default budget without sleeping between retries.
pub(crate) fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        backoff: Duration::ZERO,
        poll_interval: Duration::from_millis(1),
        ..RetryPolicy::default()
    }
}
