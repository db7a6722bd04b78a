//! Deferred night-mode toggle.
//!
//! After a mode change the auto-exposure loop can lock onto a bad value.
//! Cycling night mode off and on again forces it to re-converge. The cycle
//! runs on a worker thread after a delay; scheduling again before it starts
//! replaces the pending run instead of queueing a second one.

use crate::engine::{BusWriter, Target};
use crate::regs::Toggle;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

struct Pending {
    deadline: Instant,
    targets: Vec<Target>,
}

#[derive(Default)]
struct State {
    pending: Option<Pending>,
    running: bool,
    shutdown: bool,
    runs: u64,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    wake: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to the night-mode worker. Dropping it lets the worker finish any
/// pending toggle, then joins it.
pub struct NightModeScheduler {
    shared: Arc<Shared>,
    delay: Duration,
    worker: Option<JoinHandle<()>>,
}

impl NightModeScheduler {
    /// Start the worker thread.
    pub fn spawn(writer: BusWriter, toggle: Toggle, delay: Duration) -> std::io::Result<Self> {
        let shared = Arc::new(Shared::default());
        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("vcam-nightmode".into())
            .spawn(move || worker_loop(&worker_shared, &writer, toggle, delay))?;
        tracing::debug!(delay_ms = delay.as_millis() as u64, "night-mode worker started");
        Ok(Self {
            shared,
            delay,
            worker: Some(worker),
        })
    }

    /// A scheduler that never toggles (feature off, or no night-mode
    /// register on this sensor).
    pub fn disabled() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            delay: Duration::ZERO,
            worker: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.worker.is_some()
    }

    /// Arm the toggle for `targets`, replacing any run that has not started.
    pub fn schedule(&self, targets: Vec<Target>) {
        if !self.is_enabled() || targets.is_empty() {
            return;
        }
        let mut state = self.shared.lock();
        let coalesced = state.pending.is_some();
        state.pending = Some(Pending {
            deadline: Instant::now() + self.delay,
            targets,
        });
        tracing::debug!(coalesced, "night-mode toggle scheduled");
        self.shared.wake.notify_all();
    }

    pub fn is_pending(&self) -> bool {
        self.shared.lock().pending.is_some()
    }

    /// Number of completed off/on cycles.
    pub fn runs(&self) -> u64 {
        self.shared.lock().runs
    }

    /// Block until nothing is pending or running, or `timeout` passes.
    /// Returns `true` if the worker went idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let guard = self.shared.lock();
        let (_guard, result) = self
            .shared
            .wake
            .wait_timeout_while(guard, timeout, |s| s.pending.is_some() || s.running)
            .unwrap_or_else(PoisonError::into_inner);
        !result.timed_out()
    }
}

impl Drop for NightModeScheduler {
    fn drop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        self.shared.lock().shutdown = true;
        self.shared.wake.notify_all();
        if worker.join().is_err() {
            tracing::error!("night-mode worker panicked");
        }
    }
}

fn worker_loop(shared: &Shared, writer: &BusWriter, toggle: Toggle, delay: Duration) {
    let mut state = shared.lock();
    loop {
        match state.pending.take() {
            None if state.shutdown => return,
            None => {
                state = shared.wake.wait(state).unwrap_or_else(PoisonError::into_inner);
            }
            Some(pending) => {
                let now = Instant::now();
                if now < pending.deadline {
                    let wait = pending.deadline - now;
                    state.pending = Some(pending);
                    state = shared
                        .wake
                        .wait_timeout(state, wait)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0;
                    continue;
                }

                state.running = true;
                drop(state);
                cycle(writer, toggle, delay, &pending.targets);
                state = shared.lock();
                state.running = false;
                state.runs += 1;
                shared.wake.notify_all();
            }
        }
    }
}

fn cycle(writer: &BusWriter, toggle: Toggle, delay: Duration, targets: &[Target]) {
    for &target in targets {
        if let Err(e) = writer.write_reg(target, toggle.off) {
            tracing::warn!(slot = %target.index, error = %e, "night mode off failed");
        }
    }
    thread::sleep(delay);
    for &target in targets {
        if let Err(e) = writer.write_reg(target, toggle.on) {
            tracing::warn!(slot = %target.index, error = %e, "night mode on failed");
        }
    }
    tracing::debug!(targets = targets.len(), "night-mode toggle done");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::SlotIndex;
    use crate::testing::{fast_policy, MockBus};

    const NIGHT: Toggle = Toggle::wide(0x3a00, 0x7c, 0x78);
    const DELAY: Duration = Duration::from_millis(20);

    fn target(addr: u8) -> Target {
        Target {
            index: if addr == 0x3c { SlotIndex::First } else { SlotIndex::Second },
            addr,
        }
    }

    fn scheduler(bus: &MockBus) -> NightModeScheduler {
        NightModeScheduler::spawn(BusWriter::new(bus.shared(), fast_policy()), NIGHT, DELAY).unwrap()
    }

    #[test]
    fn test_toggle_writes_off_then_on() {
        let bus = MockBus::new();
        let nm = scheduler(&bus);
        nm.schedule(vec![target(0x3c), target(0x3d)]);
        assert!(nm.wait_idle(Duration::from_secs(5)));
        assert_eq!(nm.runs(), 1);
        assert_eq!(
            bus.writes_to_reg(0x3a00),
            vec![(0x3c, 0x78), (0x3d, 0x78), (0x3c, 0x7c), (0x3d, 0x7c)]
        );
    }

    #[test]
    fn test_back_to_back_schedules_coalesce() {
        let bus = MockBus::new();
        let nm = scheduler(&bus);
        nm.schedule(vec![target(0x3c)]);
        nm.schedule(vec![target(0x3c)]);
        assert!(nm.wait_idle(Duration::from_secs(5)));
        assert_eq!(nm.runs(), 1);
        assert_eq!(bus.writes_to_reg(0x3a00).len(), 2);
    }

    #[test]
    fn test_reschedule_replaces_targets() {
        let bus = MockBus::new();
        let nm = scheduler(&bus);
        nm.schedule(vec![target(0x3c)]);
        nm.schedule(vec![target(0x3d)]);
        assert!(nm.wait_idle(Duration::from_secs(5)));
        assert!(bus.writes_to_reg(0x3a00).iter().all(|(addr, _)| *addr == 0x3d));
    }

    #[test]
    fn test_disabled_never_writes() {
        let nm = NightModeScheduler::disabled();
        nm.schedule(vec![target(0x3c)]);
        assert!(!nm.is_pending());
        assert!(nm.wait_idle(Duration::from_millis(1)));
        assert_eq!(nm.runs(), 0);
    }

    #[test]
    fn test_drop_finishes_pending_toggle() {
        let bus = MockBus::new();
        let nm = scheduler(&bus);
        nm.schedule(vec![target(0x3c)]);
        drop(nm);
        assert_eq!(bus.writes_to_reg(0x3a00), vec![(0x3c, 0x78), (0x3c, 0x7c)]);
    }

    #[test]
    fn test_write_failure_does_not_kill_worker() {
        let bus = MockBus::new();
        bus.fail_always();
        let nm = scheduler(&bus);
        nm.schedule(vec![target(0x3c)]);
        assert!(nm.wait_idle(Duration::from_secs(5)));
        nm.schedule(vec![target(0x3c)]);
        assert!(nm.wait_idle(Duration::from_secs(5)));
        assert_eq!(nm.runs(), 2);
    }
}
