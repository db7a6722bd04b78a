//! Aptina MT9P111: 5 MP SoC sensor with 16-bit addresses and an on-chip
//! sequencer. Init is a chain of steps gated on the sequencer status in
//! 0x0018 (and the PLL lock status in 0x0016 for the last polled step).
//!
//! 16-bit registers are written high byte first as two byte writes; 8-bit
//! sequencer variables (0x8xxx) take a single byte.
//!
//! The step tables are placeholders. They reproduce the shape of the vendor
//! bring-up (step order, polls, settle delays and the sequencer commands
//! that gate each step) but not its full register contents, which still
//! need to be taken from a working module.

use super::{InitStep, SensorFamily, SensorProfile, Standby};
use crate::engine::Poll;
use crate::regs::{batch, RegisterAddress, RegisterBatch};
use std::time::Duration;

pub static PROFILE: SensorProfile = SensorProfile {
    family: SensorFamily::Mt9p111,
    mipi_init: INIT,
    parallel_init: INIT,
    parallel_setup: None,
    high_k_tuning: None,
    edge_enhancement: None,
    stream: None,
    flip: None,
    mirror: None,
    night_mode: None,
    test_pattern: None,
    autofocus: None,
    exposure: None,
    standby: Some(Standby {
        enter: STANDBY_ENTER,
        exit: STANDBY_EXIT,
    }),
    fovs: &[],
    default_fov: None,
    otp: None,
    grab_still: Some(GRAB_CONTEXT_B),
    retry_budget: None,
    second_slot_active: true,
};

const fn status(expected: u16, timeout_ms: u64) -> Option<Poll> {
    Some(Poll {
        register: RegisterAddress::Wide(0x0018),
        expected,
        timeout: Duration::from_millis(timeout_ms),
    })
}

const fn settle(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

const INIT: &[InitStep] = &[
    InitStep { batch: PLL, poll: status(0x4009, 100), settle_before: Duration::ZERO },
    InitStep { batch: LEAVE_STANDBY, poll: status(0x2008, 1000), settle_before: Duration::ZERO },
    InitStep { batch: TIMING, poll: status(0x4009, 1000), settle_before: Duration::ZERO },
    InitStep { batch: CONTEXT_A, poll: None, settle_before: settle(100) },
    InitStep { batch: CONTEXT_B, poll: None, settle_before: settle(200) },
    InitStep { batch: OUTPUT_FORMAT, poll: None, settle_before: settle(200) },
    InitStep { batch: AE_AWB, poll: None, settle_before: settle(200) },
    InitStep { batch: LENS_CORRECTION, poll: None, settle_before: settle(200) },
    InitStep {
        batch: REFRESH,
        poll: Some(Poll {
            register: RegisterAddress::Wide(0x0016),
            expected: 0x0447,
            timeout: Duration::from_millis(1000),
        }),
        settle_before: Duration::ZERO,
    },
    InitStep { batch: STREAM_CONTEXT_A, poll: None, settle_before: settle(200) },
];

const PLL: &RegisterBatch = batch!(wide:
    (0x0010, 0x03), (0x0011, 0x40), // PLL dividers
    (0x0012, 0x00), (0x0013, 0x90), // PLL P dividers
    (0x002a, 0x7f), (0x002b, 0xfa), // PLL P4/P5/P6
    (0x0014, 0x20), (0x0015, 0x46), // PLL control: bypass off, power on
);

const LEAVE_STANDBY: &RegisterBatch = batch!(wide:
    (0x0018, 0x40), (0x0019, 0x28), // standby control: exit soft standby
);

const TIMING: &RegisterBatch = batch!(wide:
    (0x001e, 0x07), (0x001f, 0x77), // pad slew
    (0x3084, 0x24), (0x3085, 0x0c), // DAC_LD_4_5
    (0x3092, 0x0a), (0x3093, 0x4c), // DAC_LD_18_19
    (0x3094, 0x4c), (0x3095, 0xcc), // DAC_LD_20_21
);

const CONTEXT_A: &RegisterBatch = batch!(wide:
    (0x098e, 0x48), (0x098f, 0x3a), // logical address: cam_core_a
    (0xc83a, 0x00), (0xc83b, 0x0c), // row start
    (0xc83c, 0x00), (0xc83d, 0x18), // column start
    (0xc83e, 0x07), (0xc83f, 0xa7), // row end
    (0xc840, 0x0a), (0xc841, 0x37), // column end
);

const CONTEXT_B: &RegisterBatch = batch!(wide:
    (0x098e, 0x48), (0x098f, 0x72), // logical address: cam_core_b
    (0xc872, 0x00), (0xc873, 0x10), // row start
    (0xc874, 0x00), (0xc875, 0x1c), // column start
    (0xc876, 0x07), (0xc877, 0xaf), // row end
    (0xc878, 0x0a), (0xc879, 0x43), // column end
);

const OUTPUT_FORMAT: &RegisterBatch = batch!(wide:
    (0xc86c, 0x05), (0xc86d, 0x00), // context A output width 1280
    (0xc86e, 0x03), (0xc86f, 0xc0), // context A output height 960
    (0xc8aa, 0x0a), (0xc8ab, 0x20), // context B output width 2592
    (0xc8ac, 0x07), (0xc8ad, 0x98), // context B output height 1944
);

const AE_AWB: &RegisterBatch = batch!(wide:
    (0xa404, 0x00), // AE rule: average
    (0xac02, 0xff), // AWB mode
    (0xa80e, 0x1e), // AE target
);

const LENS_CORRECTION: &RegisterBatch = batch!(wide:
    (0x3210, 0x49), (0x3211, 0xb8), // enable PGA
);

const REFRESH: &RegisterBatch = batch!(wide:
    (0x8404, 0x06), // sequencer command: refresh
);

const STREAM_CONTEXT_A: &RegisterBatch = batch!(wide:
    (0x843c, 0x01), // max frame count, context A
    (0x8404, 0x01), // sequencer command: preview
);

const STANDBY_ENTER: &RegisterBatch = batch!(wide:
    (0x0018, 0x40), (0x0019, 0x29), // request soft standby
);

const STANDBY_EXIT: &RegisterBatch = batch!(wide:
    (0x0018, 0x40), (0x0019, 0x28),
);

/// Switch the sequencer to context B (full-resolution still) for one frame.
const GRAB_CONTEXT_B: &RegisterBatch = batch!(wide:
    (0x843c, 0x01), // max frame count
    (0x8404, 0x02), // sequencer command: capture
);
