//! OmniVision OV7740: VGA sensor with 8-bit register addresses. A single
//! module sits behind an FPGA, so there is no FOV or orientation control.

use super::{InitStep, SensorFamily, SensorProfile, Standby};
use crate::regs::{batch, RegisterBatch};

pub static PROFILE: SensorProfile = SensorProfile {
    family: SensorFamily::Ov7740,
    mipi_init: &[InitStep::plain(INIT)],
    parallel_init: &[InitStep::plain(INIT)],
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
        enter: batch!(narrow: (0x0e, 0xe8)),
        exit: batch!(narrow: (0x0e, 0xe0)),
    }),
    fovs: &[],
    default_fov: None,
    otp: None,
    grab_still: None,
    retry_budget: Some(10),
    second_slot_active: true,
};

const INIT: &RegisterBatch = batch!(narrow:
    (0x12, 0x80), (0x13, 0x00), (0x11, 0x01), (0x12, 0x00), (0xd5, 0x10), (0x0c, 0xc2),
    (0x0d, 0x34), (0x16, 0x01), (0x17, 0x25), (0x18, 0xa0), (0x19, 0x03), (0x1a, 0xf0),
    (0x1b, 0x89), (0x22, 0x03), (0x29, 0x17), (0x2b, 0xf8), (0x2c, 0x01), (0x31, 0xa0),
    (0x32, 0xf0), (0x33, 0xc4), (0x35, 0x05), (0x36, 0x3f), (0x04, 0x60), (0x27, 0x80),
    (0x3d, 0x0f), (0x3e, 0x81), (0x3f, 0x40), (0x40, 0x7f), (0x41, 0x6a), (0x42, 0x29),
    (0x44, 0xe5), (0x45, 0x41), (0x47, 0x42), (0x48, 0x00), (0x49, 0x61), (0x4a, 0xa1),
    (0x4b, 0x5e), (0x4c, 0x18), (0x4d, 0x50), (0x4e, 0x13), (0x64, 0x00), (0x67, 0x88),
    (0x68, 0x1a), (0x14, 0x38), (0x24, 0x4b), (0x25, 0x3f), (0x26, 0x72), (0x50, 0x97),
    (0x51, 0x7e), (0x52, 0x00), (0x53, 0x00), (0x20, 0x00), (0x21, 0x23), (0x38, 0x14),
    (0xe9, 0x00), (0x56, 0x55), (0x57, 0xff), (0x58, 0xff), (0x59, 0xff), (0x5f, 0x04),
    (0xec, 0x00), (0x13, 0xff), (0x80, 0x7d), (0x81, 0x3f), (0x82, 0x32), (0x83, 0x01),
    (0x38, 0x11), (0x84, 0x70), (0x85, 0x00), (0x86, 0x03), (0x87, 0x01), (0x88, 0x05),
    (0x89, 0x30), (0x8d, 0x30), (0x8f, 0x85), (0x93, 0x30), (0x95, 0x85), (0x99, 0x30),
    (0x9b, 0x85), (0x9c, 0x08), (0x9d, 0x12), (0x9e, 0x23), (0x9f, 0x45), (0xa0, 0x55),
    (0xa1, 0x64), (0xa2, 0x72), (0xa3, 0x7f), (0xa4, 0x8b), (0xa5, 0x95), (0xa6, 0xa7),
    (0xa7, 0xb5), (0xa8, 0xcb), (0xa9, 0xdd), (0xaa, 0xec), (0xab, 0x1a), (0xce, 0x78),
    (0xcf, 0x6e), (0xd0, 0x0a), (0xd1, 0x0c), (0xd2, 0x84), (0xd3, 0x90), (0xd4, 0x1e),
    (0x5a, 0x24), (0x5b, 0x1f), (0x5c, 0x88), (0x5d, 0x60), (0xac, 0x6e), (0xbe, 0xff),
    (0xbf, 0x00), (0x70, 0x00), (0x71, 0x34), (0x74, 0x28), (0x75, 0x98), (0x76, 0x00),
    (0x77, 0x08), (0x78, 0x01), (0x79, 0xc2), (0x7d, 0x02), (0x7a, 0x4e), (0x7b, 0x1f),
    (0xec, 0x00), (0x7c, 0x0c), (0x31, 0xa0), (0x32, 0xf0), (0x82, 0x32), (0x11, 0x03),
    (0x50, 0xff), (0x51, 0x7e), (0x52, 0xf0), (0x53, 0x00), (0x20, 0x00), (0x21, 0x84),
    (0xec, 0xc0), (0x8d, 0x7f), (0x8f, 0x84), (0x93, 0x60), (0x95, 0x84), (0x99, 0x50),
    (0x9b, 0x84), (0xec, 0x40), (0x11, 0x01), (0x55, 0x40), (0x2b, 0x5e), (0x2c, 0x02),
    (0x13, 0xff), (0x50, 0x97), (0x51, 0x7e), (0x52, 0x00), (0x21, 0x23), (0xec, 0x40),
    (0x81, 0x3f), (0xda, 0x04), (0xe4, 0x0e), (0xe3, 0x10), (0x13, 0xff), (0x01, 0x84),
    (0x02, 0x4c), (0x03, 0x40), (0x15, 0x00), (0x2d, 0x00), (0x2e, 0x00), (0x80, 0x7f),
    (0x81, 0x7f), (0xda, 0x06), (0xdd, 0x50), (0xde, 0x50),
);
