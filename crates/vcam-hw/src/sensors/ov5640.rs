//! OmniVision OV5640: 5 MP, 16-bit register addresses, OTP variant detection
//! and three 1280x960 field-of-view crops.

use super::{ExposureLayout, FovProfile, InitStep, OtpLayout, SensorFamily, SensorProfile};
use crate::regs::{batch, RegisterAddress, RegisterBatch, RegisterWrite, Toggle};
use std::time::Duration;

pub static PROFILE: SensorProfile = SensorProfile {
    family: SensorFamily::Ov5640,
    mipi_init: &[InitStep::plain(INIT_9FPS_5MP)],
    parallel_init: &[InitStep::plain(INIT_5MP)],
    parallel_setup: Some(INTERFACE_CSI),
    high_k_tuning: Some(HIGH_K),
    edge_enhancement: Some(RegisterWrite::wide(0x5302, 0x24)),
    stream: Some(Toggle::wide(0x4202, 0x00, 0x0f)),
    flip: Some(Toggle::wide(0x3820, 0x46, 0x40)),
    mirror: Some(Toggle::wide(0x3821, 0x01, 0x07)),
    night_mode: Some(Toggle::wide(0x3a00, 0x7c, 0x78)),
    test_pattern: Some(Toggle::wide(0x503d, 0x80, 0x00)),
    autofocus: Some(Toggle::wide(0x3022, 0x04, 0x00)),
    exposure: Some(ExposureLayout { base: 0x3500 }),
    standby: None,
    fovs: &[
        FovProfile { fov: 54, batch: HFOV54 },
        FovProfile { fov: 39, batch: HFOV39 },
        FovProfile { fov: 28, batch: HFOV28 },
    ],
    default_fov: Some(54),
    otp: Some(&OTP),
    grab_still: None,
    retry_budget: None,
    second_slot_active: false,
};

const OTP: OtpLayout = OtpLayout {
    system_reset: RegisterAddress::Wide(0x3000),
    clock_enable: RegisterAddress::Wide(0x3004),
    block_bit: 1 << 4,
    program_ctrl: RegisterAddress::Wide(0x3d20),
    read_ctrl: RegisterAddress::Wide(0x3d21),
    start: RegisterAddress::Wide(0x3d05),
    len: 0x3d1f - 0x3d05 + 1,
    model_id: RegisterAddress::Wide(0x3d06),
    high_k_model_id: 0x02,
    high_k_prefix: b"OV5640-A71A-K_45039C15",
    unlock_settle: Duration::from_millis(1),
    read_settle: Duration::from_millis(10),
};

/// Tuning for the high-K module variant (93 writes).
const HIGH_K: &RegisterBatch = batch!(wide:
    (0x5180, 0xff), (0x5181, 0xf2), (0x5182, 0x00), (0x5183, 0x14), (0x5184, 0x25),
    (0x5185, 0x24), (0x5186, 0x10), (0x5187, 0x10), (0x5188, 0x10), (0x5189, 0x6d),
    (0x518a, 0x53), (0x518b, 0x90), (0x518c, 0x8c), (0x518d, 0x3b), (0x518e, 0x2c),
    (0x518f, 0x59), (0x5190, 0x42), (0x5191, 0xf8), (0x5192, 0x04), (0x5193, 0x70),
    (0x5194, 0xf0), (0x5195, 0xf0), (0x5196, 0x03), (0x5197, 0x01), (0x5198, 0x04),
    (0x5199, 0x00), (0x519a, 0x04), (0x519b, 0x13), (0x519c, 0x06), (0x519d, 0x9e),
    (0x519e, 0x38), (0x5800, 0x2a), (0x5801, 0x1a), (0x5802, 0x13), (0x5803, 0x13),
    (0x5804, 0x1b), (0x5805, 0x2b), (0x5806, 0x10), (0x5807, 0x09), (0x5808, 0x07),
    (0x5809, 0x07), (0x580a, 0x0a), (0x580b, 0x10), (0x580c, 0x08), (0x580d, 0x03),
    (0x580e, 0x00), (0x580f, 0x00), (0x5810, 0x04), (0x5811, 0x09), (0x5812, 0x09),
    (0x5813, 0x03), (0x5814, 0x00), (0x5815, 0x00), (0x5816, 0x04), (0x5817, 0x09),
    (0x5818, 0x0d), (0x5819, 0x06), (0x581a, 0x03), (0x581b, 0x04), (0x581c, 0x06),
    (0x581d, 0x0d), (0x581e, 0x21), (0x581f, 0x11), (0x5820, 0x0a), (0x5821, 0x0a),
    (0x5822, 0x13), (0x5823, 0x23), (0x5824, 0x13), (0x5825, 0x24), (0x5826, 0x24),
    (0x5827, 0x22), (0x5828, 0x04), (0x5829, 0x10), (0x582a, 0x22), (0x582b, 0x22),
    (0x582c, 0x22), (0x582d, 0x22), (0x582e, 0x10), (0x582f, 0x22), (0x5830, 0x42),
    (0x5831, 0x22), (0x5832, 0x22), (0x5833, 0x10), (0x5834, 0x22), (0x5835, 0x22),
    (0x5836, 0x22), (0x5837, 0x00), (0x5838, 0x12), (0x5839, 0x12), (0x583a, 0x10),
    (0x583b, 0x10), (0x583c, 0x02), (0x583d, 0xce),
);

/// Parallel (DVP) interface bring-up, written once per power-up.
const INTERFACE_CSI: &RegisterBatch = batch!(wide:
    (0x3103, 0x11), (0x3008, 0x42), (0x3103, 0x03), (0x3017, 0xff), (0x3018, 0xff),
    (0x3034, 0x1a), (0x3035, 0x21), (0x3037, 0x13), (0x3108, 0x01), (0x302d, 0x60),
    (0x3630, 0x36), (0x3631, 0x0e), (0x3632, 0xe2), (0x3633, 0x12), (0x3621, 0xe0),
    (0x3704, 0xa0), (0x3703, 0x5a), (0x3715, 0x78), (0x3717, 0x01), (0x370b, 0x60),
    (0x3705, 0x1a), (0x3905, 0x02), (0x3906, 0x10), (0x3901, 0x0a), (0x3731, 0x12),
    (0x3620, 0x52), (0x371b, 0x20), (0x3635, 0x13), (0x3636, 0x03), (0x3634, 0x40),
    (0x3622, 0x01), (0x471c, 0x50), (0x4050, 0x6e), (0x4051, 0x8f), (0x302e, 0x00),
    (0x5025, 0x00), (0x3824, 0x06), (0x3a13, 0x43), (0x3a18, 0x00), (0x3a19, 0xf8),
    (0x3c01, 0x34), (0x3c05, 0x98), (0x3c06, 0x00), (0x3c08, 0x00), (0x3c09, 0x1c),
    (0x3c0a, 0x9c), (0x3c0b, 0x40), (0x3820, 0x47), (0x3a08, 0x01), (0x3a09, 0x27),
    (0x3a0a, 0x00), (0x3a0b, 0xf6), (0x4001, 0x02), (0x4004, 0x02), (0x300e, 0x58),
    (0x4300, 0x32), (0x501f, 0x00), (0x4713, 0x02), (0x4407, 0x04), (0x440e, 0x00),
    (0x460b, 0x35), (0x460c, 0x22), (0x471d, 0x00), (0x4740, 0x21), (0x5000, 0xa7),
    (0x5180, 0xff), (0x5181, 0xf2), (0x5182, 0x00), (0x5183, 0x14), (0x5184, 0x25),
    (0x5185, 0x24), (0x5186, 0x09), (0x5187, 0x09), (0x5188, 0x09), (0x5189, 0x75),
    (0x518a, 0x54), (0x518b, 0xe0), (0x518c, 0xb2), (0x518d, 0x42), (0x518e, 0x3d),
    (0x518f, 0x56), (0x5190, 0x46), (0x5191, 0xf8), (0x5192, 0x04), (0x5193, 0x70),
    (0x5194, 0xf0), (0x5195, 0xf0), (0x5196, 0x03), (0x5197, 0x01), (0x5198, 0x04),
    (0x5199, 0x12), (0x519a, 0x04), (0x519b, 0x00), (0x519c, 0x06), (0x519d, 0x82),
    (0x519e, 0x38), (0x5381, 0x1e), (0x5382, 0x5b), (0x5383, 0x08), (0x5384, 0x0a),
    (0x5385, 0x7e), (0x5386, 0x88), (0x5387, 0x7c), (0x5388, 0x6c), (0x5389, 0x10),
    (0x538a, 0x01), (0x538b, 0x98), (0x5300, 0x08), (0x5301, 0x30), (0x5302, 0x10),
    (0x5303, 0x00), (0x5304, 0x08), (0x5305, 0x30), (0x5306, 0x08), (0x5307, 0x16),
    (0x5309, 0x08), (0x530a, 0x30), (0x530b, 0x04), (0x530c, 0x06), (0x5480, 0x01),
    (0x5481, 0x08), (0x5482, 0x14), (0x5483, 0x28), (0x5484, 0x51), (0x5485, 0x65),
    (0x5486, 0x71), (0x5487, 0x7d), (0x5488, 0x87), (0x5489, 0x91), (0x548a, 0x9a),
    (0x548b, 0xaa), (0x548c, 0xb8), (0x548d, 0xcd), (0x548e, 0xdd), (0x548f, 0xea),
    (0x5490, 0x1d), (0x5580, 0x02), (0x5583, 0x40), (0x5584, 0x10), (0x5589, 0x10),
    (0x558a, 0x00), (0x558b, 0xf8), (0x5800, 0x3f), (0x5801, 0x21), (0x5802, 0x13),
    (0x5803, 0x11), (0x5804, 0x1a), (0x5805, 0x29), (0x5806, 0x19), (0x5807, 0x0c),
    (0x5808, 0x06), (0x5809, 0x04), (0x580a, 0x08), (0x580b, 0x18), (0x580c, 0x12),
    (0x580d, 0x06), (0x580e, 0x01), (0x580f, 0x00), (0x5810, 0x04), (0x5811, 0x0e),
    (0x5812, 0x13), (0x5813, 0x07), (0x5814, 0x01), (0x5815, 0x01), (0x5816, 0x05),
    (0x5817, 0x11), (0x5818, 0x1e), (0x5819, 0x10), (0x581a, 0x0a), (0x581b, 0x09),
    (0x581c, 0x0f), (0x581d, 0x1d), (0x581e, 0x3f), (0x581f, 0x2d), (0x5820, 0x1e),
    (0x5821, 0x1f), (0x5822, 0x29), (0x5823, 0x3f), (0x5824, 0x16), (0x5825, 0x18),
    (0x5826, 0x09), (0x5827, 0x17), (0x5828, 0x1a), (0x5829, 0x29), (0x582a, 0x27),
    (0x582b, 0x25), (0x582c, 0x27), (0x582d, 0x17), (0x582e, 0x19), (0x582f, 0x43),
    (0x5830, 0x50), (0x5831, 0x32), (0x5832, 0x29), (0x5833, 0x2b), (0x5834, 0x38),
    (0x5835, 0x36), (0x5836, 0x27), (0x5837, 0x28), (0x5838, 0x28), (0x5839, 0x2a),
    (0x583a, 0x1e), (0x583b, 0x2a), (0x583c, 0x47), (0x583d, 0xce), (0x3a0f, 0x30),
    (0x3a10, 0x28), (0x3a1b, 0x30), (0x3a1e, 0x26), (0x3a11, 0x60), (0x3a1f, 0x14),
    (0x5001, 0xa3), (0x3008, 0x02),
);

/// Full-resolution init, parallel (DVP) interface.
const INIT_5MP: &RegisterBatch = batch!(wide:
    (0x3103, 0x11), (0x3008, 0x82), (0x3008, 0x42), (0x3103, 0x03), (0x3017, 0xff),
    (0x3018, 0xff), (0x3034, 0x1a), (0x3035, 0x21), (0x3036, 0x69), (0x3037, 0x13),
    (0x3108, 0x01), (0x3630, 0x36), (0x3631, 0x0e), (0x3632, 0xe2), (0x3633, 0x12),
    (0x3621, 0xe0), (0x3704, 0xa0), (0x3703, 0x5a), (0x3715, 0x78), (0x3717, 0x01),
    (0x370b, 0x60), (0x3705, 0x1a), (0x3905, 0x02), (0x3906, 0x10), (0x3901, 0x0a),
    (0x3731, 0x12), (0x3600, 0x08), (0x3601, 0x33), (0x302d, 0x60), (0x3620, 0x52),
    (0x371b, 0x20), (0x471c, 0x50), (0x3a13, 0x43), (0x3a18, 0x00), (0x3a19, 0xf8),
    (0x3635, 0x13), (0x3636, 0x03), (0x3634, 0x40), (0x3622, 0x01), (0x3c01, 0x34),
    (0x3c04, 0x28), (0x3c05, 0x98), (0x3c06, 0x00), (0x3c07, 0x07), (0x3c08, 0x00),
    (0x3c09, 0x1c), (0x3c0a, 0x9c), (0x3c0b, 0x40), (0x3821, 0x06), (0x3814, 0x11),
    (0x3815, 0x11), (0x3800, 0x00), (0x3801, 0x00), (0x3802, 0x00), (0x3803, 0x00),
    (0x3804, 0x0a), (0x3805, 0x3f), (0x3806, 0x07), (0x3807, 0x9f), (0x3808, 0x0a),
    (0x3809, 0x20), (0x380a, 0x07), (0x380b, 0x98), (0x380c, 0x0b), (0x380d, 0x1c),
    (0x380e, 0x07), (0x380f, 0xb0), (0x3810, 0x00), (0x3811, 0x10), (0x3812, 0x00),
    (0x3813, 0x04), (0x3618, 0x04), (0x3612, 0x2b), (0x3708, 0x63), (0x3709, 0x12),
    (0x370c, 0x00), (0x3a02, 0x07), (0x3a03, 0xb0), (0x3a08, 0x01), (0x3a09, 0x27),
    (0x3a0a, 0x00), (0x3a0b, 0xf6), (0x3a0e, 0x06), (0x3a0d, 0x08), (0x3a14, 0x07),
    (0x3a15, 0xb0), (0x4001, 0x02), (0x4004, 0x06), (0x4050, 0x6e), (0x4051, 0x8f),
    (0x3000, 0x00), (0x3002, 0x1c), (0x3004, 0xff), (0x3006, 0xc3), (0x300e, 0x58),
    (0x302e, 0x00), (0x4300, 0x30), (0x4837, 0x2c), (0x501f, 0x00), (0x5684, 0x0a),
    (0x5685, 0x20), (0x5686, 0x07), (0x5687, 0x98), (0x440e, 0x00), (0x5000, 0xa7),
    (0x5001, 0x83), (0x5180, 0xff), (0x5181, 0xf2), (0x5182, 0x00), (0x5183, 0x14),
    (0x5184, 0x25), (0x5185, 0x24), (0x5186, 0x09), (0x5187, 0x09), (0x5188, 0x09),
    (0x5189, 0x75), (0x518a, 0x54), (0x518b, 0xe0), (0x518c, 0xb2), (0x518d, 0x42),
    (0x518e, 0x3d), (0x518f, 0x56), (0x5190, 0x46), (0x5191, 0xf8), (0x5192, 0x04),
    (0x5193, 0x70), (0x5194, 0xf0), (0x5195, 0xf0), (0x5196, 0x03), (0x5197, 0x01),
    (0x5198, 0x04), (0x5199, 0x12), (0x519a, 0x04), (0x519b, 0x00), (0x519c, 0x06),
    (0x519d, 0x82), (0x519e, 0x38), (0x5381, 0x1e), (0x5382, 0x5b), (0x5383, 0x08),
    (0x5384, 0x0a), (0x5385, 0x7e), (0x5386, 0x88), (0x5387, 0x7c), (0x5388, 0x6c),
    (0x5389, 0x10), (0x538a, 0x01), (0x538b, 0x98), (0x5300, 0x08), (0x5301, 0x30),
    (0x5302, 0x10), (0x5303, 0x00), (0x5304, 0x08), (0x5305, 0x30), (0x5306, 0x08),
    (0x5307, 0x16), (0x5309, 0x08), (0x530a, 0x30), (0x530b, 0x04), (0x530c, 0x06),
    (0x5480, 0x01), (0x5481, 0x08), (0x5482, 0x14), (0x5483, 0x28), (0x5484, 0x51),
    (0x5485, 0x65), (0x5486, 0x71), (0x5487, 0x7d), (0x5488, 0x87), (0x5489, 0x91),
    (0x548a, 0x9a), (0x548b, 0xaa), (0x548c, 0xb8), (0x548d, 0xcd), (0x548e, 0xdd),
    (0x548f, 0xea), (0x5490, 0x1d), (0x5580, 0x02), (0x5583, 0x40), (0x5584, 0x10),
    (0x5589, 0x10), (0x558a, 0x00), (0x558b, 0xf8), (0x5800, 0x23), (0x5801, 0x14),
    (0x5802, 0x0f), (0x5803, 0x0f), (0x5804, 0x12), (0x5805, 0x26), (0x5806, 0x0c),
    (0x5807, 0x08), (0x5808, 0x05), (0x5809, 0x05), (0x580a, 0x08), (0x580b, 0x0d),
    (0x580c, 0x08), (0x580d, 0x03), (0x580e, 0x00), (0x580f, 0x00), (0x5810, 0x03),
    (0x5811, 0x09), (0x5812, 0x07), (0x5813, 0x03), (0x5814, 0x00), (0x5815, 0x01),
    (0x5816, 0x03), (0x5817, 0x08), (0x5818, 0x0d), (0x5819, 0x08), (0x581a, 0x05),
    (0x581b, 0x06), (0x581c, 0x08), (0x581d, 0x0e), (0x581e, 0x29), (0x581f, 0x17),
    (0x5820, 0x11), (0x5821, 0x11), (0x5822, 0x15), (0x5823, 0x28), (0x5824, 0x46),
    (0x5825, 0x26), (0x5826, 0x08), (0x5827, 0x26), (0x5828, 0x64), (0x5829, 0x26),
    (0x582a, 0x24), (0x582b, 0x22), (0x582c, 0x24), (0x582d, 0x24), (0x582e, 0x06),
    (0x582f, 0x22), (0x5830, 0x40), (0x5831, 0x42), (0x5832, 0x24), (0x5833, 0x26),
    (0x5834, 0x24), (0x5835, 0x22), (0x5836, 0x22), (0x5837, 0x26), (0x5838, 0x44),
    (0x5839, 0x24), (0x583a, 0x26), (0x583b, 0x28), (0x583c, 0x42), (0x583d, 0xce),
    (0x5025, 0x00), (0x3a0f, 0x30), (0x3a10, 0x28), (0x3a1b, 0x30), (0x3a1e, 0x26),
    (0x3a11, 0x60), (0x3a1f, 0x14), (0x3008, 0x02), (0x471d, 0x00), (0x4740, 0x21),
    (0x4300, 0x32), (0x501f, 0x00), (0x3820, 0x47), (0x3035, 0x21), (0x3821, 0x01),
);

/// Full-resolution init at 9 fps, MIPI interface.
const INIT_9FPS_5MP: &RegisterBatch = batch!(wide:
    (0x3103, 0x11), (0x3008, 0x82), (0x3008, 0x42), (0x3103, 0x03), (0x3017, 0x00),
    (0x3018, 0x00), (0x3034, 0x18), (0x3035, 0x11), (0x3036, 0x34), (0x3037, 0x13),
    (0x3108, 0x01), (0x3630, 0x36), (0x3631, 0x0e), (0x3632, 0xe2), (0x3633, 0x12),
    (0x3621, 0xe0), (0x3704, 0xa0), (0x3703, 0x5a), (0x3715, 0x78), (0x3717, 0x01),
    (0x370b, 0x60), (0x3705, 0x1a), (0x3905, 0x02), (0x3906, 0x10), (0x3901, 0x0a),
    (0x3731, 0x12), (0x3600, 0x08), (0x3601, 0x33), (0x302d, 0x60), (0x3620, 0x52),
    (0x371b, 0x20), (0x471c, 0x50), (0x3a13, 0x43), (0x3a17, 0x03), (0x3a18, 0x03),
    (0x3a19, 0xc0), (0x3635, 0x13), (0x3636, 0x03), (0x3634, 0x40), (0x3622, 0x01),
    (0x3c01, 0x34), (0x3c04, 0x28), (0x3c05, 0x98), (0x3c06, 0x00), (0x3c07, 0x07),
    (0x3c08, 0x00), (0x3c09, 0x1c), (0x3c0a, 0x9c), (0x3c0b, 0x40), (0x3820, 0x40),
    (0x3821, 0x07), (0x3814, 0x11), (0x3815, 0x11), (0x3800, 0x00), (0x3801, 0x00),
    (0x3802, 0x00), (0x3803, 0x00), (0x3804, 0x0a), (0x3805, 0x3f), (0x3806, 0x07),
    (0x3807, 0x9f), (0x3808, 0x0a), (0x3809, 0x20), (0x380a, 0x07), (0x380b, 0x98),
    (0x380c, 0x0b), (0x380d, 0x1c), (0x380e, 0x07), (0x380f, 0xb0), (0x3810, 0x00),
    (0x3811, 0x10), (0x3812, 0x00), (0x3813, 0x04), (0x3618, 0x04), (0x3612, 0x2b),
    (0x3708, 0x64), (0x3709, 0x12), (0x370c, 0x00), (0x3a00, 0x7c), (0x3a01, 0x01),
    (0x3a02, 0x0f), (0x3a03, 0xff), (0x3a05, 0x70), (0x3a08, 0x01), (0x3a09, 0x27),
    (0x3a0a, 0x00), (0x3a0b, 0xf6), (0x3a0e, 0x06), (0x3a0d, 0x08), (0x3a14, 0xff),
    (0x3a15, 0xff), (0x4001, 0x02), (0x4004, 0x06), (0x3000, 0x20), (0x3002, 0x1c),
    (0x3004, 0xdf), (0x3006, 0xc3), (0x300e, 0x45), (0x302e, 0x08), (0x4300, 0x32),
    (0x4837, 0x0a), (0x501f, 0x00), (0x440e, 0x00), (0x5000, 0xa7), (0x5001, 0x83),
    (0x5180, 0xff), (0x5181, 0xf2), (0x5182, 0x00), (0x5183, 0x14), (0x5184, 0x25),
    (0x5185, 0x24), (0x5186, 0x0b), (0x5187, 0x0f), (0x5188, 0x0c), (0x5189, 0x72),
    (0x518a, 0x63), (0x518b, 0xbb), (0x518c, 0x8c), (0x518d, 0x3c), (0x518e, 0x3c),
    (0x518f, 0x48), (0x5190, 0x45), (0x5191, 0xf8), (0x5192, 0x04), (0x5193, 0x70),
    (0x5194, 0xf0), (0x5195, 0xf0), (0x5196, 0x03), (0x5197, 0x01), (0x5198, 0x06),
    (0x5199, 0x9b), (0x519a, 0x04), (0x519b, 0x00), (0x519c, 0x04), (0x519d, 0x14),
    (0x519e, 0x38), (0x5381, 0x1e), (0x5382, 0x5b), (0x5383, 0x08), (0x5384, 0x0a),
    (0x5385, 0x7e), (0x5386, 0x88), (0x5387, 0x7c), (0x5388, 0x6c), (0x5389, 0x10),
    (0x538a, 0x01), (0x538b, 0x98), (0x5300, 0x08), (0x5301, 0x30), (0x5302, 0x10),
    (0x5303, 0x00), (0x5304, 0x08), (0x5305, 0x30), (0x5306, 0x08), (0x5307, 0x16),
    (0x5309, 0x08), (0x530a, 0x30), (0x530b, 0x04), (0x530c, 0x06), (0x5480, 0x01),
    (0x5481, 0x1f), (0x5482, 0x2a), (0x5483, 0x3c), (0x5484, 0x61), (0x5485, 0x73),
    (0x5486, 0x7e), (0x5487, 0x88), (0x5488, 0x91), (0x5489, 0x9a), (0x548a, 0xa2),
    (0x548b, 0xb1), (0x548c, 0xbd), (0x548d, 0xd0), (0x548e, 0xdf), (0x548f, 0xea),
    (0x5490, 0x1d), (0x5580, 0x02), (0x5583, 0x40), (0x5584, 0x10), (0x5589, 0x10),
    (0x558a, 0x00), (0x558b, 0xf8), (0x5800, 0x23), (0x5801, 0x14), (0x5802, 0x0f),
    (0x5803, 0x0f), (0x5804, 0x12), (0x5805, 0x26), (0x5806, 0x0c), (0x5807, 0x08),
    (0x5808, 0x07), (0x5809, 0x07), (0x580a, 0x08), (0x580b, 0x0d), (0x580c, 0x08),
    (0x580d, 0x03), (0x580e, 0x01), (0x580f, 0x01), (0x5810, 0x07), (0x5811, 0x09),
    (0x5812, 0x07), (0x5813, 0x03), (0x5814, 0x01), (0x5815, 0x01), (0x5816, 0x07),
    (0x5817, 0x08), (0x5818, 0x0d), (0x5819, 0x08), (0x581a, 0x05), (0x581b, 0x06),
    (0x581c, 0x08), (0x581d, 0x0e), (0x581e, 0x29), (0x581f, 0x17), (0x5820, 0x11),
    (0x5821, 0x11), (0x5822, 0x15), (0x5823, 0x28), (0x5824, 0x46), (0x5825, 0x26),
    (0x5826, 0x08), (0x5827, 0x26), (0x5828, 0x64), (0x5829, 0x26), (0x582a, 0x24),
    (0x582b, 0x21), (0x582c, 0x02), (0x582d, 0x24), (0x582e, 0x06), (0x582f, 0x21),
    (0x5830, 0x30), (0x5831, 0x21), (0x5832, 0x24), (0x5833, 0x26), (0x5834, 0x24),
    (0x5835, 0x21), (0x5836, 0x22), (0x5837, 0x26), (0x5838, 0x44), (0x5839, 0x24),
    (0x583a, 0x26), (0x583b, 0x28), (0x583c, 0x42), (0x583d, 0xff), (0x5025, 0x00),
    (0x3a0f, 0x30), (0x3a10, 0x28), (0x3a1b, 0x30), (0x3a1e, 0x26), (0x3a11, 0x60),
    (0x3a1f, 0x14), (0x3008, 0x02),
);

const HFOV54: &RegisterBatch = batch!(wide:
    (0x3008, 0x42), (0x3035, 0x21), (0x3036, 0x5c), (0x3c07, 0x07), (0x3c09, 0x1c),
    (0x3c0a, 0x9c), (0x3c0b, 0x40), (0x3814, 0x31), (0x3815, 0x31), (0x3800, 0x00),
    (0x3801, 0x00), (0x3802, 0x00), (0x3803, 0x04), (0x3804, 0x0a), (0x3805, 0x3f),
    (0x3806, 0x07), (0x3807, 0x9b), (0x3808, 0x05), (0x3809, 0x00), (0x380a, 0x03),
    (0x380b, 0xc0), (0x380c, 0x06), (0x380d, 0x40), (0x380e, 0x03), (0x380f, 0xd8),
    (0x3810, 0x00), (0x3811, 0x10), (0x3812, 0x00), (0x3813, 0x00), (0x3618, 0x00),
    (0x3612, 0x29), (0x3708, 0x64), (0x3709, 0x52), (0x370c, 0x03), (0x3a02, 0x0f),
    (0x3a03, 0xff), (0x3a08, 0x01), (0x3a09, 0xbc), (0x3a0a, 0x01), (0x3a0b, 0x72),
    (0x3a0e, 0x06), (0x3a0d, 0x02), (0x3a14, 0x0f), (0x3a15, 0xff), (0x4001, 0x02),
    (0x4004, 0x02), (0x4713, 0x02), (0x4407, 0x04), (0x460b, 0x37), (0x460c, 0x20),
    (0x3824, 0x04), (0x5001, 0x83), (0x4005, 0x1a), (0x3008, 0x02), (0x3503, 0x00),
    (0x5688, 0x11), (0x5689, 0x11), (0x568a, 0x11), (0x568b, 0x11), (0x568c, 0x11),
    (0x568d, 0x11), (0x568e, 0x11), (0x568f, 0x11), (0x5186, 0x0b), (0x5187, 0x0f),
    (0x5188, 0x0c), (0x5189, 0x72), (0x518a, 0x63), (0x518e, 0x3c), (0x518f, 0x48),
    (0x5190, 0x45), (0x5198, 0x06), (0x5199, 0x9b), (0x519c, 0x04), (0x519d, 0x14),
);

const HFOV39: &RegisterBatch = batch!(wide:
    (0x3008, 0x42), (0x3035, 0x12), (0x3036, 0x60), (0x3c07, 0x07), (0x3c09, 0x1c),
    (0x3c0a, 0x9c), (0x3c0b, 0x40), (0x3814, 0x11), (0x3815, 0x11), (0x3800, 0x01),
    (0x3801, 0x8c), (0x3802, 0x01), (0x3803, 0x26), (0x3804, 0x08), (0x3805, 0xb3),
    (0x3806, 0x06), (0x3807, 0x77), (0x3808, 0x05), (0x3809, 0x00), (0x380a, 0x03),
    (0x380b, 0xc0), (0x380c, 0x08), (0x380d, 0x00), (0x380e, 0x06), (0x380f, 0x00),
    (0x3810, 0x00), (0x3811, 0x10), (0x3812, 0x00), (0x3813, 0x06), (0x3618, 0x00),
    (0x3612, 0x29), (0x3708, 0x64), (0x3709, 0x52), (0x370c, 0x03), (0x3a02, 0x0f),
    (0x3a03, 0xff), (0x3a08, 0x01), (0x3a09, 0xbc), (0x3a0a, 0x01), (0x3a0b, 0x72),
    (0x3a0e, 0x06), (0x3a0d, 0x02), (0x3a14, 0x0f), (0x3a15, 0xff), (0x4001, 0x02),
    (0x4004, 0x02), (0x4713, 0x02), (0x4407, 0x04), (0x460b, 0x37), (0x460c, 0x20),
    (0x3824, 0x04), (0x5001, 0xa3), (0x4005, 0x1a), (0x3008, 0x02), (0x3503, 0x00),
    (0x5688, 0x11), (0x5689, 0x11), (0x568a, 0x11), (0x568b, 0x11), (0x568c, 0x11),
    (0x568d, 0x11), (0x568e, 0x11), (0x568f, 0x11), (0x5186, 0x10), (0x5187, 0x14),
    (0x5188, 0x10), (0x5189, 0x7d), (0x518a, 0x6b), (0x518e, 0x3a), (0x518f, 0x4d),
    (0x5190, 0x47), (0x5198, 0x04), (0x5199, 0x4d), (0x519c, 0x08), (0x519d, 0x82),
);

const HFOV28: &RegisterBatch = batch!(wide:
    (0x3008, 0x42), (0x3035, 0x21), (0x3036, 0x5c), (0x3c07, 0x07), (0x3c09, 0x1c),
    (0x3c0a, 0x9c), (0x3c0b, 0x40), (0x3814, 0x11), (0x3815, 0x11), (0x3800, 0x02),
    (0x3801, 0x90), (0x3802, 0x01), (0x3803, 0xec), (0x3804, 0x07), (0x3805, 0xaf),
    (0x3806, 0x05), (0x3807, 0xb3), (0x3808, 0x05), (0x3809, 0x00), (0x380a, 0x03),
    (0x380b, 0xc0), (0x380c, 0x06), (0x380d, 0x00), (0x380e, 0x03), (0x380f, 0xd8),
    (0x3810, 0x00), (0x3811, 0x10), (0x3812, 0x00), (0x3813, 0x04), (0x3618, 0x00),
    (0x3612, 0x29), (0x3708, 0x64), (0x3709, 0x52), (0x370c, 0x03), (0x3a02, 0x0f),
    (0x3a03, 0xff), (0x3a08, 0x01), (0x3a09, 0xbc), (0x3a0a, 0x01), (0x3a0b, 0x72),
    (0x3a0e, 0x06), (0x3a0d, 0x02), (0x3a14, 0x0f), (0x3a15, 0xff), (0x4001, 0x02),
    (0x4004, 0x02), (0x4713, 0x02), (0x4407, 0x04), (0x460b, 0x37), (0x460c, 0x20),
    (0x3824, 0x04), (0x5001, 0x83), (0x4005, 0x1a), (0x3008, 0x02), (0x3503, 0x00),
    (0x5688, 0x33), (0x5689, 0x33), (0x568a, 0x53), (0x568b, 0x35), (0x568c, 0x53),
    (0x568d, 0x35), (0x568e, 0x33), (0x568f, 0x33), (0x5186, 0x0b), (0x5187, 0x0f),
    (0x5188, 0x0c), (0x5189, 0x72), (0x518a, 0x63), (0x518e, 0x3c), (0x518f, 0x48),
    (0x5190, 0x45), (0x5198, 0x06), (0x5199, 0x9b), (0x519c, 0x04), (0x519d, 0x14),
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes() {
        assert_eq!(HIGH_K.len(), 93);
        assert_eq!(INIT_5MP.len(), 260);
        assert_eq!(INIT_9FPS_5MP.len(), 252);
        assert_eq!(INTERFACE_CSI.len(), 212);
        for fov in PROFILE.fovs {
            assert_eq!(fov.batch.len(), 75, "fov {}", fov.fov);
        }
    }

    #[test]
    fn test_otp_window_covers_model_id() {
        assert_eq!(OTP.len, 27);
        assert!(OTP.high_k_prefix.len() <= OTP.len);
    }

    #[test]
    fn test_fov_batches_are_wide() {
        for fov in PROFILE.fovs {
            assert!(fov
                .batch
                .iter()
                .all(|w| matches!(w.addr, RegisterAddress::Wide(_))));
        }
    }
}
