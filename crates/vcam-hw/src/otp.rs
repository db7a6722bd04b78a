//! Sensor variant detection from factory OTP memory.
//!
//! The OTP block must be read before the first configuration batch: once a
//! mode table is loaded, enabling the OTP block and clock can stop the
//! sensor from streaming. Each slot is therefore read at most once.

use crate::engine::{BusError, BusWriter, Target};
use crate::error::{Error, Result};
use crate::regs::RegisterWrite;
use crate::sensors::{OtpLayout, SensorProfile};
use crate::slots::{CameraSelector, CameraSlot, SensorVariant, Slots};
use std::thread;

/// Classify OTP contents. First match wins: the model string, then the
/// model id byte, then `Standard`.
pub fn classify(otp: &OtpLayout, memory: &[u8]) -> SensorVariant {
    if memory.starts_with(otp.high_k_prefix) {
        return SensorVariant::HighK;
    }
    let id = otp.model_id_offset().and_then(|i| memory.get(i));
    if id == Some(&otp.high_k_model_id) {
        return SensorVariant::HighK;
    }
    SensorVariant::Standard
}

/// Detect the variant of every selected slot that has not been read yet.
///
/// Every slot is attempted; a failure leaves that slot's variant unchanged
/// and the last failure is returned.
pub fn detect(
    writer: &BusWriter,
    profile: &SensorProfile,
    slots: &mut Slots,
    selector: CameraSelector,
) -> Result<()> {
    slots.for_each_keep_last_error(selector, |slot| detect_slot(writer, profile, slot))
}

fn detect_slot(writer: &BusWriter, profile: &SensorProfile, slot: &mut CameraSlot) -> Result<()> {
    if slot.otp_read {
        return Ok(());
    }

    let Some(layout) = profile.otp else {
        slot.otp_read = true;
        slot.variant = SensorVariant::Standard;
        return Ok(());
    };

    if let Some(mode) = slot.mode {
        tracing::warn!(
            slot = %slot.index,
            ?mode,
            "refusing OTP read on a configured sensor"
        );
        return Ok(());
    }

    slot.otp_read = true;
    let memory = read_otp(writer, Target::from(&*slot), layout).map_err(|source| {
        tracing::error!(slot = %slot.index, error = %source, "OTP read failed");
        Error::VariantDetect {
            slot: slot.index,
            source,
        }
    })?;

    slot.variant = classify(layout, &memory);
    tracing::info!(
        slot = %slot.index,
        variant = ?slot.variant,
        model = %String::from_utf8_lossy(&memory[..layout.high_k_prefix.len().min(memory.len())]),
        "sensor variant detected"
    );
    Ok(())
}

/// Unlock the OTP block, read it byte by byte and lock it again.
pub fn read_otp(
    writer: &BusWriter,
    target: Target,
    layout: &OtpLayout,
) -> std::result::Result<Vec<u8>, BusError> {
    let bit = layout.block_bit;

    writer.modify_reg(target, layout.system_reset, bit, 0)?;
    writer.modify_reg(target, layout.clock_enable, bit, bit)?;
    writer.write_reg(target, RegisterWrite { addr: layout.program_ctrl, value: 0 })?;
    writer.write_reg(target, RegisterWrite { addr: layout.read_ctrl, value: 0 })?;
    writer.write_reg(target, RegisterWrite { addr: layout.read_ctrl, value: 1 })?;
    thread::sleep(layout.unlock_settle);

    let memory = (0..layout.len)
        .map(|i| writer.read_reg(target, layout.start.offset(i as u16)))
        .collect::<std::result::Result<Vec<u8>, _>>()?;
    tracing::debug!(slot = %target.index, otp = ?memory, "OTP contents");

    thread::sleep(layout.read_settle);
    writer.write_reg(target, RegisterWrite { addr: layout.read_ctrl, value: 0 })?;
    writer.modify_reg(target, layout.system_reset, bit, bit)?;
    writer.modify_reg(target, layout.clock_enable, bit, 0)?;

    Ok(memory)
}
