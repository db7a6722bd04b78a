//! Register addresses, single writes and the `batch!` table macro.

use std::fmt;

/// Sensor register address. Width depends on the sensor family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterAddress {
    /// 8-bit address (OV7740).
    Narrow(u8),
    /// 16-bit address, sent big-endian (OV5640, MT9P111).
    Wide(u16),
}

impl RegisterAddress {
    /// Address bytes as they appear on the wire.
    pub fn to_bytes(self) -> Vec<u8> {
        match self {
            Self::Narrow(a) => vec![a],
            Self::Wide(a) => a.to_be_bytes().to_vec(),
        }
    }

    /// The register `n` positions after this one, keeping the width.
    pub fn offset(self, n: u16) -> Self {
        match self {
            Self::Narrow(a) => Self::Narrow(a.wrapping_add(n as u8)),
            Self::Wide(a) => Self::Wide(a.wrapping_add(n)),
        }
    }
}

impl fmt::Display for RegisterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Narrow(a) => write!(f, "0x{a:02x}"),
            Self::Wide(a) => write!(f, "0x{a:04x}"),
        }
    }
}

/// One register write. Tables of these are compile-time constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterWrite {
    pub addr: RegisterAddress,
    pub value: u8,
}

impl RegisterWrite {
    pub const fn wide(addr: u16, value: u8) -> Self {
        Self {
            addr: RegisterAddress::Wide(addr),
            value,
        }
    }

    pub const fn narrow(addr: u8, value: u8) -> Self {
        Self {
            addr: RegisterAddress::Narrow(addr),
            value,
        }
    }

    /// Framed message: address bytes followed by the value byte.
    pub fn frame(&self) -> Vec<u8> {
        let mut buf = self.addr.to_bytes();
        buf.push(self.value);
        buf
    }
}

impl fmt::Display for RegisterWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=0x{:02x}", self.addr, self.value)
    }
}

/// Ordered register writes sent as one configuration step.
///
/// Order is significant: later writes may depend on earlier ones (clock
/// enables before dependent registers), so batches are never reordered or
/// deduplicated.
pub type RegisterBatch = [RegisterWrite];

/// A register that is written with one of two fixed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    pub on: RegisterWrite,
    pub off: RegisterWrite,
}

impl Toggle {
    pub const fn wide(addr: u16, on: u8, off: u8) -> Self {
        Self {
            on: RegisterWrite::wide(addr, on),
            off: RegisterWrite::wide(addr, off),
        }
    }

    pub const fn narrow(addr: u8, on: u8, off: u8) -> Self {
        Self {
            on: RegisterWrite::narrow(addr, on),
            off: RegisterWrite::narrow(addr, off),
        }
    }

    pub fn select(&self, enable: bool) -> RegisterWrite {
        if enable {
            self.on
        } else {
            self.off
        }
    }
}

/// Build a `&'static RegisterBatch` from `(address, value)` pairs.
///
/// ```ignore
/// static STREAM: &RegisterBatch = batch!(wide: (0x4202, 0x00));
/// ```
macro_rules! batch {
    (wide: $(($addr:expr, $value:expr)),* $(,)?) => {
        &[$($crate::regs::RegisterWrite {
            addr: $crate::regs::RegisterAddress::Wide($addr),
            value: $value,
        }),*]
    };
    (narrow: $(($addr:expr, $value:expr)),* $(,)?) => {
        &[$($crate::regs::RegisterWrite {
            addr: $crate::regs::RegisterAddress::Narrow($addr),
            value: $value,
        }),*]
    };
}

pub(crate) use batch;

#[cfg(test)]
mod tests {
    use super::*;

    static TABLE: &RegisterBatch = batch!(wide: (0x3008, 0x42), (0x3035, 0x21), (0x3008, 0x02));

    #[test]
    fn test_wide_frame_is_big_endian() {
        assert_eq!(RegisterWrite::wide(0x4202, 0x0f).frame(), vec![0x42, 0x02, 0x0f]);
    }

    #[test]
    fn test_narrow_frame() {
        assert_eq!(RegisterWrite::narrow(0x0e, 0xe8).frame(), vec![0x0e, 0xe8]);
    }

    #[test]
    fn test_batch_macro_keeps_order_and_duplicates() {
        assert_eq!(TABLE.len(), 3);
        assert_eq!(TABLE[0], RegisterWrite::wide(0x3008, 0x42));
        assert_eq!(TABLE[2], RegisterWrite::wide(0x3008, 0x02));
    }

    #[test]
    fn test_offset_wraps_within_width() {
        assert_eq!(RegisterAddress::Wide(0x3d05).offset(2), RegisterAddress::Wide(0x3d07));
        assert_eq!(RegisterAddress::Narrow(0xff).offset(1), RegisterAddress::Narrow(0x00));
    }

    #[test]
    fn test_toggle_select() {
        let t = Toggle::wide(0x3a00, 0x7c, 0x78);
        assert_eq!(t.select(true).value, 0x7c);
        assert_eq!(t.select(false).value, 0x78);
    }

    #[test]
    fn test_display() {
        assert_eq!(RegisterWrite::wide(0x3821, 0x01).to_string(), "0x3821=0x01");
        assert_eq!(RegisterAddress::Narrow(0x0c).to_string(), "0x0c");
    }
}
