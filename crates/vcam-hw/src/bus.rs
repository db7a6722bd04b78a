//! Raw I²C transfer primitive.
//!
//! The engine only needs "send one framed message to a 7-bit address,
//! all-or-nothing". [`I2cTransfer`] is that primitive; [`LinuxI2c`] is the
//! production backend on top of the kernel's `i2c-dev` `I2C_RDWR` ioctl.

use std::os::unix::io::AsRawFd;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// `I2C_RDWR` from `<linux/i2c-dev.h>`: combined read/write transfer.
const I2C_RDWR: libc::c_ulong = 0x0707;

/// `I2C_M_RD` from `<linux/i2c.h>`: message is a read.
const I2C_M_RD: u16 = 0x0001;

/// Mirror of `struct i2c_msg` from `<linux/i2c.h>`.
///
/// Layout: addr:u16 flags:u16 len:u16 <pad> buf:*mut u8
/// 16 bytes on 64-bit targets, 12 on 32-bit; checked by the assert below.
#[repr(C)]
struct I2cMsg {
    addr: u16,
    flags: u16,
    len: u16,
    buf: *mut u8,
}

/// Mirror of `struct i2c_rdwr_ioctl_data` from `<linux/i2c-dev.h>`.
#[repr(C)]
struct I2cRdwrIoctlData {
    msgs: *mut I2cMsg,
    nmsgs: u32,
}

const _SIZE_ASSERT: () = assert!(
    std::mem::size_of::<I2cMsg>() == 8 + std::mem::size_of::<usize>(),
    "I2cMsg must match the kernel's struct i2c_msg"
);

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("failed to open bus {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("I2C_RDWR ioctl to 0x{addr:02x} failed: {source}")]
    Ioctl { addr: u8, source: std::io::Error },
    #[error("message too long ({0} bytes)")]
    TooLong(usize),
    #[error("device 0x{0:02x} did not acknowledge")]
    Nack(u8),
}

/// One framed bus message.
#[derive(Debug)]
pub enum Message<'a> {
    Write(&'a [u8]),
    Read(&'a mut [u8]),
}

/// Blocking "transfer one framed message" primitive.
///
/// Implementations report success only if the whole message went through.
pub trait I2cTransfer: Send {
    fn transfer(&mut self, addr: u8, msg: Message<'_>) -> Result<(), TransferError>;
}

/// Linux `i2c-dev` adapter (`/dev/i2c-N`).
pub struct LinuxI2c {
    path: String,
    file: std::fs::File,
}

impl LinuxI2c {
    /// Open `/dev/i2c-{adapter}` for read+write.
    pub fn open(adapter: u32) -> Result<Self, TransferError> {
        let path = format!("/dev/i2c-{adapter}");
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| TransferError::Open {
                path: path.clone(),
                source,
            })?;
        tracing::info!(path = %path, "opened i2c adapter");
        Ok(Self { path, file })
    }

    /// Device node this adapter was opened from.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl I2cTransfer for LinuxI2c {
    fn transfer(&mut self, addr: u8, msg: Message<'_>) -> Result<(), TransferError> {
        let (flags, len, buf) = match msg {
            Message::Write(bytes) => (0, bytes.len(), bytes.as_ptr() as *mut u8),
            Message::Read(bytes) => (I2C_M_RD, bytes.len(), bytes.as_mut_ptr()),
        };
        let len = u16::try_from(len).map_err(|_| TransferError::TooLong(len))?;

        let mut raw = I2cMsg {
            addr: u16::from(addr),
            flags,
            len,
            buf,
        };
        let mut data = I2cRdwrIoctlData {
            msgs: &mut raw,
            nmsgs: 1,
        };

        // SAFETY:
        // - fd is valid for the lifetime of `self.file`
        // - `data` and `raw` are repr(C), matching the kernel ABI
        // - `buf` points at `len` bytes that outlive this call; for writes the
        //   kernel only reads through it despite the `*mut` in the ABI
        let ret = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                I2C_RDWR,
                &mut data as *mut I2cRdwrIoctlData,
            )
        };

        if ret < 0 {
            Err(TransferError::Ioctl {
                addr,
                source: std::io::Error::last_os_error(),
            })
        } else {
            Ok(())
        }
    }
}

/// Adapter handle shared by the dispatcher and the night-mode worker.
///
/// The inner lock is held for a single message only, like the kernel's
/// adapter lock; it is not the device serialization lock.
#[derive(Clone)]
pub struct SharedBus {
    inner: Arc<Mutex<Box<dyn I2cTransfer>>>,
}

impl SharedBus {
    pub fn new(bus: impl I2cTransfer + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(bus))),
        }
    }

    pub fn transfer(&self, addr: u8, msg: Message<'_>) -> Result<(), TransferError> {
        let mut bus = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        bus.transfer(addr, msg)
    }
}
