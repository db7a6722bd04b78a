//! Board profile database.
//!
//! A board profile says which sensor family is fitted, which bus adapter and
//! addresses it sits on, how it is mounted and whether the board has a
//! torch. Profiles are embedded at compile time from `contrib/boards/*.toml`;
//! a profile can also be loaded from a file for bring-up of new boards.

use crate::sensors::{Interface, SensorFamily};
use crate::slots::Orientation;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

const BOARD_EOCO: &str = include_str!("../../../contrib/boards/eoco.toml");
const BOARD_EVCO: &str = include_str!("../../../contrib/boards/evco.toml");
const BOARD_ROCO: &str = include_str!("../../../contrib/boards/roco.toml");
const BOARD_PICO: &str = include_str!("../../../contrib/boards/pico.toml");
const BOARD_NECO: &str = include_str!("../../../contrib/boards/neco.toml");

static BOARD_DB: OnceLock<Vec<BoardFile>> = OnceLock::new();

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("unknown board: {0}")]
    Unknown(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("bad board TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("board {board}: {reason}")]
    Invalid { board: String, reason: String },
}

/// Top-level board file (one per `contrib/boards/*.toml`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardFile {
    pub board: BoardInfo,
    pub sensor: SensorInfo,
    #[serde(default)]
    pub torch: Option<TorchInfo>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// `[sensor]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SensorInfo {
    pub family: SensorFamily,
    #[serde(default)]
    pub interface: Interface,
    /// `/dev/i2c-N` adapter number.
    pub adapter: u32,
    /// 7-bit addresses of slot 1 and (optionally) slot 2.
    pub addresses: Vec<u8>,
    #[serde(default)]
    pub mounted: MountInfo,
    #[serde(default)]
    pub edge_enhancement: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct MountInfo {
    #[serde(default)]
    pub flip: bool,
    #[serde(default)]
    pub mirror: bool,
}

impl From<MountInfo> for Orientation {
    fn from(m: MountInfo) -> Self {
        Orientation {
            flip: m.flip,
            mirror: m.mirror,
        }
    }
}

/// `[torch]` section: sysfs LED class device name.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TorchInfo {
    pub led: String,
}

impl BoardFile {
    pub fn parse(src: &str) -> Result<Self, BoardError> {
        let board: BoardFile = toml::from_str(src)?;
        board.validate()?;
        Ok(board)
    }

    /// Load a board profile from a TOML file.
    pub fn load(path: &Path) -> Result<Self, BoardError> {
        let src = std::fs::read_to_string(path).map_err(|source| BoardError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&src)
    }

    pub fn is_dual(&self) -> bool {
        self.sensor.addresses.get(1).is_some_and(|&a| a != 0)
    }

    fn validate(&self) -> Result<(), BoardError> {
        let invalid = |reason: &str| BoardError::Invalid {
            board: self.board.name.clone(),
            reason: reason.to_string(),
        };
        match self.sensor.addresses.as_slice() {
            [] => return Err(invalid("no sensor address")),
            [0, ..] => return Err(invalid("slot 1 must be populated")),
            a if a.len() > 2 => return Err(invalid("at most two sensors per bus")),
            _ => {}
        }
        if self.sensor.addresses.iter().any(|&a| a > 0x7f) {
            return Err(invalid("addresses are 7-bit"));
        }
        Ok(())
    }
}

fn board_db() -> &'static Vec<BoardFile> {
    BOARD_DB.get_or_init(|| {
        let mut db = Vec::new();
        for src in [BOARD_EOCO, BOARD_EVCO, BOARD_ROCO, BOARD_PICO, BOARD_NECO] {
            match BoardFile::parse(src) {
                Ok(b) => db.push(b),
                Err(e) => tracing::error!(error = %e, "bad embedded board profile"),
            }
        }
        db
    })
}

/// Look up an embedded board by name.
pub fn lookup_board(name: &str) -> Option<&'static BoardFile> {
    board_db().iter().find(|b| b.board.name == name)
}

/// List all embedded boards.
pub fn list_boards() -> &'static [BoardFile] {
    board_db()
}

/// Resolve a board by embedded name, or by path when it names a `.toml` file.
pub fn resolve_board(name_or_path: &str) -> Result<BoardFile, BoardError> {
    if name_or_path.ends_with(".toml") {
        return BoardFile::load(Path::new(name_or_path));
    }
    lookup_board(name_or_path)
        .cloned()
        .ok_or_else(|| BoardError::Unknown(name_or_path.to_string()))
}
