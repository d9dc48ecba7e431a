use std::io;
use thiserror::Error;

/// Everything that can stop the interpreter. All variants are terminal for
/// the cycle that raised them; the host decides whether to reset or quit.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("invalid opcode {opcode:#06x}")]
    DecodeFault { opcode: u16 },

    /// only raised when the interpreter is configured as strict
    #[error("unknown instruction {opcode:#06x} in a known opcode family")]
    UnknownInstruction { opcode: u16 },

    #[error("program counter {pc:#06x} would run past the end of memory")]
    BoundsFault { pc: u16 },

    #[error("load offset {offset} must be non-negative")]
    LoadRange { offset: i64 },

    #[error("key {key:#04x} is not on the hex keypad")]
    InvalidKey { key: u8 },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
