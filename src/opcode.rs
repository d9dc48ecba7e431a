/// A raw 16-bit instruction word with accessors for the addressing fields.
///
/// ```text
///   F X Y N
///   | | | `-- n   (low nibble)
///   | | `---- y   (register index)
///   | `------ x   (register index)
///   `-------- family
///       `NN-- nn  (low byte)
///     `NNN--- nnn (low 12 bits, an address)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(u16);

impl Opcode {
    pub fn new(word: u16) -> Self {
        Opcode(word)
    }

    /// assemble an opcode from two big-endian bytes, as stored in memory
    pub fn from_bytes(hi: u8, lo: u8) -> Self {
        Opcode(((hi as u16) << 8) | lo as u16)
    }

    pub fn word(&self) -> u16 {
        self.0
    }

    /// top nibble; selects the instruction family
    pub fn family(&self) -> u8 {
        (self.0 >> 12) as u8
    }

    pub fn x(&self) -> usize {
        ((self.0 >> 8) & 0x0f) as usize
    }

    pub fn y(&self) -> usize {
        ((self.0 >> 4) & 0x0f) as usize
    }

    pub fn n(&self) -> u8 {
        (self.0 & 0x000f) as u8
    }

    pub fn nn(&self) -> u8 {
        (self.0 & 0x00ff) as u8
    }

    pub fn nnn(&self) -> u16 {
        self.0 & 0x0fff
    }
}

impl From<u16> for Opcode {
    fn from(word: u16) -> Self {
        Opcode(word)
    }
}

/// wider words are accepted; anything above bit 15 is discarded
impl From<u32> for Opcode {
    fn from(word: u32) -> Self {
        Opcode((word & 0xffff) as u16)
    }
}
