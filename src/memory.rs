use crate::error::{Chip8Error, Result};
use std::io;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents the addressable memory of the machine
pub trait MemoryMap {
    /// write unknown len of data into memory at a particular offset
    fn write_any(&mut self, reader: &mut impl io::Read, offset: i64) -> Result<usize> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.load(buf.as_slice(), offset)
    }

    /// copy as much of `data` as fits between `offset` and the end of memory;
    /// returns how many bytes were copied. a negative offset is rejected
    /// before anything is written
    fn load(&mut self, data: &[u8], offset: i64) -> Result<usize> {
        let start = usize::try_from(offset).map_err(|_| Chip8Error::LoadRange { offset })?;
        let bytes = self.get_rw_slice();
        if start >= bytes.len() {
            return Ok(0);
        }
        let len = data.len().min(bytes.len() - start);
        bytes[start..start + len].copy_from_slice(&data[..len]);
        Ok(len)
    }

    /// anything past the end of memory reads as zero
    fn read_byte(&self, addr: usize) -> u8 {
        self.get_ro_slice().get(addr).copied().unwrap_or(0)
    }

    /// writes past the end of memory are dropped
    fn write_byte(&mut self, addr: usize, value: u8) {
        if let Some(b) = self.get_rw_slice().get_mut(addr) {
            *b = value;
        }
    }

    /// get a big-endian two-byte word (opcode)
    fn get_word(&self, addr: u16) -> u16 {
        let a = addr as usize;
        ((self.read_byte(a) as u16) << 8) | self.read_byte(a + 1) as u16
    }

    fn size(&self) -> usize {
        self.get_ro_slice().len()
    }

    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self) -> &mut [u8];

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self) -> &[u8];
}

/// Defines the CHIP-8 memory map used by this interpreter
///   0x0000-0x004f  font, 16 glyphs of 5 bytes
///   0x0050-0x01ff  reserved
///   0x0200-0x0fff  program
///
/// the call stack and display live outside of addressable memory
#[derive(Clone)]
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
}

impl MemoryMap for Chip8MemoryMap {
    fn get_rw_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
    fn get_ro_slice(&self) -> &[u8] {
        &self.bytes
    }
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded, by convention
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// where the font is loaded; glyph for digit d is at d * CHIP8_GLYPH_SIZE
pub const CHIP8_FONT_ADDR: u16 = 0x0000;

/// bytes per font glyph
pub const CHIP8_GLYPH_SIZE: u16 = 5;

impl Chip8MemoryMap {
    /// all zeroes; no font
    pub fn empty() -> Self {
        Chip8MemoryMap {
            bytes: vec![0u8; CHIP8_RAM_SIZE_BYTES].into_boxed_slice(),
        }
    }

    /// initialises memory with the font baked in at 0x000
    pub fn new() -> Self {
        let mut mm = Chip8MemoryMap::empty();
        let font_addr = CHIP8_FONT_ADDR as usize;
        mm.bytes[font_addr..font_addr + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
        mm
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Chip8MemoryMap::new()
    }
}

#[rustfmt::skip]
pub const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed() {
        let m = Chip8MemoryMap::new();
        // NB. memory is zeroed from 0x50 because before that we bake in the font
        assert!(m.bytes[0x50..].iter().all(|&b| b == 0));
        assert_eq!(m.bytes[..80], CHIP8_FONT);
    }

    #[test]
    fn test_write_any_data_ok() -> Result<()> {
        let mut dst = Chip8MemoryMap::empty();
        let mut src: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7];
        assert_eq!(dst.write_any(&mut src, 8)?, 8);
        assert_eq!(
            dst.bytes[..16],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7]
        );
        Ok(())
    }

    #[test]
    fn test_load_truncates_at_end() -> Result<()> {
        let mut dst = Chip8MemoryMap::empty();
        let copied = dst.load(&[0xaa; 8], 4092)?;
        assert_eq!(copied, 4);
        assert_eq!(dst.bytes[4088..], [0, 0, 0, 0, 0xaa, 0xaa, 0xaa, 0xaa]);
        Ok(())
    }

    #[test]
    fn test_load_past_end_copies_nothing() -> Result<()> {
        let mut dst = Chip8MemoryMap::empty();
        assert_eq!(dst.load(&[1, 2, 3], 4096)?, 0);
        assert_eq!(dst.load(&[1, 2, 3], 10_000)?, 0);
        assert!(dst.bytes.iter().all(|&b| b == 0));
        Ok(())
    }

    #[test]
    fn test_load_negative_offset_rejected() {
        let mut dst = Chip8MemoryMap::new();
        let before = dst.bytes.clone();
        let r = dst.load(&[1, 2, 3], -1);
        assert!(matches!(r, Err(Chip8Error::LoadRange { offset: -1 })));
        assert_eq!(dst.bytes, before);
    }

    #[test]
    fn test_read_word() -> Result<()> {
        let mut m = Chip8MemoryMap::empty();
        m.load(&[0, 1, 2, 3, 4, 5, 6, 7], 0)?;
        assert_eq!(m.get_word(0x4), 0x0405);
        Ok(())
    }

    #[test]
    fn test_read_word_at_top_of_memory() -> Result<()> {
        let mut m = Chip8MemoryMap::empty();
        m.load(&[0x12], 0xfff)?;
        assert_eq!(m.get_word(0xfff), 0x1200);
        Ok(())
    }

    #[test]
    fn test_out_of_range_bytes() {
        let mut m = Chip8MemoryMap::empty();
        m.write_byte(4096, 0xff);
        assert_eq!(m.read_byte(4096), 0);
        assert_eq!(m.size(), CHIP8_RAM_SIZE_BYTES);
    }
}
