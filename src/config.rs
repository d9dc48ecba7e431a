use crate::memory::CHIP8_PROGRAM_ADDR;

/// Knobs the host sets once, when the interpreter is created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip8Config {
    /// fault on unknown instructions within a known family, rather than
    /// skipping them like the reference interpreter does
    pub strict: bool,
    /// fixed seed for the random-number instruction; entropy if unset
    pub seed: Option<u64>,
    /// where programs are loaded, and where execution starts
    pub program_addr: u16,
}

impl Default for Chip8Config {
    fn default() -> Self {
        Chip8Config {
            strict: false,
            seed: None,
            program_addr: CHIP8_PROGRAM_ADDR,
        }
    }
}

impl Chip8Config {
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}
