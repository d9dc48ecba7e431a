//! # machine
//!
//! Everything a CHIP-8 program can see or touch:
//!  * 4K of memory, font at 0x000, program at 0x200
//!  * V0-VF, sixteen 8-bit registers. VF doubles as carry / borrow /
//!    collision flag and gets clobbered by arithmetic and draws
//!  * I, the address register; stored in 16 bits, always masked to 12
//!  * the program counter, which must stay inside memory
//!  * an unbounded call stack of return addresses
//!  * delay and sound timers, ticked by the host at 60Hz
//!  * the hex keypad and the 64x32 framebuffer
//!
//! All mutation goes through the methods here so the masking rules live in
//! one place. Instructions get a `&mut Machine` and nothing else.

use crate::display::Framebuffer;
use crate::error::{Chip8Error, Result};
use crate::input::Keypad;
use crate::memory::{Chip8MemoryMap, MemoryMap};
use crate::opcode::Opcode;
use crate::sound::ToneRequest;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// width of one instruction in memory
pub const OPCODE_SIZE: u16 = 2;

pub const REGISTER_COUNT: usize = 16;

/// VF
pub const FLAG_REGISTER: usize = 0xf;

const ADDRESS_MASK: u16 = 0x0fff;

pub struct Machine {
    memory: Chip8MemoryMap,
    registers: [u8; REGISTER_COUNT],
    i: u16,
    program_counter: u16,
    stack: Vec<u16>,
    delay_timer: u8,
    sound_timer: u8,
    keypad: Keypad,
    framebuffer: Framebuffer,
    rng: StdRng,
    pending_tone: Option<ToneRequest>,
}

impl Machine {
    pub fn new(program_addr: u16, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Machine {
            memory: Chip8MemoryMap::new(),
            registers: [0; REGISTER_COUNT],
            i: 0,
            program_counter: program_addr & ADDRESS_MASK,
            stack: Vec::new(),
            delay_timer: 0,
            sound_timer: 0,
            keypad: Keypad::new(),
            framebuffer: Framebuffer::new(),
            rng,
            pending_tone: None,
        }
    }

    // program counter

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    /// opcode at the program counter; does not advance
    pub fn fetch(&self) -> Opcode {
        Opcode::new(self.memory.get_word(self.program_counter))
    }

    /// step over one instruction. running off the end of memory leaves the
    /// counter where it was
    pub fn advance(&mut self) -> Result<()> {
        let next = self.program_counter + OPCODE_SIZE;
        if next as usize >= self.memory.size() {
            return Err(Chip8Error::BoundsFault {
                pc: self.program_counter,
            });
        }
        self.program_counter = next;
        Ok(())
    }

    /// skip the next instruction if `condition` holds
    pub fn skip_if(&mut self, condition: bool) -> Result<()> {
        if condition {
            self.advance()?;
        }
        Ok(())
    }

    /// undo an advance so the current instruction runs again next cycle
    pub fn rewind(&mut self) {
        self.program_counter = self.program_counter.saturating_sub(OPCODE_SIZE);
    }

    pub fn jump(&mut self, addr: u16) {
        self.program_counter = addr & ADDRESS_MASK;
    }

    // call stack

    pub fn stack(&self) -> &[u16] {
        &self.stack
    }

    pub fn call(&mut self, addr: u16) {
        self.stack.push(self.program_counter);
        self.jump(addr);
    }

    /// returns false, and leaves the counter alone, if there is nowhere to go
    pub fn ret(&mut self) -> bool {
        match self.stack.pop() {
            Some(addr) => {
                self.program_counter = addr;
                true
            }
            None => false,
        }
    }

    // registers

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.registers
    }

    pub fn v(&self, x: usize) -> u8 {
        self.registers[x]
    }

    pub fn set_v(&mut self, x: usize, value: u8) {
        self.registers[x] = value;
    }

    pub fn set_flag(&mut self, on: bool) {
        self.registers[FLAG_REGISTER] = on as u8;
    }

    pub fn address_register(&self) -> u16 {
        self.i
    }

    pub fn set_address_register(&mut self, addr: u16) {
        self.i = addr & ADDRESS_MASK;
    }

    // memory

    pub fn memory(&self) -> &[u8] {
        self.memory.get_ro_slice()
    }

    pub fn load(&mut self, data: &[u8], offset: i64) -> Result<usize> {
        self.memory.load(data, offset)
    }

    pub fn load_from(&mut self, reader: &mut impl std::io::Read, offset: i64) -> Result<usize> {
        self.memory.write_any(reader, offset)
    }

    pub fn read_byte(&self, addr: usize) -> u8 {
        self.memory.read_byte(addr)
    }

    pub fn write_byte(&mut self, addr: usize, value: u8) {
        self.memory.write_byte(addr, value)
    }

    pub fn memory_size(&self) -> usize {
        self.memory.size()
    }

    // timers

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn set_delay_timer(&mut self, value: u8) {
        self.delay_timer = value;
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// a positive value also asks the host for a tone of that many ticks
    pub fn set_sound_timer(&mut self, value: u8) {
        self.sound_timer = value;
        if value > 0 {
            log::debug!("tone requested for {} ticks", value);
            self.pending_tone = Some(ToneRequest::new(value));
        }
    }

    pub fn take_tone_request(&mut self) -> Option<ToneRequest> {
        self.pending_tone.take()
    }

    pub fn decrement_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    // keypad, screen, rng

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    pub fn random_byte(&mut self) -> u8 {
        self.rng.gen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::CHIP8_PROGRAM_ADDR;

    fn machine() -> Machine {
        Machine::new(CHIP8_PROGRAM_ADDR, Some(0))
    }

    #[test]
    fn test_initial_state() {
        let m = machine();
        assert_eq!(m.program_counter(), 0x200);
        assert_eq!(m.registers(), &[0; 16]);
        assert_eq!(m.address_register(), 0);
        assert!(m.stack().is_empty());
        assert!(m.framebuffer().is_blank());
    }

    #[test]
    fn test_advance_and_rewind() -> Result<()> {
        let mut m = machine();
        m.advance()?;
        assert_eq!(m.program_counter(), 0x202);
        m.rewind();
        assert_eq!(m.program_counter(), 0x200);
        Ok(())
    }

    #[test]
    fn test_advance_past_end_rolls_back() {
        let mut m = machine();
        m.jump(0xffe);
        let r = m.advance();
        assert!(matches!(r, Err(Chip8Error::BoundsFault { pc: 0xffe })));
        assert_eq!(m.program_counter(), 0xffe);
    }

    #[test]
    fn test_advance_to_last_word() -> Result<()> {
        let mut m = machine();
        m.jump(0xffc);
        m.advance()?;
        assert_eq!(m.program_counter(), 0xffe);
        Ok(())
    }

    #[test]
    fn test_address_register_masked() {
        let mut m = machine();
        m.set_address_register(0x1234);
        assert_eq!(m.address_register(), 0x234);
    }

    #[test]
    fn test_call_and_ret() {
        let mut m = machine();
        m.call(0x300);
        assert_eq!(m.program_counter(), 0x300);
        assert_eq!(m.stack(), &[0x200]);
        assert!(m.ret());
        assert_eq!(m.program_counter(), 0x200);
        assert!(!m.ret());
        assert_eq!(m.program_counter(), 0x200);
    }

    #[test]
    fn test_timers_stop_at_zero() {
        let mut m = machine();
        m.set_delay_timer(1);
        m.set_sound_timer(2);
        m.decrement_timers();
        assert_eq!((m.delay_timer(), m.sound_timer()), (0, 1));
        m.decrement_timers();
        m.decrement_timers();
        assert_eq!((m.delay_timer(), m.sound_timer()), (0, 0));
    }

    #[test]
    fn test_tone_request_only_when_positive() {
        let mut m = machine();
        m.set_sound_timer(0);
        assert_eq!(m.take_tone_request(), None);
        m.set_sound_timer(30);
        assert_eq!(m.take_tone_request(), Some(ToneRequest::new(30)));
        assert_eq!(m.take_tone_request(), None);
    }

    #[test]
    fn test_seeded_rng_is_repeatable() {
        let mut a = Machine::new(0x200, Some(42));
        let mut b = Machine::new(0x200, Some(42));
        let xs: Vec<u8> = (0..16).map(|_| a.random_byte()).collect();
        let ys: Vec<u8> = (0..16).map(|_| b.random_byte()).collect();
        assert_eq!(xs, ys);
    }
}
