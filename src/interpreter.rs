//! # interpreter
//!
//! The part the host talks to. Two entry points, driven at different rates:
//!  * `emulate_cycle`: one fetch / decode / advance / execute step, as often
//!    as the host likes (a few hundred Hz is usual)
//!  * `decrement_timers`: once per 1/60s tick; never called from a cycle
//!
//! plus loading, key transitions, a read-only view of the framebuffer and
//! the tone requests raised by the sound timer. Faults are returned, and the
//! machine is left as it was when the fault happened.

use crate::config::Chip8Config;
use crate::display::Framebuffer;
use crate::error::Result;
use crate::instruction::Instruction;
use crate::machine::{Machine, REGISTER_COUNT};
use crate::sound::ToneRequest;
use std::io;

pub struct Chip8Interpreter {
    machine: Machine,
    config: Chip8Config,
}

impl Chip8Interpreter {
    pub fn new(config: Chip8Config) -> Self {
        Chip8Interpreter {
            machine: Machine::new(config.program_addr, config.seed),
            config,
        }
    }

    /// copy bytes into memory at `offset`, truncating at the end of memory.
    /// returns how many bytes were copied
    pub fn load(&mut self, bytes: &[u8], offset: i64) -> Result<usize> {
        self.machine.load(bytes, offset)
    }

    /// load a chip8 program at the configured program address
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize> {
        let copied = self
            .machine
            .load_from(reader, self.config.program_addr as i64)?;
        log::info!(
            "loaded {} byte program at {:#05x}",
            copied,
            self.config.program_addr
        );
        Ok(copied)
    }

    pub fn set_key_pressed(&mut self, key: u8) -> Result<()> {
        self.machine.keypad_mut().press(key)
    }

    pub fn set_key_released(&mut self, key: u8) -> Result<()> {
        self.machine.keypad_mut().release(key)
    }

    /// fetch, decode, advance, execute
    pub fn emulate_cycle(&mut self) -> Result<()> {
        let pc = self.machine.program_counter();
        let opcode = self.machine.fetch();
        let instruction = Instruction::decode(opcode, self.config.strict)?;
        self.machine.advance()?;
        if let Some(instruction) = instruction {
            log::trace!("{:#05x}: {:#06x} {:?}", pc, opcode.word(), instruction);
            instruction.execute(&mut self.machine)?;
        }
        Ok(())
    }

    pub fn decrement_timers(&mut self) {
        self.machine.decrement_timers();
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        self.machine.framebuffer()
    }

    /// the most recent tone request not yet collected by the host
    pub fn take_tone_request(&mut self) -> Option<ToneRequest> {
        self.machine.take_tone_request()
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        self.machine.registers()
    }

    pub fn address_register(&self) -> u16 {
        self.machine.address_register()
    }

    pub fn program_counter(&self) -> u16 {
        self.machine.program_counter()
    }

    pub fn stack(&self) -> &[u16] {
        self.machine.stack()
    }

    pub fn delay_timer(&self) -> u8 {
        self.machine.delay_timer()
    }

    pub fn sound_timer(&self) -> u8 {
        self.machine.sound_timer()
    }

    pub fn memory(&self) -> &[u8] {
        self.machine.memory()
    }
}

impl Default for Chip8Interpreter {
    fn default() -> Self {
        Chip8Interpreter::new(Chip8Config::default())
    }
}
