use crate::display::Display;
use crate::input::{sync_keypad, Input};
use crate::interpreter::Chip8Interpreter;
use crate::sound::{Sound, TIMER_HZ};
use spin_sleep::LoopHelper;
use std::error::Error;

/// how many instructions run per 60Hz frame by default; 540Hz overall
pub const DEFAULT_CYCLES_PER_FRAME: u32 = 9;

/// The environment: owns the interpreter and its peripherals, and drives
/// both at the right rates. One `frame` is one timer tick.
pub struct Host<D: Display, I: Input, S: Sound> {
    pub interpreter: Chip8Interpreter,
    display: D,
    input: I,
    sound: S,
    cycles_per_frame: u32,
    frames: u64,
}

impl<D: Display, I: Input, S: Sound> Host<D, I, S> {
    pub fn new(interpreter: Chip8Interpreter, display: D, input: I, sound: S) -> Self {
        Host {
            interpreter,
            display,
            input,
            sound,
            cycles_per_frame: DEFAULT_CYCLES_PER_FRAME,
            frames: 0,
        }
    }

    pub fn cycles_per_frame(mut self, cycles: u32) -> Self {
        self.cycles_per_frame = cycles;
        self
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    /// keys in, run a frame's worth of cycles, sound out, tick the timers,
    /// then picture out. a tone of N ticks sounds for N frames
    pub fn frame(&mut self) -> Result<(), Box<dyn Error>> {
        let interpreter = &mut self.interpreter;
        sync_keypad(&mut self.input, |key, down| {
            if down {
                interpreter.set_key_pressed(key)
            } else {
                interpreter.set_key_released(key)
            }
        })?;

        for _ in 0..self.cycles_per_frame {
            self.interpreter.emulate_cycle()?;
        }

        if let Some(tone) = self.interpreter.take_tone_request() {
            self.sound.play(tone)?;
        }
        if self.interpreter.sound_timer() == 0 && self.sound.is_playing() {
            self.sound.stop()?;
        }
        self.interpreter.decrement_timers();

        self.display.draw(self.interpreter.framebuffer())?;
        self.frames += 1;
        Ok(())
    }

    /// run frames at 60Hz until the user quits, `limit` frames have run, or
    /// the interpreter faults
    pub fn main_loop(&mut self, limit: Option<u64>) -> Result<(), Box<dyn Error>> {
        let mut loop_helper = LoopHelper::builder().build_with_target_rate(TIMER_HZ as f64);
        while !self.input.quit_requested() && limit.map_or(true, |n| self.frames < n) {
            loop_helper.loop_start();
            if let Err(e) = self.frame() {
                log::error!(
                    "halted at {:#05x} after {} frames: {}",
                    self.interpreter.program_counter(),
                    self.frames,
                    e
                );
                return Err(e);
            }
            loop_helper.loop_sleep();
        }
        log::info!("stopped after {} frames", self.frames);
        Ok(())
    }
}
