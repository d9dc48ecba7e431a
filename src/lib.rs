//!
//! ## Design
//!
//! * reproduce the canonical CHIP-8 instruction set exactly, quirks included:
//!   shifts work on VX only, subtract sets VF to "no borrow", draws XOR and
//!   report collisions in VF, I is kept to 12 bits
//! * the interpreter core owns all machine state and never calls out; the
//!   host calls in
//! * abstract display, input and audio behind traits so the host can plug
//!   alternatives; starting with TUI in-console
//! * timing belongs to the host: it runs cycles at the instruction rate and
//!   ticks the timers at 60Hz
//!
//! Model
//!
//! ```text
//! Host (host.rs, wired up in main.rs)
//!  |-- display, input, sound, config
//!  |-- interpreter(config)
//!  |    |-- machine: memory, registers, stack, timers, keypad, framebuffer
//!  |    `-- instruction set: decode(opcode) -> Instruction; execute(&mut machine)
//!  `-- main loop, once per 1/60s frame
//!       |-- input -> set_key_pressed / set_key_released
//!       |-- emulate_cycle() x cycles-per-frame
//!       |-- take_tone_request() -> sound
//!       |-- decrement_timers()
//!       |-- display.draw(framebuffer())
//!       `-- sleep until the next frame
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod host;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod machine;
pub mod memory;
pub mod opcode;
pub mod sound;

pub use config::Chip8Config;
pub use display::{Framebuffer, DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use error::Chip8Error;
pub use instruction::Instruction;
pub use interpreter::Chip8Interpreter;
pub use opcode::Opcode;
pub use sound::ToneRequest;
