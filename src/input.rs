use crate::error::{Chip8Error, Result};
use crossterm::event::{poll, read, Event, KeyCode};
use crossterm::terminal;
use std::collections::HashMap;
use std::time::Duration;

/// number of keys on the COSMAC hex keypad
pub const KEYPAD_SIZE: u8 = 16;

/// Pressed state of the 16 hex keys, one bit per key
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Keypad(u16);

impl Keypad {
    pub fn new() -> Self {
        Keypad(0)
    }

    pub fn press(&mut self, key: u8) -> Result<()> {
        self.0 |= Self::mask(key)?;
        Ok(())
    }

    pub fn release(&mut self, key: u8) -> Result<()> {
        self.0 &= !Self::mask(key)?;
        Ok(())
    }

    /// keys outside the keypad are never pressed
    pub fn is_pressed(&self, key: u8) -> bool {
        key < KEYPAD_SIZE && self.0 & (1 << key) != 0
    }

    /// the numerically smallest pressed key, if any
    pub fn lowest_pressed(&self) -> Option<u8> {
        match self.0 {
            0 => None,
            bits => Some(bits.trailing_zeros() as u8),
        }
    }

    fn mask(key: u8) -> Result<u16> {
        if key < KEYPAD_SIZE {
            Ok(1 << key)
        } else {
            Err(Chip8Error::InvalidKey { key })
        }
    }
}

/// map of async bytes read from the keyboard to what the chip8 might expect
/// where '1' => 0x01 and 'a' => 0x0a
const CHIP8_LITERAL_KEYMAP: [(char, u8); 16] = [
    ('0', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('4', 0x04),
    ('5', 0x05),
    ('6', 0x06),
    ('7', 0x07),
    ('8', 0x08),
    ('9', 0x09),
    ('a', 0x0a),
    ('b', 0x0b),
    ('c', 0x0c),
    ('d', 0x0d),
    ('e', 0x0e),
    ('f', 0x0f),
];

/// ditto using left-hand side of qwerty keyboard
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// reads keypresses on behalf of the host
pub trait Input {
    /// the mapped keys seen since the last call
    fn pressed_keys(&mut self) -> Result<&[u8]>;

    /// true once the user has asked to leave
    fn quit_requested(&self) -> bool;
}

/// Mirror what the input device saw onto the keypad: seen keys are pressed,
/// everything else is released.
pub fn sync_keypad(input: &mut impl Input, mut on_key: impl FnMut(u8, bool) -> Result<()>) -> Result<()> {
    let keys = input.pressed_keys()?;
    for key in 0..KEYPAD_SIZE {
        on_key(key, keys.contains(&key))?;
    }
    Ok(())
}

/// simple implementation of Input, using STDIN in raw mode. terminals only
/// report presses, so a key counts as held for the frame it was seen in
pub struct StdinInput {
    buffer: Vec<u8>,
    keymap: HashMap<char, u8>,
    quit: bool,
}

impl StdinInput {
    pub fn new(literal_keys: bool) -> Result<Self> {
        let keymap = if literal_keys {
            CHIP8_LITERAL_KEYMAP
        } else {
            CHIP8_CONVENTIONAL_KEYMAP
        };
        terminal::enable_raw_mode()?;
        Ok(StdinInput {
            buffer: Vec::new(),
            keymap: HashMap::from(keymap),
            quit: false,
        })
    }

    fn read_stdin(&mut self) -> Result<()> {
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Char(key) => match self.keymap.get(&key) {
                        Some(mapped_key) => self.buffer.push(*mapped_key),
                        None => {
                            log::warn!("can't map {:?} to a COSMAC key", key);
                        }
                    },
                    KeyCode::Esc => self.quit = true,
                    other => {
                        log::warn!("unknown key event received: {:?}", other);
                    }
                },
                _ => {
                    log::debug!("ignoring non-key terminal event");
                }
            }
        }
        Ok(())
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for StdinInput {
    fn pressed_keys(&mut self) -> Result<&[u8]> {
        self.buffer.clear();
        self.read_stdin()?;
        Ok(self.buffer.as_slice())
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// dummy Input implementation for testing; replays one set of keys per call
pub struct DummyInput {
    frames: Vec<Vec<u8>>,
    current: Vec<u8>,
}

impl DummyInput {
    pub fn new(frames: &[&[u8]]) -> Self {
        DummyInput {
            frames: frames.iter().rev().map(|f| f.to_vec()).collect(),
            current: Vec::new(),
        }
    }
}

impl Input for DummyInput {
    fn pressed_keys(&mut self) -> Result<&[u8]> {
        self.current = self.frames.pop().unwrap_or_default();
        Ok(self.current.as_slice())
    }

    fn quit_requested(&self) -> bool {
        self.frames.is_empty()
    }
}
