use crate::error::{Chip8Error, Result};
use crate::machine::Machine;
use crate::memory::CHIP8_GLYPH_SIZE;
use crate::opcode::Opcode;

/// One variant per CHIP-8 instruction. Register operands are indices 0-15.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0 (any 0xx0)
    ClearScreen,
    /// 00EE (any 0xxE)
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipIfEqualImm(usize, u8),
    /// 4XNN
    SkipIfNotEqualImm(usize, u8),
    /// 5XY_
    SkipIfEqual(usize, usize),
    /// 6XNN
    SetImm(usize, u8),
    /// 7XNN; leaves VF alone
    AddImm(usize, u8),
    /// 8XY0
    Set(usize, usize),
    /// 8XY1
    Or(usize, usize),
    /// 8XY2
    And(usize, usize),
    /// 8XY3
    Xor(usize, usize),
    /// 8XY4
    Add(usize, usize),
    /// 8XY5
    Sub(usize, usize),
    /// 8XY6; shifts VX, not VY
    ShiftRight(usize),
    /// 8XY7
    SubReverse(usize, usize),
    /// 8XYE; shifts VX, not VY
    ShiftLeft(usize),
    /// 9XY_
    SkipIfNotEqual(usize, usize),
    /// ANNN
    SetAddress(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXNN
    Random(usize, u8),
    /// DXYN
    Draw(usize, usize, u8),
    /// EX9E
    SkipIfKey(usize),
    /// EXA1
    SkipIfNotKey(usize),
    /// FX07
    GetDelay(usize),
    /// FX0A
    WaitKey(usize),
    /// FX15
    SetDelay(usize),
    /// FX18
    SetSound(usize),
    /// FX1E
    AddAddress(usize),
    /// FX29
    FontAddress(usize),
    /// FX33
    Bcd(usize),
    /// FX55
    StoreRegisters(usize),
    /// FX65
    LoadRegisters(usize),
}

impl Instruction {
    /// Work out which instruction an opcode is. `Ok(None)` means the family
    /// is known but the secondary code isn't; the cycle then does nothing,
    /// unless `strict` is set.
    pub fn decode(op: Opcode, strict: bool) -> Result<Option<Instruction>> {
        use Instruction::*;

        let (x, y, n, nn, nnn) = (op.x(), op.y(), op.n(), op.nn(), op.nnn());
        let decoded = match op.family() {
            0x0 => match n {
                0x0 => Some(ClearScreen),
                0xe => Some(Return),
                _ => None,
            },
            0x1 => Some(Jump(nnn)),
            0x2 => Some(Call(nnn)),
            0x3 => Some(SkipIfEqualImm(x, nn)),
            0x4 => Some(SkipIfNotEqualImm(x, nn)),
            0x5 => Some(SkipIfEqual(x, y)),
            0x6 => Some(SetImm(x, nn)),
            0x7 => Some(AddImm(x, nn)),
            0x8 => match n {
                0x0 => Some(Set(x, y)),
                0x1 => Some(Or(x, y)),
                0x2 => Some(And(x, y)),
                0x3 => Some(Xor(x, y)),
                0x4 => Some(Add(x, y)),
                0x5 => Some(Sub(x, y)),
                0x6 => Some(ShiftRight(x)),
                0x7 => Some(SubReverse(x, y)),
                0xe => Some(ShiftLeft(x)),
                _ => None,
            },
            0x9 => Some(SkipIfNotEqual(x, y)),
            0xa => Some(SetAddress(nnn)),
            0xb => Some(JumpOffset(nnn)),
            0xc => Some(Random(x, nn)),
            0xd => Some(Draw(x, y, n)),
            0xe => match nn {
                0x9e => Some(SkipIfKey(x)),
                0xa1 => Some(SkipIfNotKey(x)),
                _ => None,
            },
            0xf => match nn {
                0x07 => Some(GetDelay(x)),
                0x0a => Some(WaitKey(x)),
                0x15 => Some(SetDelay(x)),
                0x18 => Some(SetSound(x)),
                0x1e => Some(AddAddress(x)),
                0x29 => Some(FontAddress(x)),
                0x33 => Some(Bcd(x)),
                0x55 => Some(StoreRegisters(x)),
                0x65 => Some(LoadRegisters(x)),
                _ => None,
            },
            _ => return Err(Chip8Error::DecodeFault { opcode: op.word() }),
        };

        match decoded {
            None if strict => Err(Chip8Error::UnknownInstruction { opcode: op.word() }),
            None => {
                log::debug!("ignoring unknown instruction {:#06x}", op.word());
                Ok(None)
            }
            some => Ok(some),
        }
    }

    /// Run the instruction. The program counter has already been advanced
    /// past it; control flow overwrites that.
    pub fn execute(self, m: &mut Machine) -> Result<()> {
        use Instruction::*;

        match self {
            ClearScreen => m.framebuffer_mut().clear(),
            Return => {
                m.ret();
            }
            Jump(addr) => m.jump(addr),
            Call(addr) => m.call(addr),
            SkipIfEqualImm(x, nn) => m.skip_if(m.v(x) == nn)?,
            SkipIfNotEqualImm(x, nn) => m.skip_if(m.v(x) != nn)?,
            SkipIfEqual(x, y) => m.skip_if(m.v(x) == m.v(y))?,
            SkipIfNotEqual(x, y) => m.skip_if(m.v(x) != m.v(y))?,
            SetImm(x, nn) => m.set_v(x, nn),
            AddImm(x, nn) => m.set_v(x, m.v(x).wrapping_add(nn)),
            Set(x, y) => m.set_v(x, m.v(y)),
            Or(x, y) => m.set_v(x, m.v(x) | m.v(y)),
            And(x, y) => m.set_v(x, m.v(x) & m.v(y)),
            Xor(x, y) => m.set_v(x, m.v(x) ^ m.v(y)),
            Add(x, y) => {
                let original = m.v(x);
                let result = original.wrapping_add(m.v(y));
                m.set_v(x, result);
                m.set_flag(result < original);
            }
            Sub(x, y) => {
                let original = m.v(x);
                let result = original.wrapping_sub(m.v(y));
                m.set_v(x, result);
                m.set_flag(result <= original);
            }
            // flag first, then shift whatever is in VX afterwards
            ShiftRight(x) => {
                m.set_flag(m.v(x) & 0x01 != 0);
                m.set_v(x, m.v(x) >> 1);
            }
            ShiftLeft(x) => {
                m.set_flag(m.v(x) & 0x80 != 0);
                m.set_v(x, m.v(x) << 1);
            }
            SubReverse(x, y) => {
                let original = m.v(y);
                let result = original.wrapping_sub(m.v(x));
                m.set_v(x, result);
                m.set_flag(result <= original);
            }
            SetAddress(addr) => m.set_address_register(addr),
            JumpOffset(addr) => m.jump(m.v(0) as u16 + addr),
            Random(x, nn) => {
                let r = m.random_byte();
                m.set_v(x, r & nn);
            }
            Draw(x, y, n) => draw(m, x, y, n),
            SkipIfKey(x) => m.skip_if(m.keypad().is_pressed(m.v(x)))?,
            SkipIfNotKey(x) => m.skip_if(!m.keypad().is_pressed(m.v(x)))?,
            GetDelay(x) => m.set_v(x, m.delay_timer()),
            WaitKey(x) => match m.keypad().lowest_pressed() {
                Some(key) => m.set_v(x, key),
                None => m.rewind(),
            },
            SetDelay(x) => m.set_delay_timer(m.v(x)),
            SetSound(x) => m.set_sound_timer(m.v(x)),
            AddAddress(x) => m.set_address_register(m.address_register() + m.v(x) as u16),
            FontAddress(x) => m.set_address_register(m.v(x) as u16 * CHIP8_GLYPH_SIZE),
            Bcd(x) => {
                let value = m.v(x);
                let i = m.address_register() as usize;
                m.write_byte(i, value / 100);
                m.write_byte(i + 1, (value / 10) % 10);
                m.write_byte(i + 2, value % 10);
            }
            StoreRegisters(x) => {
                let (i, limit) = (m.address_register() as usize, m.memory_size());
                for r in (0..=x).take_while(|r| i + r < limit) {
                    m.write_byte(i + r, m.v(r));
                }
            }
            LoadRegisters(x) => {
                let (i, limit) = (m.address_register() as usize, m.memory_size());
                for r in (0..=x).take_while(|r| i + r < limit) {
                    m.set_v(r, m.read_byte(i + r));
                }
            }
        }
        Ok(())
    }
}

/// XOR an 8xN sprite from memory at I onto the screen at (VX, VY). VF ends
/// up 1 if any pixel was switched off along the way
fn draw(m: &mut Machine, x: usize, y: usize, height: u8) {
    let (left, top) = (m.v(x) as usize, m.v(y) as usize);
    let i = m.address_register() as usize;
    m.set_flag(false);

    let mut collided = false;
    for row in 0..height as usize {
        let bits = m.read_byte(i + row);
        collided |= m.framebuffer_mut().xor_row(left, top + row, bits);
    }
    if collided {
        m.set_flag(true);
    }
}
