use chip8::{Chip8Config, Chip8Error, Chip8Interpreter};
use proptest::prelude::*;

fn boot(program: &[u8]) -> Chip8Interpreter {
    let mut i = Chip8Interpreter::new(Chip8Config::default().seed(Some(1)));
    i.load(program, 0x200).unwrap();
    i
}

fn run(i: &mut Chip8Interpreter, cycles: usize) {
    for _ in 0..cycles {
        i.emulate_cycle().unwrap();
    }
}

proptest! {
    #[test]
    fn load_copies_exactly_what_fits(
        data in proptest::collection::vec(any::<u8>(), 0..64),
        offset in 0i64..4200,
    ) {
        let mut i = Chip8Interpreter::default();
        let before = i.memory().to_vec();
        let copied = i.load(&data, offset).unwrap();

        let start = offset as usize;
        let expected = data.len().min(4096usize.saturating_sub(start));
        prop_assert_eq!(copied, expected);
        for (addr, (&now, &was)) in i.memory().iter().zip(before.iter()).enumerate() {
            if addr >= start && addr < start + copied {
                prop_assert_eq!(now, data[addr - start]);
            } else {
                prop_assert_eq!(now, was);
            }
        }
    }

    #[test]
    fn load_rejects_negative_offsets(offset in i64::MIN..0) {
        let mut i = Chip8Interpreter::default();
        let before = i.memory().to_vec();
        let r = i.load(&[1, 2, 3], offset);
        prop_assert!(
            matches!(r, Err(Chip8Error::LoadRange { .. })),
            "negative offset {} accepted",
            offset
        );
        prop_assert_eq!(i.memory(), before.as_slice());
    }

    #[test]
    fn add_sets_carry(vx in any::<u8>(), vy in any::<u8>()) {
        let mut i = boot(&[0x61, vx, 0x62, vy, 0x81, 0x24]);
        run(&mut i, 3);
        let sum = vx.wrapping_add(vy);
        prop_assert_eq!(i.registers()[1], sum);
        prop_assert_eq!(i.registers()[0xf], (sum < vx) as u8);
    }

    #[test]
    fn sub_sets_not_borrow(vx in any::<u8>(), vy in any::<u8>()) {
        let mut i = boot(&[0x61, vx, 0x62, vy, 0x81, 0x25]);
        run(&mut i, 3);
        prop_assert_eq!(i.registers()[1], vx.wrapping_sub(vy));
        prop_assert_eq!(i.registers()[0xf] == 0, vx < vy);
    }

    #[test]
    fn sub_reverse_sets_not_borrow(vx in any::<u8>(), vy in any::<u8>()) {
        let mut i = boot(&[0x61, vx, 0x62, vy, 0x81, 0x27]);
        run(&mut i, 3);
        prop_assert_eq!(i.registers()[1], vy.wrapping_sub(vx));
        prop_assert_eq!(i.registers()[0xf] == 0, vy < vx);
    }

    #[test]
    fn add_imm_never_touches_flag(flag in any::<u8>(), vx in any::<u8>(), nn in any::<u8>(), vy in any::<u8>()) {
        // VF = flag; V1 = vx; V1 += nn; then V1 += V2
        let mut i = boot(&[0x6f, flag, 0x61, vx, 0x71, nn, 0x62, vy, 0x81, 0x24]);
        run(&mut i, 3);
        prop_assert_eq!(i.registers()[0xf], flag);
        prop_assert_eq!(i.registers()[1], vx.wrapping_add(nn));
        run(&mut i, 2);
        let before = vx.wrapping_add(nn);
        prop_assert_eq!(i.registers()[0xf], (before.wrapping_add(vy) < before) as u8);
    }

    #[test]
    fn address_register_stays_12_bit(hi in 0u8..0x10, lo in any::<u8>(), vx in any::<u8>()) {
        // I = 0x{hi}{lo}; V0 = vx; I += V0; I = font(V0)
        let mut i = boot(&[0xa0 | hi, lo, 0x60, vx, 0xf0, 0x1e, 0xf0, 0x29]);
        run(&mut i, 3);
        let expected = ((((hi as u16) << 8) | lo as u16) + vx as u16) & 0x0fff;
        prop_assert_eq!(i.address_register(), expected);
        run(&mut i, 1);
        prop_assert_eq!(i.address_register(), (vx as u16 * 5) & 0x0fff);
    }

    #[test]
    fn drawing_twice_restores_the_screen(
        sprite in proptest::collection::vec(any::<u8>(), 1..16),
        x in any::<u8>(),
        y in any::<u8>(),
    ) {
        let n = sprite.len() as u8;
        // I = 0x300; V0 = x; V1 = y; draw; draw
        let mut i = boot(&[0xa3, 0x00, 0x60, x, 0x61, y, 0xd0, 0x10 | n, 0xd0, 0x10 | n]);
        i.load(&sprite, 0x300).unwrap();
        run(&mut i, 4);
        let lit = i.framebuffer().lit_count();
        let expected: u32 = sprite.iter().map(|b| b.count_ones()).sum();
        prop_assert_eq!(lit as u32, expected);
        prop_assert_eq!(i.registers()[0xf], 0);

        run(&mut i, 1);
        prop_assert!(i.framebuffer().is_blank());
        prop_assert_eq!(i.registers()[0xf], (lit > 0) as u8);
    }
}
