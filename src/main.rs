use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use chip8::display::MonoTermDisplay;
use chip8::host::{Host, DEFAULT_CYCLES_PER_FRAME};
use chip8::input::StdinInput;
use chip8::sound::{Mute, SimpleBeep, Sound};
use chip8::{Chip8Config, Chip8Interpreter};
use clap::Parser;

/// Run a CHIP-8 program in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// ROM to load at 0x200
    rom: PathBuf,

    /// instructions per 60Hz frame
    #[arg(long, default_value_t = DEFAULT_CYCLES_PER_FRAME)]
    cycles_per_frame: u32,

    /// halt on unknown instructions instead of skipping them
    #[arg(long)]
    strict: bool,

    /// seed for the random-number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// no PC speaker beeps
    #[arg(long)]
    mute: bool,

    /// map keys 0-9 and a-f literally, instead of the usual 1234/qwer/asdf/zxcv block
    #[arg(long)]
    literal_keys: bool,

    /// stop after this many frames
    #[arg(long)]
    frames: Option<u64>,
}

fn run<S: Sound>(cli: &Cli, interpreter: Chip8Interpreter, sound: S) -> Result<(), Box<dyn Error>> {
    let display = MonoTermDisplay::new()?;
    let input = StdinInput::new(cli.literal_keys)?;
    let mut host = Host::new(interpreter, display, input, sound).cycles_per_frame(cli.cycles_per_frame);
    host.main_loop(cli.frames)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    // initialise
    let config = Chip8Config::default().strict(cli.strict).seed(cli.seed);
    let mut interpreter = Chip8Interpreter::new(config);

    // load a program
    let mut f = File::open(&cli.rom)?;
    interpreter.load_program(&mut f)?;

    if cli.mute {
        run(&cli, interpreter, Mute::new())?;
    } else {
        run(&cli, interpreter, SimpleBeep::new())?;
    }

    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..4 {
        println!();
    }
    Ok(())
}
