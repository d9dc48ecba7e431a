use beep::beep;
use std::error::Error;
use std::time::Duration;

/// rate at which the host ticks the delay and sound timers
pub const TIMER_HZ: u32 = 60;

/// Raised by the interpreter when the sound timer is set to a positive
/// value: play a tone for `ticks` timer ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneRequest {
    pub ticks: u8,
}

impl ToneRequest {
    pub fn new(ticks: u8) -> Self {
        ToneRequest { ticks }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.ticks as f64 / TIMER_HZ as f64)
    }
}

pub trait Sound {
    fn play(&mut self, tone: ToneRequest) -> Result<(), Box<dyn Error>>;
    fn stop(&mut self) -> Result<(), Box<dyn Error>>;
    fn is_playing(&self) -> bool;
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

/// PC speaker beep; linux only, needs access to the console
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Sound for SimpleBeep {
    fn play(&mut self, tone: ToneRequest) -> Result<(), Box<dyn Error>> {
        log::debug!("beep for {:?}", tone.duration());
        beep(SIMPLEBEEP_PITCH)?;
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        beep(0)?;
        self.is_beeping = false;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.is_beeping
    }
}

/// swallows tone requests, but remembers the last one
pub struct Mute {
    pub last: Option<ToneRequest>,
}

impl Mute {
    pub fn new() -> Self {
        Mute { last: None }
    }
}

impl Sound for Mute {
    fn play(&mut self, tone: ToneRequest) -> Result<(), Box<dyn Error>> {
        self.last = Some(tone);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        self.last = None;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.last.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_duration() {
        assert_eq!(ToneRequest::new(60).duration(), Duration::from_secs(1));
        assert_eq!(ToneRequest::new(30).duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_mute_tracks_requests() -> Result<(), Box<dyn Error>> {
        let mut m = Mute::new();
        assert!(!m.is_playing());
        m.play(ToneRequest::new(4))?;
        assert!(m.is_playing());
        assert_eq!(m.last, Some(ToneRequest::new(4)));
        m.stop()?;
        assert!(!m.is_playing());
        Ok(())
    }
}
