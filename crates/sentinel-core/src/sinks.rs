//! Output sinks - the LED matrix and the operator feedback channels
//!
//! The engine only talks to hardware through these traits. The buffered
//! implementations here record what was sent so headless runs and tests
//! can inspect it.

use sentinel_logic::constants::CELL_COUNT;
use sentinel_logic::feedback::{Blink, Tone};
use sentinel_logic::render::Rgb;

/// A 25-LED matrix: per-index writes, then one commit.
pub trait LedSink {
    fn set_led(&mut self, index: usize, color: Rgb);

    /// Push every staged write to the strip.
    fn write(&mut self);
}

/// Audio and visual signals for the operator.
pub trait FeedbackSink {
    fn beep(&mut self, tone: Tone, now_ms: u64);

    fn blink(&mut self, blink: Blink, now_ms: u64);

    /// Advance any playback in progress.
    fn tick(&mut self, _now_ms: u64) {}
}

impl<T: LedSink + ?Sized> LedSink for &mut T {
    fn set_led(&mut self, index: usize, color: Rgb) {
        (**self).set_led(index, color);
    }

    fn write(&mut self) {
        (**self).write();
    }
}

impl<T: FeedbackSink + ?Sized> FeedbackSink for &mut T {
    fn beep(&mut self, tone: Tone, now_ms: u64) {
        (**self).beep(tone, now_ms);
    }

    fn blink(&mut self, blink: Blink, now_ms: u64) {
        (**self).blink(blink, now_ms);
    }

    fn tick(&mut self, now_ms: u64) {
        (**self).tick(now_ms);
    }
}

/// In-memory matrix with a staging buffer, like the strip driver.
#[derive(Debug, Clone)]
pub struct MatrixBuffer {
    staged: [Rgb; CELL_COUNT],
    shown: [Rgb; CELL_COUNT],
    /// `set_led` calls since creation.
    pub writes: usize,
    /// `write` calls since creation.
    pub commits: usize,
}

impl Default for MatrixBuffer {
    fn default() -> Self {
        Self {
            staged: [Rgb::default(); CELL_COUNT],
            shown: [Rgb::default(); CELL_COUNT],
            writes: 0,
            commits: 0,
        }
    }
}

impl MatrixBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// What the strip currently shows, by LED index.
    pub fn shown(&self) -> &[Rgb; CELL_COUNT] {
        &self.shown
    }

    pub fn lit_count(&self) -> usize {
        self.shown.iter().filter(|c| c.is_lit()).count()
    }
}

impl LedSink for MatrixBuffer {
    fn set_led(&mut self, index: usize, color: Rgb) {
        if let Some(slot) = self.staged.get_mut(index) {
            *slot = color;
        } else {
            log::warn!("LED index {} out of range", index);
        }
        self.writes += 1;
    }

    fn write(&mut self) {
        self.shown = self.staged;
        self.commits += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Beep(Tone),
    Blink(Blink),
}

/// Records every signal with the time it was raised.
#[derive(Debug, Clone, Default)]
pub struct FeedbackLog {
    pub signals: Vec<(u64, Signal)>,
}

impl FeedbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn beeps(&self) -> impl Iterator<Item = &Tone> + '_ {
        self.signals.iter().filter_map(|(_, s)| match s {
            Signal::Beep(tone) => Some(tone),
            Signal::Blink(_) => None,
        })
    }

    pub fn blinks(&self) -> impl Iterator<Item = &Blink> + '_ {
        self.signals.iter().filter_map(|(_, s)| match s {
            Signal::Blink(blink) => Some(blink),
            Signal::Beep(_) => None,
        })
    }
}

impl FeedbackSink for FeedbackLog {
    fn beep(&mut self, tone: Tone, now_ms: u64) {
        self.signals.push((now_ms, Signal::Beep(tone)));
    }

    fn blink(&mut self, blink: Blink, now_ms: u64) {
        self.signals.push((now_ms, Signal::Blink(blink)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_logic::feedback::{BlinkChannel, Feedback};

    #[test]
    fn matrix_shows_nothing_until_commit() {
        let mut leds = MatrixBuffer::new();
        leds.set_led(3, Rgb::new(20, 0, 0));
        assert_eq!(leds.lit_count(), 0);

        leds.write();
        assert_eq!(leds.shown()[3], Rgb::new(20, 0, 0));
        assert_eq!((leds.writes, leds.commits), (1, 1));
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut leds = MatrixBuffer::new();
        leds.set_led(CELL_COUNT, Rgb::new(1, 1, 1));
        leds.write();
        assert_eq!(leds.lit_count(), 0);
    }

    #[test]
    fn feedback_log_splits_signals() {
        let mut log = FeedbackLog::new();
        log.beep(Feedback::Failure.tone(), 10);
        log.blink(Feedback::Failure.blink(), 10);

        assert_eq!(log.beeps().count(), 1);
        assert_eq!(log.blinks().next().map(|b| b.channel), Some(BlinkChannel::Red));
        assert_eq!(log.signals[0].0, 10);
    }

    #[test]
    fn borrowed_sinks_forward() {
        fn paint<L: LedSink>(mut sink: L) {
            sink.set_led(0, Rgb::new(1, 1, 1));
            sink.write();
        }

        let mut leds = MatrixBuffer::new();
        paint(&mut leds);
        assert_eq!(leds.commits, 1);
        assert_eq!(leds.lit_count(), 1);
    }
}
