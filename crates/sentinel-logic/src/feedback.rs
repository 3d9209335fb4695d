//! Operator feedback - success/failure signals and their playback.
//!
//! Every accepted or rejected action is announced twice: a buzzer tone
//! and a blink on the status LED. The signal values are fixed; playback
//! is a simple on/off cadence driven by the caller's clock.

use serde::{Deserialize, Serialize};

use crate::constants::tones;

/// Channel of the RGB status LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlinkChannel {
    Red,
    Green,
    Blue,
}

/// Audio sink request: `repeats` beeps of `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u32,
    pub repeats: u32,
}

/// Visual sink request: `repeats` blinks of `duration_ms` on `channel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blink {
    pub channel: BlinkChannel,
    pub duration_ms: u32,
    pub repeats: u32,
}

/// Outcome signal emitted to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feedback {
    Success,
    Failure,
}

impl Feedback {
    pub fn tone(self) -> Tone {
        match self {
            Feedback::Success => Tone {
                frequency_hz: tones::SUCCESS_HZ,
                duration_ms: tones::DURATION_MS,
                repeats: tones::SUCCESS_REPEATS,
            },
            Feedback::Failure => Tone {
                frequency_hz: tones::FAILURE_HZ,
                duration_ms: tones::DURATION_MS,
                repeats: tones::FAILURE_REPEATS,
            },
        }
    }

    pub fn blink(self) -> Blink {
        match self {
            Feedback::Success => Blink {
                channel: BlinkChannel::Green,
                duration_ms: tones::DURATION_MS,
                repeats: tones::SUCCESS_REPEATS,
            },
            Feedback::Failure => Blink {
                channel: BlinkChannel::Red,
                duration_ms: tones::DURATION_MS,
                repeats: tones::FAILURE_REPEATS,
            },
        }
    }
}

/// On/off toggling: starts on, then `2 * repeats - 1` state changes, one
/// every `duration_ms`, ending off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cadence {
    on: bool,
    remaining: u32,
    duration_ms: u64,
    next_change_ms: u64,
}

impl Cadence {
    pub fn start(duration_ms: u32, repeats: u32, now_ms: u64) -> Self {
        if repeats == 0 {
            return Self::default();
        }
        Self {
            on: true,
            remaining: repeats * 2 - 1,
            duration_ms: duration_ms as u64,
            next_change_ms: now_ms.saturating_add(duration_ms as u64),
        }
    }

    /// Advance to `now_ms`. Returns whether the state changed.
    ///
    /// At most one change per call; the next change is due one period
    /// after this call, so a late poll stretches the pattern.
    pub fn update(&mut self, now_ms: u64) -> bool {
        if self.remaining == 0 || now_ms < self.next_change_ms {
            return false;
        }
        self.next_change_ms = now_ms.saturating_add(self.duration_ms);
        self.remaining -= 1;
        self.on = self.remaining % 2 == 1;
        true
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }
}

/// A blink being played back on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkPattern {
    pub channel: BlinkChannel,
    cadence: Cadence,
}

impl BlinkPattern {
    pub fn start(blink: Blink, now_ms: u64) -> Self {
        Self {
            channel: blink.channel,
            cadence: Cadence::start(blink.duration_ms, blink.repeats, now_ms),
        }
    }

    pub fn update(&mut self, now_ms: u64) -> bool {
        self.cadence.update(now_ms)
    }

    pub fn is_lit(&self) -> bool {
        self.cadence.is_on()
    }

    pub fn is_finished(&self) -> bool {
        self.cadence.is_finished()
    }
}

/// A beep sequence being played back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TonePattern {
    pub frequency_hz: u32,
    cadence: Cadence,
}

impl TonePattern {
    pub fn start(tone: Tone, now_ms: u64) -> Self {
        Self {
            frequency_hz: tone.frequency_hz,
            cadence: Cadence::start(tone.duration_ms, tone.repeats, now_ms),
        }
    }

    pub fn update(&mut self, now_ms: u64) -> bool {
        self.cadence.update(now_ms)
    }

    /// Frequency currently sounding, if any.
    pub fn sounding(&self) -> Option<u32> {
        self.cadence.is_on().then_some(self.frequency_hz)
    }

    pub fn is_finished(&self) -> bool {
        self.cadence.is_finished()
    }
}
