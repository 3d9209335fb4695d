//! Indicator panel - plays feedback back on an RGB status LED and a buzzer

use sentinel_logic::feedback::{Blink, BlinkChannel, BlinkPattern, Tone, TonePattern};

use crate::sinks::FeedbackSink;

/// Simulated RGB LED plus buzzer, driven by the engine clock.
///
/// A new blink turns every channel off before it starts; a new tone
/// replaces whatever was sounding.
#[derive(Debug, Clone, Default)]
pub struct IndicatorPanel {
    blink: Option<BlinkPattern>,
    tone: Option<TonePattern>,
}

impl IndicatorPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_lit(&self, channel: BlinkChannel) -> bool {
        self.blink
            .map(|p| p.channel == channel && p.is_lit())
            .unwrap_or(false)
    }

    /// Channel currently lit, if any.
    pub fn lit_channel(&self) -> Option<BlinkChannel> {
        self.blink.filter(BlinkPattern::is_lit).map(|p| p.channel)
    }

    /// Buzzer frequency currently sounding, if any.
    pub fn sounding(&self) -> Option<u32> {
        self.tone.and_then(|t| t.sounding())
    }

    /// No playback left.
    pub fn is_idle(&self) -> bool {
        self.blink.map_or(true, |p| p.is_finished()) && self.tone.map_or(true, |t| t.is_finished())
    }
}

impl FeedbackSink for IndicatorPanel {
    fn beep(&mut self, tone: Tone, now_ms: u64) {
        self.tone = Some(TonePattern::start(tone, now_ms));
    }

    fn blink(&mut self, blink: Blink, now_ms: u64) {
        // Only one pattern exists at a time, so the old channel goes dark.
        self.blink = Some(BlinkPattern::start(blink, now_ms));
    }

    fn tick(&mut self, now_ms: u64) {
        if let Some(pattern) = self.blink.as_mut() {
            pattern.update(now_ms);
        }
        if let Some(pattern) = self.tone.as_mut() {
            pattern.update(now_ms);
        }
    }
}
