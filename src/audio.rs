//! Audio system using Web Audio API
//!
//! Procedurally generated cues, no sound files.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Character leaves the ground
    Jump,
    /// Collectable picked up
    Collect,
    /// Life lost; long enough that a game over cuts it short
    Death,
    /// Flagpole reached
    Win,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jump => Some(SoundEffect::Jump),
            GameEvent::Collect { .. } => Some(SoundEffect::Collect),
            GameEvent::Death { .. } => Some(SoundEffect::Death),
            GameEvent::Win { .. } => Some(SoundEffect::Win),
            GameEvent::GameOver | GameEvent::Restart => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Master times effects volume, zero when muted
    volume: f32,
    /// Oscillators of the death cue still playing
    death_voices: Vec<OscillatorNode>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Fails outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume().clamp(0.0, 1.0),
            death_voices: Vec::new(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play the cues for one tick's events. Game over silences the death cue
    /// fired in the same tick.
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            if *event == GameEvent::GameOver {
                self.stop_death();
            } else if let Some(effect) = SoundEffect::for_event(event) {
                self.play(effect);
            }
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = self.ctx.clone() else { return };

        // Browsers start the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Jump => self.play_jump(&ctx, vol),
            SoundEffect::Collect => self.play_collect(&ctx, vol),
            SoundEffect::Death => {
                self.death_voices = self.play_death(&ctx, vol);
            }
            SoundEffect::Win => self.play_win(&ctx, vol),
        }
    }

    /// Cut the death cue short
    pub fn stop_death(&mut self) {
        for osc in self.death_voices.drain(..) {
            osc.stop().ok();
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Jump - quick upward chirp
    fn play_jump(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(660.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.18).ok();
    }

    /// Collect - two bright coin notes
    fn play_collect(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        for (i, freq) in [988.0, 1319.0].into_iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Square) else {
                continue;
            };
            let start = t + i as f64 * 0.07;
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain().set_value_at_time(vol * 0.18, start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + 0.25)
                .ok();
            osc.start_with_when(start).ok();
            osc.stop_with_when(start + 0.3).ok();
        }
    }

    /// Death - slow descending wail; returns the voices so they can be cut
    fn play_death(&self, ctx: &AudioContext, vol: f32) -> Vec<OscillatorNode> {
        let t = ctx.current_time();
        let mut voices = Vec::with_capacity(2);

        if let Some((osc, gain)) = self.create_osc(ctx, 440.0, OscillatorType::Triangle) {
            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.6)
                .ok();
            osc.frequency().set_value_at_time(440.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(110.0, t + 1.4)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 1.7).ok();
            voices.push(osc);
        }

        // Low rumble under the wail
        if let Some((osc, gain)) = self.create_osc(ctx, 70.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.2)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 1.3).ok();
            voices.push(osc);
        }

        voices
    }

    /// Win - rising major arpeggio
    fn play_win(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        let notes = [523.25, 659.25, 783.99, 1046.5];

        for (i, freq) in notes.into_iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) else {
                continue;
            };
            let start = t + i as f64 * 0.12;
            let hold = if i == notes.len() - 1 { 0.6 } else { 0.2 };
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain().set_value_at_time(vol * 0.3, start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + hold)
                .ok();
            osc.start_with_when(start).ok();
            osc.stop_with_when(start + hold + 0.05).ok();
        }
    }
}
