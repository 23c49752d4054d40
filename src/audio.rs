//! Audio cues using the Web Audio API
//!
//! Procedurally generated - no external files needed. The manager owns its
//! `AudioContext` and closes it when dropped.

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::SoundEffect;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
        }
    }

    /// Pick up volume/mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play a cue
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Squash => self.play_squash(ctx, vol),
            SoundEffect::Regression => self.play_regression(ctx, vol),
            SoundEffect::RoundOver => self.play_round_over(ctx, vol),
        }
    }

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

    /// Squash - soft descending splat
    fn play_squash(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(180.0, t).ok();
        osc.frequency().linear_ramp_to_value_at_time(60.0, t + 0.22).ok();
        gain.gain().set_value_at_time(vol * 0.8, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.25).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.25).ok();
    }

    /// Regression - short low buzz
    fn play_regression(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 110.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.18)
            .ok();
        osc.frequency().set_value_at_time(110.0, t).ok();
        osc.frequency().set_value_at_time(90.0, t + 0.08).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Round over - descending phrase
    fn play_round_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [520.0, 440.0, 350.0].iter().enumerate() {
            let delay = i as f64 * 0.15;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }
    }
}

impl Drop for AudioManager {
    fn drop(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            let _ = ctx.close();
            log::info!("Audio context closed");
        }
    }
}
