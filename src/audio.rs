//! Audio boundary
//!
//! The simulation only names sounds; an [`AudioSink`] decides what they
//! sound like. On wasm32 [`WebAudio`] synthesizes everything with Web Audio
//! oscillators, no sample files needed.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundEffect {
    /// Player hit something, or the opponent derezzed
    Collision,
    /// Drove over a boost pad
    Boost,
    /// Drove over a slow pad
    Slow,
    /// Entered a teleporter
    Teleport,
    /// Picked up a weapon
    WeaponPickup,
    /// Armed player shattered an obstacle
    Shatter,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Collision => "collision",
            SoundEffect::Boost => "boost",
            SoundEffect::Slow => "slow",
            SoundEffect::Teleport => "teleport",
            SoundEffect::WeaponPickup => "weapon_pickup",
            SoundEffect::Shatter => "shatter",
        }
    }
}

/// Something that can make noise. Calls must return immediately.
pub trait AudioSink {
    /// Fire-and-forget one-shot effect
    fn play(&mut self, effect: SoundEffect);

    /// Set the engine drone level (0-1), or stop it with `None`
    fn engine(&mut self, level: Option<f32>);
}

/// Silent sink for headless runs and tests
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}

    fn engine(&mut self, _level: Option<f32>) {}
}

/// Writes effects to the debug log
#[derive(Debug, Default, Clone)]
pub struct LogAudio {
    engine_on: bool,
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        log::debug!("sfx: {}", effect.as_str());
    }

    fn engine(&mut self, level: Option<f32>) {
        match level {
            Some(_) if !self.engine_on => {
                self.engine_on = true;
                log::debug!("engine on");
            }
            None if self.engine_on => {
                self.engine_on = false;
                log::debug!("engine off");
            }
            _ => {}
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};
    use crate::settings::Settings;

    /// Procedural Web Audio sink
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        engine: Option<(OscillatorNode, GainNode)>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                engine: None,
                master_volume: settings.master_volume.clamp(0.0, 1.0),
                sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
                muted: settings.muted,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        fn create_osc(
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

        /// Frequency sweep with an exponential fade
        fn sweep(
            ctx: &AudioContext,
            osc_type: OscillatorType,
            from: f32,
            to: f32,
            peak: f32,
            start: f64,
            duration: f64,
        ) {
            let Some((osc, gain)) = Self::create_osc(ctx, from, osc_type) else {
                return;
            };

            gain.gain().set_value_at_time(peak, start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + duration)
                .ok();
            osc.frequency().set_value_at_time(from, start).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, start + duration)
                .ok();

            osc.start_with_when(start).ok();
            osc.stop_with_when(start + duration).ok();
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let t = ctx.current_time();
            match effect {
                SoundEffect::Collision => {
                    Self::sweep(ctx, OscillatorType::Square, 150.0, 40.0, vol * 0.3, t, 0.5)
                }
                SoundEffect::Boost => {
                    Self::sweep(ctx, OscillatorType::Sine, 400.0, 1200.0, vol * 0.2, t, 0.3)
                }
                SoundEffect::Slow => {
                    Self::sweep(ctx, OscillatorType::Sine, 400.0, 100.0, vol * 0.2, t, 0.3)
                }
                SoundEffect::Teleport => {
                    for i in 0..3 {
                        let freq = 800.0 + i as f32 * 400.0;
                        let start = t + i as f64 * 0.05;
                        Self::sweep(ctx, OscillatorType::Triangle, freq, freq * 1.5, vol * 0.15, start, 0.1);
                    }
                }
                SoundEffect::WeaponPickup => {
                    Self::sweep(ctx, OscillatorType::Sawtooth, 300.0, 900.0, vol * 0.2, t, 0.25)
                }
                SoundEffect::Shatter => {
                    Self::sweep(ctx, OscillatorType::Square, 900.0, 120.0, vol * 0.25, t, 0.2)
                }
            }
        }

        fn engine(&mut self, level: Option<f32>) {
            let Some(level) = level else {
                if let Some((osc, _)) = self.engine.take() {
                    osc.stop().ok();
                }
                return;
            };
            let Some(ctx) = &self.ctx else { return };

            if self.engine.is_none() {
                self.engine = Self::create_osc(ctx, 60.0, OscillatorType::Sawtooth);
                if let Some((osc, _)) = &self.engine {
                    osc.start().ok();
                }
            }

            let level = level.clamp(0.0, 1.0);
            let vol = self.effective_volume();
            if let Some((osc, gain)) = &self.engine {
                let t = ctx.current_time();
                osc.frequency()
                    .set_target_at_time(60.0 + level * 120.0, t, 0.1)
                    .ok();
                gain.gain()
                    .set_target_at_time((0.02 + level * 0.05) * vol, t, 0.1)
                    .ok();
            }
        }
    }
}
