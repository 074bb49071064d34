//! Audio signals
//!
//! The simulation reports what happened through [`GameEvent`]s; this module
//! decides which of those are audible. On the web the sounds are generated
//! procedurally with the Web Audio API, no sample files needed.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Cannon fired
    Fire,
    /// Ball struck a wall
    Impact,
}

impl SoundEffect {
    /// Sound for a simulation event. Ball-on-ball contacts stay silent.
    pub fn for_event(event: &GameEvent) -> Option<SoundEffect> {
        match event {
            GameEvent::Fired { .. } => Some(SoundEffect::Fire),
            GameEvent::WallImpact { audible: true, .. } => Some(SoundEffect::Impact),
            GameEvent::WallImpact { audible: false, .. } | GameEvent::Recycled { .. } => None,
        }
    }

    /// Per-effect mix level
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundEffect::Fire => 1.0,
            SoundEffect::Impact => 0.7,
        }
    }

    /// Output gain for this effect under the player's volume settings
    pub fn gain(&self, settings: &Settings) -> f32 {
        settings.effective_volume() * self.base_volume()
    }
}

/// Sounds to play for one tick's events, in event order
pub fn sounds_for(events: &[GameEvent]) -> impl Iterator<Item = SoundEffect> + '_ {
    events.iter().filter_map(SoundEffect::for_event)
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        /// Snapshot of the player's volume settings
        settings: Settings,
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
                settings: settings.clone(),
            }
        }

        /// Pick up changed volume or mute settings
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.settings = settings.clone();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = effect.gain(&self.settings);
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Fire => self.play_fire(ctx, vol),
                SoundEffect::Impact => self.play_impact(ctx, vol),
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

        /// Cannon shot - low boom with a sharp crack on top
        fn play_fire(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 90.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.45)
                    .ok();
                osc.frequency().set_value_at_time(90.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(28.0, t + 0.4)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.5).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.18, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.08).ok();
            }
        }

        /// Wall impact - short metallic clang
        fn play_impact(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 520.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.22, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.18)
                    .ok();
                osc.frequency().set_value_at_time(520.0, t).ok();
                osc.frequency().set_value_at_time(380.0, t + 0.04).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.2).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 1750.0, OscillatorType::Triangle) {
                gain.gain().set_value_at_time(vol * 0.12, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.32).ok();
            }
        }
    }
}
