//! Ambient masking sound.
//!
//! The timer only needs the [`AmbientSound`] boundary (on/off and a volume
//! that never jumps). [`AmbientMixer`] implements it in-process by rendering
//! samples: low-passed brown noise under a quiet 40 Hz + 200 Hz sine drone.
//! Getting those samples to a speaker is the front end's job.

mod brown_noise;
mod gain;

pub use brown_noise::BrownNoise;
pub use gain::SmoothedGain;

use std::f64::consts::TAU;
use std::time::Duration;

use tracing::debug;

use crate::error::ValidationError;

pub const SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_SMOOTHING: Duration = Duration::from_millis(100);

const NOISE_CUTOFF_HZ: f32 = 800.0;
const NOISE_GAIN: f32 = 0.08;
const DRONE_LOW_HZ: f64 = 40.0;
const DRONE_HIGH_HZ: f64 = 200.0;
const DRONE_GAIN: f32 = 0.05;

/// Control surface for ambient sound.
pub trait AmbientSound {
    fn enable(&mut self);
    fn disable(&mut self);
    fn is_enabled(&self) -> bool;
    /// Target volume in `0.0..=1.0`; out-of-range values are clamped.
    fn set_volume(&mut self, volume: f32);
    fn volume(&self) -> f32;

    /// Flip on/off, returning the new state.
    fn toggle(&mut self) -> bool {
        if self.is_enabled() {
            self.disable();
        } else {
            self.enable();
        }
        self.is_enabled()
    }
}

/// Mono sample generator behind [`AmbientSound`].
pub struct AmbientMixer {
    sample_rate: u32,
    enabled: bool,
    master: SmoothedGain,
    noise: BrownNoise,
    lowpass_alpha: f32,
    lowpass_state: f32,
    drone_low_phase: f64,
    drone_high_phase: f64,
}

impl AmbientMixer {
    pub fn new(sample_rate: u32, volume: f32, smoothing: Duration) -> Result<Self, ValidationError> {
        if sample_rate == 0 {
            return Err(ValidationError::InvalidValue {
                field: "sample_rate".into(),
                message: "must be greater than zero".into(),
            });
        }
        if !volume.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: "volume".into(),
                message: format!("{volume} is not a number"),
            });
        }
        let lowpass_alpha =
            1.0 - (-std::f32::consts::TAU * NOISE_CUTOFF_HZ / sample_rate as f32).exp();
        Ok(Self {
            sample_rate,
            enabled: false,
            master: SmoothedGain::new(volume.clamp(0.0, 1.0), smoothing.as_secs_f32(), sample_rate),
            noise: BrownNoise::new(),
            lowpass_alpha,
            lowpass_state: 0.0,
            drone_low_phase: 0.0,
            drone_high_phase: 0.0,
        })
    }

    /// Swap in a specific noise stream (e.g. a seeded one).
    pub fn with_noise(mut self, noise: BrownNoise) -> Self {
        self.noise = noise;
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Gain actually applied to the last rendered sample.
    pub fn current_gain(&self) -> f32 {
        self.master.current()
    }

    /// Fill `out` with the next samples. Silence while disabled.
    pub fn render(&mut self, out: &mut [f32]) {
        if !self.enabled {
            out.fill(0.0);
            return;
        }
        let low_step = TAU * DRONE_LOW_HZ / self.sample_rate as f64;
        let high_step = TAU * DRONE_HIGH_HZ / self.sample_rate as f64;

        for sample in out.iter_mut() {
            let white = self.noise.next().unwrap_or(0.0);
            self.lowpass_state += self.lowpass_alpha * (white - self.lowpass_state);
            let noise = self.lowpass_state * NOISE_GAIN;

            let drone = (self.drone_low_phase.sin() + self.drone_high_phase.sin()) as f32 * DRONE_GAIN;
            self.drone_low_phase = (self.drone_low_phase + low_step) % TAU;
            self.drone_high_phase = (self.drone_high_phase + high_step) % TAU;

            *sample = (noise + drone) * self.master.next_gain();
        }
    }
}

impl AmbientSound for AmbientMixer {
    fn enable(&mut self) {
        if !self.enabled {
            self.enabled = true;
            debug!(volume = self.master.target(), "ambient sound enabled");
        }
    }

    fn disable(&mut self) {
        if self.enabled {
            self.enabled = false;
            self.lowpass_state = 0.0;
            debug!("ambient sound disabled");
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        self.master.set_target(volume.clamp(0.0, 1.0));
    }

    fn volume(&self) -> f32 {
        self.master.target()
    }
}
