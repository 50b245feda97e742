/// Exponential approach to a target gain.
///
/// After `t` seconds the gain sits at
/// `target + (start - target) * exp(-t / time_constant)`, so a slider move
/// never produces a step in the output.
#[derive(Debug, Clone)]
pub struct SmoothedGain {
    current: f32,
    target: f32,
    /// Per-sample fraction of the remaining distance covered.
    coefficient: f32,
}

impl SmoothedGain {
    pub fn new(initial: f32, time_constant_secs: f32, sample_rate: u32) -> Self {
        let coefficient = if time_constant_secs <= 0.0 {
            1.0
        } else {
            1.0 - (-1.0 / (time_constant_secs * sample_rate as f32)).exp()
        };
        Self {
            current: initial,
            target: initial,
            coefficient,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Advance one sample and return the gain to apply to it.
    pub fn next_gain(&mut self) -> f32 {
        self.current += (self.target - self.current) * self.coefficient;
        self.current
    }
}
