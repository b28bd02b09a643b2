//! Simulation clock and frame pacing

use std::thread;
use std::time::{Duration, Instant};

use crate::consts::{SIM_DT, SUBSTEPS_NORMAL, SUBSTEPS_SLOW, TARGET_FPS};

/// Fixed-timestep settings for the physics sub-steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    /// Seconds per physics sub-step
    pub fixed_dt: f32,
    sub_steps_per_frame: u32,
    pub target_frame_rate: u32,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(SIM_DT, SUBSTEPS_NORMAL, TARGET_FPS)
    }
}

impl SimulationClock {
    /// `sub_steps_per_frame` is clamped to at least 1
    pub fn new(fixed_dt: f32, sub_steps_per_frame: u32, target_frame_rate: u32) -> Self {
        Self {
            fixed_dt,
            sub_steps_per_frame: sub_steps_per_frame.max(1),
            target_frame_rate,
        }
    }

    pub fn sub_steps_per_frame(&self) -> u32 {
        self.sub_steps_per_frame
    }

    /// Slow-motion toggle: 2 sub-steps -> 1, anything else -> 2
    pub fn toggle_slow_motion(&mut self) {
        self.sub_steps_per_frame = if self.sub_steps_per_frame == SUBSTEPS_NORMAL {
            SUBSTEPS_SLOW
        } else {
            SUBSTEPS_NORMAL
        };
    }

    pub fn is_slow_motion(&self) -> bool {
        self.sub_steps_per_frame == SUBSTEPS_SLOW
    }

    /// Simulated seconds advanced per rendered frame
    pub fn simulated_per_frame(&self) -> f32 {
        self.fixed_dt * self.sub_steps_per_frame as f32
    }
}

/// Blocks until the frame-rate cap and reports the measured rate
pub trait FramePacer {
    /// Wait out the rest of the frame so frames are at least `1 / target_fps` apart
    fn tick(&mut self, target_fps: u32);
    /// Measured frames per second
    fn fps(&self) -> f32;
}

/// Number of frame durations averaged for the fps readout
const FPS_SAMPLES: usize = 10;

/// Wall-clock pacer using `thread::sleep`
#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
    frame_times: [Duration; FPS_SAMPLES],
    frame_index: usize,
    samples: usize,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            frame_times: [Duration::ZERO; FPS_SAMPLES],
            frame_index: 0,
            samples: 0,
        }
    }

    /// Record one completed frame duration
    pub fn record(&mut self, frame_time: Duration) {
        self.frame_times[self.frame_index] = frame_time;
        self.frame_index = (self.frame_index + 1) % FPS_SAMPLES;
        self.samples = (self.samples + 1).min(FPS_SAMPLES);
    }
}

impl FramePacer for FrameClock {
    fn tick(&mut self, target_fps: u32) {
        let budget = Duration::from_secs_f64(1.0 / target_fps.max(1) as f64);
        let elapsed = self.last_tick.elapsed();
        if elapsed < budget {
            thread::sleep(budget - elapsed);
        }
        let now = Instant::now();
        self.record(now - self.last_tick);
        self.last_tick = now;
    }

    fn fps(&self) -> f32 {
        // Not enough history yet
        if self.samples < FPS_SAMPLES {
            return 0.0;
        }
        let total: Duration = self.frame_times.iter().sum();
        if total.is_zero() {
            return 0.0;
        }
        FPS_SAMPLES as f32 / total.as_secs_f32()
    }
}
