//! Per-frame timekeeping.
//!
//! The simulation advances by variable wall-clock deltas rather than a fixed
//! accumulator: the orbital state is a pure function of accumulated angle, so
//! frame-to-frame jitter cannot destabilize it. A clamp keeps a stall (debugger
//! pause, window drag) from teleporting every body across its orbit.

use std::time::Instant;
use tracing::warn;

/// Longest frame delta fed to the simulation, in seconds.
pub const MAX_FRAME_TIME: f32 = 0.25;

/// Measures elapsed wall-clock time between frames and scales it into a
/// simulation delta.
pub struct FrameClock {
    previous_time: Instant,
    time_scale: f32,
    frame_count: u64,
    total_sim_time: f64,
}

impl FrameClock {
    pub fn new(time_scale: f32) -> Self {
        Self {
            previous_time: Instant::now(),
            time_scale,
            frame_count: 0,
            total_sim_time: 0.0,
        }
    }

    /// Returns the scaled simulation delta for this frame, in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.previous_time).as_secs_f32();
        self.previous_time = now;

        if raw > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                raw * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
        }
        let dt = scale_frame_time(raw, self.time_scale);

        self.frame_count += 1;
        self.total_sim_time += dt as f64;
        dt
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Total scaled simulation time in seconds.
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

/// Clamp a raw frame delta and apply the simulation speed multiplier.
pub fn scale_frame_time(raw: f32, time_scale: f32) -> f32 {
    raw.min(MAX_FRAME_TIME).max(0.0) * time_scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_frame_passes_through() {
        let dt = scale_frame_time(1.0 / 60.0, 1.0);
        assert!((dt - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_stall_is_clamped() {
        let dt = scale_frame_time(5.0, 1.0);
        assert!((dt - MAX_FRAME_TIME).abs() < 1e-9);
    }

    #[test]
    fn test_time_scale_applies_after_clamp() {
        let dt = scale_frame_time(5.0, 2.0);
        assert!((dt - MAX_FRAME_TIME * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_delta_floors_at_zero() {
        // Instant is monotonic, but the pure helper should still be total.
        assert_eq!(scale_frame_time(-0.1, 1.0), 0.0);
    }

    #[test]
    fn test_zero_time_scale_pauses() {
        assert_eq!(scale_frame_time(1.0 / 60.0, 0.0), 0.0);
    }

    #[test]
    fn test_clock_counts_frames() {
        let mut clock = FrameClock::new(1.0);
        for _ in 0..5 {
            clock.tick();
        }
        assert_eq!(clock.frame_count(), 5);
        assert!(clock.total_sim_time() >= 0.0);
    }
}
