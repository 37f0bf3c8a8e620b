//! Sway envelope follower
//!
//! Smooths the binary detector state into a 0..1 amplitude scalar. Two
//! capped ramp counters shape a target value and a leaky integrator chases
//! it, giving an S-curve rise and fall independent of the detector's own
//! hysteresis timing.

use super::hops_for_ms;

/// Ramp-up time from silence to full sway
const SWAY_ATTACK_MS: u64 = 50;

/// Ramp-down time from full sway back to rest
const SWAY_RELEASE_MS: u64 = 250;

/// Integrator gain per hop towards the ramp target
const ENV_FOLLOW_GAIN: f64 = 0.65;

/// Attack/release envelope over the detector state.
#[derive(Debug, Clone)]
pub struct SwayEnvelope {
    attack_run: u32,
    release_run: u32,
    value: f64,
    attack_cap: u32,
    release_cap: u32,
}

impl Default for SwayEnvelope {
    fn default() -> Self {
        Self::new()
    }
}

impl SwayEnvelope {
    /// Create an envelope at rest.
    #[must_use]
    pub fn new() -> Self {
        Self {
            attack_run: 0,
            release_run: 0,
            value: 0.0,
            attack_cap: hops_for_ms(SWAY_ATTACK_MS),
            release_cap: hops_for_ms(SWAY_RELEASE_MS),
        }
    }

    /// Advance one hop with the current detector state, returning the new
    /// envelope value in `[0, 1]`.
    pub fn update(&mut self, active: bool) -> f64 {
        let target = if active {
            self.attack_run = (self.attack_run + 1).min(self.attack_cap);
            self.release_run = 0;
            f64::from(self.attack_run) / f64::from(self.attack_cap)
        } else {
            self.release_run = (self.release_run + 1).min(self.release_cap);
            self.attack_run = 0;
            1.0 - f64::from(self.release_run) / f64::from(self.release_cap)
        };

        self.value += ENV_FOLLOW_GAIN * (target - self.value);
        self.value = self.value.clamp(0.0, 1.0);
        self.value
    }

    /// Current envelope value in `[0, 1]`
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_within_unit_range() {
        let mut env = SwayEnvelope::new();
        for i in 0..200 {
            let v = env.update(i % 7 != 0);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn rises_monotonically_while_active() {
        let mut env = SwayEnvelope::new();
        let mut prev = 0.0;
        for _ in 0..10 {
            let v = env.update(true);
            assert!(v >= prev);
            prev = v;
        }
        assert!(prev > 0.95);
    }

    #[test]
    fn falls_monotonically_while_inactive() {
        let mut env = SwayEnvelope::new();
        for _ in 0..10 {
            env.update(true);
        }
        let mut prev = env.value();
        for _ in 0..10 {
            let v = env.update(false);
            assert!(v <= prev);
            prev = v;
        }
        assert!(prev < 0.05);
    }

    #[test]
    fn release_is_slower_than_attack() {
        let mut env = SwayEnvelope::new();
        let mut rise_hops = 0;
        while env.value() < 0.9 {
            env.update(true);
            rise_hops += 1;
        }
        let mut fall_hops = 0;
        while env.value() > 0.1 {
            env.update(false);
            fall_hops += 1;
        }
        assert!(fall_hops > rise_hops);
    }

    #[test]
    fn ramp_counters_cap_and_reset() {
        let mut env = SwayEnvelope::new();
        for _ in 0..20 {
            env.update(false);
        }
        assert_eq!(env.release_run, env.release_cap);
        env.update(true);
        assert_eq!(env.release_run, 0);
        assert_eq!(env.attack_run, 1);
    }
}
