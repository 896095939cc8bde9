//! Timing jitter applied on top of each step's base delay.

use std::time::Duration;

use rand::Rng;

/// Source of the extra, non-negative delay added after a step.
pub trait Jitter: Send + Sync {
    /// Draw one jitter sample. Must be strictly below [`Jitter::max`] unless
    /// `max` is zero.
    fn sample(&self) -> Duration;

    /// Exclusive upper bound of [`Jitter::sample`]
    fn max(&self) -> Duration;
}

/// Uniformly distributed jitter in `[0, max_ms)`
#[derive(Debug, Clone, Copy)]
pub struct UniformJitter {
    max_ms: u64,
}

impl UniformJitter {
    pub const DEFAULT_MAX_MS: u64 = 300;

    pub fn new(max_ms: u64) -> Self {
        Self { max_ms }
    }
}

impl Default for UniformJitter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_MS)
    }
}

impl Jitter for UniformJitter {
    fn sample(&self) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..self.max_ms))
    }

    fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

/// No jitter at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn sample(&self) -> Duration {
        Duration::ZERO
    }

    fn max(&self) -> Duration {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_jitter_stays_below_max() {
        let jitter = UniformJitter::new(50);
        for _ in 0..500 {
            assert!(jitter.sample() < Duration::from_millis(50));
        }
    }

    #[test]
    fn test_zero_max_disables_jitter() {
        let jitter = UniformJitter::new(0);
        assert_eq!(jitter.sample(), Duration::ZERO);
        assert_eq!(jitter.max(), Duration::ZERO);
    }

    #[test]
    fn test_default_bound_is_300ms() {
        assert_eq!(UniformJitter::default().max(), Duration::from_millis(300));
    }
}
