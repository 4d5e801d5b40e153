//! Reconnect delay with capped exponential growth.

use std::time::Duration;

/// Configuration for reconnect backoff.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffConfig {
    /// Delay before the first reconnect, and after every successful login.
    pub initial_delay: Duration,
    /// Upper bound for the delay.
    pub max_delay: Duration,
    /// Growth factor applied after each scheduled reconnect.
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(5_000),
            max_delay: Duration::from_millis(300_000),
            multiplier: 2.0,
        }
    }
}

impl BackoffConfig {
    pub fn new(initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            initial_delay,
            max_delay,
            ..Default::default()
        }
    }
}

/// Current reconnect delay. Lives for the whole process, across sessions.
#[derive(Debug, Clone)]
pub struct Backoff {
    config: BackoffConfig,
    current: Duration,
}

impl Backoff {
    pub fn new(config: BackoffConfig) -> Self {
        let current = config.initial_delay.min(config.max_delay);
        Self { config, current }
    }

    /// The delay the next reconnect will use.
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Take the delay for a reconnect being scheduled now, then grow it.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = self
            .current
            .mul_f64(self.config.multiplier)
            .min(self.config.max_delay);
        delay
    }

    /// Back to the initial delay.
    pub fn reset(&mut self) {
        self.current = self.config.initial_delay.min(self.config.max_delay);
    }

    pub fn config(&self) -> &BackoffConfig {
        &self.config
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(BackoffConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(d: Duration) -> u128 {
        d.as_millis()
    }

    #[test]
    fn test_doubles_from_base() {
        let mut backoff = Backoff::default();
        let delays: Vec<_> = (0..4).map(|_| ms(backoff.next_delay())).collect();
        assert_eq!(delays, vec![5_000, 10_000, 20_000, 40_000]);
    }

    #[test]
    fn test_capped_at_max() {
        let mut backoff = Backoff::default();
        let delays: Vec<_> = (0..9).map(|_| ms(backoff.next_delay())).collect();
        assert_eq!(
            delays,
            vec![5_000, 10_000, 20_000, 40_000, 80_000, 160_000, 300_000, 300_000, 300_000]
        );
    }

    #[test]
    fn test_reset() {
        let mut backoff = Backoff::default();
        backoff.next_delay();
        backoff.next_delay();
        assert_eq!(ms(backoff.current()), 20_000);
        backoff.reset();
        assert_eq!(ms(backoff.next_delay()), 5_000);
    }
}
