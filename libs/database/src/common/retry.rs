use std::time::Duration;

/// Reconnect cadence for database connections
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Delay before the first retry in milliseconds
    pub initial_delay_ms: u64,

    /// Upper bound on any single delay in milliseconds
    pub max_delay_ms: u64,

    /// Multiplier for exponential backoff (typically 2.0)
    pub backoff_multiplier: f64,

    /// Whether to add jitter to prevent thundering herd
    pub use_jitter: bool,
}

impl RetryConfig {
    /// Defaults: 500ms initial, 30s cap, x2, jittered.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Disable jitter
    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Stateful exponential backoff.
///
/// Each call to [`Backoff::next_delay`] returns the delay to wait before the
/// next attempt and grows the base delay for the one after. [`Backoff::reset`]
/// returns to the initial delay once an attempt succeeds.
#[derive(Debug, Clone)]
pub struct Backoff {
    config: RetryConfig,
    current_ms: u64,
    attempts: u32,
}

impl Backoff {
    pub fn new(config: RetryConfig) -> Self {
        let current_ms = config.initial_delay_ms;
        Self {
            config,
            current_ms,
            attempts: 0,
        }
    }

    pub fn next_delay(&mut self) -> Duration {
        let base = self.current_ms.min(self.config.max_delay_ms);
        let delay = if self.config.use_jitter {
            apply_jitter(base)
        } else {
            base
        };

        self.attempts = self.attempts.saturating_add(1);
        self.current_ms = ((self.current_ms as f64 * self.config.backoff_multiplier) as u64)
            .min(self.config.max_delay_ms)
            .max(1);

        Duration::from_millis(delay)
    }

    pub fn reset(&mut self) {
        self.current_ms = self.config.initial_delay_ms;
        self.attempts = 0;
    }

    /// Number of delays handed out since the last reset
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

/// Scale a delay to a pseudo-random 50%..=100% of itself
fn apply_jitter(delay: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let random_factor =
        (RandomState::new().hash_one(std::time::SystemTime::now()) % 51) as f64 / 100.0 + 0.5;

    (delay as f64 * random_factor) as u64
}
