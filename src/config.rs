/// Timing and retry settings for the CR95HF driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// Delay between two status polls while waiting for a response.
    pub poll_interval_ms: u32,
    /// Number of status polls before a command is reported as timed out.
    /// Values below 1 are treated as 1.
    pub max_poll_attempts: u32,
    /// Length of each half of the wake pulse sent when the handshake fails.
    pub wake_pulse_ms: u32,
    /// Number of handshake attempts before giving up, `None` retries forever.
    pub probe_attempts: Option<u32>,
    /// Pause between two tag reads that found nothing.
    pub retry_pause_ms: u32,
    /// Pause after a successful read before the field is polled again.
    pub removal_pause_ms: u32,
}

impl Config {
    /// Creates a new `Config` instance.
    ///
    /// # Arguments
    ///
    /// * `poll_interval_ms` - Delay between two status polls.
    /// * `max_poll_attempts` - Status polls allowed per command.
    ///
    /// # Returns
    ///
    /// A new `Config` with the given polling settings and default values for everything else.
    pub fn new(poll_interval_ms: u32, max_poll_attempts: u32) -> Config {
        Config {
            poll_interval_ms,
            max_poll_attempts,
            ..Config::default()
        }
    }
    /// Sets the delay between two status polls.
    pub fn poll_interval_ms(mut self, poll_interval_ms: u32) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }
    /// Sets how many status polls a command may take before timing out.
    ///
    /// The status register is always read at least once, so `0` behaves like `1`.
    pub fn max_poll_attempts(mut self, max_poll_attempts: u32) -> Self {
        self.max_poll_attempts = max_poll_attempts;
        self
    }
    /// Sets the length of each half of the wake pulse.
    pub fn wake_pulse_ms(mut self, wake_pulse_ms: u32) -> Self {
        self.wake_pulse_ms = wake_pulse_ms;
        self
    }
    /// Bounds the presence handshake.
    ///
    /// # Arguments
    ///
    /// * `attempts` - `Some(n)` to give up after `n` failed handshakes, `None` to retry forever.
    ///
    /// # Returns
    ///
    /// The updated `Config` instance.
    pub fn probe_attempts(mut self, attempts: Option<u32>) -> Self {
        self.probe_attempts = attempts;
        self
    }
    /// Sets the pause between two tag reads that found nothing.
    pub fn retry_pause_ms(mut self, retry_pause_ms: u32) -> Self {
        self.retry_pause_ms = retry_pause_ms;
        self
    }
    /// Sets the pause after a successful read.
    pub fn removal_pause_ms(mut self, removal_pause_ms: u32) -> Self {
        self.removal_pause_ms = removal_pause_ms;
        self
    }
}

/// Provides default settings for the CR95HF driver.
impl Default for Config {
    /// Returns the default configuration.
    ///
    /// Polls every 10 ms for up to one second, pulses the wake line for 10 ms,
    /// retries the handshake forever and waits 500 ms after each tag read.
    fn default() -> Config {
        Config {
            poll_interval_ms: 10,
            max_poll_attempts: 100,
            wake_pulse_ms: 10,
            probe_attempts: None,
            retry_pause_ms: 50,
            removal_pause_ms: 500,
        }
    }
}
