//! Periodic bounded-random sample generation.
//!
//! The generator is a deadline-driven state machine: [`Generator::start`]
//! validates the configuration and arms the first deadline, and the host
//! event loop calls [`Generator::poll`] on whatever cadence it likes. Every
//! deadline that has elapsed fires one tick appending exactly
//! `config.count` samples as a single batch, so ticks queue under load
//! instead of interleaving, and a tick is never partially applied.

use std::time::{Duration, Instant};

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::buffer::{Sample, SampleBuffer};

const MAX_COUNT: u32 = 99_999;
const MAX_BOUND: u32 = 99_999;
const MIN_INTERVAL_MS: u64 = 10;
const MAX_INTERVAL_MS: u64 = 60_000;

/// Parameters for one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Samples appended per tick, 1..=99999.
    pub count: u32,
    /// Inclusive lower bound of the value interval, 0..=99999.
    pub min: u32,
    /// Exclusive upper bound of the value interval, 1..=99999 and > `min`.
    pub max: u32,
    /// Tick period in milliseconds, 10..=60000.
    pub interval_ms: u64,
}

impl GeneratorConfig {
    /// The tick period as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Check all parameter bounds.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.count < 1 || self.count > MAX_COUNT {
            return Err(GeneratorError::CountOutOfRange(self.count));
        }
        if self.min > MAX_BOUND {
            return Err(GeneratorError::MinOutOfRange(self.min));
        }
        if self.max < 1 || self.max > MAX_BOUND {
            return Err(GeneratorError::MaxOutOfRange(self.max));
        }
        if self.max <= self.min {
            return Err(GeneratorError::MaxNotAboveMin {
                min: self.min,
                max: self.max,
            });
        }
        if self.interval_ms < MIN_INTERVAL_MS || self.interval_ms > MAX_INTERVAL_MS {
            return Err(GeneratorError::IntervalOutOfRange(self.interval_ms));
        }
        Ok(())
    }
}

/// Errors reported by [`Generator::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeneratorError {
    /// Per-tick sample count outside 1..=99999.
    #[error("sample count {0} outside 1..=99999")]
    CountOutOfRange(u32),
    /// Lower value bound above 99999.
    #[error("minimum value {0} above 99999")]
    MinOutOfRange(u32),
    /// Upper value bound outside 1..=99999.
    #[error("maximum value {0} outside 1..=99999")]
    MaxOutOfRange(u32),
    /// Upper value bound does not strictly exceed the lower bound.
    #[error("maximum value {max} must exceed minimum value {min}")]
    MaxNotAboveMin {
        /// Configured lower bound.
        min: u32,
        /// Configured upper bound.
        max: u32,
    },
    /// Tick period outside 10..=60000 milliseconds.
    #[error("interval {0}ms outside 10..=60000ms")]
    IntervalOutOfRange(u64),
    /// `start` was called while a run is in progress.
    #[error("generator is already running")]
    AlreadyRunning,
}

/// Lifecycle state of the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// No run in progress; `poll` appends nothing.
    #[default]
    Stopped,
    /// A run is in progress and a deadline is armed.
    Running,
}

/// Periodic source of bounded random samples.
#[derive(Debug)]
pub struct Generator {
    state: RunState,
    config: GeneratorConfig,
    next_x: u64,
    next_tick: Option<Instant>,
    rng: StdRng,
}

impl Generator {
    /// Create a stopped generator seeded from the system entropy source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a stopped generator with a fixed seed.
    ///
    /// Deterministic runs for tests and reproducible captures.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            state: RunState::Stopped,
            config: GeneratorConfig {
                count: 1,
                min: 0,
                max: 1,
                interval_ms: MIN_INTERVAL_MS,
            },
            next_x: 0,
            next_tick: None,
            rng,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Check whether a run is in progress.
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// The configuration of the current or most recent run.
    pub fn config(&self) -> GeneratorConfig {
        self.config
    }

    /// Begin a run.
    ///
    /// Validates `config`, arms the first deadline at `now + interval`, and
    /// transitions Stopped→Running. `start_index` is the x value the next
    /// sample will carry; pass the buffer length so new samples continue
    /// the existing sequence instead of restarting at zero. Fails with
    /// [`GeneratorError::AlreadyRunning`] while a run is in progress.
    pub fn start(
        &mut self,
        config: GeneratorConfig,
        start_index: u64,
        now: Instant,
    ) -> Result<(), GeneratorError> {
        if self.is_running() {
            return Err(GeneratorError::AlreadyRunning);
        }
        config.validate()?;

        self.config = config;
        self.next_x = start_index;
        self.next_tick = Some(now + config.interval());
        self.state = RunState::Running;
        debug!(
            "generator started: {} samples in [{}, {}) every {}ms from x={}",
            config.count, config.min, config.max, config.interval_ms, start_index
        );
        Ok(())
    }

    /// End the run and disarm the pending deadline.
    ///
    /// After `stop` returns, `poll` appends nothing. A no-op while Stopped.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.state = RunState::Stopped;
        self.next_tick = None;
        debug!("generator stopped at x={}", self.next_x);
    }

    /// Fire every deadline elapsed at `now`.
    ///
    /// Overdue ticks run sequentially in arrival order; each appends its
    /// full batch before the next begins. Returns the number of samples
    /// appended.
    pub fn poll(&mut self, now: Instant, buffer: &mut SampleBuffer) -> usize {
        let Some(mut deadline) = self.next_tick else {
            return 0;
        };

        let mut appended = 0;
        while deadline <= now {
            appended += self.tick(buffer);
            deadline += self.config.interval();
        }
        self.next_tick = Some(deadline);
        appended
    }

    fn tick(&mut self, buffer: &mut SampleBuffer) -> usize {
        let config = self.config;
        let mut batch = Vec::with_capacity(config.count as usize);
        for _ in 0..config.count {
            let y = self.rng.gen_range(config.min..config.max);
            batch.push(Sample::new(self.next_x as f64, y as f64));
            self.next_x += 1;
        }
        buffer.append_batch(batch)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            count: 5,
            min: 10,
            max: 20,
            interval_ms: 100,
        }
    }

    #[test]
    fn start_with_valid_config_transitions_to_running() {
        let mut generator = Generator::from_seed(7);
        assert_eq!(generator.state(), RunState::Stopped);
        generator.start(config(), 0, Instant::now()).unwrap();
        assert_eq!(generator.state(), RunState::Running);
    }

    #[test]
    fn start_rejects_each_violated_bound() {
        let now = Instant::now();
        let cases = [
            (
                GeneratorConfig { count: 0, ..config() },
                GeneratorError::CountOutOfRange(0),
            ),
            (
                GeneratorConfig {
                    count: 100_000,
                    ..config()
                },
                GeneratorError::CountOutOfRange(100_000),
            ),
            (
                GeneratorConfig {
                    min: 100_000,
                    ..config()
                },
                GeneratorError::MinOutOfRange(100_000),
            ),
            (
                GeneratorConfig { max: 0, ..config() },
                GeneratorError::MaxOutOfRange(0),
            ),
            (
                GeneratorConfig {
                    min: 20,
                    max: 20,
                    ..config()
                },
                GeneratorError::MaxNotAboveMin { min: 20, max: 20 },
            ),
            (
                GeneratorConfig {
                    interval_ms: 9,
                    ..config()
                },
                GeneratorError::IntervalOutOfRange(9),
            ),
            (
                GeneratorConfig {
                    interval_ms: 60_001,
                    ..config()
                },
                GeneratorError::IntervalOutOfRange(60_001),
            ),
        ];

        for (bad, expected) in cases {
            let mut generator = Generator::from_seed(7);
            assert_eq!(generator.start(bad, 0, now), Err(expected));
            assert_eq!(generator.state(), RunState::Stopped);
        }
    }

    #[test]
    fn start_while_running_is_rejected() {
        let mut generator = Generator::from_seed(7);
        let now = Instant::now();
        generator.start(config(), 0, now).unwrap();
        assert_eq!(
            generator.start(config(), 0, now),
            Err(GeneratorError::AlreadyRunning)
        );
    }

    #[test]
    fn poll_before_deadline_appends_nothing() {
        let mut generator = Generator::from_seed(7);
        let mut buffer = SampleBuffer::new();
        let now = Instant::now();
        generator.start(config(), 0, now).unwrap();
        assert_eq!(generator.poll(now + Duration::from_millis(99), &mut buffer), 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn each_elapsed_interval_appends_exactly_count() {
        let mut generator = Generator::from_seed(7);
        let mut buffer = SampleBuffer::new();
        let now = Instant::now();
        generator.start(config(), 0, now).unwrap();

        assert_eq!(
            generator.poll(now + Duration::from_millis(100), &mut buffer),
            5
        );
        assert_eq!(buffer.len(), 5);
        assert_eq!(
            generator.poll(now + Duration::from_millis(200), &mut buffer),
            5
        );
        assert_eq!(buffer.len(), 10);
    }

    #[test]
    fn overdue_ticks_queue_in_one_poll() {
        let mut generator = Generator::from_seed(7);
        let mut buffer = SampleBuffer::new();
        let now = Instant::now();
        generator.start(config(), 0, now).unwrap();

        // Three intervals elapse before the host gets around to polling.
        assert_eq!(
            generator.poll(now + Duration::from_millis(310), &mut buffer),
            15
        );
        assert_eq!(buffer.len(), 15);
    }

    #[test]
    fn values_stay_in_half_open_interval() {
        let mut generator = Generator::from_seed(42);
        let mut buffer = SampleBuffer::new();
        let now = Instant::now();
        let config = GeneratorConfig {
            count: 500,
            min: 3,
            max: 7,
            interval_ms: 10,
        };
        generator.start(config, 0, now).unwrap();
        generator.poll(now + Duration::from_millis(10), &mut buffer);

        for sample in buffer.snapshot().samples() {
            assert!(sample.y >= 3.0 && sample.y < 7.0, "y = {}", sample.y);
        }
    }

    #[test]
    fn x_continues_from_start_index_across_ticks() {
        let mut generator = Generator::from_seed(7);
        let mut buffer = SampleBuffer::new();
        let now = Instant::now();
        let config = GeneratorConfig {
            count: 2,
            ..config()
        };
        generator.start(config, 30, now).unwrap();
        generator.poll(now + Duration::from_millis(200), &mut buffer);

        let xs: Vec<f64> = buffer
            .snapshot()
            .samples()
            .iter()
            .map(|sample| sample.x)
            .collect();
        assert_eq!(xs, vec![30.0, 31.0, 32.0, 33.0]);
    }

    #[test]
    fn stop_disarms_the_deadline() {
        let mut generator = Generator::from_seed(7);
        let mut buffer = SampleBuffer::new();
        let now = Instant::now();
        generator.start(config(), 0, now).unwrap();
        generator.stop();
        assert_eq!(generator.state(), RunState::Stopped);

        assert_eq!(
            generator.poll(now + Duration::from_millis(250), &mut buffer),
            0
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn stop_while_stopped_is_a_noop() {
        let mut generator = Generator::from_seed(7);
        generator.stop();
        assert_eq!(generator.state(), RunState::Stopped);
    }

    #[test]
    fn restart_continues_where_the_caller_says() {
        let mut generator = Generator::from_seed(7);
        let mut buffer = SampleBuffer::new();
        let now = Instant::now();
        generator.start(config(), 0, now).unwrap();
        generator.poll(now + Duration::from_millis(100), &mut buffer);
        generator.stop();

        generator
            .start(config(), buffer.len() as u64, now + Duration::from_millis(150))
            .unwrap();
        generator.poll(now + Duration::from_millis(250), &mut buffer);
        assert_eq!(buffer.snapshot().get(5).map(|sample| sample.x), Some(5.0));
    }
}
