//! Periodic tick executor
//!
//! The scheduler owns no clock. Every wait goes through the injected
//! [`DelayNs`], so tests can count waits instead of sleeping.

use embedded_hal::delay::DelayNs;

/// Reference refresh period
pub const DEFAULT_PERIOD_MS: u32 = 60_000;

/// Fixed-period tick scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scheduler {
    period_ms: u32,
    ticks: u32,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD_MS)
    }
}

impl Scheduler {
    /// Create a scheduler with the given period
    pub const fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            ticks: 0,
        }
    }

    /// Period between ticks
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Wait before the next tick (none before the first)
    pub fn next_wait_ms(&self) -> u32 {
        if self.ticks == 0 {
            0
        } else {
            self.period_ms
        }
    }

    /// Wait if due, then run one tick
    pub fn step<D, T, F>(&mut self, delay: &mut D, task: &mut F) -> T
    where
        D: DelayNs,
        F: FnMut(&mut D) -> T,
    {
        let wait = self.next_wait_ms();
        if wait > 0 {
            delay.delay_ms(wait);
        }
        self.ticks = self.ticks.wrapping_add(1);

        #[cfg(feature = "defmt")]
        defmt::debug!("Tick {}", self.ticks);

        task(delay)
    }

    /// Run exactly `count` ticks
    pub fn run_for<D, T, F>(&mut self, delay: &mut D, count: u32, mut task: F)
    where
        D: DelayNs,
        F: FnMut(&mut D) -> T,
    {
        for _ in 0..count {
            self.step(delay, &mut task);
        }
    }

    /// Run forever
    pub fn run<D, T, F>(&mut self, delay: &mut D, mut task: F) -> !
    where
        D: DelayNs,
        F: FnMut(&mut D) -> T,
    {
        loop {
            self.step(delay, &mut task);
        }
    }
}
