//! Wall-clock and process CPU timing for sweep summaries.
//!
//! CPU time is read from `/proc/self/schedstat` on Linux and is unavailable
//! elsewhere.

use std::time::{Duration, Instant};

#[cfg(target_os = "linux")]
use std::fs;

/// Returns the CPU time consumed by this process so far, when the platform
/// exposes it.
#[must_use]
pub fn process_cpu_time() -> Option<Duration> {
    #[cfg(target_os = "linux")]
    {
        fs::read_to_string("/proc/self/schedstat")
            .ok()
            .and_then(|text| parse_schedstat(&text))
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

#[cfg(target_os = "linux")]
fn parse_schedstat(text: &str) -> Option<Duration> {
    text.split_whitespace()
        .next()?
        .parse::<u64>()
        .ok()
        .map(Duration::from_nanos)
}

/// Elapsed wall and CPU time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timing {
    /// Wall-clock time.
    pub wall: Duration,
    /// CPU time, when available.
    pub cpu: Option<Duration>,
}

impl Timing {
    /// Returns the time per step, preferring CPU time when it is known.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use isosweep_core::Timing;
    ///
    /// let timing = Timing { wall: Duration::from_secs(10), cpu: None };
    /// assert_eq!(timing.per_step(4), Duration::from_millis(2500));
    /// assert_eq!(timing.per_step(0), Duration::ZERO);
    /// ```
    #[must_use]
    pub fn per_step(&self, steps: usize) -> Duration {
        let total = self.cpu.unwrap_or(self.wall);
        u32::try_from(steps)
            .ok()
            .and_then(|steps| total.checked_div(steps))
            .unwrap_or(Duration::ZERO)
    }
}

/// Captures start times and reports elapsed [`Timing`].
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    started: Instant,
    cpu_started: Option<Duration>,
}

impl Stopwatch {
    /// Starts timing now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            cpu_started: process_cpu_time(),
        }
    }

    /// Returns the time elapsed since [`Stopwatch::start`].
    #[must_use]
    pub fn elapsed(&self) -> Timing {
        let cpu = self
            .cpu_started
            .zip(process_cpu_time())
            .map(|(start, now)| now.saturating_sub(start));
        Timing {
            wall: self.started.elapsed(),
            cpu,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[cfg(target_os = "linux")]
    #[rstest]
    #[case("123456789 2000 17\n", Some(Duration::from_nanos(123_456_789)))]
    #[case("", None)]
    #[case("garbage 1 2\n", None)]
    fn parse_schedstat_reads_the_first_field(
        #[case] text: &str,
        #[case] expected: Option<Duration>,
    ) {
        assert_eq!(parse_schedstat(text), expected);
    }

    #[rstest]
    fn per_step_prefers_cpu_time() {
        let timing = Timing {
            wall: Duration::from_secs(100),
            cpu: Some(Duration::from_secs(10)),
        };
        assert_eq!(timing.per_step(5), Duration::from_secs(2));
    }

    #[rstest]
    fn stopwatch_is_monotonic() {
        let watch = Stopwatch::start();
        let first = watch.elapsed();
        let second = watch.elapsed();
        assert!(second.wall >= first.wall);
    }
}
