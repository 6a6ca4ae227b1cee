use std::time::Duration;

use tracing::warn;

/// Bounded fixed-delay retry, the policy the page-collection loop runs
/// under. Deliberately independent of what is being retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Run `op` up to `max_attempts` times, sleeping `delay` between
    /// attempts. Returns the first success or the last error; the closure
    /// receives the 1-based attempt number.
    pub fn run<T, E, F>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnMut(u32) -> Result<T, E>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts => {
                    warn!(
                        "{} failed (attempt {}/{}): {}, retrying in {:.0}s",
                        label,
                        attempt,
                        self.max_attempts,
                        err,
                        self.delay.as_secs_f64()
                    );
                    std::thread::sleep(self.delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> RetryPolicy {
        RetryPolicy::new(3, Duration::ZERO)
    }

    #[test]
    fn succeeds_first_try() {
        let mut calls = 0;
        let out: Result<i32, String> = instant().run("op", |_| {
            calls += 1;
            Ok(7)
        });
        assert_eq!(out.unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[test]
    fn recovers_within_budget() {
        let mut calls = 0;
        let out: Result<i32, String> = instant().run("op", |attempt| {
            calls += 1;
            if attempt < 3 {
                Err("transient".to_string())
            } else {
                Ok(attempt as i32)
            }
        });
        assert_eq!(out.unwrap(), 3);
        assert_eq!(calls, 3);
    }

    #[test]
    fn exhausted_budget_returns_last_error() {
        let mut calls = 0;
        let out: Result<i32, String> = instant().run("op", |attempt| {
            calls += 1;
            Err(format!("boom {attempt}"))
        });
        assert_eq!(out.unwrap_err(), "boom 3");
        assert_eq!(calls, 3);
    }

    #[test]
    fn at_least_one_attempt() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts, 1);
    }
}
