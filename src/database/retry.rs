//! Retry schedule for statements against a database that may still be
//! settling.

use std::time::Duration;

/// An incremental-backoff schedule: the nth wait is n times the base delay.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Retry {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for Retry {
    fn default() -> Self {
        Retry {
            attempts: 3,
            delay: Duration::from_millis(100),
        }
    }
}

impl Retry {
    /// The waits between attempts; one fewer than the number of attempts.
    pub fn backoffs(&self) -> impl Iterator<Item = Duration> {
        let delay = self.delay;
        (1..self.attempts).map(move |n| delay * n)
    }
}
