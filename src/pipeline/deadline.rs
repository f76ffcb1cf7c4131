use std::time::{Duration, Instant};
use thiserror::Error;

/// Cooperative per-file time budget, checked between pipeline stages.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Option<Instant>,
    budget: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("analysis exceeded the {} ms time limit", budget.as_millis())]
pub struct DeadlineExceeded {
    pub budget: Duration,
}

impl Deadline {
    pub fn never() -> Self {
        Self {
            expires_at: None,
            budget: Duration::MAX,
        }
    }

    /// A zero budget is already expired.
    pub fn after(budget: Duration) -> Self {
        Self {
            expires_at: Instant::now().checked_add(budget),
            budget,
        }
    }

    pub fn from_timeout(timeout: Option<Duration>) -> Self {
        timeout.map(Self::after).unwrap_or_else(Self::never)
    }

    pub fn check(&self) -> Result<(), DeadlineExceeded> {
        match self.expires_at {
            Some(expires_at) if Instant::now() >= expires_at => Err(DeadlineExceeded {
                budget: self.budget,
            }),
            _ => Ok(()),
        }
    }
}
