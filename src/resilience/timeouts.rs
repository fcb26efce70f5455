//! Timeout enforcement.
//!
//! # Responsibilities
//! - Give each upstream call one deadline shared by every phase
//!   (connect, response head, body)
//! - Cancel the in-flight call cleanly when the deadline passes
//!
//! # Design Decisions
//! - Uses Tokio's `timeout_at`; the timed-out future is dropped, which
//!   closes its connection
//! - Timeout errors are distinct from transport errors (504 vs 502)

use std::future::Future;
use std::time::Duration;

use tokio::time::{error::Elapsed, timeout_at, Instant};

/// A fixed point in time by which an upstream call must finish.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    /// Deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    /// Run `fut` until it completes or the deadline passes.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Elapsed> {
        timeout_at(self.at, fut).await
    }

    /// The full time allowed, for reporting.
    pub fn budget(&self) -> Duration {
        self.budget
    }
}
