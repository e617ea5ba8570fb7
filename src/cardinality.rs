//! Result-count policy
//!
//! WebDriver lookups return any number of elements. The policy decides
//! whether an empty or crowded result is an error, an absent value, or a
//! reason to keep polling.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::errors::Result;

/// Query variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Exactly one match, now
    Get,
    /// At most one match, now
    Query,
    /// Exactly one match, polling until one appears
    Find,
    /// One or more matches, now
    GetAll,
    /// Any number of matches, now
    QueryAll,
    /// One or more matches, polling until some appear
    FindAll,
}

impl Cardinality {
    pub fn waits(&self) -> bool {
        matches!(self, Cardinality::Find | Cardinality::FindAll)
    }

    pub fn is_plural(&self) -> bool {
        matches!(
            self,
            Cardinality::GetAll | Cardinality::QueryAll | Cardinality::FindAll
        )
    }

    /// Zero matches is a valid outcome rather than an error
    pub fn allows_empty(&self) -> bool {
        matches!(self, Cardinality::Query | Cardinality::QueryAll)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinality::Get => "get",
            Cardinality::Query => "query",
            Cardinality::Find => "find",
            Cardinality::GetAll => "get_all",
            Cardinality::QueryAll => "query_all",
            Cardinality::FindAll => "find_all",
        }
    }
}

/// Outcome of applying a policy to a result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<E> {
    /// Acceptable matches, in document order
    Matched(Vec<E>),
    Empty,
    /// Several matches for a singular policy
    TooMany(Vec<E>),
}

/// Classify `matches` under `policy`
pub fn judge<E>(policy: Cardinality, matches: Vec<E>) -> Verdict<E> {
    if matches.is_empty() {
        Verdict::Empty
    } else if matches.len() > 1 && !policy.is_plural() {
        Verdict::TooMany(matches)
    } else {
        Verdict::Matched(matches)
    }
}

/// Run `attempt` every `interval` until it yields a match or `timeout` passes
///
/// The first attempt runs immediately and a last one runs at the deadline,
/// so a zero timeout means a single attempt. Errors end the poll at once.
pub async fn poll_until_found<E, F, Fut>(
    timeout: Duration,
    interval: Duration,
    mut attempt: F,
) -> Result<Vec<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<E>>>,
{
    let started = Instant::now();
    let deadline = started + timeout;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let found = attempt().await?;
        if !found.is_empty() {
            debug!("Matched after {} attempt(s)", attempts);
            return Ok(found);
        }

        let now = Instant::now();
        if now >= deadline {
            debug!(
                "No match after {} attempt(s) in {}ms",
                attempts,
                (now - started).as_millis()
            );
            return Ok(found);
        }

        sleep(interval.min(deadline - now)).await;
    }
}

#[cfg(test)]
#[path = "cardinality_test.rs"]
mod tests;
