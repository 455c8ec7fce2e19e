//! First-success race over independent attempts.
//!
//! Every attempt runs on its own task. The first `Ok` wins; failures are
//! collected and only reported once every attempt has failed. Losers keep
//! running to completion and their results are dropped.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::sync::oneshot;
use tokio::time::Instant;

/// Why one attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub provider: String,
    pub message: String,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.message)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RaceError {
    #[error("No providers to race")]
    Empty,

    #[error("All providers failed: {}", join_failures(.0))]
    AllFailed(Vec<ProviderFailure>),
}

impl RaceError {
    pub fn failures(&self) -> &[ProviderFailure] {
        match self {
            RaceError::Empty => &[],
            RaceError::AllFailed(failures) => failures,
        }
    }
}

fn join_failures(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

struct Race<T> {
    outstanding: usize,
    failures: Vec<ProviderFailure>,
    /// Taken by whoever decides the race.
    done: Option<oneshot::Sender<Result<T, RaceError>>>,
}

/// Run every attempt concurrently and return the first success.
pub async fn first_success<T, E, F>(attempts: Vec<(String, F)>) -> Result<T, RaceError>
where
    T: Send + 'static,
    E: fmt::Display + Send + 'static,
    F: Future<Output = Result<T, E>> + Send + 'static,
{
    if attempts.is_empty() {
        return Err(RaceError::Empty);
    }

    let (tx, rx) = oneshot::channel();
    let race = Arc::new(Mutex::new(Race {
        outstanding: attempts.len(),
        failures: Vec::new(),
        done: Some(tx),
    }));

    let started = Instant::now();
    for (provider, attempt) in attempts {
        let race = race.clone();
        tokio::spawn(async move {
            // A panicking attempt counts as a failure instead of stalling the race.
            let result = match tokio::spawn(attempt).await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(e) => Err(format!("attempt aborted: {e}")),
            };
            let latency_ms = started.elapsed().as_millis() as u64;

            let mut race = race.lock().unwrap_or_else(PoisonError::into_inner);
            race.outstanding -= 1;

            match result {
                Ok(value) => match race.done.take() {
                    Some(done) => {
                        tracing::info!(provider = %provider, latency_ms, "provider won");
                        let _ = done.send(Ok(value));
                    }
                    None => {
                        tracing::debug!(provider = %provider, latency_ms, "provider finished after the race was decided");
                    }
                },
                Err(message) => {
                    tracing::warn!(provider = %provider, latency_ms, error = %message, "provider failed");
                    race.failures.push(ProviderFailure { provider, message });
                    if race.outstanding == 0 {
                        if let Some(done) = race.done.take() {
                            let failures = std::mem::take(&mut race.failures);
                            let _ = done.send(Err(RaceError::AllFailed(failures)));
                        }
                    }
                }
            }
        });
    }

    rx.await
        .unwrap_or_else(|_| Err(RaceError::AllFailed(Vec::new())))
}
