pub mod categorize;
pub mod discover;
pub mod efforts;
pub mod enrich;
pub mod sync;
pub mod tiler;

use crate::error::StravaError;

/// Result of one fan-out item.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    /// Failed on its own; siblings carry on.
    Isolated(String),
    /// Failed in a way that invalidates the whole operation.
    Fatal(StravaError),
}

impl<T> Outcome<T> {
    pub fn from_strava(result: Result<T, StravaError>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(err) if err.is_fatal() => Outcome::Fatal(err),
            Err(err) => Outcome::Isolated(err.to_string()),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Outcome::Fatal(_))
    }
}

/// Keeps successes in order, drops isolated failures and stops at the first fatal one.
pub fn settle<T>(outcomes: Vec<Outcome<T>>) -> Result<Vec<T>, StravaError> {
    let mut values = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Outcome::Success(value) => values.push(value),
            Outcome::Isolated(_) => {}
            Outcome::Fatal(err) => return Err(err),
        }
    }
    Ok(values)
}
