//! Join combinators for concurrently running backend slots.
//!
//! Initialisation uses [`strict_join`]: every slot runs to completion and a
//! single failure fails the whole join. Teardown uses [`lenient_join`]:
//! every slot runs to completion and failures are only observed in the
//! returned values.

use futures_util::future::{BoxFuture, join_all};
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::future::Future;

/// Outcome of a [`strict_join`] in which at least one future failed.
#[derive(Debug)]
pub struct JoinFailure<T, E> {
    /// First error observed, in completion order.
    pub error: E,
    /// Values of the futures that succeeded, in input order.
    pub succeeded: Vec<T>,
}

/// Runs every future concurrently and waits for all of them.
///
/// Returns the values in input order when every future succeeds. Otherwise
/// returns the first error in completion order together with the values of
/// the futures that did succeed, so the caller can release them.
///
/// # Errors
///
/// Returns [`JoinFailure`] when any future fails.
pub async fn strict_join<T, E>(
    futures: Vec<BoxFuture<'_, Result<T, E>>>,
) -> Result<Vec<T>, JoinFailure<T, E>> {
    let mut pending: FuturesUnordered<_> = futures
        .into_iter()
        .enumerate()
        .map(|(index, future)| async move { (index, future.await) })
        .collect();

    let mut succeeded = Vec::new();
    let mut first_error = None;
    while let Some((index, outcome)) = pending.next().await {
        match outcome {
            Ok(value) => succeeded.push((index, value)),
            Err(error) => {
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }
    }

    succeeded.sort_by_key(|(index, _)| *index);
    let values = succeeded.into_iter().map(|(_, value)| value).collect();
    match first_error {
        Some(error) => Err(JoinFailure {
            error,
            succeeded: values,
        }),
        None => Ok(values),
    }
}

/// Runs every future concurrently and returns all outputs in input order.
pub async fn lenient_join<I>(futures: I) -> Vec<<I::Item as Future>::Output>
where
    I: IntoIterator,
    I::Item: Future,
{
    join_all(futures).await
}
