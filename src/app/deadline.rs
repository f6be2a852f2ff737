//! External deadline policy for query execution.
//!
//! The engine itself never times out a query. The CLI wraps its executor in
//! [`DeadlineExecutor`] so a slow statement becomes an
//! [`ExecutionError::Timeout`] instead of hanging the run.

use std::{future::Future, time::Duration};

use tracing::warn;

use crate::{
    error::ExecutionError,
    executor::{ExecutionResult, QueryExecutor}
};

/// Executor decorator enforcing a per-query deadline
pub struct DeadlineExecutor<E> {
    inner: E,
    limit: Duration
}

impl<E: QueryExecutor + Send> DeadlineExecutor<E> {
    /// Wrap `inner`. Non-positive, non-finite and out-of-range limits disable
    /// the deadline.
    pub fn new(inner: E, seconds: f64) -> Self {
        let limit = if seconds.is_finite() && seconds > 0.0 {
            Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
        } else {
            Duration::MAX
        };
        Self {
            inner,
            limit
        }
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    async fn execute_with_deadline(
        &mut self,
        query: &str
    ) -> Result<ExecutionResult, ExecutionError> {
        if self.limit == Duration::MAX {
            return self.inner.execute(query).await;
        }
        match tokio::time::timeout(self.limit, self.inner.execute(query)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(query, seconds = self.limit.as_secs_f64(), "query timed out");
                Err(ExecutionError::Timeout {
                    query:   query.to_string(),
                    seconds: self.limit.as_secs_f64()
                })
            }
        }
    }
}

impl<E: QueryExecutor + Send> QueryExecutor for DeadlineExecutor<E> {
    fn execute(
        &mut self,
        query: &str
    ) -> impl Future<Output = Result<ExecutionResult, ExecutionError>> + Send {
        self.execute_with_deadline(query)
    }
}
