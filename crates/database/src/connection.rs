use crate::error::DbError;
use dotenvy::dotenv;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::env;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Readiness probe: the database is only usable once the sales table answers.
const PROBE_SQL: &str = "SELECT 1 FROM histovente LIMIT 1";

/// A bounded retry schedule with a fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

/// Pool sizing for the report run.
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

/// Runs `attempt` until it succeeds or the policy is exhausted.
///
/// The closure receives the 1-based attempt number. There is no pause after
/// the final failed attempt.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut attempt: F) -> Result<T, DbError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut last_error = String::from("no attempt was made");

    for n in 1..=policy.max_attempts {
        match attempt(n).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(
                    attempt = n,
                    max_attempts = policy.max_attempts,
                    error = %e,
                    "Waiting for database..."
                );
                last_error = e.to_string();
                if n < policy.max_attempts {
                    tokio::time::sleep(policy.interval).await;
                }
            }
        }
    }

    Err(DbError::RetriesExhausted {
        attempts: policy.max_attempts,
        last_error,
    })
}

/// Establishes a connection pool to the point-of-sale database.
///
/// Reads `DATABASE_URL` from the environment (a `.env` file is honoured) and
/// keeps trying, per `policy`, until the readiness probe succeeds. The pool
/// returned is known to be ready.
pub async fn connect(policy: &RetryPolicy, settings: &PoolSettings) -> Result<PgPool, DbError> {
    // A missing .env file is fine; the variable may come from the process environment.
    dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_e| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))?;

    let url = database_url.as_str();
    let settings = *settings;
    let pool = retry(policy, move |_| async move {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(url)
            .await?;
        probe(&pool).await?;
        Ok::<_, sqlx::Error>(pool)
    })
    .await?;

    tracing::info!("Database ready.");
    Ok(pool)
}

async fn probe(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(PROBE_SQL).fetch_optional(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            interval: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn returns_first_success() {
        let calls = Cell::new(0);
        let result = retry(&fast(5), |n| {
            calls.set(calls.get() + 1);
            async move { if n < 3 { Err("not yet") } else { Ok(n) } }
        })
        .await
        .unwrap();

        assert_eq!(result, 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_the_bound() {
        let calls = Cell::new(0);
        let result: Result<(), DbError> = retry(&fast(4), |_| {
            calls.set(calls.get() + 1);
            async { Err::<(), _>("connection refused") }
        })
        .await;

        assert_eq!(calls.get(), 4);
        match result {
            Err(DbError::RetriesExhausted { attempts, last_error }) => {
                assert_eq!(attempts, 4);
                assert_eq!(last_error, "connection refused");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn waits_the_fixed_interval_between_attempts() {
        let policy = RetryPolicy {
            max_attempts: 3,
            interval: Duration::from_secs(10),
        };
        let started = tokio::time::Instant::now();
        let _ = retry(&policy, |_| async { Err::<(), _>("down") }).await;

        // Two pauses: none after the last attempt.
        assert_eq!(started.elapsed(), Duration::from_secs(20));
    }
}
