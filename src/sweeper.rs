//! Delivery-document expiration sweeper.
//!
//! A free-running one-minute loop flips rows from `NOT EXPIRED` to `EXPIRED`
//! once their creation timestamp plus the configured TTL has passed. The
//! transition is terminal; proof submission checks the status again at
//! submission time, so a request racing the sweep within one tick is an
//! accepted outcome. A failed sweep is logged and retried on the next tick.

use crate::error::AppError;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use sqlx::PgPool;
use std::time::Duration;
use tokio::task::JoinHandle;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub const STATUS_NOT_EXPIRED: &str = "NOT EXPIRED";
pub const STATUS_EXPIRED: &str = "EXPIRED";

/// Cutoff for a sweep at `now`: rows created at or before this instant have
/// outlived the TTL (`created_at + ttl <= now`).
pub fn sweep_cutoff(now: DateTime<Utc>, ttl_seconds: i64) -> DateTime<Utc> {
    now - ChronoDuration::seconds(ttl_seconds)
}

/// One bulk update, no per-row iteration. Returns the number of rows flipped.
pub async fn mark_expired_rows(pool: &PgPool, ttl_seconds: i64) -> Result<u64, AppError> {
    let cutoff = sweep_cutoff(Utc::now(), ttl_seconds);
    let result = sqlx::query(
        r#"
        UPDATE delivery_documents
        SET status = $1, updated_at = NOW()
        WHERE status = $2
          AND created_at <= $3
        "#,
    )
    .bind(STATUS_EXPIRED)
    .bind(STATUS_NOT_EXPIRED)
    .bind(cutoff)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Start the sweeper loop. The task runs until aborted at shutdown.
pub fn spawn_sweeper(pool: PgPool, ttl_seconds: i64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        // `interval` fires immediately; skip that tick so the first sweep
        // happens one full period after startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match mark_expired_rows(&pool, ttl_seconds).await {
                Ok(0) => {}
                Ok(n) => tracing::info!(expired = n, "delivery documents expired"),
                Err(e) => tracing::error!("expiration sweep failed: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TTL: i64 = 3600;

    fn sweep_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap()
    }

    #[test]
    fn row_older_than_ttl_is_swept() {
        let now = sweep_time();
        let cutoff = sweep_cutoff(now, TTL);
        let created = now - ChronoDuration::seconds(TTL + 1);
        assert!(created <= cutoff);
    }

    #[test]
    fn row_exactly_ttl_old_is_swept() {
        let now = sweep_time();
        let cutoff = sweep_cutoff(now, TTL);
        let created = now - ChronoDuration::seconds(TTL);
        assert!(created <= cutoff);
    }

    #[test]
    fn row_one_second_short_of_ttl_survives() {
        let now = sweep_time();
        let cutoff = sweep_cutoff(now, TTL);
        let created = now - ChronoDuration::seconds(TTL - 1);
        assert!(created > cutoff);
    }

    #[test]
    fn zero_ttl_sweeps_everything_created_up_to_now() {
        let now = sweep_time();
        let cutoff = sweep_cutoff(now, 0);
        assert!(now <= cutoff);
        assert!(now - ChronoDuration::seconds(1) <= cutoff);
    }
}
