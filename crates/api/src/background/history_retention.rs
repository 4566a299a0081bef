//! Periodic purge of old execution history.
//!
//! History rows age out after a retention window as a store-level policy:
//! application code never filters by age, it simply stops seeing rows
//! once this job has removed them. Runs on a fixed interval using
//! `tokio::time::interval`.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use apiforge_db::repositories::HistoryRepo;

/// Default retention window: 30 days.
const DEFAULT_RETENTION_DAYS: i64 = 30;

/// How often the purge runs.
const PURGE_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the history retention loop.
///
/// Deletes history rows executed more than `retention_days` ago
/// (defaults to 30, override via `HISTORY_RETENTION_DAYS`). Runs until
/// `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    let retention_days: i64 = std::env::var("HISTORY_RETENTION_DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_RETENTION_DAYS);

    tracing::info!(
        retention_days,
        interval_secs = PURGE_INTERVAL.as_secs(),
        "History retention job started"
    );

    let mut interval = tokio::time::interval(PURGE_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("History retention job stopping");
                break;
            }
            _ = interval.tick() => {
                let cutoff = Utc::now() - chrono::Duration::days(retention_days);
                match HistoryRepo::delete_older_than(&pool, cutoff).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "History retention: purged old rows");
                        } else {
                            tracing::debug!("History retention: no rows to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "History retention: purge failed");
                    }
                }
            }
        }
    }
}
