//! Background poller: pulls contract events from the RPC, stores them and
//! advances the persisted cursor.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::db;
use crate::errors::Result;
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Poll until `shutdown` is cancelled. A failed poll is logged and retried
/// on the next tick from the same position.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!(contract = %state.config.contract_id, "Indexer starting");

    let (mut ledger, mut cursor) = match resume_point(&state).await {
        Ok(point) => point,
        Err(e) => {
            error!("Could not read saved cursor, starting from config: {e}");
            (state.config.start_ledger, None)
        }
    };
    info!("Resuming from ledger {ledger}");

    let interval = Duration::from_secs(state.config.poll_interval_secs);
    loop {
        let polled = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = poll_once(&state, ledger, cursor.as_deref()) => result,
        };
        match polled {
            Ok((next_ledger, next_cursor)) => {
                ledger = next_ledger;
                cursor = next_cursor;
            }
            Err(e) => error!("Indexer poll error: {e}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    info!("Indexer stopped at ledger {ledger}");
}

async fn resume_point(state: &IndexerState) -> Result<(u32, Option<String>)> {
    let saved = db::get_last_ledger(&state.pool).await?;
    let cursor = db::get_cursor_string(&state.pool).await?;
    let ledger = if saved > 0 {
        saved as u32
    } else {
        state.config.start_ledger
    };
    Ok((ledger, cursor))
}

/// One fetch-decode-store round. Returns the next `(ledger, cursor)`.
async fn poll_once(
    state: &IndexerState,
    start_ledger: u32,
    cursor: Option<&str>,
) -> Result<(u32, Option<String>)> {
    let config = &state.config;
    let page = rpc::fetch_events(
        &state.client,
        &config.rpc_url,
        &config.contract_id,
        start_ledger,
        cursor,
        config.events_per_page,
    )
    .await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, &config.contract_id);
        let inserted = db::insert_events(&state.pool, &decoded).await?;
        info!(
            fetched = page.events.len(),
            stored = inserted,
            "Indexed event page"
        );
    }

    let next_ledger = next_ledger(start_ledger, page.latest_ledger);
    db::save_cursor(&state.pool, i64::from(next_ledger), page.cursor.as_deref()).await?;
    Ok((next_ledger, page.cursor))
}

/// The ledger never moves backwards, even if the RPC reports a stale tip.
fn next_ledger(start: u32, latest: Option<u64>) -> u32 {
    latest
        .map(|l| u32::try_from(l).unwrap_or(u32::MAX).max(start))
        .unwrap_or(start)
}
