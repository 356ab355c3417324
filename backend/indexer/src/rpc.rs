//! Soroban RPC client: polls `getEvents` for the crowdfunding contract and
//! decodes the results into [`CampaignEvent`]s.
//!
//! Transport errors, HTTP 429 and soft JSON-RPC errors are retried with
//! exponential back-off capped at [`MAX_BACKOFF_SECS`]. Malformed requests
//! (`-32600`) and unknown methods (`-32601`) are returned as hard errors.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{CampaignEvent, EventKind};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Unique per event: `<toid>-<event index>`.
    pub id: Option<String>,
    pub topic: Vec<String>,
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    /// Events from failed invocations are rolled back on chain.
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
}

/// One page of `getEvents` output.
#[derive(Debug)]
pub struct EventPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

// ─────────────────────────────────────────────────────────
// Fetching
// ─────────────────────────────────────────────────────────

/// Fetch one page of contract events, starting at `start_ledger` or
/// continuing from `cursor` when one is given.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventPage> {
    let mut backoff = INITIAL_BACKOFF_SECS;
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getEvents",
        "params": build_params(contract_id, start_ledger, cursor, limit),
    });

    loop {
        let resp = match client.post(rpc_url).json(&request).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("RPC request failed, retrying in {backoff}s: {e}");
                backoff = wait(backoff).await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate-limited by RPC, retrying in {backoff}s");
            backoff = wait(backoff).await;
            continue;
        }

        let body: RpcResponse = resp.json().await?;

        if let Some(err) = body.error {
            if is_hard_error(err.code) {
                return Err(IndexerError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            warn!(
                "RPC soft error {} ({}), retrying in {backoff}s",
                err.code, err.message
            );
            backoff = wait(backoff).await;
            continue;
        }

        let result = body
            .result
            .ok_or_else(|| IndexerError::EventParse("empty result from getEvents".to_string()))?;

        debug!(
            events = result.events.len(),
            latest_ledger = ?result.latest_ledger,
            "Fetched event page"
        );

        return Ok(EventPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        });
    }
}

/// Sleep for `secs` and return the next back-off delay.
async fn wait(secs: u64) -> u64 {
    tokio::time::sleep(Duration::from_secs(secs)).await;
    next_backoff(secs)
}

fn next_backoff(secs: u64) -> u64 {
    secs.saturating_mul(2).min(MAX_BACKOFF_SECS)
}

fn is_hard_error(code: i64) -> bool {
    code == -32600 || code == -32601
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [{ "type": "contract", "contractIds": [contract_id] }],
        "pagination": { "limit": limit },
    });

    // The RPC rejects startLedger together with a cursor.
    match cursor {
        Some(cur) => params["pagination"]["cursor"] = json!(cur),
        None => params["startLedger"] = json!(start_ledger),
    }
    params
}

// ─────────────────────────────────────────────────────────
// Decoding
// ─────────────────────────────────────────────────────────

/// Decode raw RPC events, skipping those from failed invocations and those
/// with no topics.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<CampaignEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call != Some(false))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<CampaignEvent> {
    let kind = EventKind::from_topic(&topic_value(raw.topic.first()?));
    let second = raw.topic.get(1).map(|t| topic_value(t));

    let (campaign_id, topic_actor) = if kind.is_registry_event() {
        (None, second)
    } else {
        (second, None)
    };

    let fields = decode_data(&raw.value, kind);
    let ledger = raw.ledger.unwrap_or(0) as i64;

    Some(CampaignEvent {
        event_id: raw.id.clone().unwrap_or_else(|| fallback_event_id(raw, ledger)),
        event_type: kind.as_str().to_string(),
        campaign_id,
        actor: fields.actor.or(topic_actor),
        amount: fields.amount,
        detail: fields.detail,
        ledger,
        timestamp: raw
            .ledger_closed_at
            .as_deref()
            .and_then(parse_iso_to_unix)
            .unwrap_or(0),
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Stand-in identity for an event the RPC sent without an `id`. Built from
/// the full topics and payload so two events of the same kind in one
/// transaction still differ.
fn fallback_event_id(raw: &RawEvent, ledger: i64) -> String {
    format!(
        "{ledger}:{}:{}:{}",
        raw.tx_hash.as_deref().unwrap_or(""),
        raw.topic.join(","),
        raw.value
    )
}

#[derive(Debug, Default, PartialEq)]
struct DataFields {
    actor: Option<String>,
    amount: Option<String>,
    detail: Option<String>,
}

/// Pick the stored columns out of an event payload. Field names follow the
/// contract's event structs.
fn decode_data(value: &Value, kind: EventKind) -> DataFields {
    let field = |key: &str| field_string(value, key);

    match kind {
        EventKind::CampaignCreated => DataFields {
            actor: field("creator"),
            amount: None,
            detail: field("name"),
        },
        EventKind::FundReceived => DataFields {
            actor: field("backer"),
            amount: field("amount"),
            detail: field("tier_index"),
        },
        EventKind::StateChanged => DataFields {
            detail: field("new_state"),
            ..Default::default()
        },
        EventKind::TierAdded => DataFields {
            actor: None,
            amount: field("amount"),
            detail: field("tier_index"),
        },
        EventKind::TierRemoved => DataFields {
            detail: field("tier_index"),
            ..Default::default()
        },
        EventKind::FundsWithdrawn | EventKind::EmergencyWithdraw => DataFields {
            actor: field("owner"),
            amount: field("amount"),
            detail: None,
        },
        EventKind::RefundIssued => DataFields {
            actor: field("backer"),
            amount: field("amount"),
            detail: None,
        },
        EventKind::CampaignPaused => DataFields {
            detail: field("paused"),
            ..Default::default()
        },
        EventKind::DeadlineExtended => DataFields {
            detail: field("new_deadline"),
            ..Default::default()
        },
        EventKind::DetailsUpdated => DataFields {
            actor: None,
            amount: field("goal"),
            detail: field("name"),
        },
        EventKind::CampaignDeleted => DataFields {
            actor: field("by"),
            ..Default::default()
        },
        EventKind::RegistryPaused => DataFields {
            actor: field("owner"),
            amount: None,
            detail: field("paused"),
        },
        EventKind::Unknown => DataFields::default(),
    }
}

/// Read `key` from a payload object as a string, searching nested objects
/// when it is not at the top level.
fn field_string(value: &Value, key: &str) -> Option<String> {
    match value {
        Value::Object(map) => match map.get(key) {
            Some(v) => scalar_string(v),
            None => map.values().find_map(|v| field_string(v, key)),
        },
        _ => None,
    }
}

/// Render a JSON scalar as a string. Unit enum variants arrive as a
/// one-element array holding the variant name.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => items.first().and_then(scalar_string),
        Value::Object(map) => map.get("value").and_then(scalar_string),
        Value::Null => None,
    }
}

/// Topic entries come back either as a `{"type":…,"value":…}` JSON object or
/// as the raw value.
fn topic_value(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|v| v.get("value").and_then(scalar_string))
        .unwrap_or_else(|| raw.to_string())
}

fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
