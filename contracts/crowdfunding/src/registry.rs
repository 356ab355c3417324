//! # Registry
//!
//! Append-only log of [`CampaignRecord`]s with a creator-keyed secondary
//! index of campaign ids. Records are written once and never edited or
//! removed; deleting a campaign only flips its `deleted` flag.

use soroban_sdk::{Address, Env, String, Vec};

use crate::storage;
use crate::types::CampaignRecord;

/// Allocate the next campaign id and append its record to both views.
pub fn append(env: &Env, creator: &Address, name: &String) -> CampaignRecord {
    let campaign_id = storage::get_and_increment_campaign_id(env);
    let record = CampaignRecord {
        campaign_id,
        creator: creator.clone(),
        name: name.clone(),
        created_at: env.ledger().timestamp(),
    };
    storage::save_record(env, &record);

    let mut ids = storage::load_creator_index(env, creator);
    ids.push_back(campaign_id);
    storage::save_creator_index(env, creator, &ids);

    record
}

pub fn find(env: &Env, campaign_id: u64) -> Option<CampaignRecord> {
    storage::load_record(env, campaign_id)
}

/// Every record, in creation order.
///
/// One ledger read per campaign: past a few dozen campaigns this hits the
/// per-invocation read limit. Use [`page`] for large registries.
pub fn all(env: &Env) -> Vec<CampaignRecord> {
    page(env, 0, u32::MAX)
}

/// Up to `limit` records starting at id `start`, in creation order.
pub fn page(env: &Env, start: u64, limit: u32) -> Vec<CampaignRecord> {
    let count = storage::campaign_count(env);
    let end = start.saturating_add(u64::from(limit)).min(count);

    let mut records = Vec::new(env);
    for id in start..end {
        if let Some(record) = storage::load_record(env, id) {
            records.push_back(record);
        }
    }
    records
}

/// Records created by `creator`, in creation order.
pub fn by_creator(env: &Env, creator: &Address) -> Vec<CampaignRecord> {
    let mut records = Vec::new(env);
    for id in storage::load_creator_index(env, creator).iter() {
        if let Some(record) = storage::load_record(env, id) {
            records.push_back(record);
        }
    }
    records
}
