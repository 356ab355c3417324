//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key              | Type      | Description                           |
//! |------------------|-----------|---------------------------------------|
//! | `Owner`          | `Address` | Registry owner, controls global pause |
//! | `Token`          | `Address` | Contribution token                    |
//! | `Paused`         | `bool`    | Blocks new campaigns only             |
//! | `CampaignCount`  | `u64`     | Next campaign id                      |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                    | Type             | Description                     |
//! |------------------------|------------------|---------------------------------|
//! | `Record(id)`           | `CampaignRecord` | Append-only registry log entry  |
//! | `ByCreator(addr)`      | `Vec<u64>`       | Creator secondary index         |
//! | `Config(id)`           | `CampaignConfig` | Owner-editable description      |
//! | `State(id)`            | `CampaignState`  | Status, flags, balance          |
//! | `Tiers(id)`            | `Vec<Tier>`      | Ordered tiers                   |
//! | `Backer(id, addr)`     | `Backer`         | Per-account contribution        |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.

use soroban_sdk::{contracttype, Address, Env, IntoVal, TryFromVal, Val, Vec};

use crate::types::{Backer, CampaignConfig, CampaignRecord, CampaignState, Tier};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Owner,
    Token,
    Paused,
    CampaignCount,
    Record(u64),
    ByCreator(Address),
    Config(u64),
    State(u64),
    Tiers(u64),
    Backer(u64, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
    bump_instance(env);
}

pub fn get_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Owner)
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
    bump_instance(env);
}

pub fn get_token(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Token)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
    bump_instance(env);
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn campaign_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::CampaignCount)
        .unwrap_or(0)
}

/// Reads, increments, and stores the campaign counter.
/// Returns the id for the *current* campaign (pre-increment value).
pub fn get_and_increment_campaign_id(env: &Env) -> u64 {
    bump_instance(env);
    let current = campaign_count(env);
    env.storage()
        .instance()
        .set(&DataKey::CampaignCount, &(current + 1));
    current
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn load<T>(env: &Env, key: DataKey) -> Option<T>
where
    T: TryFromVal<Env, Val>,
    T::Error: core::fmt::Debug,
{
    let value: Option<T> = env.storage().persistent().get(&key);
    if value.is_some() {
        bump_persistent(env, &key);
    }
    value
}

fn save<T: IntoVal<Env, Val>>(env: &Env, key: DataKey, value: &T) {
    env.storage().persistent().set(&key, value);
    bump_persistent(env, &key);
}

pub fn save_record(env: &Env, record: &CampaignRecord) {
    save(env, DataKey::Record(record.campaign_id), record);
}

pub fn load_record(env: &Env, id: u64) -> Option<CampaignRecord> {
    load(env, DataKey::Record(id))
}

pub fn load_creator_index(env: &Env, creator: &Address) -> Vec<u64> {
    load(env, DataKey::ByCreator(creator.clone())).unwrap_or_else(|| Vec::new(env))
}

pub fn save_creator_index(env: &Env, creator: &Address, ids: &Vec<u64>) {
    save(env, DataKey::ByCreator(creator.clone()), ids);
}

pub fn load_config(env: &Env, id: u64) -> Option<CampaignConfig> {
    load(env, DataKey::Config(id))
}

pub fn save_config(env: &Env, id: u64, config: &CampaignConfig) {
    save(env, DataKey::Config(id), config);
}

pub fn load_state(env: &Env, id: u64) -> Option<CampaignState> {
    load(env, DataKey::State(id))
}

pub fn save_state(env: &Env, id: u64, state: &CampaignState) {
    save(env, DataKey::State(id), state);
}

pub fn load_tiers(env: &Env, id: u64) -> Vec<Tier> {
    load(env, DataKey::Tiers(id)).unwrap_or_else(|| Vec::new(env))
}

pub fn save_tiers(env: &Env, id: u64, tiers: &Vec<Tier>) {
    save(env, DataKey::Tiers(id), tiers);
}

/// Load a backer entry, or an empty position if the account never contributed.
pub fn load_backer(env: &Env, id: u64, backer: &Address) -> Backer {
    load(env, DataKey::Backer(id, backer.clone())).unwrap_or_else(|| Backer {
        total_contribution: 0,
        funded_tiers: Vec::new(env),
    })
}

pub fn save_backer(env: &Env, id: u64, backer: &Address, entry: &Backer) {
    save(env, DataKey::Backer(id, backer.clone()), entry);
}
