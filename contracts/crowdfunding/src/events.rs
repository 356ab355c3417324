//! Contract events.
//!
//! Every event is published with topics `(symbol, campaign_id)` and a typed
//! payload struct, except the registry pause toggle which carries the
//! registry owner as its second topic.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

use crate::types::CampaignStatus;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignCreated {
    pub campaign_id: u64,
    pub creator: Address,
    pub name: String,
    pub created_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundReceived {
    pub campaign_id: u64,
    pub backer: Address,
    pub amount: i128,
    pub tier_index: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignStateChanged {
    pub campaign_id: u64,
    pub new_state: CampaignStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TierAdded {
    pub campaign_id: u64,
    pub tier_index: u32,
    pub name: String,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TierRemoved {
    pub campaign_id: u64,
    pub tier_index: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsWithdrawn {
    pub campaign_id: u64,
    pub owner: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundIssued {
    pub campaign_id: u64,
    pub backer: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignPaused {
    pub campaign_id: u64,
    pub paused: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeadlineExtended {
    pub campaign_id: u64,
    pub new_deadline: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignDetailsUpdated {
    pub campaign_id: u64,
    pub name: String,
    pub description: String,
    pub goal: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignDeleted {
    pub campaign_id: u64,
    pub by: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdraw {
    pub campaign_id: u64,
    pub owner: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistryPaused {
    pub owner: Address,
    pub paused: bool,
}

pub fn emit_campaign_created(env: &Env, record: &crate::types::CampaignRecord) {
    let topics = (symbol_short!("created"), record.campaign_id);
    let data = CampaignCreated {
        campaign_id: record.campaign_id,
        creator: record.creator.clone(),
        name: record.name.clone(),
        created_at: record.created_at,
    };
    env.events().publish(topics, data);
}

pub fn emit_fund_received(
    env: &Env,
    campaign_id: u64,
    backer: Address,
    amount: i128,
    tier_index: u32,
) {
    let topics = (symbol_short!("funded"), campaign_id);
    let data = FundReceived {
        campaign_id,
        backer,
        amount,
        tier_index,
    };
    env.events().publish(topics, data);
}

pub fn emit_state_changed(env: &Env, campaign_id: u64, new_state: CampaignStatus) {
    let topics = (symbol_short!("state"), campaign_id);
    let data = CampaignStateChanged {
        campaign_id,
        new_state,
    };
    env.events().publish(topics, data);
}

pub fn emit_tier_added(env: &Env, campaign_id: u64, tier_index: u32, name: String, amount: i128) {
    let topics = (symbol_short!("tier_add"), campaign_id);
    let data = TierAdded {
        campaign_id,
        tier_index,
        name,
        amount,
    };
    env.events().publish(topics, data);
}

pub fn emit_tier_removed(env: &Env, campaign_id: u64, tier_index: u32) {
    let topics = (symbol_short!("tier_rm"), campaign_id);
    let data = TierRemoved {
        campaign_id,
        tier_index,
    };
    env.events().publish(topics, data);
}

pub fn emit_funds_withdrawn(env: &Env, campaign_id: u64, owner: Address, amount: i128) {
    let topics = (symbol_short!("withdrawn"), campaign_id);
    let data = FundsWithdrawn {
        campaign_id,
        owner,
        amount,
    };
    env.events().publish(topics, data);
}

pub fn emit_refund_issued(env: &Env, campaign_id: u64, backer: Address, amount: i128) {
    let topics = (symbol_short!("refunded"), campaign_id);
    let data = RefundIssued {
        campaign_id,
        backer,
        amount,
    };
    env.events().publish(topics, data);
}

pub fn emit_campaign_paused(env: &Env, campaign_id: u64, paused: bool) {
    let topics = (symbol_short!("paused"), campaign_id);
    let data = CampaignPaused {
        campaign_id,
        paused,
    };
    env.events().publish(topics, data);
}

pub fn emit_deadline_extended(env: &Env, campaign_id: u64, new_deadline: u64) {
    let topics = (symbol_short!("extended"), campaign_id);
    let data = DeadlineExtended {
        campaign_id,
        new_deadline,
    };
    env.events().publish(topics, data);
}

pub fn emit_details_updated(
    env: &Env,
    campaign_id: u64,
    name: String,
    description: String,
    goal: i128,
) {
    let topics = (symbol_short!("updated"), campaign_id);
    let data = CampaignDetailsUpdated {
        campaign_id,
        name,
        description,
        goal,
    };
    env.events().publish(topics, data);
}

pub fn emit_campaign_deleted(env: &Env, campaign_id: u64, by: Address) {
    let topics = (symbol_short!("deleted"), campaign_id);
    let data = CampaignDeleted { campaign_id, by };
    env.events().publish(topics, data);
}

pub fn emit_emergency_withdraw(env: &Env, campaign_id: u64, owner: Address, amount: i128) {
    let topics = (symbol_short!("emergency"), campaign_id);
    let data = EmergencyWithdraw {
        campaign_id,
        owner,
        amount,
    };
    env.events().publish(topics, data);
}

pub fn emit_registry_paused(env: &Env, owner: Address, paused: bool) {
    let topics = (symbol_short!("reg_pause"), owner.clone());
    let data = RegistryPaused { owner, paused };
    env.events().publish(topics, data);
}
