//! # Settlement
//!
//! One canonical status function, shared by the mutating path ([`resolve`],
//! which persists and announces transitions) and the read path
//! (`get_campaign_status`, which only reports).
//!
//! Rules, in order:
//!
//! 1. A deleted campaign is `Failed`.
//! 2. A campaign that already left `Active` keeps its status.
//! 3. `balance >= goal` ⇒ `Successful`, even at or past the deadline.
//! 4. `now >= deadline` ⇒ `Failed`.
//! 5. Otherwise `Active`.

use soroban_sdk::Env;

use crate::events;
use crate::types::{CampaignConfig, CampaignState, CampaignStatus};

/// Derive the effective status of a campaign.
pub fn compute_status(
    current: CampaignStatus,
    balance: i128,
    goal: i128,
    deadline: u64,
    now: u64,
    deleted: bool,
) -> CampaignStatus {
    if deleted {
        return CampaignStatus::Failed;
    }
    if current != CampaignStatus::Active {
        return current;
    }
    if balance >= goal {
        CampaignStatus::Successful
    } else if now >= deadline {
        CampaignStatus::Failed
    } else {
        CampaignStatus::Active
    }
}

/// Effective status of a stored campaign at the current ledger time.
pub fn effective_status(
    env: &Env,
    config: &CampaignConfig,
    state: &CampaignState,
) -> CampaignStatus {
    compute_status(
        state.status,
        state.balance,
        config.goal,
        config.deadline,
        env.ledger().timestamp(),
        state.deleted,
    )
}

/// Apply the status function to `state` in place, emitting
/// `CampaignStateChanged` when it moves. The caller persists `state`.
pub fn resolve(
    env: &Env,
    campaign_id: u64,
    config: &CampaignConfig,
    state: &mut CampaignState,
) -> CampaignStatus {
    let next = effective_status(env, config, state);
    if next != state.status {
        state.status = next;
        events::emit_state_changed(env, campaign_id, next);
    }
    next
}
