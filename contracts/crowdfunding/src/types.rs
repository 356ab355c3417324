//! # Types
//!
//! Shared data structures used across all modules of the crowdfunding contract.
//!
//! ## Config / State split
//!
//! A campaign is stored as separate ledger entries:
//!
//! - [`CampaignConfig`]: descriptive fields the owner edits rarely
//!   (details update, deadline extension).
//! - [`CampaignState`]: lifecycle flags and the tracked balance, rewritten on
//!   every contribution and payout.
//! - `Vec<Tier>` and one [`Backer`] entry per contributing account.
//!
//! The public API returns the reconstructed [`CampaignDetails`].
//!
//! ## Status as a Finite-State Machine
//!
//! ```text
//! Active ──► Successful
//!    └─────► Failed
//! Successful ──(delete)──► Failed
//! ```
//!
//! `Successful` and `Failed` never return to `Active`. See [`crate::settlement`].

use soroban_sdk::{contracttype, Address, String, Vec};

/// Lifecycle status of a campaign.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CampaignStatus {
    /// Accepting contributions.
    Active,
    /// Goal reached; the owner may withdraw.
    Successful,
    /// Deadline passed below goal, or soft-deleted; backers may refund.
    Failed,
}

/// Immutable registry entry appended once per created campaign.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignRecord {
    pub campaign_id: u64,
    pub creator: Address,
    pub name: String,
    pub created_at: u64,
}

/// Owner-editable campaign description.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignConfig {
    pub owner: Address,
    pub name: String,
    pub description: String,
    /// Target amount in the token's smallest unit.
    pub goal: i128,
    /// Ledger timestamp after which an under-funded campaign fails.
    pub deadline: u64,
}

/// Mutable lifecycle state, written on every contribution and payout.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignState {
    /// Last persisted status; see [`crate::settlement::resolve`].
    pub status: CampaignStatus,
    pub paused: bool,
    pub deleted: bool,
    /// Funds held for this campaign by the contract.
    pub balance: i128,
    /// Next stable tier identifier.
    pub next_tier_id: u32,
}

/// A fixed-price contribution option.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tier {
    /// Stable identifier; survives removal of other tiers.
    pub id: u32,
    pub name: String,
    pub amount: i128,
    pub backer_count: u32,
}

/// A contributing account's position in one campaign.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Backer {
    pub total_contribution: i128,
    /// Ids (not positions) of the tiers this backer has paid for.
    pub funded_tiers: Vec<u32>,
}

/// Full view of a campaign, as returned by `get_campaign_details`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignDetails {
    pub campaign_id: u64,
    pub name: String,
    pub description: String,
    pub goal: i128,
    pub deadline: u64,
    pub owner: Address,
    pub paused: bool,
    pub deleted: bool,
    pub state: CampaignStatus,
    pub balance: i128,
    pub tiers: Vec<Tier>,
}
